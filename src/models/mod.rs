pub mod category;
pub mod entry;
pub mod ids;
pub mod occurrence;
pub mod settings;
pub mod signal;
pub mod snapshot;
