pub mod backup;
pub mod clock;
pub mod coordinator;
pub mod liveness;
pub mod log;
pub mod mirror;
pub mod reconcile;
pub mod setup;
pub mod summary;

pub use coordinator::Coordinator;
pub use reconcile::{IgnoreReason, Outcome, Rejection};
pub use setup::{SetupReport, SetupRequest};
