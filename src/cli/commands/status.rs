use crate::cli::commands::open;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{header, info};

/// Print the roster summary. Nothing is written.
pub fn handle(cfg: &Config) -> AppResult<()> {
    let coord = open(cfg)?;
    let summary = coord.status();

    header(&summary.title);
    println!("{}", summary.render());

    match coord.store().snapshot().message_id {
        Some(message) => info(format!("Bound to message {message}")),
        None => info("No signup message bound yet; run `setup`"),
    }
    Ok(())
}
