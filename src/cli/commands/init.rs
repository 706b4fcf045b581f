use crate::cli::parser::Cli;
use crate::config::Config;
use crate::errors::AppResult;
use crate::store::log;
use crate::ui::messages::{success, warning};

/// Handle the `init` command
///
/// Creates the config directory and file (skipped with `--test`), the data
/// directory and an empty roster snapshot.
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    println!("⚙️  Initializing rGameNight…");
    cfg.model()?;
    cfg.schedule.rule()?;
    cfg.init_all(cli.test)?;

    if let Err(e) = log::ttlog(
        &cfg.activity_path(),
        "init",
        "",
        &format!("Initialized at {}", cfg.data_path().display()),
    ) {
        warning(format!("Failed to write internal log: {}", e));
    }

    success("rGameNight initialization completed!");
    Ok(())
}
