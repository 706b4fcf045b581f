use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::backup::{BackupLogic, ask_overwrite};
use crate::errors::AppResult;
use crate::store::{RosterStore, log};
use crate::ui::messages::warning;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Backup { file, compress } = cmd {
        let mut store = RosterStore::restore(cfg.snapshot_path());
        if let Some(written) = BackupLogic::backup(&mut store, file, *compress, ask_overwrite)? {
            if let Err(e) = log::ttlog(
                &cfg.activity_path(),
                "backup",
                &written.display().to_string(),
                if *compress { "Compressed backup created" } else { "Backup created" },
            ) {
                warning(format!("Failed to write internal log: {}", e));
            }
        }
    }

    Ok(())
}
