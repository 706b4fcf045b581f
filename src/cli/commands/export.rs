use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::store::{RosterStore, log};
use crate::ui::messages::warning;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        force,
    } = cmd
    {
        let model = cfg.model()?;
        let store = RosterStore::restore(cfg.snapshot_path());
        let rows = ExportLogic::export(&model, &store, format.clone(), file, *force)?;

        if let Err(e) = log::ttlog(
            &cfg.activity_path(),
            "export",
            file,
            &format!("{} rows as {}", rows.len(), format.as_str()),
        ) {
            warning(format!("Failed to write internal log: {}", e));
        }
    }
    Ok(())
}
