// src/export/logic.rs

use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::{RosterExport, roster_rows};
use crate::models::category::CategoryModel;
use crate::store::RosterStore;
use crate::ui::messages::warning;
use std::path::Path;

pub struct ExportLogic;

impl ExportLogic {
    /// Export the current roster. `file` must be an absolute path.
    pub fn export(
        model: &CategoryModel,
        store: &RosterStore,
        format: ExportFormat,
        file: &str,
        force: bool,
    ) -> AppResult<Vec<RosterExport>> {
        let path = Path::new(file);

        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "Output file path must be absolute: {file}"
            )));
        }

        ensure_writable(path, force)?;

        let rows = roster_rows(model, store);
        if rows.is_empty() {
            warning("Roster is empty, writing an empty export.");
        }

        match format {
            ExportFormat::Csv => export_csv(&rows, path)?,
            ExportFormat::Json => export_json(&rows, path)?,
        }

        Ok(rows)
    }
}
