// src/export/fs_utils.rs

use crate::errors::{AppError, AppResult};
use crate::core::backup::ask_overwrite;
use crate::ui::messages::info;
use std::path::Path;

/// Ok when `path` may be written: absent, `force`, or confirmed by the user.
pub(crate) fn ensure_writable(path: &Path, force: bool) -> AppResult<()> {
    if !path.exists() || force {
        return Ok(());
    }

    if ask_overwrite(path) {
        info("Existing file will be overwritten.");
        Ok(())
    } else {
        Err(AppError::Export(
            "export cancelled: existing file not overwritten".into(),
        ))
    }
}
