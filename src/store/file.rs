//! Snapshot file I/O: pretty JSON, written atomically (temp file + rename).

use crate::errors::AppResult;
use crate::models::snapshot::RosterSnapshot;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "snapshot.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}

/// Read the snapshot at `path`. `Ok(None)` when the file does not exist.
pub fn load_snapshot(path: &Path) -> AppResult<Option<RosterSnapshot>> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let snapshot = serde_json::from_str(&content)?;
    Ok(Some(snapshot))
}

pub fn save_snapshot(path: &Path, snapshot: &RosterSnapshot) -> AppResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(snapshot)?;
    let tmp = temp_path(path);
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
