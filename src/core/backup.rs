use crate::errors::{AppError, AppResult};
use crate::store::RosterStore;
use crate::ui::messages::{info, success, warning};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::FileOptions;

pub struct BackupLogic;

impl BackupLogic {
    /// Copy the snapshot to `dest_file`, optionally zipped. Returns the path
    /// written, or `None` when the operator declined to overwrite.
    pub fn backup(
        store: &mut RosterStore,
        dest_file: &str,
        compress: bool,
        confirm: impl Fn(&Path) -> bool,
    ) -> AppResult<Option<PathBuf>> {
        let src = store
            .path()
            .map(Path::to_path_buf)
            .ok_or_else(|| AppError::Other("roster has no snapshot file".into()))?;
        let dest = Path::new(dest_file);

        // pending in-memory changes go to disk first
        store.flush()?;

        if !src.exists() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Snapshot not found: {}", src.display()),
            )
            .into());
        }

        if let Some(parent) = dest.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let final_path = if compress {
            dest.with_extension("zip")
        } else {
            dest.to_path_buf()
        };

        if final_path.exists() && !confirm(&final_path) {
            info("Backup cancelled.");
            return Ok(None);
        }

        if compress {
            compress_snapshot(&src, &final_path)?;
        } else {
            fs::copy(&src, &final_path)?;
        }
        success(format!("Backup created: {}", final_path.display()));
        Ok(Some(final_path))
    }
}

/// Interactive overwrite prompt used by the CLI.
pub fn ask_overwrite(path: &Path) -> bool {
    warning(format!("The file '{}' already exists.", path.display()));
    print!("Overwrite? [y/N]: ");
    io::stdout().flush().ok();

    let mut answer = String::new();
    if io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

fn compress_snapshot(src: &Path, zip_path: &Path) -> AppResult<()> {
    let file = fs::File::create(zip_path)?;
    let mut zip = ZipWriter::new(file);

    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let name = src
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "snapshot.json".to_string());
    zip.start_file(name, options).map_err(io::Error::other)?;

    let mut f = fs::File::open(src)?;
    io::copy(&mut f, &mut zip)?;
    zip.finish().map_err(io::Error::other)?;
    Ok(())
}
