//! CSV exports
//!
//! Export endpoints answer with CSV bytes which are written next to each
//! other as `<base>-<YYYY-MM-DD>.csv`.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use ayur_core::{PortalError, PortalResult};

pub fn export_file_name(base: &str, date: NaiveDate) -> String {
    format!("{base}-{}.csv", date.format("%Y-%m-%d"))
}

/// Write `bytes` into `directory`, replacing a same-day export
pub async fn save_export(
    directory: &Path,
    base: &str,
    date: NaiveDate,
    bytes: &[u8],
) -> PortalResult<PathBuf> {
    tokio::fs::create_dir_all(directory)
        .await
        .map_err(|e| PortalError::Internal(format!("cannot create {}: {e}", directory.display())))?;

    let path = directory.join(export_file_name(base, date));
    tokio::fs::write(&path, bytes)
        .await
        .map_err(|e| PortalError::Internal(format!("cannot write {}: {e}", path.display())))?;

    tracing::info!(path = %path.display(), bytes = bytes.len(), "export saved");
    Ok(path)
}
