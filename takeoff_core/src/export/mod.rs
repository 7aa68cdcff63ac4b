//! # Exports
//!
//! Thin text formatters over takeoff output:
//!
//! - [`to_tsv`]: quantity table for pasting into a spreadsheet
//! - [`members_to_csv`]: one row per member with both endpoints
//! - [`to_staad`]: STAAD-style joint / member block (geometry only)
//! - [`to_ifc`]: not supported
//!
//! Formatters build a `String`; [`write_export`] puts it on disk with a
//! temp-file-and-rename so a failed write never leaves a half file behind.

mod csv;
mod staad;
mod tsv;

pub use csv::members_to_csv;
pub use staad::to_staad;
pub use tsv::to_tsv;

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::errors::{TakeoffError, TakeoffResult};
use crate::members::MemberRecord;

/// IFC / BIM export. Always fails with `Unsupported`.
pub fn to_ifc(_members: &[MemberRecord]) -> TakeoffResult<String> {
    Err(TakeoffError::unsupported("IFC export"))
}

/// Write export text to `path` atomically.
pub fn write_export(path: &Path, contents: &str) -> TakeoffResult<()> {
    write_export_bytes(path, contents.as_bytes())
}

/// Write binary output (e.g. a PDF report) to `path` atomically.
pub fn write_export_bytes(path: &Path, contents: &[u8]) -> TakeoffResult<()> {
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = Path::new(&tmp_name);

    let mut tmp_file = File::create(tmp_path)
        .map_err(|e| TakeoffError::file_error("create temp file", tmp_path.display().to_string(), e.to_string()))?;
    tmp_file
        .write_all(contents)
        .map_err(|e| TakeoffError::file_error("write temp file", tmp_path.display().to_string(), e.to_string()))?;
    tmp_file
        .sync_all()
        .map_err(|e| TakeoffError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string()))?;

    fs::rename(tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(tmp_path);
        TakeoffError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    info!(path = %path.display(), bytes = contents.len(), "Wrote export");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::temp_dir;

    #[test]
    fn test_ifc_unsupported() {
        let err = to_ifc(&[]).unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED");
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_write_export_roundtrip() {
        let path = temp_dir().join(format!("steelgrid_export_{}.tsv", uuid::Uuid::new_v4()));
        write_export(&path, "a\tb\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a\tb\n");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_write_export_bytes_leaves_no_temp_file() {
        let path = temp_dir().join(format!("steelgrid_report_{}.pdf", uuid::Uuid::new_v4()));
        let bytes = b"%PDF-1.7\n\x00\xff";
        write_export_bytes(&path, bytes).unwrap();
        assert_eq!(fs::read(&path).unwrap(), bytes.to_vec());

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        assert!(!Path::new(&tmp).exists());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_write_export_bad_dir() {
        let err = write_export(Path::new("/nonexistent/steelgrid/out.tsv"), "x").unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }
}
