//! Scan source for the entry screen.
//!
//! There is no camera or OCR engine: "scanning" a bill means picking a text
//! file that already holds the recognised text.

use std::path::{Path, PathBuf};

use rfd::AsyncFileDialog;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("cannot read scan '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("scan '{}' contains no text", path.display())]
    Empty { path: PathBuf },
}

/// Opens an async file picker for a scanned bill, starting in `location`.
pub async fn pick_scan_file(location: String) -> Option<PathBuf> {
    let file = AsyncFileDialog::new()
        .set_title("Scan Water Bill")
        .set_directory(&location)
        .add_filter("Scanned text", &["txt"])
        .pick_file()
        .await?;
    Some(file.path().to_path_buf())
}

/// Reads the recognised text of a scan. Whitespace-only files are rejected.
pub fn read_scan(path: &Path) -> Result<String, ScanError> {
    let text = std::fs::read_to_string(path).map_err(|source| ScanError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    if text.trim().is_empty() {
        return Err(ScanError::Empty {
            path: path.to_path_buf(),
        });
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_data(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("test-data")
            .join(name)
    }

    #[test]
    fn read_scan_returns_file_text() {
        let text = read_scan(&test_data("water_bill_scan.txt")).expect("scan should be readable");

        assert!(text.contains("Amount: $48.75"));
    }

    #[test]
    fn read_scan_rejects_blank_file() {
        let err = read_scan(&test_data("blank_scan.txt")).unwrap_err();

        assert!(matches!(err, ScanError::Empty { .. }));
    }

    #[test]
    fn read_scan_reports_missing_path() {
        let err = read_scan(&test_data("nope.txt")).unwrap_err();

        assert!(matches!(err, ScanError::Read { .. }));
        assert!(err.to_string().contains("nope.txt"));
    }
}
