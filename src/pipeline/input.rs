//! Input resolution: validate a user-supplied path before pdfium sees it.
//!
//! pdfium aborts with an opaque internal error when handed a missing file
//! or a file that merely has a `.pdf` extension. Checking existence, read
//! permission, and the `%PDF` magic bytes up front means callers get one of
//! the typed [`PriceListError`] input variants with an actionable message
//! instead.

use crate::error::PriceListError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolve a local file path, validating existence and PDF magic bytes.
pub fn resolve_input(path: &Path) -> Result<PathBuf, PriceListError> {
    let path = path.to_path_buf();

    if !path.exists() {
        return Err(PriceListError::FileNotFound { path });
    }

    // Check read permission by attempting to open
    match std::fs::File::open(&path) {
        Ok(mut f) => {
            use std::io::Read;
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
                return Err(PriceListError::NotAPdf { path, magic });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(PriceListError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(PriceListError::FileNotFound { path });
        }
    }

    debug!("Resolved input PDF: {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_is_file_not_found() {
        let err = resolve_input(Path::new("/nonexistent/price-list.pdf")).unwrap_err();
        assert!(matches!(err, PriceListError::FileNotFound { .. }));
    }

    #[test]
    fn non_pdf_content_is_rejected_with_magic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.pdf");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"hello world")
            .unwrap();

        match resolve_input(&path).unwrap_err() {
            PriceListError::NotAPdf { magic, .. } => assert_eq!(&magic, b"hell"),
            other => panic!("expected NotAPdf, got {other:?}"),
        }
    }

    #[test]
    fn pdf_magic_passes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ok.pdf");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"%PDF-1.7\n%dummy")
            .unwrap();

        let resolved = resolve_input(&path).unwrap();
        assert_eq!(resolved, path);
    }

    #[test]
    fn short_file_passes_magic_check() {
        // Fewer than 4 bytes: read_exact fails, validation is skipped and
        // pdfium reports the corruption instead.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.pdf");
        std::fs::File::create(&path).unwrap().write_all(b"%P").unwrap();
        assert!(resolve_input(&path).is_ok());
    }
}
