//! CSV attachments staged for the next outgoing message.

use std::path::{Path, PathBuf};

use crate::error::{AnalystError, Result};

/// The only MIME type accepted for attachments.
pub const CSV_MIME: &str = "text/csv";

/// A CSV file chosen by the user, pending inclusion in the next send.
///
/// Only the reference is kept; the bytes are read when the message is
/// uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    path: PathBuf,
    name: String,
}

impl Attachment {
    /// Validates a file selection and turns it into a stageable attachment.
    ///
    /// The type check is extension based, the same way a browser fills in
    /// `File.type` for a local selection.
    ///
    /// # Errors
    ///
    /// - [`AnalystError::NotCsv`] if the file is not recognised as `text/csv`
    /// - [`AnalystError::Io`] if the path does not name a readable regular file
    pub fn select(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| AnalystError::io(format!("not a file: {}", path.display())))?;

        let mime = mime_guess::from_path(path).first_or_octet_stream();
        if mime.essence_str() != CSV_MIME {
            return Err(AnalystError::NotCsv {
                name,
                mime: mime.essence_str().to_string(),
            });
        }

        let metadata = std::fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(AnalystError::io(format!("not a file: {}", path.display())));
        }

        Ok(Self {
            path: path.to_path_buf(),
            name,
        })
    }

    /// File name shown on the message chip and sent as the multipart file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mime_type(&self) -> &'static str {
        CSV_MIME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_select_csv() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sales.csv");
        std::fs::write(&path, "region,total\nnorth,10\n").unwrap();

        let attachment = Attachment::select(&path).expect("csv should be accepted");
        assert_eq!(attachment.name(), "sales.csv");
        assert_eq!(attachment.path(), path.as_path());
        assert_eq!(attachment.mime_type(), "text/csv");
    }

    #[test]
    fn test_select_uppercase_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("REPORT.CSV");
        std::fs::write(&path, "a,b\n").unwrap();

        assert!(Attachment::select(&path).is_ok());
    }

    #[test]
    fn test_select_rejects_other_types() {
        let dir = TempDir::new().unwrap();
        for name in ["chart.png", "notes.txt", "data.xlsx", "noext"] {
            let path = dir.path().join(name);
            std::fs::write(&path, "x").unwrap();
            let err = Attachment::select(&path).unwrap_err();
            assert!(err.is_not_csv(), "{name} should be rejected, got {err:?}");
        }
    }

    #[test]
    fn test_select_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = Attachment::select(dir.path().join("missing.csv")).unwrap_err();
        assert!(matches!(err, AnalystError::Io { .. }));
    }

    #[test]
    fn test_select_directory_named_like_csv() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("folder.csv");
        std::fs::create_dir(&path).unwrap();
        let err = Attachment::select(&path).unwrap_err();
        assert!(matches!(err, AnalystError::Io { .. }));
    }
}
