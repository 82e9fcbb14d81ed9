//! Local file system document loader
//!
//! Documents are read as UTF-8 text; invalid byte sequences are replaced
//! rather than rejected so extracted text with stray bytes still loads. The
//! document is named after its file name, which is the id agents and
//! citations refer to.

use std::fs;
use std::path::{Path, PathBuf};
use swarm_application::{DocumentSource, DocumentSourceError};
use swarm_domain::Document;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum DocumentLoadError {
    #[error("Document not found: {0}")]
    NotFound(PathBuf),

    #[error("Not a regular file: {0}")]
    NotAFile(PathBuf),

    #[error("Document is empty: {0}")]
    Empty(PathBuf),

    #[error("Could not derive a document name from {0}")]
    InvalidName(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Document loader that reads from the local file system.
#[derive(Debug, Clone, Default)]
pub struct LocalDocumentLoader;

impl LocalDocumentLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load one file as a document named after its file name.
    pub fn load(&self, path: &Path) -> Result<Document, DocumentLoadError> {
        if !path.exists() {
            return Err(DocumentLoadError::NotFound(path.to_path_buf()));
        }
        if !path.is_file() {
            return Err(DocumentLoadError::NotAFile(path.to_path_buf()));
        }

        let bytes = fs::read(path).map_err(|source| DocumentLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let content = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => {
                warn!("{} is not valid UTF-8; decoding lossily", path.display());
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };

        if content.trim().is_empty() {
            return Err(DocumentLoadError::Empty(path.to_path_buf()));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| DocumentLoadError::InvalidName(path.to_path_buf()))?;
        let document = Document::new(name, content)
            .map_err(|_| DocumentLoadError::InvalidName(path.to_path_buf()))?;

        debug!(
            "Loaded document {} ({} bytes)",
            document.id,
            document.content.len()
        );
        Ok(document)
    }

    /// Load every path, stopping at the first failure.
    pub fn load_all(&self, paths: &[PathBuf]) -> Result<Vec<Document>, DocumentLoadError> {
        paths.iter().map(|path| self.load(path)).collect()
    }
}

impl DocumentSource for LocalDocumentLoader {
    fn load(&self, path: &Path) -> Result<Document, DocumentSourceError> {
        LocalDocumentLoader::load(self, path).map_err(|e| DocumentSourceError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn test_load_names_document_after_file() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "Annual Report 2023.txt", b"Revenue: $5m");

        let document = LocalDocumentLoader::new().load(&path).unwrap();
        assert_eq!(document.name(), "Annual Report 2023.txt");
        assert_eq!(document.content, "Revenue: $5m");
    }

    #[test]
    fn test_invalid_utf8_is_decoded_lossily() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "scan.txt", b"Total \xff 42");

        let document = LocalDocumentLoader::new().load(&path).unwrap();
        assert!(document.content.starts_with("Total "));
        assert!(document.content.ends_with(" 42"));
        assert!(document.content.contains('\u{FFFD}'));
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = LocalDocumentLoader::new()
            .load(&dir.path().join("missing.txt"))
            .unwrap_err();
        assert!(matches!(err, DocumentLoadError::NotFound(_)));
    }

    #[test]
    fn test_directory_and_empty_file_rejected() {
        let dir = TempDir::new().unwrap();
        let loader = LocalDocumentLoader::new();
        assert!(matches!(
            loader.load(dir.path()).unwrap_err(),
            DocumentLoadError::NotAFile(_)
        ));

        let blank = write(&dir, "blank.txt", b"  \n ");
        assert!(matches!(
            loader.load(&blank).unwrap_err(),
            DocumentLoadError::Empty(_)
        ));
    }

    #[test]
    fn test_document_source_port_reports_message() {
        let dir = TempDir::new().unwrap();
        let source: &dyn DocumentSource = &LocalDocumentLoader::new();
        let err = source.load(&dir.path().join("gone.txt")).unwrap_err();
        assert!(err.0.contains("gone.txt"));
    }

    #[test]
    fn test_load_all_stops_at_first_failure() {
        let dir = TempDir::new().unwrap();
        let good = write(&dir, "a.txt", b"alpha");
        let loader = LocalDocumentLoader::new();

        assert_eq!(loader.load_all(&[good.clone()]).unwrap().len(), 1);
        assert!(loader
            .load_all(&[good, dir.path().join("nope.txt")])
            .is_err());
    }
}
