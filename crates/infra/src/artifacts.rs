//! Flat-file artifact store.
//!
//! One directory holds every artifact, named `invoice-{number}-{suffix}`.
//! Writes for the same invoice number overwrite each other (last write wins);
//! distinct invoice numbers never touch the same file.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Request,
    Response,
    QrCode,
}

impl ArtifactKind {
    pub fn file_name(self, invoice_number: &str) -> String {
        match self {
            Self::Request => format!("invoice-{invoice_number}-request.json"),
            Self::Response => format!("invoice-{invoice_number}-response.json"),
            Self::QrCode => format!("invoice-{invoice_number}-qr.png"),
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request => f.write_str("invoice request JSON"),
            Self::Response => f.write_str("invoice response JSON"),
            Self::QrCode => f.write_str("QR code"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("invoice number `{0}` cannot be used in a file name")]
    InvalidKey(String),

    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Relative roots are resolved against the current working directory.
    /// Nothing is created until the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(&root))
                .unwrap_or(root)
        };
        Self { root }
    }

    pub fn output_root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, kind: ArtifactKind, invoice_number: &str) -> PathBuf {
        self.root.join(kind.file_name(invoice_number))
    }

    /// Write one artifact, creating the output directory if needed.
    pub async fn save(
        &self,
        kind: ArtifactKind,
        invoice_number: &str,
        contents: impl AsRef<[u8]>,
    ) -> Result<PathBuf, ArtifactError> {
        if invoice_number.contains(['/', '\\', '\0']) {
            return Err(ArtifactError::InvalidKey(invoice_number.to_string()));
        }

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|source| ArtifactError::CreateDir {
                path: self.root.clone(),
                source,
            })?;

        let path = self.path_for(kind, invoice_number);
        tokio::fs::write(&path, contents)
            .await
            .map_err(|source| ArtifactError::Write {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }

    /// File names in the output directory, reverse-lexicographic.
    /// A missing or unreadable directory lists as empty.
    pub async fn list(&self) -> Vec<String> {
        match self.read_file_names().await {
            Ok(mut names) => {
                names.sort_unstable_by(|a, b| b.cmp(a));
                names
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                tracing::error!(path = %self.root.display(), error = %e, "error listing generated files");
                Vec::new()
            }
        }
    }

    async fn read_file_names(&self) -> io::Result<Vec<String>> {
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_follow_the_invoice_number() {
        assert_eq!(ArtifactKind::Request.file_name("INV-1"), "invoice-INV-1-request.json");
        assert_eq!(ArtifactKind::Response.file_name("INV-1"), "invoice-INV-1-response.json");
        assert_eq!(ArtifactKind::QrCode.file_name("INV-1"), "invoice-INV-1-qr.png");
    }

    #[tokio::test]
    async fn creates_directory_on_first_write() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(tmp.path().join("nested").join("out"));
        assert!(!store.output_root().exists());

        let path = store
            .save(ArtifactKind::Request, "INV-1", "{\"a\":1}")
            .await
            .unwrap();

        assert_eq!(path, store.path_for(ArtifactKind::Request, "INV-1"));
        assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), "{\"a\":1}");
    }

    #[tokio::test]
    async fn same_invoice_number_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(tmp.path());

        store.save(ArtifactKind::Response, "INV-1", "first").await.unwrap();
        let path = store.save(ArtifactKind::Response, "INV-1", "second").await.unwrap();

        assert_eq!(tokio::fs::read_to_string(path).await.unwrap(), "second");
    }

    #[tokio::test]
    async fn lists_files_in_reverse_order() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(tmp.path());
        store.save(ArtifactKind::Request, "A", "{}").await.unwrap();
        store.save(ArtifactKind::Response, "A", "{}").await.unwrap();
        store.save(ArtifactKind::Request, "B", "{}").await.unwrap();
        tokio::fs::create_dir(tmp.path().join("subdir")).await.unwrap();

        assert_eq!(
            store.list().await,
            vec![
                "invoice-B-request.json".to_string(),
                "invoice-A-response.json".to_string(),
                "invoice-A-request.json".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn missing_directory_lists_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(tmp.path().join("never-created"));
        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn rejects_path_like_invoice_numbers() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(tmp.path());
        let err = store
            .save(ArtifactKind::Request, "../escape", "{}")
            .await
            .unwrap_err();
        assert!(matches!(err, ArtifactError::InvalidKey(_)));
    }

    #[tokio::test]
    async fn write_failure_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("blocker");
        tokio::fs::write(&blocker, "not a directory").await.unwrap();

        let store = ArtifactStore::new(&blocker);
        let err = store.save(ArtifactKind::Request, "INV-1", "{}").await.unwrap_err();
        assert!(matches!(err, ArtifactError::CreateDir { .. }));
    }
}
