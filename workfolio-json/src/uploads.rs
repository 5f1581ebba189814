use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error};
use workfolio_core::assets::{local_file_name, opaque_file_name, upload_reference};
use workfolio_core::{AssetStore, CoreError, Removal};

/// Uploaded images stored as flat files in one directory.
pub struct UploadDir {
    root: PathBuf,
}

impl UploadDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where `reference` lives on disk, if it is a local upload.
    pub fn locate(&self, reference: &str) -> Option<PathBuf> {
        local_file_name(reference).map(|name| self.root.join(name))
    }
}

impl AssetStore for UploadDir {
    fn store(&self, bytes: &[u8], original_filename: &str) -> Result<String, CoreError> {
        let name = opaque_file_name(original_filename);
        let path = self.root.join(&name);
        let written = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .and_then(|mut f| {
                f.write_all(bytes)?;
                f.sync_all()
            });
        if let Err(e) = written {
            error!(path = %path.display(), error = %e, "failed to write upload");
            let _ = fs::remove_file(&path);
            return Err(CoreError::UploadIo(format!("{}: {e}", path.display())));
        }
        debug!(path = %path.display(), bytes = bytes.len(), "stored upload");
        Ok(upload_reference(&name))
    }

    fn remove(&self, reference: &str) -> Result<Removal, CoreError> {
        let Some(path) = self.locate(reference) else {
            return Ok(Removal::Skipped);
        };
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(path = %path.display(), "deleted image");
                Ok(Removal::Deleted)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Removal::Missing),
            Err(e) => {
                error!(path = %path.display(), error = %e, "failed to delete image");
                Err(CoreError::AssetCleanup(format!("{}: {e}", path.display())))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_under_opaque_name() {
        let dir = tempfile::tempdir().unwrap();
        let uploads = UploadDir::new(dir.path());

        let reference = uploads.store(b"abc", "../../evil name.PNG").unwrap();
        assert!(reference.starts_with("/uploads/"));
        assert!(reference.ends_with(".png"));
        assert!(!reference.contains("evil"));

        let path = uploads.locate(&reference).unwrap();
        assert_eq!(path.parent().unwrap(), dir.path());
        assert_eq!(fs::read(path).unwrap(), b"abc");
    }

    #[test]
    fn removal_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let uploads = UploadDir::new(dir.path());
        let reference = uploads.store(b"abc", "a.jpg").unwrap();

        assert_eq!(uploads.remove(&reference).unwrap(), Removal::Deleted);
        assert_eq!(uploads.remove(&reference).unwrap(), Removal::Missing);
        assert_eq!(uploads.remove("https://example.com/a.jpg").unwrap(), Removal::Skipped);
    }

    #[test]
    fn write_failure_is_upload_error() {
        let dir = tempfile::tempdir().unwrap();
        let uploads = UploadDir::new(dir.path().join("missing"));
        assert!(matches!(uploads.store(b"abc", "a.jpg"), Err(CoreError::UploadIo(_))));
    }
}
