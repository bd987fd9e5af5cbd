use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// An uploaded document on disk, removed when the guard goes out of scope.
#[derive(Debug)]
pub struct TempUpload {
    path: PathBuf,
}

impl TempUpload {
    /// Write `bytes` to `path`, creating the parent directory if needed.
    pub async fn write(path: PathBuf, bytes: &[u8]) -> std::io::Result<Self> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await?;
        }
        tokio::fs::write(&path, bytes).await?;
        debug!(path = %path.display(), bytes = bytes.len(), "upload written");
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        // Drop can't await; one unlink of a small file is fine inline on the runtime thread.
        if let Err(e) = std::fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %e, "failed to remove upload");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn file_removed_on_drop() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("uploads").join("doc.pdf");

        let upload = TempUpload::write(path.clone(), b"%PDF-1.4").await.unwrap();
        assert_eq!(std::fs::read(upload.path()).unwrap(), b"%PDF-1.4");
        drop(upload);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn missing_file_on_drop_is_not_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("doc.pdf");
        let upload = TempUpload::write(path.clone(), b"x").await.unwrap();
        std::fs::remove_file(&path).unwrap();
        drop(upload);
    }
}
