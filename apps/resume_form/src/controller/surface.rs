use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tracing::info;

/// A generated document waiting to be saved. Dropped once the surface has
/// written it out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: String,
    pub bytes: Bytes,
}

/// User-facing side effects that are not form fields.
#[async_trait]
pub trait Surface: Send + Sync {
    /// Blocking alert shown to the user.
    fn alert(&self, message: &str);

    /// Hands a document to the user. Returns where it ended up.
    async fn save(&self, download: Download) -> std::io::Result<PathBuf>;
}

/// Terminal surface: alerts go to stderr, downloads into a directory.
pub struct DirectorySurface {
    dir: PathBuf,
}

impl DirectorySurface {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl Surface for DirectorySurface {
    fn alert(&self, message: &str) {
        eprintln!("{message}");
    }

    async fn save(&self, download: Download) -> std::io::Result<PathBuf> {
        // Only the last path component of the suggested name is honoured.
        let file_name = Path::new(&download.file_name).file_name().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("unusable download name '{}'", download.file_name),
            )
        })?;

        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(file_name);
        tokio::fs::write(&path, &download.bytes).await?;

        info!(path = %path.display(), bytes = download.bytes.len(), "Saved download");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_directory_surface_writes_document() {
        let dir = tempfile::tempdir().unwrap();
        let surface = DirectorySurface::new(dir.path().join("out"));

        let path = surface
            .save(Download {
                file_name: "Ada_Lovelace_resume.docx".to_string(),
                bytes: Bytes::from_static(b"docx-bytes"),
            })
            .await
            .unwrap();

        assert_eq!(path, dir.path().join("out").join("Ada_Lovelace_resume.docx"));
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"docx-bytes");
    }

    #[tokio::test]
    async fn test_directory_surface_strips_parent_components() {
        let dir = tempfile::tempdir().unwrap();
        let surface = DirectorySurface::new(dir.path());

        let path = surface
            .save(Download {
                file_name: "../../etc/x_resume.docx".to_string(),
                bytes: Bytes::from_static(b"x"),
            })
            .await
            .unwrap();

        assert_eq!(path, dir.path().join("x_resume.docx"));
    }

    #[tokio::test]
    async fn test_directory_surface_rejects_nameless_download() {
        let dir = tempfile::tempdir().unwrap();
        let surface = DirectorySurface::new(dir.path());

        let err = surface
            .save(Download {
                file_name: "..".to_string(),
                bytes: Bytes::new(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
    }
}
