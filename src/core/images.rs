//! Pending image attachments and their preview lifecycle.
//!
//! Each staged image owns a locally generated preview file under the app's
//! cache area. The preview is a scoped resource: it exists from attach
//! until the image is removed or the draft is discarded, and is released
//! exactly once. `Drop` is only the backstop for abnormal paths.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Handle to one preview file. Releasing twice is a no-op.
#[derive(Debug)]
pub struct PreviewHandle {
    path: PathBuf,
    released: bool,
}

impl PreviewHandle {
    fn create(preview_dir: &Path, bytes: &[u8]) -> io::Result<Self> {
        fs::create_dir_all(preview_dir)?;
        let path = preview_dir.join(format!("preview-{}.bin", uuid::Uuid::new_v4()));
        fs::write(&path, bytes)?;
        Ok(Self {
            path,
            released: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Delete the preview file. Idempotent.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != io::ErrorKind::NotFound {
                log::warn!("Failed to remove preview {}: {e}", self.path.display());
            }
        }
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.release();
    }
}

/// An image staged for submission: raw payload plus its preview.
/// Not `Clone`: the preview must have exactly one owner.
#[derive(Debug)]
pub struct PendingImage {
    file_name: String,
    bytes: Vec<u8>,
    preview: PreviewHandle,
}

impl PendingImage {
    /// Stage a file from disk, writing a preview copy under `preview_dir`.
    pub fn attach(source: &Path, preview_dir: &Path) -> io::Result<Self> {
        let bytes = fs::read(source)?;
        let file_name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "attachment".to_string());
        Self::from_bytes(file_name, bytes, preview_dir)
    }

    /// Stage an in-memory payload directly.
    pub fn from_bytes(
        file_name: String,
        bytes: Vec<u8>,
        preview_dir: &Path,
    ) -> io::Result<Self> {
        let preview = PreviewHandle::create(preview_dir, &bytes)?;
        Ok(Self {
            file_name,
            bytes,
            preview,
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn preview_path(&self) -> &Path {
        self.preview.path()
    }

    pub fn preview_released(&self) -> bool {
        self.preview.is_released()
    }

    /// Release the preview ahead of drop. Called when the image leaves the
    /// draft (removal, cap overflow, discard).
    pub fn release_preview(&mut self) {
        self.preview.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_writes_preview_file() {
        let dir = tempfile::tempdir().unwrap();
        let image =
            PendingImage::from_bytes("door.jpg".into(), vec![1, 2, 3], dir.path()).unwrap();
        assert!(image.preview_path().exists());
        assert_eq!(image.bytes(), &[1, 2, 3]);
        assert_eq!(image.file_name(), "door.jpg");
    }

    #[test]
    fn test_release_removes_preview_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut image =
            PendingImage::from_bytes("a.png".into(), vec![0xFF], dir.path()).unwrap();
        let preview = image.preview_path().to_path_buf();
        assert!(preview.exists());

        image.release_preview();
        assert!(!preview.exists());
        assert!(image.preview_released());

        // Second release is a no-op, not a panic or warning storm.
        image.release_preview();
        assert!(!preview.exists());
    }

    #[test]
    fn test_drop_is_a_backstop() {
        let dir = tempfile::tempdir().unwrap();
        let preview = {
            let image =
                PendingImage::from_bytes("b.png".into(), vec![7], dir.path()).unwrap();
            image.preview_path().to_path_buf()
        };
        assert!(!preview.exists());
    }

    #[test]
    fn test_attach_missing_source_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.jpg");
        assert!(PendingImage::attach(&missing, dir.path()).is_err());
    }
}
