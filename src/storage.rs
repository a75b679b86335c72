//! Durable storage for ingested images.
//!
//! Layout under the upload root is flat per category:
//!
//! ```text
//! static/uploads/          ← upload_root
//! ├── projects/
//! │   └── team.jpg         → "uploads/projects/team.jpg"
//! └── clients/
//!     └── logo.png         → "uploads/clients/logo.png"
//! ```
//!
//! The returned path is relative to the public static-asset root (the
//! `public_prefix`), not to the upload root, so it can be used as an `<img>`
//! source as-is.
//!
//! ## Writes
//!
//! Each write goes to a temp file inside the category directory and is then
//! renamed over the destination. Readers see either the previous file or the
//! complete new one, never a truncated image. An existing file with the same
//! name is replaced. Concurrent writes of the same name race and the last
//! rename wins; there is no locking.
//!
//! Stored files are world-readable (`0644` on Unix) so a static-asset server
//! running as another user can serve them.

use crate::types::{Category, StoredImagePath};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[cfg(unix)]
const STORED_FILE_MODE: u32 = 0o644;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("failed to create {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Category-partitioned image store on the local filesystem.
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
    public_prefix: String,
}

impl UploadStore {
    pub fn new(root: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_prefix: public_prefix.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn category_dir(&self, category: Category) -> PathBuf {
        self.root.join(category.as_str())
    }

    /// Create the upload root and every category directory. Idempotent.
    pub fn ensure_layout(&self) -> Result<(), StorageError> {
        for category in Category::ALL {
            let dir = self.category_dir(category);
            std::fs::create_dir_all(&dir)
                .map_err(|source| StorageError::CreateDir { path: dir, source })?;
        }
        Ok(())
    }

    /// Atomically write `data` as `<root>/<category>/<filename>`.
    ///
    /// `filename` must already be a sanitized single path segment. The
    /// category directory must exist; it is not created here.
    pub fn write(
        &self,
        category: Category,
        filename: &str,
        data: &[u8],
    ) -> Result<StoredImagePath, StorageError> {
        let dir = self.category_dir(category);
        let dest = dir.join(filename);

        write_atomic(&dir, &dest, data).map_err(|source| StorageError::Write {
            path: dest.clone(),
            source,
        })?;

        tracing::debug!(path = %dest.display(), bytes = data.len(), "stored image");
        Ok(StoredImagePath::new(&self.public_prefix, category, filename))
    }
}

fn write_atomic(dir: &Path, dest: &Path, data: &[u8]) -> io::Result<()> {
    let mut tmp = tempfile::Builder::new()
        .prefix(".upload-")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    tmp.write_all(data)?;
    set_public_read(tmp.as_file())?;
    tmp.as_file().sync_all()?;
    tmp.persist(dest).map_err(|e| e.error)?;
    Ok(())
}

/// Temp files are created `0600`; widen before the rename publishes them.
#[cfg(unix)]
fn set_public_read(file: &std::fs::File) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(std::fs::Permissions::from_mode(STORED_FILE_MODE))
}

#[cfg(not(unix))]
fn set_public_read(_file: &std::fs::File) -> io::Result<()> {
    Ok(())
}
