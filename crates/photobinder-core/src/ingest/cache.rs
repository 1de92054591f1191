//! Content-addressed image storage.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::Result;
use crate::photo::ContentHash;

/// Directory of stored photos named `<hash><ext>`.
///
/// Identical content always maps to the same file, so writes are
/// idempotent and concurrent writers of the same content are harmless.
#[derive(Debug, Clone)]
pub struct ImageCache {
    dir: PathBuf,
}

impl ImageCache {
    /// Opens (creating if needed) a cache directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Opens a cache directory after discarding anything left from a
    /// previous run.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be emptied or created.
    pub fn open_fresh(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if dir.exists() {
            info!("Clearing image cache at {}", dir.display());
            fs::remove_dir_all(&dir)?;
        }
        Self::open(dir)
    }

    /// The cache directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Storage path for a hash and extension.
    #[must_use]
    pub fn path_for(&self, hash: &ContentHash, extension: &str) -> PathBuf {
        self.dir.join(format!("{hash}{extension}"))
    }

    /// Stores content for a hash unless it is already there.
    ///
    /// `encode` runs only when the slot is empty.
    ///
    /// # Errors
    ///
    /// Returns an error from `encode` or from writing the file.
    pub fn store_with<F>(&self, hash: &ContentHash, extension: &str, encode: F) -> Result<PathBuf>
    where
        F: FnOnce() -> Result<Vec<u8>>,
    {
        let path = self.path_for(hash, extension);
        if path.exists() {
            debug!("Reusing cached {}", path.display());
            return Ok(path);
        }
        let bytes = encode()?;
        // Readers must never see a half-written slot.
        let partial = self.dir.join(format!("{hash}{extension}.part"));
        fs::write(&partial, &bytes)?;
        fs::rename(&partial, &path)?;
        debug!("Stored {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }
}
