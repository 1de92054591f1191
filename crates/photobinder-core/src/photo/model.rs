//! Photo domain models.

use std::fmt;
use std::path::PathBuf;

/// Hex MD5 digest of a photo's raw upload bytes.
///
/// Serves as the deduplication key, the block-list key and the stem of
/// the cached file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash(String);

impl ContentHash {
    /// Hashes raw bytes.
    #[must_use]
    pub fn of(bytes: &[u8]) -> Self {
        Self(format!("{:x}", md5::compute(bytes)))
    }

    /// Returns the hex digest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A photo in the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoRecord {
    /// Where the orientation-normalized image is stored.
    pub storage_path: PathBuf,
    /// Digest of the original upload bytes.
    pub content_hash: ContentHash,
    /// Caption; empty means "same as the previous photo".
    pub label: String,
    /// Original file or attachment name, for display.
    pub display_name: String,
    /// UI selection state. Not part of the rendered document.
    pub selected: bool,
}

impl PhotoRecord {
    /// Creates an unlabeled, unselected record.
    #[must_use]
    pub fn new(
        storage_path: impl Into<PathBuf>,
        content_hash: ContentHash,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            storage_path: storage_path.into(),
            content_hash,
            label: String::new(),
            display_name: display_name.into(),
            selected: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_hash_is_md5_hex() {
        let hash = ContentHash::of(b"hello");
        assert_eq!(hash.as_str(), "5d41402abc4b2a76b9719d911017c592");
        assert_eq!(hash.to_string().len(), 32);
    }

    #[test]
    fn test_content_hash_deterministic() {
        assert_eq!(ContentHash::of(b"abc"), ContentHash::of(b"abc"));
        assert_ne!(ContentHash::of(b"abc"), ContentHash::of(b"abd"));
    }

    #[test]
    fn test_new_record_defaults() {
        let record = PhotoRecord::new("/tmp/x.jpg", ContentHash::of(b"x"), "x.jpg");
        assert!(record.label.is_empty());
        assert!(!record.selected);
        assert_eq!(record.display_name, "x.jpg");
    }
}
