//! Content deduplication and first-time ingestion.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat};
use tracing::debug;

use super::cache::ImageCache;
use super::orientation::Orientation;
use super::upload::{Upload, is_decodable};
use crate::photo::{ContentHash, PhotoRecord, PhotoStore};
use crate::{Error, Result};

/// Why an upload was not added.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    /// The same content is already in the collection.
    Duplicate,
    /// The same content was removed by the user this session.
    Blocked,
}

/// Outcome of ingesting one upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ingested {
    /// A new record, ready to append.
    Added(PhotoRecord),
    /// Content was recognised and ignored.
    Skipped {
        /// Hash of the ignored content.
        hash: ContentHash,
        /// Reason it was ignored.
        reason: Skip,
    },
}

/// Turns uploads into stored, upright photo records.
#[derive(Debug, Clone)]
pub struct Ingestor {
    cache: ImageCache,
}

impl Ingestor {
    /// Creates an ingestor writing into `cache`.
    #[must_use]
    pub const fn new(cache: ImageCache) -> Self {
        Self { cache }
    }

    /// The backing cache.
    #[must_use]
    pub const fn cache(&self) -> &ImageCache {
        &self.cache
    }

    /// Hashes an upload and, if the content is new, stores it upright.
    ///
    /// Blocked or already-present content is a [`Ingested::Skipped`] value,
    /// not an error. The returned record is not appended to `store`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] for extensions we cannot decode,
    /// [`Error::Image`] for corrupt data, or an I/O error from the cache.
    pub fn ingest(&self, store: &PhotoStore, upload: &Upload) -> Result<Ingested> {
        let bytes = upload.bytes();
        let hash = ContentHash::of(bytes);

        if store.is_blocked(&hash) {
            debug!("Skipping blocked {}", upload.display_name());
            return Ok(Ingested::Skipped {
                hash,
                reason: Skip::Blocked,
            });
        }
        if store.contains(&hash) {
            debug!("Skipping duplicate {}", upload.display_name());
            return Ok(Ingested::Skipped {
                hash,
                reason: Skip::Duplicate,
            });
        }

        let extension = upload.extension();
        if !is_decodable(&extension) {
            return Err(Error::UnsupportedFormat(extension));
        }

        let image = image::load_from_memory(bytes)?;
        let orientation = Orientation::read(bytes);
        let path = self.cache.store_with(&hash, &extension, || {
            if orientation.is_upright() {
                Ok(bytes.to_vec())
            } else {
                debug!("Normalizing {orientation:?} for {}", upload.display_name());
                encode(&orientation.apply(image), &extension)
            }
        })?;

        Ok(Ingested::Added(PhotoRecord::new(
            path,
            hash,
            upload.display_name(),
        )))
    }
}

/// Re-encodes pixels in the format named by `extension`.
fn encode(image: &DynamicImage, extension: &str) -> Result<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    if extension == ".png" {
        image.write_to(&mut out, ImageFormat::Png)?;
    } else {
        DynamicImage::ImageRgb8(image.to_rgb8()).write_to(&mut out, ImageFormat::Jpeg)?;
    }
    Ok(out.into_inner())
}
