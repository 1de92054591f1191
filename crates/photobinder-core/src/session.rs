//! Application state for one run.

use std::fmt;
use std::path::Path;

use tracing::{info, warn};

use crate::ingest::{ImageCache, Ingested, Ingestor, Skip, Upload};
use crate::photo::{Edit, PhotoRecord, PhotoStore};
use crate::render::{self, DocumentKind, RenderOptions, RenderedDocument};
use crate::unpack::unpack;
use crate::{Error, Result};

/// A file that could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadWarning {
    /// File or attachment name.
    pub file: String,
    /// What went wrong.
    pub message: String,
}

impl fmt::Display for UploadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file, self.message)
    }
}

/// Summary of one upload batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadReport {
    /// Photos appended to the collection.
    pub added: usize,
    /// Photos already in the collection.
    pub duplicates: usize,
    /// Photos the user removed earlier this session.
    pub blocked: usize,
    /// Files or attachments that were skipped with an error.
    pub warnings: Vec<UploadWarning>,
}

impl UploadReport {
    /// Informational notice for a batch that added nothing.
    #[must_use]
    pub fn notice(&self) -> Option<&'static str> {
        (self.added == 0).then_some("No new files added")
    }
}

/// The photo collection and everything needed to grow and render it.
///
/// Owned by the top-level control loop and changed only through its
/// methods.
#[derive(Debug)]
pub struct Session {
    store: PhotoStore,
    ingestor: Ingestor,
}

impl Session {
    /// Starts a session storing photos in `cache`.
    #[must_use]
    pub fn new(cache: ImageCache) -> Self {
        Self {
            store: PhotoStore::new(),
            ingestor: Ingestor::new(cache),
        }
    }

    /// The collection.
    #[must_use]
    pub const fn store(&self) -> &PhotoStore {
        &self.store
    }

    /// Directory holding the stored photos.
    #[must_use]
    pub fn cache_dir(&self) -> &Path {
        self.ingestor.cache().dir()
    }

    /// Photos in page order.
    #[must_use]
    pub fn photos(&self) -> &[PhotoRecord] {
        self.store.photos()
    }

    /// Ingests a batch of uploads in order.
    ///
    /// Containers are unpacked; duplicates and blocked content are counted
    /// and skipped. A bad file only produces a warning, the rest of the
    /// batch still goes in.
    pub fn upload(&mut self, uploads: Vec<Upload>) -> UploadReport {
        let mut report = UploadReport::default();

        for upload in uploads {
            let container = upload.display_name();
            let images = match unpack(upload) {
                Ok(images) => images,
                Err(e) => {
                    warn!("Could not open {container}: {e}");
                    report.warnings.push(UploadWarning {
                        file: container,
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            for image in images {
                let image = match image {
                    Ok(image) => image,
                    Err(Error::Attachment { name, source }) => {
                        warn!("Skipping {name} in {container}: {source}");
                        report.warnings.push(UploadWarning {
                            file: name,
                            message: source.to_string(),
                        });
                        continue;
                    }
                    Err(e) => {
                        warn!("Skipping part of {container}: {e}");
                        report.warnings.push(UploadWarning {
                            file: container.clone(),
                            message: e.to_string(),
                        });
                        continue;
                    }
                };
                match self.ingest_one(&image) {
                    Ok(Some(Skip::Duplicate)) => report.duplicates += 1,
                    Ok(Some(Skip::Blocked)) => report.blocked += 1,
                    Ok(None) => report.added += 1,
                    Err(e) => {
                        let file = image.display_name();
                        warn!("Skipping {file}: {e}");
                        report.warnings.push(UploadWarning {
                            file,
                            message: e.to_string(),
                        });
                    }
                }
            }
        }

        info!(
            "Upload batch: {} added, {} duplicate, {} blocked, {} failed",
            report.added,
            report.duplicates,
            report.blocked,
            report.warnings.len()
        );
        report
    }

    fn ingest_one(&mut self, upload: &Upload) -> Result<Option<Skip>> {
        match self.ingestor.ingest(&self.store, upload)? {
            Ingested::Added(record) => {
                self.store.append(record)?;
                Ok(None)
            }
            Ingested::Skipped { reason, .. } => Ok(Some(reason)),
        }
    }

    /// Applies a user edit to the collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the edit names a photo that does not exist.
    pub fn apply(&mut self, edit: Edit) -> Result<()> {
        self.store.apply(edit)
    }

    /// Renders the current collection.
    ///
    /// # Errors
    ///
    /// See [`render::render`].
    pub fn render(
        &self,
        kind: DocumentKind,
        options: &RenderOptions,
        progress: &mut dyn FnMut(f64),
    ) -> Result<RenderedDocument> {
        render::render(kind, self.photos(), options, progress)
    }

    #[cfg(test)]
    pub(crate) fn store_mut(&mut self) -> &mut PhotoStore {
        &mut self.store
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn png(shade: u8) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 6, Rgb([shade, 0, 0])))
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    fn session() -> (tempfile::TempDir, Session) {
        let tmp = tempfile::tempdir().unwrap();
        let cache = ImageCache::open(tmp.path()).unwrap();
        (tmp, Session::new(cache))
    }

    #[test]
    fn test_same_batch_duplicates_collapse() {
        let (_tmp, mut session) = session();
        let report = session.upload(vec![
            Upload::named("a.png", png(1)),
            Upload::named("a-copy.png", png(1)),
        ]);
        assert_eq!(report.added, 1);
        assert_eq!(report.duplicates, 1);
        assert_eq!(session.photos().len(), 1);
        assert_eq!(report.notice(), None);
    }

    #[test]
    fn test_bad_file_does_not_abort_batch() {
        let (_tmp, mut session) = session();
        let report = session.upload(vec![
            Upload::named("broken.jpg", b"garbage".to_vec()),
            Upload::named("mail.msg", b"not a compound file".to_vec()),
            Upload::named("ok.png", png(2)),
        ]);
        assert_eq!(report.added, 1);
        assert_eq!(report.warnings.len(), 2);
        assert_eq!(report.warnings[0].file, "broken.jpg");
        assert_eq!(report.warnings[1].file, "mail.msg");
    }

    #[test]
    fn test_undecodable_email_image_is_reported() {
        let (_tmp, mut session) = session();
        let raw = "Subject: site\r\n\
Content-Type: multipart/mixed; boundary=\"b1\"\r\n\
\r\n\
--b1\r\n\
Content-Type: image/jpeg; name=\"porch.jpg\"\r\n\
Content-Transfer-Encoding: base64\r\n\
\r\n\
@@@@\r\n\
--b1--\r\n";
        let report = session.upload(vec![Upload::named("site.eml", raw.as_bytes().to_vec())]);
        assert_eq!(report.added, 0);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].file, "porch.jpg");
        assert_eq!(report.notice(), Some("No new files added"));
    }

    #[test]
    fn test_blocked_then_cleared() {
        let (_tmp, mut session) = session();
        session.upload(vec![Upload::named("a.png", png(3))]);
        session.apply(Edit::ToggleSelection(0)).unwrap();
        session.apply(Edit::RemoveSelected).unwrap();

        let report = session.upload(vec![Upload::named("a.png", png(3))]);
        assert_eq!(report.blocked, 1);
        assert_eq!(report.notice(), Some("No new files added"));
        assert!(session.photos().is_empty());

        session.store_mut().clear_block_list();
        let report = session.upload(vec![Upload::named("a.png", png(3))]);
        assert_eq!(report.added, 1);
    }

    #[test]
    fn test_cache_dir_is_the_ingest_target() {
        let (tmp, mut session) = session();
        assert_eq!(session.cache_dir(), tmp.path());
        session.upload(vec![Upload::named("a.png", png(9))]);
        assert!(session.photos()[0].storage_path.starts_with(session.cache_dir()));
    }
}
