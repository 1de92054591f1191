//! Document rendering.
//!
//! Both formats consume the same ordered photo list and produce one page
//! per photo: the photo, fitted into a 6x8 inch box, followed by its
//! effective label. A label left empty repeats the nearest preceding
//! non-empty label.

mod docx;
mod pdf;
pub mod raster;

use std::fmt;
use std::io::Cursor;

use serde::{Deserialize, Serialize};
use tracing::info;

pub use docx::WordRenderer;
pub use pdf::PdfRenderer;

use self::raster::{ImageEncoding, PreparedImage};
use crate::photo::PhotoRecord;
use crate::{Error, Result};

/// Points per inch.
pub const POINTS_PER_INCH: f32 = 72.0;
/// US Letter width in points.
pub const PAGE_WIDTH_PT: f32 = 8.5 * POINTS_PER_INCH;
/// US Letter height in points.
pub const PAGE_HEIGHT_PT: f32 = 11.0 * POINTS_PER_INCH;
/// Page margin on every side.
pub const MARGIN_PT: f32 = POINTS_PER_INCH;
/// Image box width (6 inches).
pub const MAX_IMAGE_WIDTH_PT: f32 = 6.0 * POINTS_PER_INCH;
/// Image box height (8 inches).
pub const MAX_IMAGE_HEIGHT_PT: f32 = 8.0 * POINTS_PER_INCH;

/// Output document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DocumentKind {
    /// Office Open XML word-processing package.
    #[default]
    Word,
    /// Portable Document Format.
    Pdf,
}

impl DocumentKind {
    /// Every format, in menu order.
    pub const ALL: [Self; 2] = [Self::Word, Self::Pdf];

    /// File extension without the dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Word => "docx",
            Self::Pdf => "pdf",
        }
    }

    /// MIME type of the rendered file.
    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Word => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::Pdf => "application/pdf",
        }
    }

    /// Download file name for a document name.
    #[must_use]
    pub fn file_name(self, document_name: &str) -> String {
        format!("{document_name}.{}", self.extension())
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Word => write!(f, "Word"),
            Self::Pdf => write!(f, "PDF"),
        }
    }
}

/// Options shared by both renderers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Re-encode losslessly instead of as JPEG.
    pub preserve_quality: bool,
    /// Document title written to the file metadata.
    pub title: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            preserve_quality: false,
            title: "photos".to_string(),
        }
    }
}

/// A finished document held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    /// Format of `bytes`.
    pub kind: DocumentKind,
    /// Complete file content.
    pub bytes: Vec<u8>,
}

impl RenderedDocument {
    /// A reader positioned at the start of the document.
    #[must_use]
    pub fn reader(&self) -> Cursor<&[u8]> {
        Cursor::new(&self.bytes)
    }

    /// Size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True for a zero-byte document.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// One page's worth of content.
#[derive(Debug)]
pub struct PageContent<'a> {
    /// Zero-based page number.
    pub index: usize,
    /// Total pages in the document.
    pub count: usize,
    /// Fitted, encoded photo.
    pub image: PreparedImage,
    /// Effective label.
    pub label: &'a str,
}

/// A document format back-end.
///
/// Implementations receive pages strictly in order through
/// [`DocumentRenderer::add_page`] and assemble the file in
/// [`DocumentRenderer::finish`].
pub trait DocumentRenderer {
    /// Format produced.
    fn kind(&self) -> DocumentKind;

    /// Encoding to request when quality preservation is on.
    fn lossless_encoding(&self) -> ImageEncoding;

    /// Places one photo and its label.
    ///
    /// # Errors
    ///
    /// Returns an error if the page cannot be written.
    fn add_page(&mut self, page: PageContent<'_>) -> Result<()>;

    /// Assembles the document.
    ///
    /// # Errors
    ///
    /// Returns an error if packaging fails.
    fn finish(self: Box<Self>, options: &RenderOptions) -> Result<Vec<u8>>;
}

/// Computes each photo's effective label.
///
/// An empty label takes the previous effective label; the first photo
/// with an empty label renders as empty.
#[must_use]
pub fn effective_labels<'a, I>(labels: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut last = "";
    labels
        .into_iter()
        .map(|label| {
            if !label.is_empty() {
                last = label;
            }
            last
        })
        .collect()
}

/// Scales `width`x`height` uniformly to fit a box, never enlarging.
#[must_use]
pub fn fit_within(width: f32, height: f32, box_width: f32, box_height: f32) -> (f32, f32) {
    if width <= 0.0 || height <= 0.0 {
        return (0.0, 0.0);
    }
    let scale = (box_width / width).min(box_height / height).min(1.0);
    (width * scale, height * scale)
}

/// Renders photos in order into a document of the given kind.
///
/// `progress` is called once per photo with `(i + 1) / n`, ending at
/// exactly 1.0; it is never called for an empty list. A photo that cannot
/// be loaded aborts the whole render.
///
/// # Errors
///
/// Returns [`Error::Render`] naming the first photo that could not be
/// placed, or a packaging error.
pub fn render(
    kind: DocumentKind,
    photos: &[PhotoRecord],
    options: &RenderOptions,
    progress: &mut dyn FnMut(f64),
) -> Result<RenderedDocument> {
    let renderer: Box<dyn DocumentRenderer> = match kind {
        DocumentKind::Word => Box::new(WordRenderer::new()),
        DocumentKind::Pdf => Box::new(PdfRenderer::new()),
    };
    render_with(renderer, photos, options, progress)
}

/// Drives any renderer over the photo list.
///
/// # Errors
///
/// See [`render`].
#[allow(clippy::cast_precision_loss)]
pub fn render_with(
    mut renderer: Box<dyn DocumentRenderer>,
    photos: &[PhotoRecord],
    options: &RenderOptions,
    progress: &mut dyn FnMut(f64),
) -> Result<RenderedDocument> {
    let kind = renderer.kind();
    let encoding = if options.preserve_quality {
        renderer.lossless_encoding()
    } else {
        ImageEncoding::Jpeg
    };
    let labels = effective_labels(photos.iter().map(|p| p.label.as_str()));
    let count = photos.len();

    for (index, (photo, label)) in photos.iter().zip(labels).enumerate() {
        let failed = |e| Error::Render {
            path: photo.storage_path.clone(),
            source: Box::new(e),
        };
        let image = raster::prepare(&photo.storage_path, encoding).map_err(failed)?;
        renderer
            .add_page(PageContent {
                index,
                count,
                image,
                label,
            })
            .map_err(failed)?;
        progress((index + 1) as f64 / count as f64);
    }

    let bytes = renderer.finish(options)?;
    info!("Rendered {kind} document with {count} pages ({} bytes)", bytes.len());
    Ok(RenderedDocument { kind, bytes })
}
