//! Error types for the core library.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image could not be decoded or encoded.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Email file could not be parsed.
    #[error("MIME error: {0}")]
    Mime(#[from] photobinder_mime::Error),

    /// Outlook `.msg` file could not be read.
    #[error("Outlook message error: {0}")]
    Msg(String),

    /// Word document packaging failed.
    #[error("Packaging error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// File extension is not an image format we can decode.
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// Photo index does not exist in the collection.
    #[error("Photo index {index} out of range (collection has {len})")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Collection length.
        len: usize,
    },

    /// A photo with the same content hash is already in the collection.
    #[error("Duplicate photo: {0}")]
    Duplicate(String),

    /// The content hash was removed by the user this session.
    #[error("Blocked photo: {0}")]
    Blocked(String),

    /// An image inside an email could not be extracted.
    #[error("Failed to extract {name}: {source}")]
    Attachment {
        /// Attachment or part filename.
        name: String,
        /// Underlying failure.
        #[source]
        source: Box<Error>,
    },

    /// A stored photo could not be placed into the document.
    #[error("Failed to render {}: {source}", path.display())]
    Render {
        /// Storage path of the failing photo.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: Box<Error>,
    },
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
