//! Errors raised while taking a MIME message apart.

use thiserror::Error;

/// Result alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Reasons a message or part could not be parsed or decoded.
#[derive(Debug, Error)]
pub enum Error {
    /// `Content-Type` value without a usable `type/subtype`.
    #[error("Malformed content type: {0}")]
    InvalidContentType(String),

    /// Body or encoded word that does not follow its declared encoding.
    #[error("Malformed encoding: {0}")]
    InvalidEncoding(String),

    /// Base64 payload that could not be decoded even leniently.
    #[error("Bad base64 payload: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    /// `multipart/*` part with no `boundary` parameter.
    #[error("Multipart part has no boundary")]
    MissingBoundary,

    /// Multipart body whose delimiters never appear.
    #[error("Broken multipart body: {0}")]
    InvalidMultipart(String),

    /// Input that is not a message at all.
    #[error("Not a MIME message: {0}")]
    Parse(String),
}
