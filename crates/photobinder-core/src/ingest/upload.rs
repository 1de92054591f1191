//! Upload inputs and file-name policy.

use std::path::Path;

/// Extension used when none can be determined from any name.
pub const DEFAULT_EXTENSION: &str = ".jpg";

/// Extensions the ingestor can decode.
pub const DECODABLE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png"];

/// Extensions offered by the upload dialog, including email containers.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "heic", "msg", "eml"];

/// A single incoming file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Upload {
    /// Bytes with an optional explicit file name, as extracted from an
    /// email container.
    RawBytes {
        /// File content.
        bytes: Vec<u8>,
        /// Attachment or part file name, if the container had one.
        filename: Option<String>,
    },
    /// Bytes picked by the user, carrying the uploaded file's name.
    NamedBytes {
        /// Uploaded file name.
        name: String,
        /// File content.
        bytes: Vec<u8>,
    },
}

impl Upload {
    /// Creates a direct upload.
    #[must_use]
    pub fn named(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::NamedBytes {
            name: name.into(),
            bytes,
        }
    }

    /// Creates an extracted upload.
    #[must_use]
    pub fn raw(bytes: Vec<u8>, filename: Option<String>) -> Self {
        Self::RawBytes { bytes, filename }
    }

    /// File content.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        match self {
            Self::RawBytes { bytes, .. } | Self::NamedBytes { bytes, .. } => bytes,
        }
    }

    /// Consumes the upload, returning its content.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::RawBytes { bytes, .. } | Self::NamedBytes { bytes, .. } => bytes,
        }
    }

    /// The best available name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::RawBytes { filename, .. } => filename.as_deref(),
            Self::NamedBytes { name, .. } => Some(name),
        }
    }

    /// Name shown on the photo card.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.name()
            .filter(|n| !n.trim().is_empty())
            .map_or_else(|| format!("untitled{}", self.extension()), ToString::to_string)
    }

    /// Lowercased storage extension including the dot.
    #[must_use]
    pub fn extension(&self) -> String {
        match self {
            Self::RawBytes { filename, .. } => resolve_extension(filename.as_deref(), None),
            Self::NamedBytes { name, .. } => resolve_extension(None, Some(name)),
        }
    }

    /// Container kind, judged by name.
    #[must_use]
    pub fn container_kind(&self) -> ContainerKind {
        self.name().map_or(ContainerKind::Image, ContainerKind::detect)
    }
}

/// What an upload holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// Outlook compound-file message.
    Msg,
    /// MIME email.
    Eml,
    /// Anything else is treated as a single image.
    Image,
}

impl ContainerKind {
    /// Detects the kind from a file name's extension.
    #[must_use]
    pub fn detect(name: &str) -> Self {
        match extension_of(name).as_deref() {
            Some(".msg") => Self::Msg,
            Some(".eml") => Self::Eml,
            _ => Self::Image,
        }
    }
}

/// Picks the storage extension: explicit file name first, uploaded name
/// second, [`DEFAULT_EXTENSION`] otherwise.
#[must_use]
pub fn resolve_extension(explicit: Option<&str>, uploaded: Option<&str>) -> String {
    explicit
        .and_then(extension_of)
        .or_else(|| uploaded.and_then(extension_of))
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}

/// True if the extension names a format the ingestor decodes.
#[must_use]
pub fn is_decodable(extension: &str) -> bool {
    DECODABLE_EXTENSIONS.contains(&extension)
}

fn extension_of(name: &str) -> Option<String> {
    Path::new(name.trim())
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
}
