//! Persisted user preferences.

use std::path::PathBuf;

use photobinder_core::DocumentKind;
use serde::{Deserialize, Serialize};

use crate::style::widgets::ThemeMode;

/// Document name used when none was saved.
pub const DEFAULT_DOCUMENT_NAME: &str = "photos";

/// Application settings that persist across runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Light or dark palette.
    pub theme_mode: ThemeMode,
    /// Name of the last generated document, without extension.
    pub document_name: String,
    /// Format of the last generated document.
    pub document_kind: DocumentKind,
    /// Embed images losslessly.
    pub preserve_quality: bool,
    /// Where uploaded photos are stored while the app runs.
    pub cache_dir: Option<PathBuf>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme_mode: ThemeMode::Light,
            document_name: DEFAULT_DOCUMENT_NAME.to_string(),
            document_kind: DocumentKind::Word,
            preserve_quality: false,
            cache_dir: None,
        }
    }
}

impl AppSettings {
    /// The cache directory to use, falling back to the platform cache dir.
    #[must_use]
    pub fn upload_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(default_upload_dir)
    }
}

/// `<platform cache dir>/photobinder/uploads`.
#[must_use]
pub fn default_upload_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("photobinder")
        .join("uploads")
}
