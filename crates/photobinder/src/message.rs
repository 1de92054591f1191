//! Message types for application events.
//!
//! In the Elm architecture, Messages are events that trigger state changes.

use std::path::PathBuf;

use photobinder_core::{DocumentKind, Upload};

use crate::model::{AppSettings, GenerationEvent};

/// Application messages (events).
#[derive(Debug, Clone)]
pub enum Message {
    // Upload
    /// Open the file picker.
    PickFiles,
    /// Files read from disk, or an empty list if the picker was cancelled.
    FilesPicked(Result<Vec<Upload>, String>),

    // Editing
    /// Flip one photo's selection.
    ToggleSelection(usize),
    /// A photo's label was edited.
    LabelChanged(usize, String),
    /// Move selected photos one place earlier.
    MoveUp,
    /// Move selected photos one place later.
    MoveDown,
    /// Remove selected photos and block them for the rest of the run.
    RemoveSelected,
    /// Clear every selection.
    DeselectAll,

    // Document
    /// Document name field changed.
    DocumentNameChanged(String),
    /// Word or PDF picked.
    DocumentKindSelected(DocumentKind),
    /// Lossless embedding switched on or off.
    PreserveQualityToggled(bool),
    /// Start rendering the document.
    Generate,
    /// Progress or result from the running render.
    Generation(GenerationEvent),
    /// Open the save dialog for the finished document.
    SaveDocument,
    /// Where the document was written, or `None` if the dialog was cancelled.
    DocumentSaved(Result<Option<PathBuf>, String>),

    // Settings
    /// Switch between light and dark palettes.
    ToggleTheme,
    /// Settings loaded on startup.
    SettingsLoaded(Result<AppSettings, String>),
    /// Settings written to disk.
    SettingsSaved(Result<(), String>),

    /// Hide the notice banner.
    DismissNotice,
    /// Keyboard shortcut.
    KeyPressed(KeyboardAction),
    /// Event with nothing to do.
    Ignored,
}

/// Actions reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyboardAction {
    /// Ctrl+O.
    Upload,
    /// Ctrl+Up.
    MoveUp,
    /// Ctrl+Down.
    MoveDown,
    /// Delete.
    Remove,
    /// Escape.
    DeselectAll,
    /// Ctrl+G.
    Generate,
}
