//! Data models for the desktop app.

mod generation;
mod settings;

pub use generation::{GenerationEvent, GenerationState};
pub use settings::AppSettings;
