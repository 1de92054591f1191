//! View components for the application.

mod generate;
mod header;
mod notices;
mod photo_list;

pub use generate::{GeneratePanel, view_generate_panel};
pub use header::view_header;
pub use notices::view_notices;
pub use photo_list::view_photo_list;
