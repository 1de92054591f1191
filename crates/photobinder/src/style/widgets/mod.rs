//! Widget styles driven by the global palette.

mod buttons;
mod containers;
mod inputs;
pub mod palette;
mod shadows;

pub use palette::{ThemeMode, set_theme};

pub use containers::{
    banner_style, card_style, header_style, page_style, panel_style, selected_card_style,
    toolbar_style,
};

pub use buttons::{danger_button_style, primary_button_style, toolbar_button_style};

pub use inputs::{label_input_style, scrollable_style};
