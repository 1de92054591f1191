//! Light and dark color sets, plus the one currently in use.

use std::sync::RwLock;

use iced::Color;
use serde::{Deserialize, Serialize};

/// Which color set the app is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Paper white with a blue accent.
    #[default]
    Light,
    /// Charcoal with an amber accent.
    Dark,
}

impl ThemeMode {
    /// The other mode.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Every color the style functions draw from.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub accent: Color,
    pub accent_hover: Color,
    pub accent_pressed: Color,
    pub on_accent: Color,

    pub window: Color,
    pub card: Color,
    pub panel: Color,

    pub ink: Color,
    pub ink_soft: Color,
    pub ink_faint: Color,

    pub success: Color,
    pub warning: Color,
    pub danger: Color,

    /// Fill and edge of a selected photo card.
    pub picked: Color,
    pub picked_edge: Color,
    pub hover: Color,

    pub rule: Color,
    pub rule_strong: Color,
    pub shadow: Color,
}

const LIGHT: Palette = Palette {
    accent: Color::from_rgb(0.16, 0.36, 0.70),
    accent_hover: Color::from_rgb(0.30, 0.50, 0.84),
    accent_pressed: Color::from_rgb(0.10, 0.26, 0.55),
    on_accent: Color::WHITE,

    window: Color::from_rgb(0.95, 0.955, 0.965),
    card: Color::WHITE,
    panel: Color::from_rgb(0.985, 0.985, 0.99),

    ink: Color::from_rgb(0.11, 0.12, 0.15),
    ink_soft: Color::from_rgb(0.38, 0.41, 0.47),
    ink_faint: Color::from_rgb(0.58, 0.61, 0.66),

    success: Color::from_rgb(0.16, 0.62, 0.36),
    warning: Color::from_rgb(0.90, 0.62, 0.05),
    danger: Color::from_rgb(0.84, 0.23, 0.26),

    picked: Color::from_rgb(0.91, 0.94, 0.99),
    picked_edge: Color::from_rgb(0.16, 0.36, 0.70),
    hover: Color::from_rgb(0.96, 0.97, 0.98),

    rule: Color::from_rgb(0.89, 0.90, 0.92),
    rule_strong: Color::from_rgb(0.76, 0.79, 0.83),
    shadow: Color::from_rgba(0.0, 0.0, 0.0, 0.07),
};

const DARK: Palette = Palette {
    accent: Color::from_rgb(0.98, 0.70, 0.25),
    accent_hover: Color::from_rgb(1.0, 0.80, 0.42),
    accent_pressed: Color::from_rgb(0.82, 0.56, 0.15),
    on_accent: Color::from_rgb(0.10, 0.09, 0.08),

    window: Color::from_rgb(0.09, 0.09, 0.10),
    card: Color::from_rgb(0.13, 0.13, 0.14),
    panel: Color::from_rgb(0.16, 0.16, 0.18),

    ink: Color::from_rgb(0.93, 0.93, 0.94),
    ink_soft: Color::from_rgb(0.68, 0.68, 0.71),
    ink_faint: Color::from_rgb(0.50, 0.50, 0.54),

    success: Color::from_rgb(0.35, 0.82, 0.52),
    warning: Color::from_rgb(1.0, 0.78, 0.30),
    danger: Color::from_rgb(1.0, 0.42, 0.42),

    picked: Color::from_rgb(0.22, 0.19, 0.13),
    picked_edge: Color::from_rgb(0.98, 0.70, 0.25),
    hover: Color::from_rgb(0.18, 0.18, 0.20),

    rule: Color::from_rgb(0.22, 0.22, 0.24),
    rule_strong: Color::from_rgb(0.38, 0.38, 0.42),
    shadow: Color::from_rgba(0.0, 0.0, 0.0, 0.30),
};

impl ThemeMode {
    /// Colors for this mode.
    #[must_use]
    pub const fn palette(self) -> Palette {
        match self {
            Self::Light => LIGHT,
            Self::Dark => DARK,
        }
    }
}

static ACTIVE: RwLock<Palette> = RwLock::new(LIGHT);

/// Switches every style function to `mode`'s colors.
pub fn set_theme(mode: ThemeMode) {
    if let Ok(mut active) = ACTIVE.write() {
        *active = mode.palette();
    }
}

/// Colors in use right now.
#[must_use]
pub fn current() -> Palette {
    ACTIVE.read().map_or(LIGHT, |active| *active)
}
