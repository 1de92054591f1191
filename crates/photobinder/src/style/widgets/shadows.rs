//! Shadow presets and corner radii.

use iced::{Shadow, Vector};

use super::palette;

/// Corner radii.
pub mod radius {
    pub const NONE: f32 = 0.0;
    pub const SMALL: f32 = 4.0;
    pub const MEDIUM: f32 = 6.0;
    pub const LARGE: f32 = 10.0;
}

pub fn none() -> Shadow {
    Shadow::default()
}

/// Soft drop shadow for photo cards.
pub fn card() -> Shadow {
    Shadow {
        color: palette::current().shadow,
        offset: Vector::new(0.0, 2.0),
        blur_radius: 8.0,
    }
}

/// Colored halo for the primary action.
pub fn glow(color: iced::Color) -> Shadow {
    Shadow {
        color: iced::Color { a: 0.35, ..color },
        offset: Vector::new(0.0, 2.0),
        blur_radius: 10.0,
    }
}
