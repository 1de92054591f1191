//! Button style functions.

use iced::widget::button::{Status, Style};
use iced::{Border, Color};

use super::palette;
use super::shadows;
use super::shadows::radius;

fn outlined(background: Color, text_color: Color, edge: Color, corner: f32) -> Style {
    Style {
        background: Some(background.into()),
        text_color,
        border: Border {
            color: edge,
            width: 1.0,
            radius: corner.into(),
        },
        shadow: shadows::none(),
        snap: false,
    }
}

/// Filled accent button for the main action (upload, generate, save).
pub fn primary_button_style(_theme: &iced::Theme, status: Status) -> Style {
    let p = palette::current();
    let fill = |color| outlined(color, p.on_accent, p.accent_pressed, radius::MEDIUM);

    match status {
        Status::Active => Style {
            shadow: shadows::glow(p.accent),
            ..fill(p.accent)
        },
        Status::Hovered => Style {
            shadow: shadows::glow(p.accent_hover),
            ..fill(p.accent_hover)
        },
        Status::Pressed => fill(p.accent_pressed),
        Status::Disabled => outlined(
            p.rule_strong,
            p.ink_faint,
            p.rule_strong,
            radius::MEDIUM,
        ),
    }
}

/// Flat toolbar button that outlines on hover.
pub fn toolbar_button_style(_theme: &iced::Theme, status: Status) -> Style {
    let p = palette::current();

    let (background, text_color, edge) = match status {
        Status::Active => (Color::TRANSPARENT, p.ink, Color::TRANSPARENT),
        Status::Hovered => (p.hover, p.ink, p.rule),
        Status::Pressed => (p.picked, p.ink, p.picked_edge),
        Status::Disabled => (Color::TRANSPARENT, p.ink_faint, Color::TRANSPARENT),
    };
    outlined(background, text_color, edge, radius::SMALL)
}

/// Red outline that fills in on hover, for removing photos.
pub fn danger_button_style(_theme: &iced::Theme, status: Status) -> Style {
    let p = palette::current();

    let (background, text_color, edge) = match status {
        Status::Active => (Color::TRANSPARENT, p.danger, p.danger),
        Status::Hovered | Status::Pressed => (p.danger, p.on_accent, p.danger),
        Status::Disabled => (Color::TRANSPARENT, p.ink_faint, p.rule),
    };
    outlined(background, text_color, edge, radius::SMALL)
}
