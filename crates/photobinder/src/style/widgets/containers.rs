//! Container style functions.

use iced::widget::container::Style;
use iced::{Border, Color};

use super::palette;
use super::shadows;
use super::shadows::radius;

fn panel(background: Color, edge: Color, width: f32, corner: f32) -> Style {
    Style {
        background: Some(background.into()),
        text_color: Some(palette::current().ink),
        border: Border {
            color: edge,
            width,
            radius: corner.into(),
        },
        ..Style::default()
    }
}

/// Window background behind everything else.
pub fn page_style(_theme: &iced::Theme) -> Style {
    let p = palette::current();
    panel(p.window, Color::TRANSPARENT, 0.0, radius::NONE)
}

/// Title bar across the top of the window.
pub fn header_style(_theme: &iced::Theme) -> Style {
    let p = palette::current();
    panel(p.card, p.rule, 1.0, radius::NONE)
}

/// Group of edit actions in the header.
pub fn toolbar_style(_theme: &iced::Theme) -> Style {
    let p = palette::current();
    panel(p.panel, p.rule, 1.0, radius::MEDIUM)
}

/// Unselected photo card.
pub fn card_style(_theme: &iced::Theme) -> Style {
    let p = palette::current();
    Style {
        shadow: shadows::card(),
        ..panel(p.card, p.rule, 1.0, radius::LARGE)
    }
}

/// Photo card marked for a move or removal.
pub fn selected_card_style(_theme: &iced::Theme) -> Style {
    let p = palette::current();
    Style {
        shadow: shadows::card(),
        ..panel(p.picked, p.picked_edge, 2.0, radius::LARGE)
    }
}

/// Side panel holding the document options.
pub fn panel_style(_theme: &iced::Theme) -> Style {
    let p = palette::current();
    panel(p.panel, p.rule, 1.0, radius::LARGE)
}

/// Strip for upload results and errors.
pub fn banner_style(_theme: &iced::Theme) -> Style {
    let p = palette::current();
    Style {
        text_color: Some(p.ink_soft),
        ..panel(p.card, p.warning, 1.0, radius::SMALL)
    }
}
