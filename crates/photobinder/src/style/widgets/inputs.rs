//! Text input and scrollable styles.

use iced::widget::{container, scrollable, text_input};
use iced::{Background, Border, Color};

use super::palette;
use super::shadows;
use super::shadows::radius;

/// Label and document-name fields.
pub fn label_input_style(_theme: &iced::Theme, status: text_input::Status) -> text_input::Style {
    let p = palette::current();

    let (background, edge, value) = match status {
        text_input::Status::Active => (p.card, p.rule, p.ink),
        text_input::Status::Hovered => (p.card, p.rule_strong, p.ink),
        text_input::Status::Focused { .. } => (p.card, p.accent, p.ink),
        text_input::Status::Disabled => (p.window, p.rule, p.ink_faint),
    };

    text_input::Style {
        background: background.into(),
        border: Border {
            color: edge,
            width: 1.0,
            radius: radius::SMALL.into(),
        },
        icon: p.ink_faint,
        placeholder: p.ink_faint,
        value,
        selection: p.picked,
    }
}

/// Thin scrollbar that picks up the accent color while in use.
pub fn scrollable_style(_theme: &iced::Theme, status: scrollable::Status) -> scrollable::Style {
    let p = palette::current();

    let rail = |color: Color| scrollable::Rail {
        background: None,
        border: Border::default(),
        scroller: scrollable::Scroller {
            background: color.into(),
            border: Border::default().rounded(radius::SMALL),
        },
    };

    let thumb = match status {
        scrollable::Status::Hovered {
            is_vertical_scrollbar_hovered: true,
            ..
        } => p.accent_hover,
        scrollable::Status::Dragged {
            is_vertical_scrollbar_dragged: true,
            ..
        } => p.accent,
        _ => p.rule_strong,
    };

    scrollable::Style {
        container: container::Style::default(),
        vertical_rail: rail(thumb),
        horizontal_rail: rail(p.rule_strong),
        gap: None,
        auto_scroll: scrollable::AutoScroll {
            background: Background::Color(p.card),
            border: Border::default(),
            shadow: shadows::none(),
            icon: p.ink_faint,
        },
    }
}
