//! Banner for upload notices, per-file warnings and errors.

use iced::widget::{Column, button, container, row, text};
use iced::{Alignment, Element, Length};
use photobinder_core::UploadWarning;

use crate::message::Message;
use crate::style::widgets::{banner_style, palette, toolbar_button_style};

/// Renders the banner, or nothing when there is nothing to say.
pub fn view_notices<'a>(
    notice: Option<&'a str>,
    warnings: &'a [UploadWarning],
    error: Option<&'a str>,
) -> Option<Element<'a, Message>> {
    if notice.is_none() && warnings.is_empty() && error.is_none() {
        return None;
    }

    let p = palette::current();
    let mut lines = Column::new().spacing(4);

    if let Some(error) = error {
        lines = lines.push(text(error).size(14).color(p.danger));
    }
    if let Some(notice) = notice {
        lines = lines.push(text(notice).size(14).color(p.ink));
    }
    for warning in warnings {
        lines = lines.push(text(warning.to_string()).size(13).color(p.warning));
    }

    let dismiss = button(text("\u{2715}").size(12))
        .padding([2, 8])
        .style(toolbar_button_style)
        .on_press(Message::DismissNotice);

    Some(
        container(row![lines.width(Length::Fill), dismiss].align_y(Alignment::Start))
        .padding([8, 12])
        .width(Length::Fill)
        .style(banner_style)
        .into(),
    )
}
