//! Title bar with the edit toolbar.

use iced::widget::{Space, button, container, row, text};
use iced::{Alignment, Element, Length};

use crate::message::Message;
use crate::style::widgets::{
    ThemeMode, danger_button_style, header_style, palette, primary_button_style,
    toolbar_button_style, toolbar_style,
};

/// Renders the header: app title, upload button, edit actions, theme switch.
///
/// Edit actions are disabled while nothing is selected.
pub fn view_header(
    photo_count: usize,
    selected_count: usize,
    theme_mode: ThemeMode,
) -> Element<'static, Message> {
    let p = palette::current();

    let title = text("PhotoBinder")
        .size(22)
        .font(iced::Font {
            weight: iced::font::Weight::Bold,
            ..Default::default()
        })
        .color(p.accent);

    let count = text(match photo_count {
        0 => "No photos".to_string(),
        1 => "1 photo".to_string(),
        n => format!("{n} photos"),
    })
    .size(13)
    .color(p.ink_soft);

    let upload = button(text("Upload files").size(14))
        .padding([8, 16])
        .style(primary_button_style)
        .on_press(Message::PickFiles);

    let has_selection = selected_count > 0;
    let tool = |label: &'static str, message: Message| {
        button(text(label).size(14))
            .padding([6, 12])
            .style(toolbar_button_style)
            .on_press_maybe(has_selection.then_some(message))
    };

    let remove = button(text("Remove selected").size(14))
        .padding([6, 12])
        .style(danger_button_style)
        .on_press_maybe(has_selection.then_some(Message::RemoveSelected));

    let toolbar = container(
        row![
            tool("\u{2191} Move up", Message::MoveUp),
            tool("\u{2193} Move down", Message::MoveDown),
            tool("Deselect all", Message::DeselectAll),
            remove,
        ]
        .spacing(6)
        .align_y(Alignment::Center),
    )
    .padding(4)
    .style(toolbar_style);

    let theme_label = match theme_mode {
        ThemeMode::Light => "\u{263E} Dark",
        ThemeMode::Dark => "\u{2600} Light",
    };
    let theme = button(text(theme_label).size(13))
        .padding([6, 12])
        .style(toolbar_button_style)
        .on_press(Message::ToggleTheme);

    container(
        row![
            title,
            count,
            Space::new().width(Length::Fixed(16.0)),
            upload,
            toolbar,
            Space::new().width(Length::Fill),
            theme,
        ]
        .spacing(12)
        .align_y(Alignment::Center),
    )
    .padding([12, 20])
    .width(Length::Fill)
    .style(header_style)
    .into()
}
