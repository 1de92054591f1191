//! Scrollable list of photo cards.

use iced::widget::{
    Column, column, container, image, row, scrollable, text, text_input, toggler,
};
use iced::{Alignment, ContentFit, Element, Length};
use photobinder_core::PhotoRecord;

use crate::message::Message;
use crate::style::widgets::{
    card_style, label_input_style, palette, scrollable_style, selected_card_style,
};

const HELP: &str = "You can label, reorder and edit your photos below. Photos with no label \
                    are labeled the same as the photo before them, so you don't have to \
                    repeat yourself.";

const PREVIEW_WIDTH: f32 = 320.0;
const PREVIEW_HEIGHT: f32 = 240.0;

/// Renders every photo as a card in page order.
pub fn view_photo_list(photos: &[PhotoRecord]) -> Element<'_, Message> {
    let p = palette::current();

    if photos.is_empty() {
        return container(
            text("Upload photos, .msg or .eml files to get started.")
                .size(15)
                .color(p.ink_faint),
        )
        .center(Length::Fill)
        .into();
    }

    let cards = photos
        .iter()
        .enumerate()
        .fold(Column::new().spacing(12), |list, (index, photo)| {
            list.push(view_card(index, photo))
        });

    column![
        text(HELP).size(13).color(p.ink_soft),
        scrollable(cards.padding([4, 16]))
            .height(Length::Fill)
            .style(scrollable_style),
    ]
    .spacing(12)
    .into()
}

fn view_card(index: usize, photo: &PhotoRecord) -> Element<'_, Message> {
    let p = palette::current();

    let select = toggler(photo.selected)
        .label("Select")
        .size(16)
        .on_toggle(move |_| Message::ToggleSelection(index));

    let preview = image(image::Handle::from_path(&photo.storage_path))
        .width(Length::Fixed(PREVIEW_WIDTH))
        .height(Length::Fixed(PREVIEW_HEIGHT))
        .content_fit(ContentFit::Contain);

    let details = column![
        text(format!("Photo {}", index + 1)).size(15),
        text(&photo.display_name).size(12).color(p.ink_faint),
        select,
        text_input(&format!("Label for photo {}", index + 1), &photo.label)
            .padding([8, 10])
            .style(label_input_style)
            .on_input(move |label| Message::LabelChanged(index, label)),
    ]
    .spacing(10)
    .width(Length::Fill);

    let style = if photo.selected {
        selected_card_style
    } else {
        card_style
    };

    container(row![preview, details].spacing(16).align_y(Alignment::Center))
        .padding(12)
        .width(Length::Fill)
        .style(style)
        .into()
}
