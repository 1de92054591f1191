//! Document options and the generate/save actions.

use iced::widget::{
    Column, Space, button, column, container, pick_list, progress_bar, text, text_input, toggler,
};
use iced::{Element, Length};
use photobinder_core::DocumentKind;

use crate::message::Message;
use crate::model::GenerationState;
use crate::style::widgets::{label_input_style, palette, panel_style, primary_button_style};

/// Everything the generate panel shows.
pub struct GeneratePanel<'a> {
    pub document_name: &'a str,
    pub document_kind: DocumentKind,
    pub preserve_quality: bool,
    /// Generate stays disabled for an empty collection.
    pub photo_count: usize,
    pub generation: &'a GenerationState,
}

/// Renders the side panel.
#[allow(clippy::cast_possible_truncation)]
pub fn view_generate_panel(panel: GeneratePanel<'_>) -> Element<'_, Message> {
    let p = palette::current();
    let running = panel.generation.is_running();

    let name = text_input("Document name", panel.document_name)
        .padding([8, 10])
        .style(label_input_style)
        .on_input(Message::DocumentNameChanged);

    let kind = pick_list(
        DocumentKind::ALL.to_vec(),
        Some(panel.document_kind),
        Message::DocumentKindSelected,
    )
    .width(Length::Fill);

    let quality = toggler(panel.preserve_quality)
        .label("Preserve image quality")
        .size(16)
        .on_toggle(Message::PreserveQualityToggled);

    let can_generate =
        !running && panel.photo_count > 0 && !panel.document_name.trim().is_empty();
    let generate = button(text("Generate document").size(14))
        .padding([10, 16])
        .width(Length::Fill)
        .style(primary_button_style)
        .on_press_maybe(can_generate.then_some(Message::Generate));

    let mut content = Column::new()
        .spacing(10)
        .push(text("Document").size(18))
        .push(text("Name").size(12).color(p.ink_soft))
        .push(name)
        .push(text("Type").size(12).color(p.ink_soft))
        .push(kind)
        .push(quality)
        .push(Space::new().height(Length::Fixed(8.0)))
        .push(generate);

    match panel.generation {
        GenerationState::Idle => {}
        GenerationState::Running { fraction, .. } => {
            content = content.push(progress_bar(0.0..=1.0, *fraction as f32));
        }
        GenerationState::Ready(document) => {
            let file_name = document.kind.file_name(panel.document_name);
            let save = button(text(format!("Save {file_name}")).size(14))
                .padding([10, 16])
                .width(Length::Fill)
                .style(primary_button_style)
                .on_press(Message::SaveDocument);
            content = content.push(
                column![
                    text("Document generated successfully!")
                        .size(14)
                        .color(p.success),
                    save,
                ]
                .spacing(8),
            );
        }
        GenerationState::Failed(error) => {
            content = content.push(text(error).size(13).color(p.danger));
        }
    }

    container(content)
        .padding(16)
        .width(Length::Fixed(280.0))
        .style(panel_style)
        .into()
}
