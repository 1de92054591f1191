//! `PhotoBinder` - turn a pile of photos into a one-photo-per-page document.
//!
//! Photos come from image files or from the attachments of `.msg` / `.eml`
//! emails; the result is a Word or PDF file.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod message;
mod model;
mod style;
mod view;

use std::path::{Path, PathBuf};

use anyhow::Context;
use iced::futures::{SinkExt, Stream};
use iced::keyboard::{self, Key, Modifiers};
use iced::widget::{Column, column, container, row};
use iced::{Element, Length, Subscription, Task};
use photobinder_core::ingest::ACCEPTED_EXTENSIONS;
use photobinder_core::{
    DocumentKind, Edit, ImageCache, PhotoRecord, RenderOptions, RenderedDocument, Session,
    Upload, UploadWarning,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use message::{KeyboardAction, Message};
use model::{AppSettings, GenerationEvent, GenerationState};
use style::widgets::page_style;
use view::GeneratePanel;

fn main() -> iced::Result {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "photobinder=debug,photobinder_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting PhotoBinder");

    iced::application(PhotoBinder::new, PhotoBinder::update, PhotoBinder::view)
        .title("PhotoBinder")
        .subscription(PhotoBinder::subscription)
        .run()
}

/// Main application state.
struct PhotoBinder {
    /// Photo collection and block-list; `None` if the cache could not be opened.
    session: Option<Session>,
    /// Document options and theme, persisted between runs.
    settings: AppSettings,
    /// Generate panel state.
    generation: GenerationState,
    /// Informational message, e.g. "No new files added".
    notice: Option<String>,
    /// Files skipped by the last upload.
    warnings: Vec<UploadWarning>,
    /// Error to display.
    error_message: Option<String>,
}

impl PhotoBinder {
    /// Create new application instance.
    fn new() -> (Self, Task<Message>) {
        let settings = AppSettings::default();
        let mut app = Self {
            session: None,
            generation: GenerationState::Idle,
            notice: None,
            warnings: Vec::new(),
            error_message: None,
            settings,
        };
        app.apply_theme();
        let dir = app.settings.upload_dir();
        app.open_session(&dir);
        (app, Task::perform(load_settings(), Message::SettingsLoaded))
    }

    /// Applies the current theme mode to the global palette.
    fn apply_theme(&self) {
        style::widgets::set_theme(self.settings.theme_mode);
    }

    /// Starts a new session over an emptied cache directory.
    fn open_session(&mut self, dir: &Path) {
        match ImageCache::open_fresh(dir) {
            Ok(cache) => {
                info!("Storing uploads in {}", dir.display());
                self.session = Some(Session::new(cache));
            }
            Err(e) => {
                warn!("Cannot use {} for uploads: {e}", dir.display());
                self.error_message = Some(format!(
                    "Photo storage at {} is unavailable: {e}",
                    dir.display()
                ));
            }
        }
    }

    fn photos(&self) -> &[PhotoRecord] {
        self.session.as_ref().map_or(&[][..], Session::photos)
    }

    fn save_settings(&self) -> Task<Message> {
        Task::perform(save_settings(self.settings.clone()), Message::SettingsSaved)
    }

    /// Drops a finished document once the photos it was made from change.
    fn invalidate_document(&mut self) {
        self.generation.invalidate();
    }

    /// Update state based on message.
    #[allow(clippy::needless_pass_by_value)]
    #[allow(clippy::too_many_lines)] // Large match is idiomatic for Elm architecture
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PickFiles => {
                return Task::perform(pick_uploads(), Message::FilesPicked);
            }
            Message::FilesPicked(Ok(uploads)) => {
                if uploads.is_empty() {
                    return Task::none();
                }
                let Some(session) = self.session.as_mut() else {
                    return Task::none();
                };
                let report = session.upload(uploads);
                self.notice = report.notice().map(str::to_string);
                self.warnings = report.warnings;
                if report.added > 0 {
                    self.invalidate_document();
                }
            }
            Message::FilesPicked(Err(e)) => {
                self.error_message = Some(e);
            }
            Message::ToggleSelection(index) => self.edit(Edit::ToggleSelection(index)),
            Message::LabelChanged(index, label) => self.edit(Edit::SetLabel(index, label)),
            Message::MoveUp => self.edit(Edit::MoveSelectedUp),
            Message::MoveDown => self.edit(Edit::MoveSelectedDown),
            Message::RemoveSelected => self.edit(Edit::RemoveSelected),
            Message::DeselectAll => self.edit(Edit::DeselectAll),
            Message::DocumentNameChanged(name) => {
                self.settings.document_name = name;
            }
            Message::DocumentKindSelected(kind) => {
                self.settings.document_kind = kind;
                self.invalidate_document();
                return self.save_settings();
            }
            Message::PreserveQualityToggled(preserve) => {
                self.settings.preserve_quality = preserve;
                self.invalidate_document();
                return self.save_settings();
            }
            Message::Generate => return self.start_generation(),
            Message::Generation(event) => {
                match &event {
                    GenerationEvent::Finished(Ok(document)) => {
                        info!("Generated {} ({} bytes)", document.kind, document.len());
                    }
                    GenerationEvent::Finished(Err(e)) => warn!("Generation failed: {e}"),
                    GenerationEvent::Progress(_) => {}
                }
                self.generation.advance(event);
            }
            Message::SaveDocument => {
                if let Some(document) = self.generation.document().cloned() {
                    let file_name = document.kind.file_name(&self.settings.document_name);
                    return Task::perform(
                        save_document(document, file_name),
                        Message::DocumentSaved,
                    );
                }
            }
            Message::DocumentSaved(Ok(Some(path))) => {
                self.notice = Some(format!("Saved to {}", path.display()));
            }
            Message::DocumentSaved(Ok(None)) => {}
            Message::DocumentSaved(Err(e)) => {
                self.error_message = Some(e);
            }
            Message::ToggleTheme => {
                self.settings.theme_mode = self.settings.theme_mode.toggled();
                self.apply_theme();
                return self.save_settings();
            }
            Message::SettingsLoaded(Ok(settings)) => {
                let dir = settings.upload_dir();
                let moved = self.session.as_ref().is_none_or(|s| s.cache_dir() != dir);
                self.settings = settings;
                self.apply_theme();
                if moved && self.photos().is_empty() {
                    self.error_message = None;
                    self.open_session(&dir);
                }
            }
            Message::SettingsLoaded(Err(e)) => {
                info!("Using default settings: {e}");
            }
            Message::SettingsSaved(Ok(())) => {}
            Message::SettingsSaved(Err(e)) => {
                warn!("Failed to save settings: {e}");
            }
            Message::DismissNotice => {
                self.notice = None;
                self.warnings.clear();
                self.error_message = None;
            }
            Message::KeyPressed(action) => return self.handle_keyboard_action(action),
            Message::Ignored => {}
        }
        Task::none()
    }

    /// Applies an edit; selection changes leave a finished document alone.
    fn edit(&mut self, edit: Edit) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let changes_document = !matches!(edit, Edit::ToggleSelection(_) | Edit::DeselectAll);
        match session.apply(edit) {
            Ok(()) if changes_document => self.invalidate_document(),
            Ok(()) => {}
            Err(e) => {
                warn!("Edit rejected: {e}");
                self.error_message = Some(e.to_string());
            }
        }
    }

    fn start_generation(&mut self) -> Task<Message> {
        if self.generation.is_running() || self.photos().is_empty() {
            return Task::none();
        }

        let photos = self.photos().to_vec();
        let kind = self.settings.document_kind;
        let options = RenderOptions {
            preserve_quality: self.settings.preserve_quality,
            title: self.settings.document_name.clone(),
        };
        info!("Generating {kind} document from {} photos", photos.len());

        self.generation = GenerationState::started();
        Task::batch([
            Task::run(generate(photos, kind, options), Message::Generation),
            self.save_settings(),
        ])
    }

    fn handle_keyboard_action(&mut self, action: KeyboardAction) -> Task<Message> {
        let message = match action {
            KeyboardAction::Upload => Message::PickFiles,
            KeyboardAction::MoveUp => Message::MoveUp,
            KeyboardAction::MoveDown => Message::MoveDown,
            KeyboardAction::Remove => Message::RemoveSelected,
            KeyboardAction::DeselectAll => Message::DeselectAll,
            KeyboardAction::Generate => Message::Generate,
        };
        self.update(message)
    }

    /// Render current state as UI.
    fn view(&self) -> Element<'_, Message> {
        let photos = self.photos();
        let selected = self
            .session
            .as_ref()
            .map_or(0, |s| s.store().selected_count());

        let header = view::view_header(photos.len(), selected, self.settings.theme_mode);

        let mut body = Column::new().spacing(12).width(Length::Fill);
        if let Some(notices) = view::view_notices(
            self.notice.as_deref(),
            &self.warnings,
            self.error_message.as_deref(),
        ) {
            body = body.push(notices);
        }
        body = body.push(view::view_photo_list(photos));

        let panel = view::view_generate_panel(GeneratePanel {
            document_name: &self.settings.document_name,
            document_kind: self.settings.document_kind,
            preserve_quality: self.settings.preserve_quality,
            photo_count: photos.len(),
            generation: &self.generation,
        });

        container(column![
            header,
            row![body, panel]
                .spacing(16)
                .padding(16)
                .height(Length::Fill),
        ])
        .width(Length::Fill)
        .height(Length::Fill)
        .style(page_style)
        .into()
    }

    /// Subscribe to keyboard events for shortcuts.
    #[allow(clippy::unused_self)] // Required signature for iced subscription
    fn subscription(&self) -> Subscription<Message> {
        keyboard::listen().map(|event| {
            if let keyboard::Event::KeyPressed { key, modifiers, .. } = event {
                handle_key_press(key, modifiers).unwrap_or(Message::Ignored)
            } else {
                Message::Ignored
            }
        })
    }
}

/// Handle keyboard shortcuts and return appropriate message.
fn handle_key_press(key: Key, modifiers: Modifiers) -> Option<Message> {
    let ctrl = modifiers.command(); // Ctrl on Linux/Windows, Cmd on macOS

    let action = match key {
        Key::Character(c) if ctrl && c.as_str() == "o" => KeyboardAction::Upload,
        Key::Character(c) if ctrl && c.as_str() == "g" => KeyboardAction::Generate,
        Key::Named(keyboard::key::Named::ArrowUp) if ctrl => KeyboardAction::MoveUp,
        Key::Named(keyboard::key::Named::ArrowDown) if ctrl => KeyboardAction::MoveDown,
        Key::Named(keyboard::key::Named::Delete) => KeyboardAction::Remove,
        Key::Named(keyboard::key::Named::Escape) => KeyboardAction::DeselectAll,
        _ => return None,
    };
    Some(Message::KeyPressed(action))
}

fn settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("photobinder")
        .join("settings.json")
}

/// Load application settings from file.
async fn load_settings() -> Result<AppSettings, String> {
    let settings_path = settings_path();

    if !settings_path.exists() {
        return Ok(AppSettings::default());
    }

    let contents = tokio::fs::read_to_string(&settings_path)
        .await
        .map_err(|e| e.to_string())?;

    serde_json::from_str(&contents).map_err(|e| e.to_string())
}

/// Save application settings to file.
async fn save_settings(settings: AppSettings) -> Result<(), String> {
    let settings_path = settings_path();

    if let Some(config_dir) = settings_path.parent() {
        tokio::fs::create_dir_all(config_dir)
            .await
            .map_err(|e| e.to_string())?;
    }

    let contents = serde_json::to_string_pretty(&settings).map_err(|e| e.to_string())?;

    tokio::fs::write(&settings_path, contents)
        .await
        .map_err(|e| e.to_string())?;

    tracing::debug!("Settings saved to {:?}", settings_path);
    Ok(())
}

/// Ask for files and read them. Cancelling yields an empty list.
async fn pick_uploads() -> Result<Vec<Upload>, String> {
    read_picked_files().await.map_err(|e| format!("{e:#}"))
}

async fn read_picked_files() -> anyhow::Result<Vec<Upload>> {
    let Some(handles) = rfd::AsyncFileDialog::new()
        .set_title("Upload photos or emails")
        .add_filter("Photos and emails", ACCEPTED_EXTENSIONS)
        .pick_files()
        .await
    else {
        return Ok(Vec::new());
    };

    let mut uploads = Vec::with_capacity(handles.len());
    for handle in handles {
        let path = handle.path();
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        uploads.push(Upload::named(handle.file_name(), bytes));
    }

    info!("Picked {} files", uploads.len());
    Ok(uploads)
}

/// Renders on a blocking thread, streaming progress back to the UI.
fn generate(
    photos: Vec<PhotoRecord>,
    kind: DocumentKind,
    options: RenderOptions,
) -> impl Stream<Item = GenerationEvent> {
    iced::stream::channel(
        16,
        move |mut output: iced::futures::channel::mpsc::Sender<GenerationEvent>| async move {
            let (progress_tx, mut progress_rx) = tokio::sync::mpsc::unbounded_channel();

            let job = tokio::task::spawn_blocking(move || {
                let mut report = |fraction: f64| {
                    let _ = progress_tx.send(fraction);
                };
                photobinder_core::render(kind, &photos, &options, &mut report)
            });

            while let Some(fraction) = progress_rx.recv().await {
                let _ = output.send(GenerationEvent::Progress(fraction)).await;
            }

            let result = match job.await {
                Ok(rendered) => rendered.map_err(|e| e.to_string()),
                Err(e) => Err(format!("Generation stopped unexpectedly: {e}")),
            };
            let _ = output.send(GenerationEvent::Finished(result)).await;
        },
    )
}

/// Ask where to save the document and write it there.
async fn save_document(
    document: RenderedDocument,
    file_name: String,
) -> Result<Option<PathBuf>, String> {
    write_document(document, file_name)
        .await
        .map_err(|e| format!("{e:#}"))
}

async fn write_document(
    document: RenderedDocument,
    file_name: String,
) -> anyhow::Result<Option<PathBuf>> {
    let kind = document.kind;
    let Some(handle) = rfd::AsyncFileDialog::new()
        .set_title("Save document")
        .set_file_name(file_name)
        .add_filter(kind.to_string(), &[kind.extension()])
        .save_file()
        .await
    else {
        return Ok(None);
    };

    let path = handle.path().to_path_buf();
    tokio::fs::write(&path, &document.bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!(
        "Saved {} ({}, {} bytes)",
        path.display(),
        kind.mime_type(),
        document.len()
    );
    Ok(Some(path))
}
