//! Document generation progress.

use photobinder_core::RenderedDocument;

/// Event emitted by a running generation.
#[derive(Debug, Clone)]
pub enum GenerationEvent {
    /// Fraction of photos placed so far.
    Progress(f64),
    /// Generation ended.
    Finished(Result<RenderedDocument, String>),
}

/// Where the generate panel is at.
#[derive(Debug, Clone, Default)]
pub enum GenerationState {
    /// Nothing generated yet, or the photos changed since.
    #[default]
    Idle,
    /// Rendering.
    Running {
        /// Last reported fraction.
        fraction: f64,
        /// The photos or options changed after the render started.
        stale: bool,
    },
    /// A document is ready to save.
    Ready(RenderedDocument),
    /// The last attempt failed. No document is offered.
    Failed(String),
}

impl GenerationState {
    /// True while a render is in flight.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self, Self::Running { .. })
    }

    /// A fresh render at zero progress.
    #[must_use]
    pub const fn started() -> Self {
        Self::Running {
            fraction: 0.0,
            stale: false,
        }
    }

    /// Forgets the finished document after the photos or options change.
    ///
    /// A render in flight keeps running but its result will be discarded.
    pub fn invalidate(&mut self) {
        match self {
            Self::Running { stale, .. } => *stale = true,
            _ => *self = Self::Idle,
        }
    }

    /// Folds an event into the state.
    pub fn advance(&mut self, event: GenerationEvent) {
        let stale = matches!(self, Self::Running { stale: true, .. });
        *self = match event {
            GenerationEvent::Progress(fraction) => Self::Running { fraction, stale },
            GenerationEvent::Finished(Ok(_)) if stale => Self::Idle,
            GenerationEvent::Finished(Ok(document)) => Self::Ready(document),
            GenerationEvent::Finished(Err(e)) => Self::Failed(e),
        };
    }

    /// The finished document, if any.
    #[must_use]
    pub const fn document(&self) -> Option<&RenderedDocument> {
        match self {
            Self::Ready(document) => Some(document),
            _ => None,
        }
    }
}
