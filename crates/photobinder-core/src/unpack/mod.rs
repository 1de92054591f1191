//! Email container unpacking.
//!
//! Container uploads (`.msg`, `.eml`) are opened and their image
//! attachments yielded one at a time; any other upload passes through as a
//! single-element sequence. An attachment that cannot be extracted is
//! yielded as an error in its place.

mod eml;
mod msg;

use std::option;

use tracing::debug;

pub use eml::EmlImages;
pub use msg::MsgImages;

use crate::Result;
use crate::ingest::{ContainerKind, Upload};

/// Images produced from one upload. Finite and consumed once.
#[derive(Debug)]
pub enum Unpacked {
    /// A plain image upload.
    Single(option::IntoIter<Upload>),
    /// Image parts of a MIME message.
    Eml(EmlImages),
    /// Image attachments of an Outlook message.
    Msg(MsgImages),
}

impl Iterator for Unpacked {
    type Item = Result<Upload>;

    fn next(&mut self) -> Option<Result<Upload>> {
        match self {
            Self::Single(inner) => inner.next().map(Ok),
            Self::Eml(inner) => inner.next(),
            Self::Msg(inner) => inner.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Self::Single(inner) => inner.size_hint(),
            Self::Eml(inner) => inner.size_hint(),
            Self::Msg(inner) => inner.size_hint(),
        }
    }
}

/// Opens an upload according to its container kind.
///
/// # Errors
///
/// Returns an error if a `.msg` or `.eml` upload cannot be parsed.
pub fn unpack(upload: Upload) -> Result<Unpacked> {
    match upload.container_kind() {
        ContainerKind::Image => Ok(Unpacked::Single(Some(upload).into_iter())),
        ContainerKind::Eml => {
            debug!("Unpacking email {}", upload.display_name());
            EmlImages::parse(upload.bytes()).map(Unpacked::Eml)
        }
        ContainerKind::Msg => {
            debug!("Unpacking Outlook message {}", upload.display_name());
            MsgImages::parse(upload.into_bytes()).map(Unpacked::Msg)
        }
    }
}
