//! Image extraction from MIME (`.eml`) messages.

use std::vec;

use photobinder_mime::{Message, Part};
use tracing::debug;

use crate::{Error, Result};
use crate::ingest::Upload;

/// Lazily decodes the `image/*` leaf parts of a parsed message, in
/// document order.
///
/// A part whose body cannot be decoded is yielded as
/// [`Error::Attachment`] so the caller can report it and move on.
#[derive(Debug)]
pub struct EmlImages {
    parts: vec::IntoIter<Part>,
    seen: usize,
}

impl EmlImages {
    /// Parses a message and prepares its image parts for extraction.
    ///
    /// # Errors
    ///
    /// Returns an error if the message structure cannot be parsed.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        let message = Message::parse(raw)?;
        debug!(
            "Parsed email {:?}",
            message.subject().unwrap_or_default()
        );
        let parts: Vec<Part> = message
            .into_leaf_parts()
            .into_iter()
            .filter(|part| part.content_type_or_default().is_image())
            .collect();
        Ok(Self {
            parts: parts.into_iter(),
            seen: 0,
        })
    }
}

impl Iterator for EmlImages {
    type Item = Result<Upload>;

    fn next(&mut self) -> Option<Result<Upload>> {
        let part = self.parts.next()?;
        self.seen += 1;
        let filename = part.filename().unwrap_or_else(|| {
            let subtype = part.content_type_or_default().sub_type;
            format!("image_{}.{}", self.seen, extension_for_subtype(&subtype))
        });
        Some(match part.decode_body() {
            Ok(bytes) => Ok(Upload::raw(bytes, Some(filename))),
            Err(e) => Err(Error::Attachment {
                name: filename,
                source: Box::new(e.into()),
            }),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.parts.size_hint().1)
    }
}

fn extension_for_subtype(subtype: &str) -> &str {
    match subtype {
        "jpeg" | "pjpeg" | "jpg" => "jpg",
        "x-png" => "png",
        other if !other.is_empty() => other,
        _ => "jpg",
    }
}
