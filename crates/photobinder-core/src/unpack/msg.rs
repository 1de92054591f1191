//! Image extraction from Outlook (`.msg`) compound files.
//!
//! A `.msg` file is a compound file binary whose attachments live in root
//! storages named `__attach_version1.0_#NNNNNNNN`. Each attachment keeps
//! its properties in `__substg1.0_<tag><type>` streams.

use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::vec;

use cfb::CompoundFile;
use tracing::{debug, warn};

use crate::ingest::{Upload, is_decodable, resolve_extension};
use crate::{Error, Result};

const ATTACHMENT_PREFIX: &str = "__attach_version1.0_#";

/// `PR_ATTACH_DATA_BIN`.
const ATTACH_DATA: &str = "__substg1.0_37010102";

/// Filename properties in preference order: long name, then short name,
/// each as Unicode then as ANSI.
const FILENAME_STREAMS: &[&str] = &[
    "__substg1.0_3707001F",
    "__substg1.0_3704001F",
    "__substg1.0_3707001E",
    "__substg1.0_3704001E",
];

/// Lazily reads image attachments from an Outlook message, in attachment
/// order.
///
/// An image attachment without a readable data stream is yielded as
/// [`Error::Attachment`].
pub struct MsgImages {
    file: CompoundFile<Cursor<Vec<u8>>>,
    attachments: vec::IntoIter<PathBuf>,
}

impl std::fmt::Debug for MsgImages {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MsgImages")
            .field("remaining", &self.attachments.len())
            .finish_non_exhaustive()
    }
}

impl MsgImages {
    /// Opens a compound file and lists its attachment storages.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Msg`] if the bytes are not a compound file.
    pub fn parse(raw: Vec<u8>) -> Result<Self> {
        let file = CompoundFile::open(Cursor::new(raw))
            .map_err(|e| Error::Msg(format!("Not an Outlook message: {e}")))?;

        let mut attachments: Vec<PathBuf> = file
            .read_root_storage()
            .filter(|entry| entry.is_storage() && entry.name().starts_with(ATTACHMENT_PREFIX))
            .map(|entry| entry.path().to_path_buf())
            .collect();
        attachments.sort();
        debug!("Outlook message has {} attachments", attachments.len());

        Ok(Self {
            file,
            attachments: attachments.into_iter(),
        })
    }

    fn read_stream(&mut self, path: &Path) -> Option<Vec<u8>> {
        if !self.file.is_stream(path) {
            return None;
        }
        let mut data = Vec::new();
        match self.file.open_stream(path) {
            Ok(mut stream) => match stream.read_to_end(&mut data) {
                Ok(_) => Some(data),
                Err(e) => {
                    warn!("Failed to read {}: {e}", path.display());
                    None
                }
            },
            Err(e) => {
                warn!("Failed to open {}: {e}", path.display());
                None
            }
        }
    }

    fn filename(&mut self, attachment: &Path) -> Option<String> {
        FILENAME_STREAMS.iter().find_map(|stream| {
            let raw = self.read_stream(&attachment.join(stream))?;
            let name = if stream.ends_with("001F") {
                decode_utf16le(&raw)
            } else {
                String::from_utf8_lossy(&raw).into_owned()
            };
            let name = name.trim_end_matches('\0').trim().to_string();
            (!name.is_empty()).then_some(name)
        })
    }
}

impl Iterator for MsgImages {
    type Item = Result<Upload>;

    fn next(&mut self) -> Option<Result<Upload>> {
        loop {
            let attachment = self.attachments.next()?;
            let Some(filename) = self.filename(&attachment) else {
                debug!("Skipping unnamed attachment {}", attachment.display());
                continue;
            };
            if !is_decodable(&resolve_extension(Some(&filename), None)) {
                debug!("Skipping non-image attachment {filename}");
                continue;
            }
            return Some(match self.read_stream(&attachment.join(ATTACH_DATA)) {
                Some(bytes) => Ok(Upload::raw(bytes, Some(filename))),
                None => Err(Error::Attachment {
                    name: filename,
                    source: Box::new(Error::Msg("attachment has no data".into())),
                }),
            });
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.attachments.len()))
    }
}

fn decode_utf16le(raw: &[u8]) -> String {
    let units: Vec<u16> = raw
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16_lossy(&units)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    fn utf16(s: &str) -> Vec<u8> {
        s.encode_utf16().flat_map(u16::to_le_bytes).collect()
    }

    /// Builds a minimal compound file with the given `(name, data)`
    /// attachments.
    fn build_msg(attachments: &[(&str, &[u8])]) -> Vec<u8> {
        let mut file = CompoundFile::create(Cursor::new(Vec::new())).unwrap();
        for (i, (name, data)) in attachments.iter().enumerate() {
            let storage = PathBuf::from(format!("/{ATTACHMENT_PREFIX}{i:08X}"));
            file.create_storage(&storage).unwrap();
            let mut stream = file
                .create_stream(storage.join("__substg1.0_3707001F"))
                .unwrap();
            stream.write_all(&utf16(name)).unwrap();
            stream.flush().unwrap();
            drop(stream);
            let mut stream = file.create_stream(storage.join(ATTACH_DATA)).unwrap();
            stream.write_all(data).unwrap();
            stream.flush().unwrap();
        }
        file.flush().unwrap();
        file.into_inner().into_inner()
    }

    #[test]
    fn test_extracts_image_attachments_in_order() {
        let raw = build_msg(&[
            ("north.JPG", b"jpeg-bytes"),
            ("notes.docx", b"docx-bytes"),
            ("south.png", b"png-bytes"),
        ]);
        let images: Vec<Upload> = MsgImages::parse(raw)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].name(), Some("north.JPG"));
        assert_eq!(images[0].bytes(), b"jpeg-bytes");
        assert_eq!(images[1].name(), Some("south.png"));
    }

    #[test]
    fn test_not_a_compound_file() {
        assert!(matches!(
            MsgImages::parse(b"From: nobody".to_vec()),
            Err(Error::Msg(_))
        ));
    }

    #[test]
    fn test_decode_utf16le_trailing_nul() {
        let mut raw = utf16("a.png");
        raw.extend_from_slice(&[0, 0]);
        assert_eq!(decode_utf16le(&raw).trim_end_matches('\0'), "a.png");
    }
}
