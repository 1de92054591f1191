//! EXIF orientation normalization.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::DynamicImage;

/// EXIF orientation tag values (1 through 8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// 1: already upright.
    #[default]
    Normal,
    /// 2: mirrored left to right.
    MirrorHorizontal,
    /// 3: upside down.
    Rotate180,
    /// 4: mirrored top to bottom.
    MirrorVertical,
    /// 5: mirrored along the main diagonal.
    Transpose,
    /// 6: needs a quarter turn clockwise.
    Rotate90,
    /// 7: mirrored along the anti-diagonal.
    Transverse,
    /// 8: needs a quarter turn counter-clockwise.
    Rotate270,
}

impl Orientation {
    /// Maps a raw tag value. Unknown values are treated as upright.
    #[must_use]
    pub const fn from_tag(value: u32) -> Self {
        match value {
            2 => Self::MirrorHorizontal,
            3 => Self::Rotate180,
            4 => Self::MirrorVertical,
            5 => Self::Transpose,
            6 => Self::Rotate90,
            7 => Self::Transverse,
            8 => Self::Rotate270,
            _ => Self::Normal,
        }
    }

    /// Reads the primary image's orientation from an encoded file.
    ///
    /// Files without EXIF data, or with an unreadable orientation field,
    /// are upright.
    #[must_use]
    pub fn read(bytes: &[u8]) -> Self {
        let mut cursor = Cursor::new(bytes);
        let Ok(exif) = Reader::new().read_from_container(&mut cursor) else {
            return Self::Normal;
        };
        exif.get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map_or(Self::Normal, Self::from_tag)
    }

    /// True if no pixel transform is needed.
    #[must_use]
    pub const fn is_upright(self) -> bool {
        matches!(self, Self::Normal)
    }

    /// Transforms pixels so the image displays upright without metadata.
    #[must_use]
    pub fn apply(self, image: DynamicImage) -> DynamicImage {
        match self {
            Self::Normal => image,
            Self::MirrorHorizontal => image.fliph(),
            Self::Rotate180 => image.rotate180(),
            Self::MirrorVertical => image.flipv(),
            Self::Transpose => image.rotate90().fliph(),
            Self::Rotate90 => image.rotate90(),
            Self::Transverse => image.rotate270().fliph(),
            Self::Rotate270 => image.rotate270(),
        }
    }
}
