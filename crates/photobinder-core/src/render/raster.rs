//! Image preparation shared by both document formats.

use std::io::{Cursor, Write};
use std::path::Path;

use flate2::Compression;
use flate2::write::ZlibEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};

use super::{MAX_IMAGE_HEIGHT_PT, MAX_IMAGE_WIDTH_PT, fit_within};
use crate::Result;

/// JPEG quality used when quality preservation is off.
pub const JPEG_QUALITY: u8 = 85;

/// How prepared pixels are encoded for embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageEncoding {
    /// Baseline JPEG.
    Jpeg,
    /// PNG file.
    Png,
    /// Zlib-compressed 8-bit RGB samples, as a PDF `FlateDecode` stream.
    FlateRgb,
}

/// A photo scaled and encoded for one page.
#[derive(Debug, Clone)]
pub struct PreparedImage {
    /// Width of the encoded pixels.
    pub pixel_width: u32,
    /// Height of the encoded pixels.
    pub pixel_height: u32,
    /// Placed width in points.
    pub width_pt: f32,
    /// Placed height in points.
    pub height_pt: f32,
    /// Encoding of `data`.
    pub encoding: ImageEncoding,
    /// Encoded image.
    pub data: Vec<u8>,
}

/// Loads a stored photo, fits it into the image box and encodes it.
///
/// Pixels are treated as points, so a 300x200 photo is placed at 300x200pt
/// and only photos larger than the box are resampled.
///
/// # Errors
///
/// Returns an error if the file is unreadable or not a valid image.
pub fn prepare(path: &Path, encoding: ImageEncoding) -> Result<PreparedImage> {
    let image = image::open(path)?;
    prepare_image(&image, encoding)
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub(crate) fn prepare_image(image: &DynamicImage, encoding: ImageEncoding) -> Result<PreparedImage> {
    let (width, height) = image.dimensions();
    let (width_pt, height_pt) = fit_within(
        width as f32,
        height as f32,
        MAX_IMAGE_WIDTH_PT,
        MAX_IMAGE_HEIGHT_PT,
    );
    let target_width = (width_pt.round() as u32).max(1);
    let target_height = (height_pt.round() as u32).max(1);

    let scaled = if (target_width, target_height) == (width, height) {
        image.clone()
    } else {
        image.resize_exact(target_width, target_height, FilterType::Lanczos3)
    };

    Ok(PreparedImage {
        pixel_width: scaled.width(),
        pixel_height: scaled.height(),
        width_pt,
        height_pt,
        encoding,
        data: encode(&scaled, encoding)?,
    })
}

fn encode(image: &DynamicImage, encoding: ImageEncoding) -> Result<Vec<u8>> {
    match encoding {
        ImageEncoding::Jpeg => {
            let mut out = Vec::new();
            let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
            rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY))?;
            Ok(out)
        }
        ImageEncoding::Png => {
            let mut out = Cursor::new(Vec::new());
            image.write_to(&mut out, ImageFormat::Png)?;
            Ok(out.into_inner())
        }
        ImageEncoding::FlateRgb => {
            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(image.to_rgb8().as_raw())?;
            Ok(encoder.finish()?)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use flate2::read::ZlibDecoder;
    use std::io::Read;

    #[test]
    fn test_large_image_is_downscaled() {
        let image = DynamicImage::new_rgb8(4000, 2000);
        let prepared = prepare_image(&image, ImageEncoding::Jpeg).unwrap();
        assert_eq!(prepared.width_pt, 432.0);
        assert_eq!(prepared.height_pt, 216.0);
        assert_eq!((prepared.pixel_width, prepared.pixel_height), (432, 216));
        assert_eq!(image::guess_format(&prepared.data).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_small_image_keeps_size() {
        let image = DynamicImage::new_rgb8(120, 80);
        let prepared = prepare_image(&image, ImageEncoding::Png).unwrap();
        assert_eq!((prepared.pixel_width, prepared.pixel_height), (120, 80));
        assert_eq!(prepared.width_pt, 120.0);
        assert_eq!(image::guess_format(&prepared.data).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn test_flate_rgb_is_raw_samples() {
        let image = DynamicImage::new_rgba8(3, 2);
        let prepared = prepare_image(&image, ImageEncoding::FlateRgb).unwrap();
        let mut raw = Vec::new();
        ZlibDecoder::new(prepared.data.as_slice())
            .read_to_end(&mut raw)
            .unwrap();
        assert_eq!(raw.len(), 3 * 2 * 3);
    }
}
