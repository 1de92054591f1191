//! End-to-end tests: upload, edit, render.

#![allow(clippy::unwrap_used)]

use std::io::{Cursor, Read};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, GenericImageView, ImageFormat, Rgb, RgbImage};
use photobinder_core::{DocumentKind, Edit, ImageCache, RenderOptions, Session, Upload};

fn encoded(width: u32, height: u32, shade: u8, format: ImageFormat) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([shade, 120, 40]));
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img).write_to(&mut out, format).unwrap();
    out.into_inner()
}

/// Inserts an EXIF APP1 segment carrying only an orientation tag right
/// after the JPEG SOI marker.
fn with_orientation(jpeg: &[u8], orientation: u16) -> Vec<u8> {
    let mut tiff = vec![b'I', b'I', 0x2A, 0x00, 0x08, 0x00, 0x00, 0x00];
    tiff.extend_from_slice(&1u16.to_le_bytes());
    tiff.extend_from_slice(&0x0112u16.to_le_bytes());
    tiff.extend_from_slice(&3u16.to_le_bytes());
    tiff.extend_from_slice(&1u32.to_le_bytes());
    tiff.extend_from_slice(&orientation.to_le_bytes());
    tiff.extend_from_slice(&[0, 0]);
    tiff.extend_from_slice(&0u32.to_le_bytes());

    let mut segment = b"Exif\0\0".to_vec();
    segment.extend_from_slice(&tiff);
    let length = u16::try_from(segment.len() + 2).unwrap();

    let mut out = jpeg[..2].to_vec();
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&length.to_be_bytes());
    out.extend_from_slice(&segment);
    out.extend_from_slice(&jpeg[2..]);
    out
}

fn eml_with(images: &[(&str, &str, &[u8])]) -> Vec<u8> {
    let mut raw = String::from(
        "From: field@example.com\r\nSubject: Photos\r\nMIME-Version: 1.0\r\n\
         Content-Type: multipart/mixed; boundary=\"XX\"\r\n\r\n\
         --XX\r\nContent-Type: text/plain\r\n\r\nPhotos attached.\r\n",
    );
    for (content_type, disposition, bytes) in images {
        raw.push_str(&format!(
            "--XX\r\nContent-Type: {content_type}\r\n{disposition}Content-Transfer-Encoding: base64\r\n\r\n{}\r\n",
            STANDARD.encode(bytes)
        ));
    }
    raw.push_str("--XX--\r\n");
    raw.into_bytes()
}

fn session() -> (tempfile::TempDir, Session) {
    let tmp = tempfile::tempdir().unwrap();
    let cache = ImageCache::open_fresh(tmp.path().join("uploads")).unwrap();
    (tmp, Session::new(cache))
}

fn zip_entry(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut out = String::new();
    archive.by_name(name).unwrap().read_to_string(&mut out).unwrap();
    out
}

fn count(haystack: &[u8], needle: &[u8]) -> usize {
    haystack.windows(needle.len()).filter(|w| *w == needle).count()
}

#[test]
fn test_dedup_across_batches() {
    let (_tmp, mut session) = session();
    let photo = encoded(10, 10, 1, ImageFormat::Png);

    let first = session.upload(vec![Upload::named("a.png", photo.clone())]);
    let second = session.upload(vec![Upload::named("renamed.png", photo)]);

    assert_eq!(first.added, 1);
    assert_eq!(second.added, 0);
    assert_eq!(second.duplicates, 1);
    assert_eq!(second.notice(), Some("No new files added"));
    assert_eq!(session.photos().len(), 1);
}

#[test]
fn test_removed_photo_stays_removed() {
    let (_tmp, mut session) = session();
    let photo = encoded(10, 10, 2, ImageFormat::Png);
    session.upload(vec![
        Upload::named("keep.png", encoded(10, 10, 3, ImageFormat::Png)),
        Upload::named("drop.png", photo.clone()),
    ]);
    session.apply(Edit::ToggleSelection(1)).unwrap();
    session.apply(Edit::RemoveSelected).unwrap();

    let report = session.upload(vec![Upload::named("drop-again.png", photo)]);
    assert_eq!(report.blocked, 1);
    assert_eq!(session.photos().len(), 1);
    assert_eq!(session.photos()[0].display_name, "keep.png");
}

#[test]
fn test_eml_extracts_two_images_and_ignores_pdf() {
    let (_tmp, mut session) = session();
    let red = encoded(12, 8, 200, ImageFormat::Png);
    let green = encoded(8, 12, 50, ImageFormat::Jpeg);
    let eml = eml_with(&[
        (
            "image/png",
            "Content-Disposition: attachment; filename=\"north.png\"\r\n",
            &red,
        ),
        ("application/pdf; name=\"report.pdf\"", "", b"%PDF-1.4"),
        ("image/jpeg", "", &green),
    ]);

    let report = session.upload(vec![Upload::named("site.eml", eml)]);
    assert_eq!(report.added, 2);
    assert!(report.warnings.is_empty());

    let names: Vec<&str> = session
        .photos()
        .iter()
        .map(|p| p.display_name.as_str())
        .collect();
    assert_eq!(names, vec!["north.png", "image_2.jpg"]);
}

#[test]
fn test_exif_rotation_is_applied_before_storage() {
    let (_tmp, mut session) = session();
    let jpeg = with_orientation(&encoded(40, 20, 90, ImageFormat::Jpeg), 6);

    let report = session.upload(vec![Upload::named("sideways.jpg", jpeg.clone())]);
    assert_eq!(report.added, 1);

    let stored = &session.photos()[0];
    assert!(stored.storage_path.to_string_lossy().ends_with(".jpg"));
    assert_ne!(std::fs::read(&stored.storage_path).unwrap(), jpeg);
    let image = image::open(&stored.storage_path).unwrap();
    assert_eq!(image.dimensions(), (20, 40));
}

#[test]
fn test_three_photos_render_three_pages() {
    let (_tmp, mut session) = session();
    session.upload(
        (0..3)
            .map(|i| Upload::named(format!("p{i}.png"), encoded(30, 20, i * 40, ImageFormat::Png)))
            .collect(),
    );
    session.apply(Edit::SetLabel(0, "Roof".into())).unwrap();
    session.apply(Edit::SetLabel(2, "Basement".into())).unwrap();

    let word = session
        .render(DocumentKind::Word, &RenderOptions::default(), &mut |_| {})
        .unwrap();
    let document = zip_entry(&word.bytes, "word/document.xml");
    assert_eq!(document.matches(r#"<w:br w:type="page"/>"#).count(), 2);
    assert_eq!(document.matches(">Roof</w:t>").count(), 2);
    assert_eq!(document.matches(">Basement</w:t>").count(), 1);

    let pdf = session
        .render(DocumentKind::Pdf, &RenderOptions::default(), &mut |_| {})
        .unwrap();
    assert!(pdf.bytes.starts_with(b"%PDF-"));
    assert_eq!(count(&pdf.bytes, b"/Type /Page\n"), 3);
    assert_eq!(count(&pdf.bytes, b"(Roof) Tj"), 2);
}

#[test]
fn test_progress_is_strictly_increasing_to_one() {
    let (_tmp, mut session) = session();
    session.upload(
        (0..4)
            .map(|i| Upload::named(format!("p{i}.png"), encoded(5, 5, i, ImageFormat::Png)))
            .collect(),
    );

    for kind in DocumentKind::ALL {
        let mut seen = Vec::new();
        session
            .render(kind, &RenderOptions::default(), &mut |p| seen.push(p))
            .unwrap();
        assert_eq!(seen.len(), 4);
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
        assert!((seen[3] - 1.0).abs() < f64::EPSILON);
    }
}

#[test]
fn test_preserve_quality_embeds_lossless_images() {
    let (_tmp, mut session) = session();
    session.upload(vec![Upload::named("p.png", encoded(6, 6, 7, ImageFormat::Png))]);
    let options = RenderOptions {
        preserve_quality: true,
        ..RenderOptions::default()
    };

    let word = session.render(DocumentKind::Word, &options, &mut |_| {}).unwrap();
    let mut archive = zip::ZipArchive::new(word.reader()).unwrap();
    assert!(archive.by_name("word/media/image1.png").is_ok());

    let pdf = session.render(DocumentKind::Pdf, &options, &mut |_| {}).unwrap();
    assert_eq!(count(&pdf.bytes, b"/FlateDecode"), 1);
    assert_eq!(count(&pdf.bytes, b"/DCTDecode"), 0);
}

#[test]
fn test_render_fails_when_stored_photo_disappears() {
    let (_tmp, mut session) = session();
    session.upload(vec![Upload::named("p.png", encoded(6, 6, 9, ImageFormat::Png))]);
    std::fs::remove_file(&session.photos()[0].storage_path).unwrap();

    let mut calls = 0;
    let result = session.render(DocumentKind::Word, &RenderOptions::default(), &mut |_| calls += 1);
    assert!(matches!(result, Err(photobinder_core::Error::Render { .. })));
    assert_eq!(calls, 0);
}

#[test]
fn test_moves_reorder_pages() {
    let (_tmp, mut session) = session();
    session.upload(
        ["a", "b", "c"]
            .iter()
            .zip(0u8..)
            .map(|(name, i)| Upload::named(format!("{name}.png"), encoded(4, 4, i, ImageFormat::Png)))
            .collect(),
    );
    session.apply(Edit::ToggleSelection(2)).unwrap();
    session.apply(Edit::MoveSelectedUp).unwrap();
    session.apply(Edit::MoveSelectedUp).unwrap();
    session.apply(Edit::DeselectAll).unwrap();

    let names: Vec<&str> = session
        .photos()
        .iter()
        .map(|p| p.display_name.as_str())
        .collect();
    assert_eq!(names, vec!["c.png", "a.png", "b.png"]);
    assert_eq!(session.store().selected_count(), 0);
}
