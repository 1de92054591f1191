//! PDF back-end.
//!
//! Pages are built as a story of flowables (image, centered label, page
//! break after every photo but the last) and then laid out onto US Letter
//! pages with 1-inch margins.

use chrono::{Datelike, Timelike, Utc};
use pdf_writer::{Content, Date, Filter, Finish, Name, Pdf, Rect, Ref, Str, TextStr};
use tracing::{debug, warn};

use super::raster::{ImageEncoding, PreparedImage};
use super::{
    DocumentKind, DocumentRenderer, MARGIN_PT, PAGE_HEIGHT_PT, PAGE_WIDTH_PT, PageContent,
    RenderOptions,
};
use crate::Result;

const FONT_NAME: Name<'static> = Name(b"F1");
const FONT_SIZE: f32 = 10.0;
const LEADING: f32 = 12.0;
/// Space between a photo and its label.
const LABEL_GAP: f32 = 6.0;
const FRAME_WIDTH: f32 = PAGE_WIDTH_PT - 2.0 * MARGIN_PT;

/// Items placed on pages in order.
#[derive(Debug)]
enum Flowable {
    Image(PreparedImage),
    Paragraph(String),
    PageBreak,
}

/// A positioned image on a laid-out page.
#[derive(Debug)]
struct PlacedImage {
    image: PreparedImage,
    x: f32,
    y: f32,
}

/// A laid-out page.
#[derive(Debug, Default)]
struct Page {
    images: Vec<PlacedImage>,
    /// Baseline origin and WinAnsi bytes of each text line.
    lines: Vec<(f32, f32, Vec<u8>)>,
}

impl Page {
    fn is_empty(&self) -> bool {
        self.images.is_empty() && self.lines.is_empty()
    }
}

/// Builds a PDF from a story of flowables.
#[derive(Debug, Default)]
pub struct PdfRenderer {
    story: Vec<Flowable>,
}

impl PdfRenderer {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lays the story out onto pages.
    fn layout(story: Vec<Flowable>) -> Vec<Page> {
        let top = PAGE_HEIGHT_PT - MARGIN_PT;
        let mut pages = Vec::new();
        let mut page = Page::default();
        let mut cursor = top;

        for flowable in story {
            match flowable {
                Flowable::Image(image) => {
                    let x = MARGIN_PT + (FRAME_WIDTH - image.width_pt) / 2.0;
                    cursor -= image.height_pt;
                    page.images.push(PlacedImage { image, x, y: cursor });
                    cursor -= LABEL_GAP;
                }
                Flowable::Paragraph(text) => {
                    for line in wrap(&text, FRAME_WIDTH) {
                        cursor -= LEADING;
                        if cursor < MARGIN_PT {
                            warn!("Label too long for the page, truncating: {text:?}");
                            break;
                        }
                        let x = MARGIN_PT + (FRAME_WIDTH - text_width(&line)) / 2.0;
                        page.lines.push((x, cursor, to_win_ansi(&line)));
                    }
                }
                Flowable::PageBreak => {
                    pages.push(std::mem::take(&mut page));
                    cursor = top;
                }
            }
        }
        if !page.is_empty() || pages.is_empty() {
            pages.push(page);
        }
        pages
    }
}

impl DocumentRenderer for PdfRenderer {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Pdf
    }

    fn lossless_encoding(&self) -> ImageEncoding {
        ImageEncoding::FlateRgb
    }

    fn add_page(&mut self, page: PageContent<'_>) -> Result<()> {
        debug_assert_ne!(page.image.encoding, ImageEncoding::Png);
        self.story.push(Flowable::Image(page.image));
        self.story.push(Flowable::Paragraph(page.label.to_string()));
        if page.index + 1 < page.count {
            self.story.push(Flowable::PageBreak);
        }
        Ok(())
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn finish(self: Box<Self>, options: &RenderOptions) -> Result<Vec<u8>> {
        let pages = Self::layout(self.story);

        let catalog_id = Ref::new(1);
        let page_tree_id = Ref::new(2);
        let font_id = Ref::new(3);
        let info_id = Ref::new(4);
        let mut next_id = 5;
        let mut alloc = || {
            let id = Ref::new(next_id);
            next_id += 1;
            id
        };

        let mut pdf = Pdf::new();
        pdf.catalog(catalog_id).pages(page_tree_id);
        pdf.type1_font(font_id)
            .base_font(Name(b"Helvetica"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));

        let mut page_ids = Vec::with_capacity(pages.len());
        for page in &pages {
            let page_id = alloc();
            let content_id = alloc();
            page_ids.push(page_id);

            let mut content = Content::new();
            let mut xobjects = Vec::with_capacity(page.images.len());
            for (i, placed) in page.images.iter().enumerate() {
                let image_id = alloc();
                let name = format!("Im{}", i + 1);
                write_image(&mut pdf, image_id, &placed.image);

                content.save_state();
                content.transform([
                    placed.image.width_pt,
                    0.0,
                    0.0,
                    placed.image.height_pt,
                    placed.x,
                    placed.y,
                ]);
                content.x_object(Name(name.as_bytes()));
                content.restore_state();
                xobjects.push((name, image_id));
            }
            if !page.lines.is_empty() {
                content.begin_text();
                content.set_font(FONT_NAME, FONT_SIZE);
                for (x, y, bytes) in &page.lines {
                    content.set_text_matrix([1.0, 0.0, 0.0, 1.0, *x, *y]);
                    content.show(Str(bytes));
                }
                content.end_text();
            }
            pdf.stream(content_id, &content.finish());

            let mut pdf_page = pdf.page(page_id);
            pdf_page
                .media_box(Rect::new(0.0, 0.0, PAGE_WIDTH_PT, PAGE_HEIGHT_PT))
                .parent(page_tree_id)
                .contents(content_id);
            let mut resources = pdf_page.resources();
            resources.fonts().pair(FONT_NAME, font_id);
            let mut dict = resources.x_objects();
            for (name, id) in &xobjects {
                dict.pair(Name(name.as_bytes()), *id);
            }
            dict.finish();
            resources.finish();
            pdf_page.finish();
        }

        pdf.pages(page_tree_id)
            .kids(page_ids.iter().copied())
            .count(page_ids.len() as i32);

        let now = Utc::now();
        pdf.document_info(info_id)
            .title(TextStr(&options.title))
            .creator(TextStr("PhotoBinder"))
            .creation_date(
                Date::new(now.year() as u16)
                    .month(now.month() as u8)
                    .day(now.day() as u8)
                    .hour(now.hour() as u8)
                    .minute(now.minute() as u8)
                    .second(now.second() as u8)
                    .utc_offset_hour(0),
            );

        debug!("Laid out {} PDF pages", page_ids.len());
        Ok(pdf.finish())
    }
}

#[allow(clippy::cast_possible_wrap)]
fn write_image(pdf: &mut Pdf, id: Ref, image: &PreparedImage) {
    let mut xobject = pdf.image_xobject(id, &image.data);
    xobject.filter(match image.encoding {
        ImageEncoding::FlateRgb | ImageEncoding::Png => Filter::FlateDecode,
        ImageEncoding::Jpeg => Filter::DctDecode,
    });
    xobject.width(image.pixel_width as i32);
    xobject.height(image.pixel_height as i32);
    xobject.color_space().device_rgb();
    xobject.bits_per_component(8);
    xobject.finish();
}

/// Helvetica advance widths for printable ASCII, per 1000 units.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

fn char_width(c: char) -> f32 {
    let units = match c {
        ' '..='~' => HELVETICA_WIDTHS[c as usize - 0x20],
        _ => 556,
    };
    f32::from(units) * FONT_SIZE / 1000.0
}

fn text_width(text: &str) -> f32 {
    text.chars().map(char_width).sum()
}

/// Greedy word wrap; words wider than the line are broken by character.
fn wrap(text: &str, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let candidate = if line.is_empty() {
            word.to_string()
        } else {
            format!("{line} {word}")
        };
        if text_width(&candidate) <= max_width {
            line = candidate;
            continue;
        }
        if !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        for c in word.chars() {
            if !line.is_empty() && text_width(&line) + char_width(c) > max_width {
                lines.push(std::mem::take(&mut line));
            }
            line.push(c);
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Encodes text for a WinAnsi simple font, replacing anything else with `?`.
fn to_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' | '\u{A0}'..='\u{FF}' => c as u8,
            '€' => 0x80,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::render::raster::prepare_image;
    use image::DynamicImage;

    fn page(index: usize, count: usize, label: &str) -> PageContent<'_> {
        PageContent {
            index,
            count,
            image: prepare_image(&DynamicImage::new_rgb8(40, 30), ImageEncoding::Jpeg).unwrap(),
            label,
        }
    }

    fn story(labels: &[&str]) -> Vec<Flowable> {
        let mut renderer = PdfRenderer::new();
        for (i, label) in labels.iter().enumerate() {
            renderer.add_page(page(i, labels.len(), label)).unwrap();
        }
        renderer.story
    }

    fn count(haystack: &[u8], needle: &[u8]) -> usize {
        haystack.windows(needle.len()).filter(|w| *w == needle).count()
    }

    #[test]
    fn test_page_break_after_all_but_last() {
        let story = story(&["a", "b", "c"]);
        let breaks: Vec<usize> = story
            .iter()
            .enumerate()
            .filter(|(_, f)| matches!(f, Flowable::PageBreak))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(breaks, vec![2, 5]);
        assert!(!matches!(story.last(), Some(Flowable::PageBreak)));
    }

    #[test]
    fn test_three_photos_three_pages() {
        let pages = PdfRenderer::layout(story(&["a", "b", "c"]));
        assert_eq!(pages.len(), 3);
        assert!(pages.iter().all(|p| p.images.len() == 1 && p.lines.len() == 1));

        let mut renderer = Box::new(PdfRenderer::new());
        for i in 0..3 {
            renderer.add_page(page(i, 3, "x")).unwrap();
        }
        let bytes = DocumentRenderer::finish(renderer, &RenderOptions::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        assert_eq!(count(&bytes, b"/Type /Page\n"), 3);
        assert_eq!(count(&bytes, b"/Count 3"), 1);
    }

    #[test]
    fn test_no_photos_yields_one_blank_page() {
        let pages = PdfRenderer::layout(Vec::new());
        assert_eq!(pages.len(), 1);
        assert!(pages[0].is_empty());

        let renderer = Box::new(PdfRenderer::new());
        let bytes = DocumentRenderer::finish(renderer, &RenderOptions::default()).unwrap();
        assert_eq!(count(&bytes, b"/Type /Page\n"), 1);
        assert_eq!(count(&bytes, b"/Count 1"), 1);
    }

    #[test]
    fn test_image_centered_at_top() {
        let pages = PdfRenderer::layout(story(&["label"]));
        let placed = &pages[0].images[0];
        assert_eq!(placed.x, 72.0 + (468.0 - 40.0) / 2.0);
        assert_eq!(placed.y, 720.0 - 30.0);
        let (x, y, _) = &pages[0].lines[0];
        assert!(*y < placed.y);
        assert!((x - (306.0 - text_width("label") / 2.0)).abs() < 1e-3);
    }

    #[test]
    fn test_empty_label_has_no_lines() {
        let pages = PdfRenderer::layout(story(&[""]));
        assert!(pages[0].lines.is_empty());
    }

    #[test]
    fn test_wrap_long_label() {
        let text = "word ".repeat(60);
        let lines = wrap(&text, FRAME_WIDTH);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| text_width(l) <= FRAME_WIDTH));
        assert_eq!(lines.join(" "), text.trim_end());
    }

    #[test]
    fn test_wrap_breaks_unspaced_text() {
        let text = "W".repeat(100);
        let lines = wrap(&text, FRAME_WIDTH);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), text);
    }

    #[test]
    fn test_win_ansi_fallback() {
        assert_eq!(to_win_ansi("café – 日"), b"caf\xe9 \x96 ?".to_vec());
    }

    #[test]
    fn test_char_widths() {
        assert_eq!(char_width(' '), 2.78);
        assert_eq!(char_width('W'), 9.44);
        assert_eq!(char_width('~'), 5.84);
    }
}
