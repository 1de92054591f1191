//! Word (`.docx`) back-end.
//!
//! Writes a minimal WordprocessingML package by hand: one inline picture
//! and one left-aligned label paragraph per photo, with an explicit page
//! break before every photo but the first.

use std::fmt::Write as _;
use std::io::{Cursor, Write};

use chrono::Utc;
use tracing::debug;
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

use super::raster::ImageEncoding;
use super::{DocumentKind, DocumentRenderer, PageContent, RenderOptions};
use crate::Result;

/// English Metric Units per point.
const EMU_PER_POINT: f32 = 12_700.0;

/// Letter page and 1-inch margins, in twentieths of a point.
const SECTION_PROPERTIES: &str = r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr>"#;

const PAGE_BREAK: &str = r#"<w:p><w:r><w:br w:type="page"/></w:r></w:p>"#;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Default Extension="jpeg" ContentType="image/jpeg"/><Default Extension="png" ContentType="image/png"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/></Relationships>"#;

/// Builds a `.docx` package page by page.
#[derive(Debug, Default)]
pub struct WordRenderer {
    body: String,
    media: Vec<(String, Vec<u8>)>,
}

impl WordRenderer {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn document_xml(&self) -> String {
        format!(
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                "\n",
                r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" "#,
                r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
                r#"xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" "#,
                r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
                r#"xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture">"#,
                "<w:body>{}{}</w:body></w:document>"
            ),
            self.body, SECTION_PROPERTIES
        )
    }

    fn document_rels(&self) -> String {
        let mut xml = String::from(concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            "\n",
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#
        ));
        for (i, (name, _)) in self.media.iter().enumerate() {
            let _ = write!(
                xml,
                r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="media/{name}"/>"#,
                i + 1
            );
        }
        xml.push_str("</Relationships>");
        xml
    }
}

impl DocumentRenderer for WordRenderer {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Word
    }

    fn lossless_encoding(&self) -> ImageEncoding {
        ImageEncoding::Png
    }

    #[allow(clippy::cast_possible_truncation)]
    fn add_page(&mut self, page: PageContent<'_>) -> Result<()> {
        if page.index > 0 {
            self.body.push_str(PAGE_BREAK);
        }

        let number = self.media.len() + 1;
        let extension = match page.image.encoding {
            ImageEncoding::Png => "png",
            ImageEncoding::Jpeg | ImageEncoding::FlateRgb => "jpeg",
        };
        let name = format!("image{number}.{extension}");
        let cx = (page.image.width_pt * EMU_PER_POINT).round() as i64;
        let cy = (page.image.height_pt * EMU_PER_POINT).round() as i64;

        let _ = write!(
            self.body,
            concat!(
                "<w:p><w:r><w:drawing>",
                r#"<wp:inline distT="0" distB="0" distL="0" distR="0">"#,
                r#"<wp:extent cx="{cx}" cy="{cy}"/>"#,
                r#"<wp:docPr id="{n}" name="Picture {n}"/>"#,
                r#"<wp:cNvGraphicFramePr><a:graphicFrameLocks noChangeAspect="1"/></wp:cNvGraphicFramePr>"#,
                r#"<a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture">"#,
                r#"<pic:pic><pic:nvPicPr><pic:cNvPr id="{n}" name="{name}"/><pic:cNvPicPr/></pic:nvPicPr>"#,
                r#"<pic:blipFill><a:blip r:embed="rId{n}"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill>"#,
                r#"<pic:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm>"#,
                r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr></pic:pic>"#,
                "</a:graphicData></a:graphic></wp:inline></w:drawing></w:r></w:p>"
            ),
            cx = cx,
            cy = cy,
            n = number,
            name = name,
        );
        let _ = write!(
            self.body,
            r#"<w:p><w:pPr><w:jc w:val="left"/></w:pPr><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
            escape_xml(page.label)
        );

        debug!("Placed {name} on page {} of {}", page.index + 1, page.count);
        self.media.push((name, page.image.data));
        Ok(())
    }

    fn finish(self: Box<Self>, options: &RenderOptions) -> Result<Vec<u8>> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        // Images are already compressed.
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

        zip.start_file("[Content_Types].xml", deflated)?;
        zip.write_all(CONTENT_TYPES.as_bytes())?;
        zip.start_file("_rels/.rels", deflated)?;
        zip.write_all(PACKAGE_RELS.as_bytes())?;
        zip.start_file("docProps/core.xml", deflated)?;
        zip.write_all(core_properties(&options.title).as_bytes())?;
        zip.start_file("word/document.xml", deflated)?;
        zip.write_all(self.document_xml().as_bytes())?;
        zip.start_file("word/_rels/document.xml.rels", deflated)?;
        zip.write_all(self.document_rels().as_bytes())?;
        for (name, data) in &self.media {
            zip.start_file(format!("word/media/{name}"), stored)?;
            zip.write_all(data)?;
        }

        Ok(zip.finish()?.into_inner())
    }
}

fn core_properties(title: &str) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            "\n",
            r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
            r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
            r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
            "<dc:title>{}</dc:title><dc:creator>PhotoBinder</dc:creator>",
            r#"<dcterms:created xsi:type="dcterms:W3CDTF">{}</dcterms:created>"#,
            "</cp:coreProperties>"
        ),
        escape_xml(title),
        Utc::now().format("%Y-%m-%dT%H:%M:%SZ")
    )
}

/// Escapes text for XML content and attributes, dropping characters
/// XML 1.0 cannot carry.
fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' | '\n' | '\r' => out.push(c),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}
