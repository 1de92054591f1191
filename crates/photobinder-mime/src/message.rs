//! MIME message structure and parsing.

use crate::content_type::{ContentType, parse_parameters};
use crate::encoding::{decode_base64, decode_quoted_printable, decode_rfc2047};
use crate::error::{Error, Result};
use crate::header::Headers;

/// Nesting deeper than this is treated as an opaque leaf.
const MAX_DEPTH: usize = 32;

/// How a part body is encoded on the wire.
///
/// `7bit`, `8bit` and `binary` all leave the bytes untouched, so they
/// collapse into [`TransferEncoding::Identity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferEncoding {
    /// Body bytes are used as-is.
    #[default]
    Identity,
    /// `base64`.
    Base64,
    /// `quoted-printable`.
    QuotedPrintable,
}

impl TransferEncoding {
    /// Reads a `Content-Transfer-Encoding` value. Unknown tokens mean
    /// [`TransferEncoding::Identity`].
    #[must_use]
    pub fn from_header(value: &str) -> Self {
        let token = value.trim();
        if token.eq_ignore_ascii_case("base64") {
            Self::Base64
        } else if token.eq_ignore_ascii_case("quoted-printable") {
            Self::QuotedPrintable
        } else {
            Self::Identity
        }
    }
}

/// MIME entity: a header block plus either a body or child parts.
#[derive(Debug, Clone, Default)]
pub struct Part {
    /// Part headers.
    pub headers: Headers,
    /// Raw (still transfer-encoded) body. Empty for multipart containers.
    pub body: Vec<u8>,
    /// Child entities of a `multipart/*` or `message/rfc822` part.
    pub children: Vec<Part>,
}

impl Part {
    /// Creates a new leaf part.
    #[must_use]
    pub const fn new(headers: Headers, body: Vec<u8>) -> Self {
        Self {
            headers,
            body,
            children: Vec::new(),
        }
    }

    /// Parses a raw entity (headers, blank line, body).
    ///
    /// # Errors
    ///
    /// Returns an error if a multipart body has no boundary or no
    /// delimiter line.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        Self::parse_at_depth(raw, 0)
    }

    fn parse_at_depth(raw: &[u8], depth: usize) -> Result<Self> {
        let (header_bytes, body) = split_header_body(raw);
        let headers = Headers::parse(&String::from_utf8_lossy(header_bytes));
        let mut part = Self::new(headers, body.to_vec());

        if depth >= MAX_DEPTH {
            tracing::debug!("MIME nesting limit reached, treating part as leaf");
            return Ok(part);
        }

        let content_type = part.content_type_or_default();
        if content_type.is_multipart() {
            let boundary = content_type.boundary().ok_or(Error::MissingBoundary)?;
            for section in split_multipart(&part.body, boundary)? {
                part.children.push(Self::parse_at_depth(section, depth + 1)?);
            }
            part.body.clear();
        } else if content_type.essence() == "message/rfc822" {
            let inner = part.decode_body()?;
            part.children.push(Self::parse_at_depth(&inner, depth + 1)?);
        }

        Ok(part)
    }

    /// The part's content type.
    ///
    /// Parts without a `Content-Type` header default to `text/plain`.
    ///
    /// # Errors
    ///
    /// Returns an error if the content type header is invalid.
    pub fn content_type(&self) -> Result<ContentType> {
        self.headers
            .get("content-type")
            .map_or_else(|| Ok(ContentType::implicit()), ContentType::parse)
    }

    /// Like [`Part::content_type`], but an unparseable header falls back to
    /// `application/octet-stream` so a single bad part does not poison a walk.
    #[must_use]
    pub fn content_type_or_default(&self) -> ContentType {
        self.content_type().unwrap_or_else(|e| {
            tracing::debug!("Invalid content type, assuming octet-stream: {}", e);
            ContentType::octet_stream()
        })
    }

    /// The part's `Content-Transfer-Encoding`.
    #[must_use]
    pub fn transfer_encoding(&self) -> TransferEncoding {
        self.headers
            .get("content-transfer-encoding")
            .map(TransferEncoding::from_header)
            .unwrap_or_default()
    }

    /// The body with its transfer encoding removed.
    ///
    /// # Errors
    ///
    /// Returns an error for Base64 that cannot be decoded even leniently.
    pub fn decode_body(&self) -> Result<Vec<u8>> {
        match self.transfer_encoding() {
            TransferEncoding::Identity => Ok(self.body.clone()),
            TransferEncoding::Base64 => decode_base64(&self.body),
            TransferEncoding::QuotedPrintable => Ok(decode_quoted_printable(&self.body)),
        }
    }

    /// Returns the attachment filename, if any.
    ///
    /// Looks at the `Content-Disposition` `filename` parameter first, then
    /// the `Content-Type` `name` parameter. RFC 2231 and RFC 2047 encodings
    /// are decoded.
    #[must_use]
    pub fn filename(&self) -> Option<String> {
        let from_disposition = self.headers.get("content-disposition").and_then(|value| {
            let params = value.split_once(';').map_or("", |(_, p)| p);
            parse_parameters(params).remove("filename")
        });
        let raw = from_disposition.or_else(|| {
            self.content_type()
                .ok()
                .and_then(|ct| ct.parameter("name").map(ToString::to_string))
        })?;

        let decoded = decode_rfc2047(&raw).unwrap_or(raw);
        let trimmed = decoded.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    /// Checks if this part has child entities.
    #[must_use]
    pub fn is_container(&self) -> bool {
        !self.children.is_empty()
    }

    /// Collects leaf parts depth-first, in document order.
    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a Self>) {
        if self.children.is_empty() {
            out.push(self);
        } else {
            for child in &self.children {
                child.collect_leaves(out);
            }
        }
    }

    fn into_leaves(self, out: &mut Vec<Self>) {
        if self.children.is_empty() {
            out.push(self);
        } else {
            for child in self.children {
                child.into_leaves(out);
            }
        }
    }
}

/// Parsed MIME message.
#[derive(Debug, Clone)]
pub struct Message {
    root: Part,
}

impl Message {
    /// Parses a raw RFC 5322 message.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or a multipart section is
    /// malformed.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Err(Error::Parse("Empty message".to_string()));
        }
        let root = Part::parse(raw)?;
        if root.headers.is_empty() {
            return Err(Error::Parse("No headers found".to_string()));
        }
        Ok(Self { root })
    }

    /// Top-level headers.
    #[must_use]
    pub const fn headers(&self) -> &Headers {
        &self.root.headers
    }

    /// Root entity.
    #[must_use]
    pub const fn root(&self) -> &Part {
        &self.root
    }

    /// Gets the decoded Subject header.
    #[must_use]
    pub fn subject(&self) -> Option<String> {
        self.root.headers.get_decoded("subject")
    }

    /// Returns every leaf part, depth-first in document order.
    #[must_use]
    pub fn leaf_parts(&self) -> Vec<&Part> {
        let mut out = Vec::new();
        self.root.collect_leaves(&mut out);
        out
    }

    /// Consumes the message, returning its leaf parts in document order.
    #[must_use]
    pub fn into_leaf_parts(self) -> Vec<Part> {
        let mut out = Vec::new();
        self.root.into_leaves(&mut out);
        out
    }
}

/// Splits a raw entity at the first empty line.
fn split_header_body(raw: &[u8]) -> (&[u8], &[u8]) {
    // A leading empty line means no headers at all
    if raw.starts_with(b"\r\n") {
        return (&[], &raw[2..]);
    }
    if raw.starts_with(b"\n") {
        return (&[], &raw[1..]);
    }

    let mut i = 0;
    while let Some(offset) = raw[i..].iter().position(|&b| b == b'\n') {
        let nl = i + offset;
        let next = &raw[nl + 1..];
        if next.starts_with(b"\r\n") {
            return (&raw[..nl + 1], &next[2..]);
        }
        if next.starts_with(b"\n") {
            return (&raw[..nl + 1], &next[1..]);
        }
        i = nl + 1;
    }

    (raw, &[])
}

/// Splits a multipart body into its sections (preamble and epilogue dropped).
fn split_multipart<'a>(body: &'a [u8], boundary: &str) -> Result<Vec<&'a [u8]>> {
    let delimiter = format!("--{boundary}");
    let delimiter = delimiter.as_bytes();

    let mut sections = Vec::new();
    let mut section_start: Option<usize> = None;
    let mut line_start = 0;
    let mut closed = false;

    while line_start < body.len() {
        let line_end = body[line_start..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(body.len(), |p| line_start + p);
        let line = trim_line_end(&body[line_start..line_end]);

        if let Some(rest) = line.strip_prefix(delimiter) {
            let is_close = rest.starts_with(b"--");
            if rest.is_empty() || is_close {
                if let Some(start) = section_start.take() {
                    // The line break before a delimiter belongs to the delimiter
                    let end = strip_trailing_newline(body, start, line_start);
                    sections.push(&body[start..end]);
                }
                if is_close {
                    closed = true;
                    break;
                }
                section_start = Some((line_end + 1).min(body.len()));
            }
        }

        line_start = line_end + 1;
    }

    if let Some(start) = section_start {
        tracing::debug!("Multipart body without closing delimiter");
        sections.push(&body[start..]);
    }

    if sections.is_empty() && !closed {
        return Err(Error::InvalidMultipart(format!(
            "No delimiter for boundary {boundary}"
        )));
    }

    Ok(sections)
}

fn trim_line_end(line: &[u8]) -> &[u8] {
    let mut end = line.len();
    while end > 0 && matches!(line[end - 1], b'\r' | b' ' | b'\t') {
        end -= 1;
    }
    &line[..end]
}

fn strip_trailing_newline(body: &[u8], start: usize, end: usize) -> usize {
    let mut end = end;
    if end > start && body[end - 1] == b'\n' {
        end -= 1;
        if end > start && body[end - 1] == b'\r' {
            end -= 1;
        }
    }
    end
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_encoding_from_header() {
        assert_eq!(TransferEncoding::from_header("7bit"), TransferEncoding::Identity);
        assert_eq!(TransferEncoding::from_header("binary"), TransferEncoding::Identity);
        assert_eq!(TransferEncoding::from_header(" BASE64 "), TransferEncoding::Base64);
        assert_eq!(
            TransferEncoding::from_header("Quoted-Printable"),
            TransferEncoding::QuotedPrintable
        );
        assert_eq!(TransferEncoding::from_header("x-uuencode"), TransferEncoding::Identity);
    }

    #[test]
    fn test_split_header_body_crlf() {
        let (headers, body) = split_header_body(b"A: 1\r\nB: 2\r\n\r\nbody");
        assert_eq!(headers, b"A: 1\r\nB: 2\r\n");
        assert_eq!(body, b"body");
    }

    #[test]
    fn test_split_header_body_no_body() {
        let (headers, body) = split_header_body(b"A: 1\n");
        assert_eq!(headers, b"A: 1\n");
        assert!(body.is_empty());
    }

    #[test]
    fn test_single_part_message() {
        let raw = b"Subject: Test\r\nContent-Type: text/plain\r\n\r\nHello, World!";
        let message = Message::parse(raw).unwrap();
        assert_eq!(message.subject().as_deref(), Some("Test"));
        let leaves = message.leaf_parts();
        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].decode_body().unwrap(), b"Hello, World!");
    }

    #[test]
    fn test_split_multipart_sections() {
        let body = b"preamble\r\n--b\r\nA: 1\r\n\r\none\r\n--b\r\n\r\ntwo\r\n--b--\r\nepilogue";
        let sections = split_multipart(body, "b").unwrap();
        assert_eq!(sections, vec![&b"A: 1\r\n\r\none"[..], &b"\r\ntwo"[..]]);
    }

    #[test]
    fn test_split_multipart_missing_delimiter() {
        assert!(split_multipart(b"no delimiters here", "b").is_err());
    }

    #[test]
    fn test_nested_multipart_leaf_order() {
        let raw = concat!(
            "Content-Type: multipart/mixed; boundary=outer\r\n",
            "\r\n",
            "--outer\r\n",
            "Content-Type: multipart/alternative; boundary=inner\r\n",
            "\r\n",
            "--inner\r\n",
            "Content-Type: text/plain\r\n",
            "\r\n",
            "plain\r\n",
            "--inner\r\n",
            "Content-Type: text/html\r\n",
            "\r\n",
            "<p>html</p>\r\n",
            "--inner--\r\n",
            "--outer\r\n",
            "Content-Type: image/png; name=\"a.png\"\r\n",
            "Content-Transfer-Encoding: base64\r\n",
            "\r\n",
            "iVBORw0K\r\n",
            "--outer--\r\n",
        );
        let message = Message::parse(raw.as_bytes()).unwrap();
        let types: Vec<String> = message
            .leaf_parts()
            .iter()
            .map(|p| p.content_type().unwrap().essence())
            .collect();
        assert_eq!(types, vec!["text/plain", "text/html", "image/png"]);
        assert_eq!(message.leaf_parts()[2].filename().as_deref(), Some("a.png"));
    }

    #[test]
    fn test_filename_prefers_disposition() {
        let mut headers = Headers::new();
        headers.add("Content-Type", "image/jpeg; name=\"type.jpg\"");
        headers.add(
            "Content-Disposition",
            "attachment; filename=\"=?utf-8?Q?caf=C3=A9.jpg?=\"",
        );
        let part = Part::new(headers, Vec::new());
        assert_eq!(part.filename().as_deref(), Some("café.jpg"));
    }

    #[test]
    fn test_filename_absent() {
        let mut headers = Headers::new();
        headers.add("Content-Type", "image/jpeg");
        headers.add("Content-Disposition", "inline");
        let part = Part::new(headers, Vec::new());
        assert!(part.filename().is_none());
    }

    #[test]
    fn test_missing_boundary_is_error() {
        let raw = b"Content-Type: multipart/mixed\r\n\r\nbody";
        assert!(matches!(Message::parse(raw), Err(Error::MissingBoundary)));
    }

    #[test]
    fn test_empty_message_is_error() {
        assert!(Message::parse(b"   \r\n").is_err());
    }
}
