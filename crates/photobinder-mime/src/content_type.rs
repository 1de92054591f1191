//! `Content-Type` values.

use std::collections::HashMap;

use crate::encoding::decode_percent;
use crate::error::{Error, Result};

/// A parsed `Content-Type`: lowercased `type/subtype` plus parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    /// Top-level type, e.g. `image` or `multipart`.
    pub main_type: String,
    /// Subtype, e.g. `jpeg` or `mixed`.
    pub sub_type: String,
    /// Parameters keyed by lowercased name, RFC 2231 pieces already joined.
    pub parameters: HashMap<String, String>,
}

impl ContentType {
    fn bare(main_type: &str, sub_type: &str) -> Self {
        Self {
            main_type: main_type.to_string(),
            sub_type: sub_type.to_string(),
            parameters: HashMap::new(),
        }
    }

    /// `text/plain; charset=us-ascii`, the type of a part with no
    /// `Content-Type` header (RFC 2045 section 5.2).
    #[must_use]
    pub fn implicit() -> Self {
        let mut ct = Self::bare("text", "plain");
        ct.parameters
            .insert("charset".to_string(), "us-ascii".to_string());
        ct
    }

    /// `application/octet-stream`, for parts whose header is unreadable.
    #[must_use]
    pub fn octet_stream() -> Self {
        Self::bare("application", "octet-stream")
    }

    /// Parameter value by case-insensitive name.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// The multipart delimiter.
    #[must_use]
    pub fn boundary(&self) -> Option<&str> {
        self.parameter("boundary")
    }

    /// `type/subtype` without parameters.
    #[must_use]
    pub fn essence(&self) -> String {
        format!("{}/{}", self.main_type, self.sub_type)
    }

    /// `multipart/*`.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        self.main_type == "multipart"
    }

    /// `image/*`.
    #[must_use]
    pub fn is_image(&self) -> bool {
        self.main_type == "image"
    }

    /// Parses `type/subtype; name=value; name2="quoted value"`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidContentType`] when the type or subtype is
    /// missing.
    pub fn parse(s: &str) -> Result<Self> {
        let (essence, params) = s.split_once(';').unwrap_or((s, ""));
        let Some((main_type, sub_type)) = essence.split_once('/') else {
            return Err(Error::InvalidContentType(format!(
                "expected type/subtype, got {:?}",
                essence.trim()
            )));
        };
        let (main_type, sub_type) = (main_type.trim(), sub_type.trim());
        if main_type.is_empty() || sub_type.is_empty() {
            return Err(Error::InvalidContentType(essence.trim().to_string()));
        }

        Ok(Self {
            main_type: main_type.to_ascii_lowercase(),
            sub_type: sub_type.to_ascii_lowercase(),
            parameters: parse_parameters(params),
        })
    }
}

/// Parses a `; key=value; key2="quoted; value"` parameter list.
///
/// Keys are lowercased. RFC 2231 extended (`key*=charset''pct-encoded`) and
/// continued (`key*0=`, `key*1*=`) parameters are reassembled under the bare key.
pub(crate) fn parse_parameters(s: &str) -> HashMap<String, String> {
    let mut plain = HashMap::new();
    let mut continued: HashMap<String, Vec<(u32, String, bool)>> = HashMap::new();

    for raw in split_unquoted(s, ';') {
        let Some((key, value)) = raw.split_once('=') else {
            continue;
        };
        let key = key.trim().to_ascii_lowercase();
        let value = unquote(value.trim());
        if key.is_empty() {
            continue;
        }

        let (name, extended) = key
            .strip_suffix('*')
            .map_or((key.as_str(), false), |k| (k, true));
        if let Some((base, index)) = name.rsplit_once('*')
            && let Ok(index) = index.parse::<u32>()
        {
            continued
                .entry(base.to_string())
                .or_default()
                .push((index, value, extended));
        } else if extended {
            plain.insert(name.to_string(), decode_extended_value(&value, true));
        } else {
            plain.entry(name.to_string()).or_insert(value);
        }
    }

    for (name, mut pieces) in continued {
        pieces.sort_by_key(|(index, _, _)| *index);
        let mut value = String::new();
        for (index, piece, extended) in pieces {
            if extended {
                value.push_str(&decode_extended_value(&piece, index == 0));
            } else {
                value.push_str(&piece);
            }
        }
        plain.insert(name, value);
    }

    plain
}

/// Decodes an RFC 2231 extended value. The first segment carries
/// `charset'language'` before the percent-encoded text.
fn decode_extended_value(value: &str, has_charset: bool) -> String {
    let encoded = if has_charset {
        value.splitn(3, '\'').nth(2).unwrap_or(value)
    } else {
        value
    };
    let bytes = decode_percent(encoded);
    String::from_utf8(bytes)
        .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

/// Splits on `sep`, ignoring separators inside double quotes.
fn split_unquoted(s: &str, sep: char) -> Vec<&str> {
    let mut out = Vec::new();
    let mut in_quotes = false;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in s.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            c if c == sep && !in_quotes => {
                out.push(&s[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    out.push(&s[start..]);
    out
}

fn unquote(value: &str) -> String {
    let Some(inner) = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
    else {
        return value.to_string();
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}
