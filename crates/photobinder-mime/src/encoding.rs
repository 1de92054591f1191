//! MIME decoding utilities.
//!
//! Supports Base64, Quoted-Printable, RFC 2047 encoded words and the
//! percent-encoding used by RFC 2231 parameters.

use crate::error::{Error, Result};
use base64::Engine;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, PAD};
use base64::engine::DecodePaddingMode;

/// Standard alphabet, tolerant of missing or present padding.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    PAD.with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decodes Base64 data, ignoring embedded whitespace and line breaks.
///
/// # Errors
///
/// Returns an error if the input is not valid Base64.
pub fn decode_base64(data: &[u8]) -> Result<Vec<u8>> {
    let cleaned: Vec<u8> = data
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    LENIENT.decode(cleaned).map_err(Into::into)
}

/// Decodes Quoted-Printable data (RFC 2045) to raw bytes.
///
/// Malformed escapes are passed through literally, as RFC 2045 §6.7 suggests.
#[must_use]
pub fn decode_quoted_printable(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    let mut i = 0;

    while i < data.len() {
        let byte = data[i];
        if byte != b'=' {
            out.push(byte);
            i += 1;
            continue;
        }

        // Soft line break, possibly preceded by trailing whitespace
        let mut j = i + 1;
        while j < data.len() && (data[j] == b' ' || data[j] == b'\t') {
            j += 1;
        }
        if data.get(j) == Some(&b'\r') && data.get(j + 1) == Some(&b'\n') {
            i = j + 2;
            continue;
        }
        if data.get(j) == Some(&b'\n') {
            i = j + 1;
            continue;
        }

        match (data.get(i + 1), data.get(i + 2)) {
            (Some(&hi), Some(&lo)) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => {
                out.push(hex_value(hi) << 4 | hex_value(lo));
                i += 3;
            }
            _ => {
                out.push(b'=');
                i += 1;
            }
        }
    }

    out
}

/// Decodes `%XX` escapes (RFC 2231 extended parameter values).
#[must_use]
pub fn decode_percent(text: &str) -> Vec<u8> {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%'
            && let (Some(&hi), Some(&lo)) = (bytes.get(i + 1), bytes.get(i + 2))
            && hi.is_ascii_hexdigit()
            && lo.is_ascii_hexdigit()
        {
            out.push(hex_value(hi) << 4 | hex_value(lo));
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    out
}

const fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        b'A'..=b'F' => digit - b'A' + 10,
        _ => 0,
    }
}

/// Decodes a header value that may contain RFC 2047 encoded words.
///
/// Format of each word: `=?charset?encoding?encoded-text?=`. Plain text
/// around encoded words is kept; whitespace between two adjacent encoded
/// words is dropped.
///
/// # Errors
///
/// Returns an error if an encoded word uses an unknown encoding or its
/// payload cannot be decoded.
pub fn decode_rfc2047(text: &str) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut pending_ws = String::new();
    let mut last_was_word = false;

    while let Some(start) = rest.find("=?") {
        let (before, candidate) = rest.split_at(start);
        let Some((word, consumed)) = split_encoded_word(candidate) else {
            out.push_str(&pending_ws);
            pending_ws.clear();
            out.push_str(before);
            out.push_str("=?");
            rest = &candidate[2..];
            last_was_word = false;
            continue;
        };

        if last_was_word && before.trim().is_empty() {
            // Whitespace between adjacent encoded words is not significant
        } else {
            out.push_str(&pending_ws);
            out.push_str(before);
        }
        pending_ws.clear();

        out.push_str(&decode_encoded_word(word)?);
        rest = &candidate[consumed..];
        last_was_word = true;

        let trimmed = rest.trim_start();
        if trimmed.starts_with("=?") {
            pending_ws = rest[..rest.len() - trimmed.len()].to_string();
            rest = trimmed;
        }
    }

    out.push_str(&pending_ws);
    out.push_str(rest);
    Ok(out)
}

/// Splits `=?cs?e?text?=` off the front of `s`, returning the inner
/// `cs?e?text` and the number of bytes consumed.
fn split_encoded_word(s: &str) -> Option<(&str, usize)> {
    let inner = s.strip_prefix("=?")?;
    let charset_end = inner.find('?')?;
    let after_charset = &inner[charset_end + 1..];
    let encoding_end = after_charset.find('?')?;
    let after_encoding = &after_charset[encoding_end + 1..];
    let text_end = after_encoding.find("?=")?;

    let inner_len = charset_end + 1 + encoding_end + 1 + text_end;
    Some((&inner[..inner_len], 2 + inner_len + 2))
}

fn decode_encoded_word(word: &str) -> Result<String> {
    let mut parts = word.splitn(3, '?');
    let (Some(charset), Some(encoding), Some(payload)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(Error::InvalidEncoding(format!("Invalid RFC 2047 word: {word}")));
    };
    // RFC 2231 allows a language suffix: charset*lang
    let charset = charset.split('*').next().unwrap_or(charset);

    let bytes = match encoding.to_ascii_uppercase().as_str() {
        "B" => decode_base64(payload.as_bytes())?,
        "Q" => decode_quoted_printable(payload.replace('_', " ").as_bytes()),
        other => {
            return Err(Error::InvalidEncoding(format!(
                "Unknown encoding: {other}"
            )));
        }
    };

    Ok(decode_charset(&bytes, charset))
}

/// Converts bytes in the named charset to a `String`.
///
/// UTF-8 and ASCII are decoded directly; Latin-1 family charsets map each
/// byte to the code point of the same value. Anything else is decoded as
/// lossy UTF-8.
#[must_use]
pub fn decode_charset(bytes: &[u8], charset: &str) -> String {
    match charset.to_ascii_lowercase().as_str() {
        "iso-8859-1" | "latin1" | "iso-8859-15" | "windows-1252" | "cp1252" => {
            bytes.iter().map(|&b| char::from(b)).collect()
        }
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_base64_decode_with_line_breaks() {
        let decoded = decode_base64(b"SGVsbG8s\r\nIFdvcmxkIQ==").unwrap();
        assert_eq!(decoded, b"Hello, World!");
    }

    #[test]
    fn test_base64_decode_missing_padding() {
        let decoded = decode_base64(b"SGk").unwrap();
        assert_eq!(decoded, b"Hi");
    }

    #[test]
    fn test_quoted_printable_decode() {
        assert_eq!(decode_quoted_printable(b"H=C3=A9llo"), "Héllo".as_bytes());
    }

    #[test]
    fn test_quoted_printable_soft_line_break() {
        assert_eq!(decode_quoted_printable(b"Hello=\r\nWorld"), b"HelloWorld");
        assert_eq!(decode_quoted_printable(b"Hello= \nWorld"), b"HelloWorld");
    }

    #[test]
    fn test_quoted_printable_malformed_escape_kept() {
        assert_eq!(decode_quoted_printable(b"a=ZZb"), b"a=ZZb");
    }

    #[test]
    fn test_rfc2047_plain_passthrough() {
        assert_eq!(decode_rfc2047("photo.jpg").unwrap(), "photo.jpg");
    }

    #[test]
    fn test_rfc2047_base64() {
        assert_eq!(decode_rfc2047("=?utf-8?B?SMOpbGxv?=").unwrap(), "Héllo");
    }

    #[test]
    fn test_rfc2047_q_encoding() {
        assert_eq!(
            decode_rfc2047("=?UTF-8?Q?caf=C3=A9_photo.png?=").unwrap(),
            "café photo.png"
        );
    }

    #[test]
    fn test_rfc2047_adjacent_words_join() {
        let decoded = decode_rfc2047("=?utf-8?Q?IMG=5F?= =?utf-8?Q?0042.jpg?=").unwrap();
        assert_eq!(decoded, "IMG_0042.jpg");
    }

    #[test]
    fn test_rfc2047_mixed_text() {
        let decoded = decode_rfc2047("Site =?iso-8859-1?Q?r=E9sum=E9?= photo").unwrap();
        assert_eq!(decoded, "Site résumé photo");
    }

    #[test]
    fn test_rfc2047_unknown_encoding() {
        assert!(decode_rfc2047("=?utf-8?X?abc?=").is_err());
    }

    #[test]
    fn test_percent_decode() {
        assert_eq!(decode_percent("a%20b%zz"), b"a b%zz");
    }

    proptest! {
        #[test]
        fn quoted_printable_is_identity_on_plain_ascii(s in "[a-zA-Z0-9 .,:]{0,64}") {
            prop_assert_eq!(decode_quoted_printable(s.as_bytes()), s.as_bytes());
        }
    }
}
