//! Conversions between JSON string *content* (the bytes between the
//! quotes) and UTF-8 text.
//!
//! [`decode_json_string_content`] is deliberately permissive about raw
//! control bytes: the parsing engine rejects them during lexing, but this
//! standalone function is also used on already-validated or third-party
//! text where best-effort decoding is wanted.

use alloc::string::String;

use bstr::ByteSlice;

use crate::error::{DecodeError, EscapeError, UnicodeCodePointError};
use crate::utf8::{SurrogateTracker, decode_utf8};

/// Decodes the four hex digits of a `\uXXXX` escape from the front of
/// `bytes` into a code point.
pub(crate) fn hex_seq_to_code_point(bytes: &[u8]) -> Result<u32, EscapeError> {
    if bytes.len() < 4 {
        return Err(EscapeError::PartialUnicodeEscape);
    }
    let mut code_point = 0u32;
    for &byte in &bytes[..4] {
        let digit = match byte {
            b'0'..=b'9' => u32::from(byte - b'0'),
            b'a'..=b'f' => u32::from(byte - b'a') + 10,
            b'A'..=b'F' => u32::from(byte - b'A') + 10,
            _ => return Err(EscapeError::HexDigitExpected(byte)),
        };
        code_point = (code_point << 4) | digit;
    }
    Ok(code_point)
}

fn scalar(code_point: u32) -> Result<char, UnicodeCodePointError> {
    char::from_u32(code_point).ok_or(UnicodeCodePointError::OutOfRange(code_point))
}

/// Resolves the escape grammar of JSON string content into UTF-8 text.
///
/// `\uXXXX` escapes are fed through a [`SurrogateTracker`], so surrogate
/// pairs combine into a single scalar value and broken pairs fail. Raw
/// control bytes are copied through unchanged.
pub fn decode_json_string_content(bytes: &[u8]) -> Result<String, DecodeError> {
    let mut out = String::with_capacity(bytes.len());
    let mut tracker = SurrogateTracker::new();
    let mut pos = 0usize;
    while pos < bytes.len() {
        if bytes[pos] == b'\\' {
            pos += 1;
            let Some(&escape) = bytes.get(pos) else {
                return Err(EscapeError::PartialEscape.into());
            };
            pos += 1;
            let simple = match escape {
                b'"' | b'\\' | b'/' => Some(char::from(escape)),
                b'b' => Some('\u{0008}'),
                b'f' => Some('\u{000C}'),
                b'n' => Some('\n'),
                b'r' => Some('\r'),
                b't' => Some('\t'),
                b'u' => None,
                _ => return Err(EscapeError::InvalidEscape(escape).into()),
            };
            if let Some(ch) = simple {
                tracker.check(None)?;
                out.push(ch);
            } else {
                let code_point = hex_seq_to_code_point(&bytes[pos..])?;
                pos += 4;
                if tracker.check(Some(code_point))? {
                    out.push(scalar(tracker.last_code_point())?);
                }
            }
        } else {
            let (code_point, len) = decode_utf8(&bytes[pos..])?;
            pos += len;
            tracker.check(None)?;
            out.push(scalar(code_point)?);
        }
    }
    tracker.check(None)?;
    Ok(out)
}

fn push_hex_escape(code_point: u32, out: &mut String) {
    out.push_str("\\u");
    for shift in [12u32, 8, 4, 0] {
        let digit = (code_point >> shift) & 0xF;
        out.push(char::from_digit(digit, 16).unwrap_or('0'));
    }
}

fn push_code_point_escape(code_point: u32, out: &mut String) -> Result<(), UnicodeCodePointError> {
    if code_point > 0x0010_FFFF {
        return Err(UnicodeCodePointError::OutOfRange(code_point));
    }
    if code_point >= 0x0001_0000 {
        // Non-BMP code points escape as a UTF-16 surrogate pair.
        let reduced = code_point - 0x0001_0000;
        push_hex_escape(0xD800 | (reduced >> 10), out);
        push_hex_escape(0xDC00 | (reduced & 0x03FF), out);
    } else {
        push_hex_escape(code_point, out);
    }
    Ok(())
}

/// Encodes UTF-8 text as JSON string content.
///
/// `"`, `\`, `/` and the control bytes 0x00-0x1F and 0x7F are escaped,
/// short forms first; everything else copies through unchanged. Fails if a
/// multi-byte code point turns out not to be valid UTF-8, since decoding
/// is needed to know the escape boundary.
pub fn encode_json_string_content(bytes: &[u8]) -> Result<String, DecodeError> {
    let mut out = String::with_capacity(bytes.len() * 2);
    let mut pos = 0usize;
    while pos < bytes.len() {
        let byte = bytes[pos];
        match byte {
            b'"' | b'\\' | b'/' => {
                out.push('\\');
                out.push(char::from(byte));
                pos += 1;
            }
            0x08 => {
                out.push_str("\\b");
                pos += 1;
            }
            0x0C => {
                out.push_str("\\f");
                pos += 1;
            }
            b'\n' => {
                out.push_str("\\n");
                pos += 1;
            }
            b'\r' => {
                out.push_str("\\r");
                pos += 1;
            }
            b'\t' => {
                out.push_str("\\t");
                pos += 1;
            }
            0x00..=0x1F | 0x7F => {
                push_code_point_escape(u32::from(byte), &mut out)?;
                pos += 1;
            }
            _ => {
                let (code_point, len) = decode_utf8(&bytes[pos..])?;
                pos += len;
                out.push(scalar(code_point)?);
            }
        }
    }
    Ok(out)
}

/// Forces arbitrary bytes into valid UTF-8.
///
/// Valid UTF-8 input passes through unchanged; anything else is treated as
/// ISO-8859-1 (Latin-1) and re-encoded, which is reversible for every byte
/// value and never produces invalid output. Pure ASCII is reproduced
/// unchanged either way. This never fails, making it a safety net in front
/// of [`encode_json_string_content`] for arbitrary byte soup.
#[must_use]
pub fn coerce_to_valid_utf8(bytes: &[u8]) -> String {
    match bytes.to_str() {
        Ok(text) => text.into(),
        Err(_) => bytes.iter().map(|&byte| char::from(byte)).collect(),
    }
}
