//! Error types surfaced across the crate boundary.
//!
//! Codec-level failures ([`Utf8DecodeError`], [`UnicodeCodePointError`],
//! [`EscapeError`]) are unioned into [`DecodeError`]; a parse call catches
//! any of them, decorates it with the byte offset at which it was detected,
//! and surfaces it as a [`ParseError`] so callers only ever need to handle
//! one error type around [`JsonParser::parse`](crate::JsonParser::parse).

use thiserror::Error;

/// A malformed UTF-8 byte sequence.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Utf8DecodeError {
    /// The first byte of a sequence matches no valid lead pattern.
    #[error("invalid leading utf-8 byte 0x{0:02x}")]
    InvalidLeadByte(u8),
    /// Fewer continuation bytes remain than the lead byte requires.
    #[error("end of data: partial utf-8 code point")]
    TruncatedSequence,
    /// A continuation byte's top bits are not `10`.
    #[error("invalid utf-8 continuation byte 0x{0:02x}")]
    InvalidContinuationByte(u8),
    /// UTF-8 must never encode a surrogate directly.
    #[error("utf-8 encoded surrogate code point U+{0:04X}")]
    SurrogateCodePoint(u32),
}

/// A code-point-level violation: out-of-range values or broken
/// surrogate-pair sequencing.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum UnicodeCodePointError {
    /// The value is larger than U+10FFFF.
    #[error("code point {0:#x} is larger than U+10FFFF")]
    OutOfRange(u32),
    /// A low surrogate arrived without a preceding high surrogate.
    #[error("low surrogate U+{0:04X} not preceded by a high surrogate")]
    DanglingLowSurrogate(u32),
    /// A high surrogate was followed by something other than a low
    /// surrogate.
    #[error("high surrogate not followed by a low surrogate (got U+{0:04X})")]
    DanglingHighSurrogate(u32),
    /// The sequence ended while a low surrogate was still awaited.
    #[error("high surrogate unpaired at end of sequence")]
    UnpairedHighSurrogate,
}

/// An escape-grammar failure inside JSON string content.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EscapeError {
    /// The content ended directly after a `\`.
    #[error("end of data: partial escape sequence")]
    PartialEscape,
    /// The byte after a `\` names no escape.
    #[error("invalid escape character 0x{0:02x}")]
    InvalidEscape(u8),
    /// Fewer than four bytes follow a `\u`.
    #[error("end of data: partial unicode escape sequence")]
    PartialUnicodeEscape,
    /// A non-hex byte inside the four digits of a `\uXXXX` escape.
    #[error("hex digit expected in unicode escape, got 0x{0:02x}")]
    HexDigitExpected(u8),
}

/// Any codec-level failure. This is what the pure codec functions and
/// [`EventConsumer`](crate::EventConsumer) implementations return; the
/// parsing engine wraps it into a [`ParseError`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    #[error(transparent)]
    Utf8(#[from] Utf8DecodeError),
    #[error(transparent)]
    CodePoint(#[from] UnicodeCodePointError),
    #[error(transparent)]
    Escape(#[from] EscapeError),
}

/// A failed parse call: what went wrong and the byte offset at which it
/// was detected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{kind} (offset={offset})")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub offset: usize,
}

/// The reason a parse call failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The input ended where the grammar required more.
    #[error("end of data: {0}")]
    EndOfData(&'static str),
    /// A byte violated the grammar.
    #[error("invalid: {0}")]
    Unexpected(&'static str),
    /// A raw byte in the range 0x00-0x1F appeared inside a string.
    #[error("invalid: control characters must be escaped as \\uXXXX")]
    ControlCharacterMustBeEscaped,
    /// The configured depth limit was exceeded.
    #[error("maximum nesting depth ({0}) reached")]
    MaxNestingDepthExceeded(u32),
    /// A codec or consumer failure, re-raised with parse context.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// A value path (or filter string) that does not match the path grammar.
/// Each variant names the token class that was expected.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValuePathError {
    #[error("value path must start with '.'")]
    LeadingDotExpected,
    #[error("start of array or key expected")]
    ArrayOrKeyExpected,
    #[error("end of array expected")]
    ArrayCloseExpected,
    #[error("key character expected")]
    KeyCharExpected,
    #[error("invalid key character")]
    InvalidKeyChar,
}
