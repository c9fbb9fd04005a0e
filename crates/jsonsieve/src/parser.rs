//! The streaming JSON parsing engine.
//!
//! [`JsonParser`] walks a complete in-memory byte range and emits
//! structural and value events to an [`EventConsumer`]. Nesting is tracked
//! on an explicit, growable stack of frames rather than the native call
//! stack, so call-stack usage stays bounded no matter how deeply the input
//! nests and a configured depth limit can be enforced deterministically.
//!
//! # Examples
//!
//! ```rust
//! use jsonsieve::{JsonParser, NullConsumer};
//!
//! let mut parser = JsonParser::new(NullConsumer);
//! let complete = parser.parse(br#"{"key": [null, true, 3.14]}"#).unwrap();
//! assert!(complete);
//! ```

use alloc::vec::Vec;

use crate::error::{DecodeError, ParseError, ParseErrorKind};
use crate::event::{EventConsumer, ValueKind};
use crate::string_content::hex_seq_to_code_point;
use crate::utf8::{SurrogateTracker, decode_utf8};

/// Configuration for [`JsonParser`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ParserOptions {
    /// Maximum number of open frames permitted, `0` meaning unlimited.
    ///
    /// The root value counts as depth 1 and every member or element the
    /// engine steps into adds one, so `[]` parses with a limit of 1 but
    /// `[1]` needs a limit of at least 2.
    pub depth_limit: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ElementPhase {
    Initial,
    Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValuePhase {
    Initial,
    Object,
    Array,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArrayPhase {
    Initial,
    ElementRead,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ObjectPhase {
    Initial,
    MemberRead,
    End,
}

/// One frame per open element (the root included). Each records which
/// sub-phase of parsing it is in plus the offset where the current
/// collection began, needed to emit end events with the full span.
#[derive(Debug, Clone, Copy)]
struct Frame {
    element: ElementPhase,
    value: ValuePhase,
    array: ArrayPhase,
    object: ObjectPhase,
    start: usize,
}

impl Frame {
    fn new() -> Self {
        Frame {
            element: ElementPhase::Initial,
            value: ValuePhase::Initial,
            array: ArrayPhase::Initial,
            object: ObjectPhase::Initial,
            start: 0,
        }
    }
}

/// The streaming JSON parser.
///
/// Drives an [`EventConsumer`] over one complete input buffer per
/// [`parse`](Self::parse) call. The consumer is chosen statically, keeping
/// event delivery free of dynamic dispatch in the hot loop.
#[derive(Debug)]
pub struct JsonParser<C> {
    consumer: C,
    frames: Vec<Frame>,
    pos: usize,
    depth_limit: u32,
}

impl<C: EventConsumer> JsonParser<C> {
    /// Creates a parser around `consumer` with default options.
    pub fn new(consumer: C) -> Self {
        Self::with_options(consumer, ParserOptions::default())
    }

    /// Creates a parser around `consumer` with the given options.
    pub fn with_options(consumer: C, options: ParserOptions) -> Self {
        Self {
            consumer,
            frames: Vec::with_capacity(16),
            pos: 0,
            depth_limit: options.depth_limit,
        }
    }

    /// The consumer driven by this parser.
    pub fn consumer(&mut self) -> &mut C {
        &mut self.consumer
    }

    /// Consumes the parser, returning its consumer.
    pub fn into_consumer(self) -> C {
        self.consumer
    }

    /// Parses one JSON value from `input`, streaming events to the
    /// consumer.
    ///
    /// Leading and trailing whitespace (space, tab, CR, LF) is skipped.
    /// Returns whether all input bytes were consumed. Extra non-whitespace
    /// data after the value, truncation, grammar violations, and any codec
    /// or consumer failure abort the call with a [`ParseError`] carrying
    /// the byte offset at which the failure was detected; no further
    /// events are delivered after that point.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] as described above. The frame stack is
    /// left in its failing state for inspection and cleared on the next
    /// call.
    pub fn parse(&mut self, input: &[u8]) -> Result<bool, ParseError> {
        self.pos = 0;
        self.frames.clear();
        self.push_frame()?;
        loop {
            let descend = self.parse_element(input)?;
            if !descend {
                self.frames.pop();
            }
            if self.frames.is_empty() && self.pos != input.len() {
                return Err(self.error(ParseErrorKind::Unexpected(
                    "extra data present after value",
                )));
            }
            if self.pos == input.len() {
                break;
            }
        }
        if !self.frames.is_empty() {
            return Err(self.error(ParseErrorKind::EndOfData("document truncated")));
        }
        Ok(self.pos == input.len())
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError {
            kind,
            offset: self.pos,
        }
    }

    fn decode_error(&self, err: impl Into<DecodeError>) -> ParseError {
        self.error(ParseErrorKind::Decode(err.into()))
    }

    fn top(&mut self) -> &mut Frame {
        // A frame is always live while the parse_* routines run.
        let top = self.frames.len() - 1;
        &mut self.frames[top]
    }

    fn push_frame(&mut self) -> Result<(), ParseError> {
        self.frames.push(Frame::new());
        if self.depth_limit > 0 && self.frames.len() > self.depth_limit as usize {
            return Err(self.error(ParseErrorKind::MaxNestingDepthExceeded(self.depth_limit)));
        }
        Ok(())
    }

    fn chomp_whitespace(&mut self, input: &[u8]) {
        while let Some(&byte) = input.get(self.pos) {
            if !matches!(byte, b' ' | b'\t' | b'\r' | b'\n') {
                break;
            }
            self.pos += 1;
        }
    }

    fn chomp_digits(&mut self, input: &[u8]) {
        while let Some(byte) = input.get(self.pos) {
            if !byte.is_ascii_digit() {
                break;
            }
            self.pos += 1;
        }
    }

    /// Advances the top frame. `Ok(true)` means a new frame was pushed and
    /// the caller should run it before returning here.
    fn parse_element(&mut self, input: &[u8]) -> Result<bool, ParseError> {
        if self.top().element == ElementPhase::Initial {
            self.chomp_whitespace(input);
            self.top().element = ElementPhase::Value;
        }
        if self.parse_value(input)? {
            return Ok(true);
        }
        self.chomp_whitespace(input);
        Ok(false)
    }

    fn parse_value(&mut self, input: &[u8]) -> Result<bool, ParseError> {
        loop {
            match self.top().value {
                ValuePhase::Initial => {
                    let Some(&byte) = input.get(self.pos) else {
                        return Err(self.error(ParseErrorKind::EndOfData("value expected")));
                    };
                    match byte {
                        b'{' => self.top().value = ValuePhase::Object,
                        b'[' => self.top().value = ValuePhase::Array,
                        b'"' => {
                            let start = self.pos;
                            self.parse_string(input)?;
                            let raw = &input[start + 1..self.pos - 1];
                            self.emit_primitive(ValueKind::String, raw)?;
                            return Ok(false);
                        }
                        b'-' | b'0'..=b'9' => {
                            let start = self.pos;
                            self.parse_number(input)?;
                            let raw = &input[start..self.pos];
                            self.emit_primitive(ValueKind::Number, raw)?;
                            return Ok(false);
                        }
                        _ if input[self.pos..].starts_with(b"true") => {
                            self.emit_primitive(ValueKind::True, &input[self.pos..self.pos + 4])?;
                            self.pos += 4;
                            return Ok(false);
                        }
                        _ if input[self.pos..].starts_with(b"null") => {
                            self.emit_primitive(ValueKind::Null, &input[self.pos..self.pos + 4])?;
                            self.pos += 4;
                            return Ok(false);
                        }
                        _ if input[self.pos..].starts_with(b"false") => {
                            self.emit_primitive(ValueKind::False, &input[self.pos..self.pos + 5])?;
                            self.pos += 5;
                            return Ok(false);
                        }
                        _ => return Err(self.error(ParseErrorKind::Unexpected("value expected"))),
                    }
                }
                ValuePhase::Object => return self.parse_object(input),
                ValuePhase::Array => return self.parse_array(input),
            }
        }
    }

    fn emit_primitive(&mut self, kind: ValueKind, raw: &[u8]) -> Result<(), ParseError> {
        self.consumer
            .on_primitive_value(kind, raw)
            .map_err(|err| self.decode_error(err))
    }

    fn parse_object(&mut self, input: &[u8]) -> Result<bool, ParseError> {
        loop {
            match self.top().object {
                ObjectPhase::Initial => {
                    self.top().start = self.pos;
                    let offset = self.pos;
                    self.consumer
                        .on_object_start(offset)
                        .map_err(|err| self.decode_error(err))?;
                    self.pos += 1; // known to be '{' by the caller
                    self.chomp_whitespace(input); // handles the empty object case
                    if input.get(self.pos) == Some(&b'}') {
                        self.top().object = ObjectPhase::End;
                    } else {
                        self.parse_member_key(input)?;
                        self.top().object = ObjectPhase::MemberRead;
                        self.push_frame()?;
                        return Ok(true);
                    }
                }
                ObjectPhase::MemberRead => match input.get(self.pos) {
                    Some(b'}') => self.top().object = ObjectPhase::End,
                    Some(b',') => {
                        self.pos += 1;
                        self.parse_member_key(input)?;
                        self.push_frame()?;
                        return Ok(true);
                    }
                    Some(_) => {
                        return Err(self.error(ParseErrorKind::Unexpected(
                            "end of object or comma expected",
                        )));
                    }
                    None => {
                        return Err(self.error(ParseErrorKind::EndOfData(
                            "end of object or comma expected",
                        )));
                    }
                },
                ObjectPhase::End => {
                    self.pos += 1; // step over '}'
                    let start = self.top().start;
                    let raw = &input[start..self.pos];
                    self.consumer
                        .on_object_end(raw)
                        .map_err(|err| self.decode_error(err))?;
                    return Ok(false);
                }
            }
        }
    }

    fn parse_member_key(&mut self, input: &[u8]) -> Result<(), ParseError> {
        self.chomp_whitespace(input);
        match input.get(self.pos) {
            None => return Err(self.error(ParseErrorKind::EndOfData("object key expected"))),
            Some(b'"') => {}
            Some(_) => {
                return Err(self.error(ParseErrorKind::Unexpected("object key string expected")));
            }
        }
        let start = self.pos;
        self.parse_string(input)?;
        let key = &input[start + 1..self.pos - 1];
        self.consumer
            .on_object_key(key)
            .map_err(|err| self.decode_error(err))?;
        self.chomp_whitespace(input);
        if input.get(self.pos) != Some(&b':') {
            return Err(self.error(ParseErrorKind::Unexpected("object member colon expected")));
        }
        self.pos += 1;
        Ok(())
    }

    fn parse_array(&mut self, input: &[u8]) -> Result<bool, ParseError> {
        loop {
            match self.top().array {
                ArrayPhase::Initial => {
                    self.top().start = self.pos;
                    let offset = self.pos;
                    self.consumer
                        .on_array_start(offset)
                        .map_err(|err| self.decode_error(err))?;
                    self.pos += 1; // known to be '[' by the caller
                    self.chomp_whitespace(input); // handles the empty array case
                    if input.get(self.pos) == Some(&b']') {
                        self.top().array = ArrayPhase::End;
                    } else {
                        self.top().array = ArrayPhase::ElementRead;
                        self.push_frame()?;
                        return Ok(true);
                    }
                }
                ArrayPhase::ElementRead => match input.get(self.pos) {
                    Some(b']') => self.top().array = ArrayPhase::End,
                    Some(b',') => {
                        self.pos += 1;
                        self.push_frame()?;
                        return Ok(true);
                    }
                    Some(_) => {
                        return Err(self.error(ParseErrorKind::Unexpected(
                            "end of array or comma expected",
                        )));
                    }
                    None => {
                        return Err(self.error(ParseErrorKind::EndOfData(
                            "end of array or comma expected",
                        )));
                    }
                },
                ArrayPhase::End => {
                    self.pos += 1; // step over ']'
                    let start = self.top().start;
                    let raw = &input[start..self.pos];
                    self.consumer
                        .on_array_end(raw)
                        .map_err(|err| self.decode_error(err))?;
                    return Ok(false);
                }
            }
        }
    }

    fn parse_string(&mut self, input: &[u8]) -> Result<(), ParseError> {
        self.pos += 1; // known to be '"' by the caller
        let mut tracker = SurrogateTracker::new();
        loop {
            let Some(&byte) = input.get(self.pos) else {
                break;
            };
            if byte == b'"' {
                break;
            }
            if byte == b'\\' {
                self.pos += 1;
                let Some(&escape) = input.get(self.pos) else {
                    return Err(self.error(ParseErrorKind::EndOfData("partial escape sequence")));
                };
                match escape {
                    b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't' => {
                        self.pos += 1;
                        tracker
                            .check(None)
                            .map_err(|err| self.decode_error(err))?;
                    }
                    b'u' => {
                        self.pos += 1;
                        let code_point = hex_seq_to_code_point(&input[self.pos..])
                            .map_err(|err| self.decode_error(err))?;
                        self.pos += 4;
                        tracker
                            .check(Some(code_point))
                            .map_err(|err| self.decode_error(err))?;
                    }
                    _ => {
                        return Err(
                            self.error(ParseErrorKind::Unexpected("invalid escape sequence"))
                        );
                    }
                }
            } else {
                if byte <= 0x1F {
                    return Err(self.error(ParseErrorKind::ControlCharacterMustBeEscaped));
                }
                let (_, len) =
                    decode_utf8(&input[self.pos..]).map_err(|err| self.decode_error(err))?;
                self.pos += len;
                tracker
                    .check(None)
                    .map_err(|err| self.decode_error(err))?;
            }
        }
        // Last tick catches a trailing unpaired high surrogate.
        tracker.check(None).map_err(|err| self.decode_error(err))?;
        if self.pos >= input.len() {
            return Err(self.error(ParseErrorKind::EndOfData("no string terminator reached")));
        }
        self.pos += 1; // step over '"'
        Ok(())
    }

    fn parse_number(&mut self, input: &[u8]) -> Result<(), ParseError> {
        // First byte known to be '-' or a digit by the caller.
        if input.get(self.pos) == Some(&b'-') {
            self.pos += 1;
            if self.pos == input.len() {
                return Err(self.error(ParseErrorKind::EndOfData(
                    "no integer part following leading '-'",
                )));
            }
        }
        match input.get(self.pos) {
            Some(b'0') => self.pos += 1,
            Some(byte) if byte.is_ascii_digit() => {
                self.pos += 1;
                self.chomp_digits(input);
            }
            _ => {
                return Err(self.error(ParseErrorKind::Unexpected("non-decimal in integer part")));
            }
        }
        if input.get(self.pos) == Some(&b'.') {
            self.pos += 1;
            match input.get(self.pos) {
                None => {
                    return Err(self.error(ParseErrorKind::EndOfData(
                        "no digits following decimal point",
                    )));
                }
                Some(byte) if byte.is_ascii_digit() => {
                    self.pos += 1;
                    self.chomp_digits(input);
                }
                Some(_) => {
                    return Err(self.error(ParseErrorKind::Unexpected(
                        "digit expected following decimal point",
                    )));
                }
            }
        }
        if matches!(input.get(self.pos), Some(b'e' | b'E')) {
            self.pos += 1;
            if matches!(input.get(self.pos), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            match input.get(self.pos) {
                None => {
                    return Err(
                        self.error(ParseErrorKind::EndOfData("no exponent digit following 'e'"))
                    );
                }
                Some(byte) if byte.is_ascii_digit() => {
                    self.pos += 1;
                    self.chomp_digits(input);
                }
                Some(_) => {
                    return Err(self.error(ParseErrorKind::Unexpected(
                        "digit expected following exponent",
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Frame, JsonParser, ParserOptions};
    use crate::event::NullConsumer;

    #[test]
    fn frame_is_small() {
        // Frames are pushed once per nesting level; keep them cheap.
        assert!(core::mem::size_of::<Frame>() <= 16);
    }

    #[test]
    fn depth_limit_zero_means_unlimited() {
        let mut parser =
            JsonParser::with_options(NullConsumer, ParserOptions { depth_limit: 0 });
        assert_eq!(parser.parse(b"[[[[[[[[1]]]]]]]]"), Ok(true));
    }
}
