//! Pretty-printing consumer that re-emits the parsed document.

use alloc::string::String;
use alloc::vec::Vec;

use crate::error::DecodeError;
use crate::event::{EventConsumer, ValueKind};

/// Layout state for one open level of the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    Root,
    StartArray,
    InArray,
    StartObject,
    AfterKey,
    InObject,
}

/// Re-serializes engine events as indented JSON text.
///
/// Keys and primitive values are copied through verbatim from their spans
/// (strings re-quoted), so the output is lossless with respect to escape
/// sequences and number formatting. Empty objects and arrays collapse to
/// `{}` and `[]`.
///
/// # Examples
///
/// ```rust
/// use jsonsieve::{EchoConsumer, JsonParser};
///
/// let mut parser = JsonParser::new(EchoConsumer::new());
/// parser.parse(br#"{"a":[1,2]}"#).unwrap();
/// let output = parser.into_consumer().into_output();
/// assert_eq!(
///     String::from_utf8(output).unwrap(),
///     "{\n  \"a\": [\n    1,\n    2\n  ]\n}"
/// );
/// ```
#[derive(Debug)]
pub struct EchoConsumer {
    indent: String,
    out: Vec<u8>,
    stack: Vec<Layout>,
}

impl Default for EchoConsumer {
    fn default() -> Self {
        Self::new()
    }
}

impl EchoConsumer {
    /// An echo consumer indenting with two spaces.
    #[must_use]
    pub fn new() -> Self {
        Self::with_indent("  ")
    }

    /// An echo consumer with the given indent string.
    #[must_use]
    pub fn with_indent(indent: &str) -> Self {
        Self {
            indent: indent.into(),
            out: Vec::new(),
            stack: alloc::vec![Layout::Root],
        }
    }

    /// The serialized output so far.
    #[must_use]
    pub fn output(&self) -> &[u8] {
        &self.out
    }

    /// Consumes the echo consumer, returning the serialized output.
    #[must_use]
    pub fn into_output(self) -> Vec<u8> {
        self.out
    }

    fn newline_and_indent(&mut self) {
        self.out.push(b'\n');
        for _ in 1..self.stack.len() {
            self.out.extend_from_slice(self.indent.as_bytes());
        }
    }

    fn set_top(&mut self, layout: Layout) {
        if let Some(top) = self.stack.last_mut() {
            *top = layout;
        }
    }

    /// Separates a value about to be written from whatever precedes it.
    fn lead_in(&mut self) {
        match self.stack.last() {
            Some(Layout::StartArray) => {
                self.set_top(Layout::InArray);
                self.newline_and_indent();
            }
            Some(Layout::InArray) => {
                self.out.push(b',');
                self.newline_and_indent();
            }
            _ => {}
        }
    }

    /// A value at the current level is complete; members need a comma
    /// before the next key.
    fn close_value(&mut self) {
        if self.stack.last() == Some(&Layout::AfterKey) {
            self.set_top(Layout::InObject);
        }
    }
}

impl EventConsumer for EchoConsumer {
    fn on_object_start(&mut self, _offset: usize) -> Result<(), DecodeError> {
        self.lead_in();
        self.stack.push(Layout::StartObject);
        self.out.push(b'{');
        Ok(())
    }

    fn on_object_key(&mut self, key: &[u8]) -> Result<(), DecodeError> {
        match self.stack.last() {
            Some(Layout::InObject) => {
                self.out.push(b',');
                self.newline_and_indent();
            }
            _ => self.newline_and_indent(),
        }
        self.set_top(Layout::AfterKey);
        self.out.push(b'"');
        self.out.extend_from_slice(key);
        self.out.extend_from_slice(b"\": ");
        Ok(())
    }

    fn on_object_end(&mut self, _raw: &[u8]) -> Result<(), DecodeError> {
        let empty = self.stack.pop() == Some(Layout::StartObject);
        if !empty {
            self.newline_and_indent();
        }
        self.out.push(b'}');
        self.close_value();
        Ok(())
    }

    fn on_array_start(&mut self, _offset: usize) -> Result<(), DecodeError> {
        self.lead_in();
        self.stack.push(Layout::StartArray);
        self.out.push(b'[');
        Ok(())
    }

    fn on_array_end(&mut self, _raw: &[u8]) -> Result<(), DecodeError> {
        let empty = self.stack.pop() == Some(Layout::StartArray);
        if !empty {
            self.newline_and_indent();
        }
        self.out.push(b']');
        self.close_value();
        Ok(())
    }

    fn on_primitive_value(&mut self, kind: ValueKind, raw: &[u8]) -> Result<(), DecodeError> {
        self.lead_in();
        if kind == ValueKind::String {
            self.out.push(b'"');
            self.out.extend_from_slice(raw);
            self.out.push(b'"');
        } else {
            self.out.extend_from_slice(raw);
        }
        self.close_value();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::EchoConsumer;
    use crate::parser::JsonParser;

    fn pretty(input: &str) -> String {
        let mut parser = JsonParser::new(EchoConsumer::new());
        assert_eq!(parser.parse(input.as_bytes()), Ok(true));
        String::from_utf8(parser.into_consumer().into_output()).unwrap()
    }

    #[test]
    fn primitives_at_root() {
        assert_eq!(pretty("null"), "null");
        assert_eq!(pretty("-1.5e3"), "-1.5e3");
        assert_eq!(pretty("\"a\\nb\""), "\"a\\nb\"");
    }

    #[test]
    fn empty_collections_collapse() {
        assert_eq!(pretty("{ }"), "{}");
        assert_eq!(pretty("[ ]"), "[]");
    }

    #[test]
    fn nested_layout() {
        assert_eq!(
            pretty("{\"a\": [1, {\"b\": 2}, []], \"c\": {}}"),
            "{\n  \"a\": [\n    1,\n    {\n      \"b\": 2\n    },\n    []\n  ],\n  \"c\": {}\n}"
        );
    }

    #[test]
    fn custom_indent() {
        let mut parser = JsonParser::new(EchoConsumer::with_indent("\t"));
        assert_eq!(parser.parse(b"[1]"), Ok(true));
        assert_eq!(parser.into_consumer().output(), b"[\n\t1\n]");
    }

    #[test]
    fn pretty_printing_is_a_fixpoint() {
        let once = pretty("[{\"x\": [1, 2, {}]}, null]");
        assert_eq!(pretty(&once), once);
    }
}
