//! Streaming JSON validation, re-serialization, and selective extraction.
//!
//! The parsing engine walks a complete in-memory byte range and streams
//! events to an [`EventConsumer`] without building a document tree; an
//! explicit frame stack keeps native call-stack usage bounded no matter
//! how deeply the input nests. [`PathDispatcher`] sits on the consumer
//! seam and routes values at registered [`ValuePath`]s to callbacks;
//! [`EchoConsumer`] re-emits the document pretty-printed; [`NullConsumer`]
//! turns a parse into pure validation.
//!
//! ```rust
//! use core::cell::RefCell;
//! use jsonsieve::{JsonParser, PathDispatcher};
//!
//! let numbers = RefCell::new(Vec::new());
//! let mut dispatcher = PathDispatcher::new();
//! dispatcher.register(&".values[]".parse().unwrap(), |_kind, _path, raw| {
//!     numbers.borrow_mut().push(raw.to_vec());
//!     Ok(())
//! });
//!
//! let mut parser = JsonParser::new(dispatcher);
//! let complete = parser.parse(br#"{"values": [1, 2, 3]}"#).unwrap();
//! assert!(complete);
//! assert_eq!(*numbers.borrow(), [b"1", b"2", b"3"]);
//! ```

#![no_std]
#![allow(missing_docs)]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod dispatch;
mod echo;
mod error;
mod event;
mod parser;
mod path;
mod string_content;
mod utf8;

#[cfg(test)]
mod tests;

pub use dispatch::{PathDispatcher, ValueCallback};
pub use echo::EchoConsumer;
pub use error::{
    DecodeError, EscapeError, ParseError, ParseErrorKind, UnicodeCodePointError, Utf8DecodeError,
    ValuePathError,
};
pub use event::{EventConsumer, NullConsumer, ValueKind};
pub use parser::{JsonParser, ParserOptions};
pub use path::{PathSegment, ValuePath};
pub use string_content::{
    coerce_to_valid_utf8, decode_json_string_content, encode_json_string_content,
};
pub use utf8::{SurrogateTracker, decode_utf8};
