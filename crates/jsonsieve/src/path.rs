//! Value paths: location descriptors selecting zero or more values within
//! a JSON document by a root-to-node route of member and wildcard steps.

use alloc::string::String;
use alloc::vec::Vec;
use core::mem;
use core::str::FromStr;

use crate::error::ValuePathError;

/// One step in a [`ValuePath`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// `[]`: every element of an array.
    Array,
    /// `.name`: the value of one object member.
    Member(String),
}

/// A parsed value path.
///
/// The grammar:
///
/// - `""` or `"."` — the root value (zero segments)
/// - `".abc"` — value of key `abc` in the root object
/// - `".[]"` — values of the root array
/// - `".abc.def"` — value of key `def` in a nested object
/// - `".abc[]"` — values of the array at key `abc` in the root object
/// - `".[][]"` — values of any array within the root array
///
/// Member names are one or more bytes of printable ASCII excluding space,
/// `\`, `"`, `[` and `.`. Two paths are equal iff their segment sequences
/// are equal, so `""` and `"."` compare equal.
#[derive(Debug, Clone, Default)]
pub struct ValuePath {
    segments: Vec<PathSegment>,
    repr: String,
}

impl PartialEq for ValuePath {
    fn eq(&self, other: &Self) -> bool {
        // "" and "." are the same path; the representation is cosmetic.
        self.segments == other.segments
    }
}

impl Eq for ValuePath {}

impl ValuePath {
    /// The path selecting only the root value.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// The textual form this path was parsed from.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.repr
    }

    /// Parses a filter string: one or more value paths separated by `|`.
    ///
    /// Each part parses and registers independently; an empty part denotes
    /// the root path.
    pub fn parse_filter(filter: &str) -> Result<Vec<ValuePath>, ValuePathError> {
        filter.split('|').map(str::parse).collect()
    }
}

fn allowed_key_byte(byte: u8) -> bool {
    // Printable ASCII excluding space, minus the string characters reserved
    // for future quoted-key support and the structural path characters.
    byte > b' ' && byte <= b'~' && !matches!(byte, b'\\' | b'"' | b'[' | b'.')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    EmptyRoot,
    DotRoot,
    PartialArray,
    CompleteArray,
    StartKey,
    WithinKey,
}

impl FromStr for ValuePath {
    type Err = ValuePathError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        use ParseState::*;

        let mut segments = Vec::new();
        let mut key = String::new();
        let mut state = EmptyRoot;
        for &byte in path.as_bytes() {
            state = match state {
                EmptyRoot => {
                    if byte != b'.' {
                        return Err(ValuePathError::LeadingDotExpected);
                    }
                    DotRoot
                }
                DotRoot => match byte {
                    b'[' => PartialArray,
                    _ if allowed_key_byte(byte) => {
                        key.push(char::from(byte));
                        WithinKey
                    }
                    _ => return Err(ValuePathError::ArrayOrKeyExpected),
                },
                PartialArray => {
                    if byte != b']' {
                        return Err(ValuePathError::ArrayCloseExpected);
                    }
                    segments.push(PathSegment::Array);
                    CompleteArray
                }
                CompleteArray => match byte {
                    b'.' => StartKey,
                    b'[' => PartialArray,
                    _ => return Err(ValuePathError::ArrayOrKeyExpected),
                },
                StartKey => {
                    if !allowed_key_byte(byte) {
                        return Err(ValuePathError::KeyCharExpected);
                    }
                    key.push(char::from(byte));
                    WithinKey
                }
                WithinKey => match byte {
                    b'.' => {
                        segments.push(PathSegment::Member(mem::take(&mut key)));
                        StartKey
                    }
                    b'[' => {
                        segments.push(PathSegment::Member(mem::take(&mut key)));
                        PartialArray
                    }
                    _ if allowed_key_byte(byte) => {
                        key.push(char::from(byte));
                        WithinKey
                    }
                    _ => return Err(ValuePathError::InvalidKeyChar),
                },
            };
        }
        match state {
            EmptyRoot | DotRoot | CompleteArray => {}
            WithinKey => segments.push(PathSegment::Member(key)),
            PartialArray => return Err(ValuePathError::ArrayCloseExpected),
            StartKey => return Err(ValuePathError::KeyCharExpected),
        }
        Ok(ValuePath {
            segments,
            repr: path.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec;

    use super::{PathSegment, ValuePath};
    use crate::error::ValuePathError;

    fn parse(path: &str) -> ValuePath {
        path.parse().unwrap()
    }

    #[test]
    fn empty_path_is_root() {
        assert_eq!(parse(""), ValuePath::root());
        assert!(parse("").segments().is_empty());
    }

    #[test]
    fn dot_is_alias_for_empty() {
        assert_eq!(parse("."), parse(""));
    }

    #[test]
    fn single_key() {
        assert_eq!(
            parse(".abc").segments(),
            &[PathSegment::Member("abc".to_string())]
        );
    }

    #[test]
    fn single_array() {
        assert_eq!(parse(".[]").segments(), &[PathSegment::Array]);
    }

    #[test]
    fn key_then_key() {
        assert_eq!(
            parse(".abc.efg").segments(),
            &[
                PathSegment::Member("abc".to_string()),
                PathSegment::Member("efg".to_string()),
            ]
        );
    }

    #[test]
    fn key_then_array() {
        assert_eq!(
            parse(".abc[]").segments(),
            &[PathSegment::Member("abc".to_string()), PathSegment::Array]
        );
    }

    #[test]
    fn array_then_array() {
        assert_eq!(
            parse(".[][]").segments(),
            &[PathSegment::Array, PathSegment::Array]
        );
    }

    #[test]
    fn representation_is_preserved() {
        assert_eq!(parse(".abc[]").as_str(), ".abc[]");
    }

    #[test]
    fn error_cases() {
        assert_eq!(
            "a".parse::<ValuePath>(),
            Err(ValuePathError::LeadingDotExpected)
        );
        assert_eq!(
            ". ".parse::<ValuePath>(),
            Err(ValuePathError::ArrayOrKeyExpected)
        );
        assert_eq!(
            ".[a".parse::<ValuePath>(),
            Err(ValuePathError::ArrayCloseExpected)
        );
        assert_eq!(
            ".[".parse::<ValuePath>(),
            Err(ValuePathError::ArrayCloseExpected)
        );
        assert_eq!(
            ".[]a".parse::<ValuePath>(),
            Err(ValuePathError::ArrayOrKeyExpected)
        );
        assert_eq!(
            ".a ".parse::<ValuePath>(),
            Err(ValuePathError::InvalidKeyChar)
        );
        assert_eq!(
            ".a. ".parse::<ValuePath>(),
            Err(ValuePathError::KeyCharExpected)
        );
        assert_eq!(
            ".a.".parse::<ValuePath>(),
            Err(ValuePathError::KeyCharExpected)
        );
    }

    #[test]
    fn filter_splits_on_pipes() {
        let paths = ValuePath::parse_filter(".abc|.[]|.abc.efg").unwrap();
        assert_eq!(paths, vec![parse(".abc"), parse(".[]"), parse(".abc.efg")]);
    }

    #[test]
    fn filter_empty_parts_are_root() {
        let paths = ValuePath::parse_filter(".abc|").unwrap();
        assert_eq!(paths, vec![parse(".abc"), ValuePath::root()]);
        assert_eq!(ValuePath::parse_filter("").unwrap(), vec![ValuePath::root()]);
    }

    #[test]
    fn filter_propagates_path_errors() {
        assert_eq!(
            ValuePath::parse_filter(".abc|x"),
            Err(ValuePathError::LeadingDotExpected)
        );
    }
}
