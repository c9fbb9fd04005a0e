use alloc::string::ToString;
use alloc::vec;

use rstest::rstest;

use super::utils::{Event, Recorder};
use crate::event::{NullConsumer, ValueKind};
use crate::parser::{JsonParser, ParserOptions};

fn accepts(input: &str) {
    let mut parser = JsonParser::new(NullConsumer);
    assert_eq!(parser.parse(input.as_bytes()), Ok(true), "input: {input:?}");
}

#[rstest]
#[case("null")]
#[case("false")]
#[case("true")]
#[case("\"hello\"")]
#[case("{}")]
#[case("{ }")]
#[case("[]")]
#[case("[ ]")]
#[case("1")]
#[case("0")]
#[case("1.0")]
#[case("-1.0")]
#[case("-1")]
#[case("-0")]
#[case("-1e1")]
#[case("-1e+1")]
#[case("-1e-1")]
#[case("-1.0e-1")]
#[case("-1.0e1")]
#[case("-1.0e+1")]
#[case("   12   ")]
#[case(" [  1 , 2] ")]
#[case(" [  1 , 2, {}] ")]
#[case(" [  1 , 2, { \"123\": 123 }] ")]
#[case(" [  1 , 2, { \"123\": [] }] ")]
#[case(" [  1 , 2, { \"123\": {} }] ")]
#[case(" [  1 , 2, { \"123\": \"jkn\" }] ")]
#[case("\t{\"a\"\r:\n1}\t")]
#[case("\"\\u0041\\uD834\\uDD1E\"")]
#[case("123456789012345678901234567890")]
fn accepts_valid_documents(#[case] input: &str) {
    accepts(input);
}

#[test]
fn accepts_deep_nesting_without_stack_growth() {
    // Far deeper than any native-recursion parser could survive.
    let mut input = "[".repeat(100_000);
    input.push('1');
    input.push_str(&"]".repeat(100_000));
    accepts(&input);
}

#[test]
fn event_sequence_for_mixed_document() {
    let mut parser = JsonParser::new(Recorder::default());
    let complete = parser.parse(br#" {"a": [1, true, null, "x\n"], "b": {}} "#);
    assert_eq!(complete, Ok(true));
    assert_eq!(
        parser.into_consumer().events,
        vec![
            Event::ObjectStart(1),
            Event::Key("a".to_string()),
            Event::ArrayStart(7),
            Event::Primitive(ValueKind::Number, "1".to_string()),
            Event::Primitive(ValueKind::True, "true".to_string()),
            Event::Primitive(ValueKind::Null, "null".to_string()),
            Event::Primitive(ValueKind::String, "x\\n".to_string()),
            Event::ArrayEnd("[1, true, null, \"x\\n\"]".to_string()),
            Event::Key("b".to_string()),
            Event::ObjectStart(36),
            Event::ObjectEnd("{}".to_string()),
            Event::ObjectEnd("{\"a\": [1, true, null, \"x\\n\"], \"b\": {}}".to_string()),
        ]
    );
}

#[test]
fn string_spans_exclude_quotes_and_keep_escapes() {
    let mut parser = JsonParser::new(Recorder::default());
    assert_eq!(parser.parse(br#""a\u0041\\b""#), Ok(true));
    assert_eq!(
        parser.into_consumer().events,
        vec![Event::Primitive(
            ValueKind::String,
            "a\\u0041\\\\b".to_string()
        )]
    );
}

#[test]
fn number_spans_are_opaque_text() {
    let mut parser = JsonParser::new(Recorder::default());
    assert_eq!(parser.parse(b"-12.50e+007"), Ok(true));
    assert_eq!(
        parser.into_consumer().events,
        vec![Event::Primitive(ValueKind::Number, "-12.50e+007".to_string())]
    );
}

#[test]
fn end_spans_cover_the_trimmed_input() {
    let mut parser = JsonParser::new(Recorder::default());
    assert_eq!(parser.parse(b"  [1, []]  "), Ok(true));
    let events = parser.into_consumer().events;
    assert_eq!(events.last(), Some(&Event::ArrayEnd("[1, []]".to_string())));
}

#[rstest]
#[case(0)]
#[case(3)]
#[case(100)]
fn depth_limit_at_or_above_nesting_succeeds(#[case] depth_limit: u32) {
    // Three frames deep: root array, inner array, number element.
    let mut parser =
        JsonParser::with_options(NullConsumer, ParserOptions { depth_limit });
    assert_eq!(parser.parse(b"[[1]]"), Ok(true));
}

#[test]
fn parser_is_reusable_across_calls() {
    let mut parser = JsonParser::new(NullConsumer);
    assert_eq!(parser.parse(b"[1]"), Ok(true));
    assert!(parser.parse(b"{\"a\"").is_err());
    assert_eq!(parser.parse(b"true"), Ok(true));
}
