use bumpalo::Bump;
use rstest::rstest;

use crate::{SyntaxError, parse, parse_str};

#[rstest]
#[case::leading_zero(b"01".as_slice())]
#[case::negative_leading_zero(b"-01".as_slice())]
#[case::bare_fraction_dot(b"1.".as_slice())]
#[case::leading_dot(b".5".as_slice())]
#[case::empty_exponent(b"1e".as_slice())]
#[case::negative_zero_empty_exponent(b"-0e".as_slice())]
#[case::trailing_comma_in_object(br#"{"a":1,}"#.as_slice())]
#[case::trailing_comma_in_array(b"[1,2,]".as_slice())]
#[case::missing_colon(br#"{"a" 1}"#.as_slice())]
#[case::unterminated_string(br#"{"a":"abc}"#.as_slice())]
#[case::unterminated_array(b"[1,2".as_slice())]
#[case::unterminated_object(br#"{"a":1"#.as_slice())]
#[case::mangled_literal(b"trux".as_slice())]
#[case::space_inside_number(br#"{"n": - 1}"#.as_slice())]
#[case::nan(br#"{"n": NaN}"#.as_slice())]
#[case::infinity(br#"{"n": Infinity}"#.as_slice())]
#[case::capitalized_true(br#"{"t": True}"#.as_slice())]
#[case::byte_order_mark(b"\xEF\xBB\xBF{}".as_slice())]
#[case::bare_key(b"{a:1}".as_slice())]
#[case::colon_in_array(b"[1:2]".as_slice())]
#[case::empty_input(b"".as_slice())]
#[case::only_whitespace(b" \t\r\n".as_slice())]
#[case::lone_minus(b"-".as_slice())]
#[case::plus_prefix(b"+1".as_slice())]
fn rejected(#[case] input: &[u8]) {
    let arena = Bump::new();
    let doc = parse(&arena, input);
    assert!(doc.is_error(), "expected an error node for {input:?}");
    // Error nodes emit nothing.
    assert_eq!(doc.to_vec(), b"");
    assert_eq!(doc.compact_size(), 1);
}

#[test]
fn error_reports_offset_row_and_column() {
    let arena = Bump::new();
    let doc = parse_str(&arena, r#"{"a":x}"#);
    let err = doc.parse_error().unwrap();
    assert_eq!(err.offset(), 5);
    assert_eq!(err.reason(), SyntaxError::InvalidCharacter);
    assert_eq!(
        format!("{err}"),
        "Error at row 1, column: 6 (5 bytes into json)"
    );
}

#[test]
fn error_rows_count_newlines() {
    let arena = Bump::new();
    let doc = parse_str(&arena, "{\n  \"a\": x");
    let err = doc.parse_error().unwrap();
    assert_eq!(err.offset(), 9);
    assert_eq!(err.row_column(), (2, 8));
}

#[test]
fn error_columns_skip_two_bytes_per_backslash() {
    let arena = Bump::new();
    // [ " \ n " ,   x  — the backslash advances the column walk by two.
    let doc = parse_str(&arena, r#"["\n", x]"#);
    let err = doc.parse_error().unwrap();
    assert_eq!(err.offset(), 7);
    assert_eq!(err.row_column(), (1, 8));
}

#[test]
fn bom_gets_its_own_reason() {
    let arena = Bump::new();
    let doc = parse(&arena, b"\xEF\xBB\xBF{}");
    let err = doc.parse_error().unwrap();
    assert_eq!(err.reason(), SyntaxError::ByteOrderMark);
    assert_eq!(err.offset(), 0);
}

#[test]
fn rejection_reasons_are_specific() {
    let arena = Bump::new();
    let reason = |s: &str| parse_str(&arena, s).parse_error().unwrap().reason();
    assert_eq!(reason("01"), SyntaxError::LeadingZero);
    assert_eq!(reason("1."), SyntaxError::MalformedNumber);
    assert_eq!(reason(r#"{"a":"abc}"#), SyntaxError::UnterminatedString);
    assert_eq!(reason(r#"{"a" 1}"#), SyntaxError::ExpectedColon);
    assert_eq!(reason(r#"{"a":1,}"#), SyntaxError::ExpectedKey);
    assert_eq!(reason("[1 2]"), SyntaxError::ExpectedCommaOrClose);
    assert_eq!(reason("[1,2"), SyntaxError::UnexpectedEndOfInput);
}

#[test]
fn error_nodes_are_inert() {
    let arena = Bump::new();
    let doc = parse_str(&arena, "nope");
    assert!(doc.is_error());
    assert!(!doc.is_object() && !doc.is_array() && !doc.is_number());
    assert!(doc.scalar_view().is_none());
    assert!(doc.as_object().is_none());
    assert!(doc.as_array().is_none());
    assert!(doc.path("anything").is_none());
    assert_eq!(doc.to_i64(-3), -3);
}
