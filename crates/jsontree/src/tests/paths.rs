use bstr::ByteSlice;
use bumpalo::Bump;

use crate::parse_str;

const USERS: &str = r#"{"users":[{"id":"1","name":"x"},{"id":"2","name":"y"}]}"#;

#[test]
fn index_segments_address_arrays() {
    let arena = Bump::new();
    let doc = parse_str(&arena, USERS);
    assert_eq!(doc.path_view("users.1.name").unwrap().as_bytes(), b"y");
    assert_eq!(doc.path_view("users.0.id").unwrap().as_bytes(), b"1");
    assert!(doc.path("users.999").is_none());
    assert!(doc.path("users.x").is_none());
}

#[test]
fn filter_segments_select_by_key_value() {
    let arena = Bump::new();
    let doc = parse_str(&arena, USERS);
    assert_eq!(doc.path_view("users.id=2.name").unwrap().as_bytes(), b"y");
    assert_eq!(doc.path_view("users.id=1.name").unwrap().as_bytes(), b"x");
    assert!(doc.path("users.id=3.name").is_none());
    assert!(doc.path("users.name=2").is_none());
}

#[test]
fn escaped_dots_address_literal_keys() {
    let arena = Bump::new();
    let doc = parse_str(&arena, r#"{"obj": {"x.y": 3}}"#);
    assert_eq!(doc.path_view("obj.x\\.y").unwrap().as_bytes(), b"3");
    // Without the escape, the dot splits the segment.
    assert!(doc.path("obj.x.y").is_none());
}

#[test]
fn filters_compare_the_encoded_view() {
    let arena = Bump::new();
    let doc = parse_str(&arena, r#"{"arr":[{"k":"a\nb","v":1},{"k":"x","v":2}]}"#);
    // A path backslash escapes the next character, so the encoded form
    // "a\nb" is spelled with a doubled backslash.
    assert_eq!(doc.path("arr.k=a\\\\nb.v").unwrap().to_i64(-1), 1);
    assert_eq!(doc.path("arr.k=x.v").unwrap().to_i64(-1), 2);
    // The decoded form of the value does not match.
    assert!(doc.path("arr.k=a\nb.v").is_none());
}

#[test]
fn result_forms() {
    let arena = Bump::new();
    let doc = parse_str(&arena, r#"{"s":"a\nb","n":3.25e-5}"#);
    assert!(doc.path("s").unwrap().is_string());
    assert_eq!(doc.path_view("s").unwrap().as_bytes(), b"a\\nb");
    assert_eq!(doc.path_decoded("s").unwrap().as_ref(), b"a\nb");
    assert_eq!(doc.path_view("n").unwrap().as_bytes(), b"3.25e-5");
}

#[test]
fn mismatched_shapes_are_null() {
    let arena = Bump::new();
    let doc = parse_str(&arena, r#"{"a":{"b":1},"n":7}"#);
    assert!(doc.path("a.b.c").is_none());
    assert!(doc.path("n.0").is_none());
    assert!(doc.path("missing").is_none());
    assert!(doc.path("a.7").is_none());
    assert!(doc.path("").is_none());
}

#[test]
fn deep_mixed_paths() {
    let arena = Bump::new();
    let doc = parse_str(
        &arena,
        r#"{"a":[{"b":[10,{"c":"hit"}]},{"b":[]}]}"#,
    );
    assert_eq!(doc.path_view("a.0.b.1.c").unwrap().as_bytes(), b"hit");
    assert!(doc.path("a.1.b.0").is_none());
}
