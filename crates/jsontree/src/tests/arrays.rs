use bstr::ByteSlice;
use bumpalo::Bump;

use crate::{Node, parse_str};

#[test]
fn nth_and_scan_index_agree() {
    let arena = Bump::new();
    let doc = parse_str(&arena, "[10,20,30,40,50]");
    let arr = doc.as_array().unwrap();
    assert_eq!(arr.len(), 5);
    for i in 0..5 {
        let a = arr.nth(i).unwrap().scalar_view().unwrap();
        let b = arr.scan_index(i).unwrap().scalar_view().unwrap();
        assert_eq!(a, b, "index {i}");
    }
    assert!(arr.nth(5).is_none());
    assert!(arr.scan_index(5).is_none());
    assert!(arr.nth(usize::MAX).is_none());
}

#[test]
fn push_after_table_build_is_visible() {
    let arena = Bump::new();
    let doc = parse_str(&arena, "[1,2]");
    let arr = doc.as_array().unwrap();
    // Build the table.
    assert!(arr.nth(0).is_some());
    // Push invalidates it; the next access rebuilds.
    arr.push(Node::from_i64(&arena, 3));
    assert_eq!(arr.len(), 3);
    assert_eq!(arr.nth(2).unwrap().scalar_view().unwrap().as_bytes(), b"3");
}

#[test]
fn erase_middle_keeps_order() {
    let arena = Bump::new();
    let doc = parse_str(&arena, "[1,2,3]");
    let arr = doc.as_array().unwrap();
    let middle = arr.nth_entry(1).unwrap();
    arr.erase(middle);
    assert_eq!(arr.len(), 2);
    assert_eq!(doc.to_vec(), b"[1,3]");
    assert!(middle.next().is_none());
    assert!(middle.previous().is_none());
    assert!(middle.value().parent().is_none());
}

#[test]
fn erase_head_and_tail() {
    let arena = Bump::new();
    let doc = parse_str(&arena, "[1,2,3]");
    let arr = doc.as_array().unwrap();
    arr.erase(arr.first().unwrap());
    assert_eq!(doc.to_vec(), b"[2,3]");
    arr.erase(arr.last().unwrap());
    assert_eq!(doc.to_vec(), b"[2]");
    arr.erase(arr.first().unwrap());
    assert_eq!(doc.to_vec(), b"[]");
    assert!(arr.is_empty());
    assert!(arr.first().is_none());
    assert!(arr.last().is_none());
}

#[test]
fn clear_empties_the_array() {
    let arena = Bump::new();
    let doc = parse_str(&arena, "[1,[2],3]");
    let arr = doc.as_array().unwrap();
    let nested = arr.nth(1).unwrap();
    arr.clear();
    assert_eq!(arr.len(), 0);
    assert!(arr.nth(0).is_none());
    assert_eq!(doc.to_vec(), b"[]");
    assert!(nested.parent().is_none());
}

#[test]
fn balanced_scan_walks_from_the_nearer_end() {
    let arena = Bump::new();
    let doc = Node::array(&arena);
    let arr = doc.as_array().unwrap();
    for i in 0..101 {
        arr.push(Node::from_i64(&arena, i));
    }
    // Front, back, and both sides of the midpoint.
    for i in [0, 1, 49, 50, 51, 99, 100] {
        let got = arr.scan_index(i).unwrap().to_i64(-1);
        assert_eq!(got, i as i64);
    }
}

#[test]
fn entry_navigation() {
    let arena = Bump::new();
    let doc = parse_str(&arena, "[1,2,3]");
    let arr = doc.as_array().unwrap();
    let first = arr.first().unwrap();
    let second = first.next().unwrap();
    let third = second.next().unwrap();
    assert!(third.next().is_none());
    assert!(std::ptr::eq(arr.last().unwrap(), third));
    assert!(std::ptr::eq(third.previous().unwrap(), second));
    let collected: Vec<i64> = arr.iter().map(|e| e.value().to_i64(-1)).collect();
    assert_eq!(collected, [1, 2, 3]);
}

#[test]
fn array_values_know_their_parent() {
    let arena = Bump::new();
    let doc = parse_str(&arena, "[true,false]");
    let arr = doc.as_array().unwrap();
    for e in arr {
        assert!(std::ptr::eq(e.value().parent().unwrap(), doc));
    }
}

#[test]
fn extractors_over_arrays() {
    let arena = Bump::new();
    let doc = parse_str(&arena, r#"["a\nb","plain",7]"#);
    let strings = doc.string_array();
    assert_eq!(strings.len(), 3);
    assert_eq!(strings[0].as_ref(), b"a\nb");
    assert_eq!(strings[1].as_ref(), b"plain");
    assert_eq!(strings[2].as_ref(), b"7");

    let doc = parse_str(&arena, "[1,2.5,\"x\",null]");
    // Non-numeric elements coerce to 0.0.
    assert_eq!(doc.float_array(), [1.0, 2.5, 0.0, 0.0]);

    // A scalar extracts as a single-element array.
    let doc = parse_str(&arena, "\"solo\"");
    let strings = doc.string_array();
    assert_eq!(strings.len(), 1);
    assert_eq!(strings[0].as_ref(), b"solo");
    assert_eq!(parse_str(&arena, "4").float_array(), [4.0]);

    // Null is not a textual scalar.
    assert!(parse_str(&arena, "null").string_array().is_empty());
}

#[test]
fn try_forms_distinguish_parsed_from_defaulted() {
    let arena = Bump::new();
    let doc = parse_str(
        &arena,
        r#"{"n":42,"f":2.5,"neg":-7,"big":4294967296,"yes":"yes","s":"nope"}"#,
    );
    let obj = doc.as_object().unwrap();

    let n = obj.scan("n").unwrap();
    assert_eq!(n.try_to_i32(), Some(42));
    assert_eq!(n.try_to_u32(), Some(42));
    assert_eq!(n.try_to_i64(), Some(42));
    assert_eq!(n.try_to_u64(), Some(42));
    assert_eq!(n.try_to_f32(), Some(42.0));
    assert_eq!(n.try_to_f64(), Some(42.0));

    // A decimal parses as float but not as any integer.
    let f = obj.scan("f").unwrap();
    assert_eq!(f.try_to_f32(), Some(2.5));
    assert_eq!(f.try_to_f64(), Some(2.5));
    assert_eq!(f.try_to_i64(), None);
    assert_eq!(f.to_f32(-1.0), 2.5);
    assert_eq!(f.to_i64(-1), -1);

    // Sign and range failures are `None`, not a silent default.
    let neg = obj.scan("neg").unwrap();
    assert_eq!(neg.try_to_i32(), Some(-7));
    assert_eq!(neg.try_to_u32(), None);
    assert_eq!(neg.to_u32(9), 9);
    let big = obj.scan("big").unwrap();
    assert_eq!(big.try_to_u32(), None);
    assert_eq!(big.try_to_u64(), Some(4_294_967_296));
    assert_eq!(big.try_to_i64(), Some(4_294_967_296));

    assert_eq!(obj.scan("yes").unwrap().try_to_bool(), Some(true));
    let s = obj.scan("s").unwrap();
    assert_eq!(s.try_to_bool(), None);
    assert!(s.to_bool(true));

    // Containers and null have no scalar view to convert.
    assert_eq!(doc.try_to_i64(), None);
    assert_eq!(parse_str(&arena, "null").try_to_bool(), None);
    assert_eq!(parse_str(&arena, "true").try_to_bool(), Some(true));
}
