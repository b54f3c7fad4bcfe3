//! Dotted-path lookup over a tree.
//!
//! A path like `users.1.name` descends one segment at a time: object
//! segments are literal encoded keys (scan semantics), all-digit segments
//! index arrays through the balanced scan, and `key=value` segments filter
//! arrays by the first element whose object carries a scalar at `key`
//! whose *encoded* view byte-equals `value`. A backslash escapes the next
//! character, so `a\.b` addresses the literal key `a.b`.

use std::borrow::Cow;

use bstr::{BStr, ByteSlice};

use crate::node::Node;

impl<'a> Node<'a> {
    /// Resolves a dotted path to a node.
    #[must_use]
    pub fn path(&self, path: &str) -> Option<&'a Node<'a>> {
        let mut segments = split_segments(path).into_iter();
        let mut cur = step(self, &segments.next()?)?;
        for seg in segments {
            cur = step(cur, &seg)?;
        }
        Some(cur)
    }

    /// Resolves a dotted path to the encoded scalar view of its target.
    #[must_use]
    pub fn path_view(&self, path: &str) -> Option<&'a BStr> {
        self.path(path)?.scalar_view()
    }

    /// Resolves a dotted path to the decoded string form of its target.
    #[must_use]
    pub fn path_decoded(&self, path: &str) -> Option<Cow<'a, [u8]>> {
        self.path(path)?.decoded()
    }
}

/// Splits on `.`, honoring backslash escapes (`\.` for a literal dot,
/// `\\` for a literal backslash).
fn split_segments(path: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut cur = String::new();
    let mut chars = path.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped) => cur.push(escaped),
                None => cur.push('\\'),
            },
            '.' => segments.push(std::mem::take(&mut cur)),
            _ => cur.push(c),
        }
    }
    segments.push(cur);
    segments
}

fn step<'a>(node: &Node<'a>, segment: &str) -> Option<&'a Node<'a>> {
    if let Some(o) = node.as_object() {
        return o.scan(segment.as_bytes());
    }
    let a = node.as_array()?;
    if let Some((key, want)) = segment.split_once('=') {
        // First element that is an object whose scanned key holds a
        // scalar byte-equal to the filter value. The comparison is
        // against the encoded view.
        return a.iter().map(|e| e.value()).find(|v| {
            v.as_object()
                .and_then(|o| o.scan(key.as_bytes()))
                .and_then(|n| n.scalar_view())
                .is_some_and(|view| view.as_bytes() == want.as_bytes())
        });
    }
    if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
        return a.scan_index(segment.parse().ok()?);
    }
    None
}
