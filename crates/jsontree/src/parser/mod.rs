//! The tree parser.
//!
//! A single-pass state machine (`loop` + `match` over [`State`]) that
//! materializes the document tree directly into the arena. The input is
//! copied into the arena once up front, so parsing is non-destructive and
//! every scalar payload and object key is a zero-copy slice of that copy.
//!
//! Containers are built in place: a child container is attached to its
//! parent the moment it opens, and closing walks the parent pointer back
//! up — the open-container chain *is* the stack, there is no separate one.
//!
//! Failure never panics and never returns `Result`: a failed parse yields
//! an error node carrying the source, the offset of the first byte not
//! consumed by a successful production, and a [`SyntaxError`] reason.

mod error;

pub use error::{ParseError, SyntaxError};

use bstr::{BStr, ByteSlice};
use bumpalo::Bump;

use crate::node::{Node, NodeKind};

/// Parses `bytes` into a document tree allocated in `arena`.
///
/// The root may be any JSON value. Bytes after a complete root value are
/// ignored. On failure the returned node is an error node; see
/// [`Node::parse_error`].
pub fn parse<'a>(arena: &'a Bump, bytes: &[u8]) -> &'a Node<'a> {
    let src = &*arena.alloc_slice_copy(bytes);
    let mut parser = Parser {
        arena,
        src,
        pos: 0,
    };
    match parser.document() {
        Ok(root) => root,
        Err(err) => Node::error(arena, err),
    }
}

/// Convenience wrapper over [`parse`] for string input.
pub fn parse_str<'a>(arena: &'a Bump, text: &str) -> &'a Node<'a> {
    parse(arena, text.as_bytes())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Expecting a value. `in_empty_array` is set immediately after `[`,
    /// where `]` is also acceptable.
    Value { in_empty_array: bool },
    /// Inside an object, expecting a key (or `}` when nothing has been
    /// parsed yet).
    BeforeKey { first: bool },
    /// Between an object key and its `:`.
    AfterKey,
    /// After a complete value inside a container.
    AfterValue,
}

struct Parser<'a> {
    arena: &'a Bump,
    src: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn document(&mut self) -> Result<&'a Node<'a>, ParseError<'a>> {
        let mut state = State::Value {
            in_empty_array: false,
        };
        // Innermost open container; `None` until the root container opens
        // (or forever, for a scalar root).
        let mut cur: Option<&'a Node<'a>> = None;
        // Key awaiting its value while `cur` is an object.
        let mut key: Option<&'a BStr> = None;

        loop {
            self.skip_whitespace();
            let Some(b) = self.peek() else {
                return Err(self.err(SyntaxError::UnexpectedEndOfInput));
            };
            match state {
                State::Value { in_empty_array } => match b {
                    b']' if in_empty_array => {
                        self.pos += 1;
                        match Self::close(&mut cur) {
                            Some(root) => return Ok(root),
                            None => state = State::AfterValue,
                        }
                    }
                    b'{' => {
                        let node = Node::object(self.arena);
                        Self::attach(cur, key.take(), node);
                        cur = Some(node);
                        state = State::BeforeKey { first: true };
                        self.pos += 1;
                    }
                    b'[' => {
                        let node = Node::array(self.arena);
                        Self::attach(cur, key.take(), node);
                        cur = Some(node);
                        state = State::Value {
                            in_empty_array: true,
                        };
                        self.pos += 1;
                    }
                    b'"' => {
                        let body = self.scan_string()?;
                        let node = Node::new_in(self.arena, NodeKind::String(body));
                        match Self::finish_value(cur, key.take(), node) {
                            Some(root) => return Ok(root),
                            None => state = State::AfterValue,
                        }
                    }
                    b't' | b'f' | b'n' => {
                        let node = self.scan_literal()?;
                        match Self::finish_value(cur, key.take(), node) {
                            Some(root) => return Ok(root),
                            None => state = State::AfterValue,
                        }
                    }
                    b'-' | b'0'..=b'9' => {
                        let text = self.scan_number()?;
                        let node = Node::number_from_text(self.arena, text);
                        match Self::finish_value(cur, key.take(), node) {
                            Some(root) => return Ok(root),
                            None => state = State::AfterValue,
                        }
                    }
                    _ => {
                        let reason = if self.src[self.pos..].starts_with(b"\xEF\xBB\xBF") {
                            SyntaxError::ByteOrderMark
                        } else {
                            SyntaxError::InvalidCharacter
                        };
                        return Err(self.err(reason));
                    }
                },
                State::BeforeKey { first } => match b {
                    b'}' if first => {
                        self.pos += 1;
                        match Self::close(&mut cur) {
                            Some(root) => return Ok(root),
                            None => state = State::AfterValue,
                        }
                    }
                    b'"' => {
                        key = Some(self.scan_string()?);
                        state = State::AfterKey;
                    }
                    _ => return Err(self.err(SyntaxError::ExpectedKey)),
                },
                State::AfterKey => match b {
                    b':' => {
                        self.pos += 1;
                        state = State::Value {
                            in_empty_array: false,
                        };
                    }
                    _ => return Err(self.err(SyntaxError::ExpectedColon)),
                },
                State::AfterValue => match b {
                    b',' => {
                        self.pos += 1;
                        state = match cur {
                            Some(c) if c.is_object() => State::BeforeKey { first: false },
                            _ => State::Value {
                                in_empty_array: false,
                            },
                        };
                    }
                    b'}' if cur.is_some_and(Node::is_object) => {
                        self.pos += 1;
                        match Self::close(&mut cur) {
                            Some(root) => return Ok(root),
                            None => state = State::AfterValue,
                        }
                    }
                    b']' if cur.is_some_and(Node::is_array) => {
                        self.pos += 1;
                        match Self::close(&mut cur) {
                            Some(root) => return Ok(root),
                            None => state = State::AfterValue,
                        }
                    }
                    _ => return Err(self.err(SyntaxError::ExpectedCommaOrClose)),
                },
            }
        }
    }

    /// Attaches a value to the open container, keyed when the container is
    /// an object. A `None` container means the value is the root; nothing
    /// to do.
    fn attach(cur: Option<&'a Node<'a>>, key: Option<&'a BStr>, node: &'a Node<'a>) {
        let Some(c) = cur else { return };
        match key {
            Some(k) => {
                if let Some(o) = c.as_object() {
                    o.push_entry(k, node);
                }
            }
            None => {
                if let Some(a) = c.as_array() {
                    a.push(node);
                }
            }
        }
    }

    /// Completes a scalar: returns it when it is the whole document,
    /// otherwise attaches it to the open container.
    fn finish_value(
        cur: Option<&'a Node<'a>>,
        key: Option<&'a BStr>,
        node: &'a Node<'a>,
    ) -> Option<&'a Node<'a>> {
        if cur.is_none() {
            return Some(node);
        }
        Self::attach(cur, key, node);
        None
    }

    /// Closes the open container by walking up its parent pointer;
    /// returns the root when the closed container had no parent.
    fn close(cur: &mut Option<&'a Node<'a>>) -> Option<&'a Node<'a>> {
        let done = (*cur)?;
        match done.parent() {
            None => Some(done),
            Some(p) => {
                *cur = Some(p);
                None
            }
        }
    }

    // --------------------------------------------------------------------
    // Token scanners
    // --------------------------------------------------------------------

    /// Scans a string starting at the opening quote; returns the body
    /// verbatim (escapes preserved) and leaves `pos` past the closing
    /// quote. The closing quote is the next `"` preceded by an even run
    /// of backslashes.
    fn scan_string(&mut self) -> Result<&'a BStr, ParseError<'a>> {
        let src = self.src;
        let open = self.pos;
        let start = open + 1;
        let mut from = start;
        loop {
            let Some(off) = src[from..].find_byte(b'"') else {
                return Err(self.err_at(SyntaxError::UnterminatedString, open));
            };
            let q = from + off;
            let mut run = 0;
            while q - run > start && src[q - run - 1] == b'\\' {
                run += 1;
            }
            if run % 2 == 0 {
                self.pos = q + 1;
                return Ok(BStr::new(&src[start..q]));
            }
            from = q + 1;
        }
    }

    /// Scans a number literal: optional `-`, `0` or nonzero-digit digits,
    /// optional fraction, optional exponent. Leading zeros are rejected;
    /// so is anything (whitespace included) interrupting the body.
    fn scan_number(&mut self) -> Result<&'a BStr, ParseError<'a>> {
        let src = self.src;
        let start = self.pos;
        let mut i = self.pos;
        if src.get(i).copied() == Some(b'-') {
            i += 1;
        }
        match src.get(i).copied() {
            Some(b'0') => {
                i += 1;
                if matches!(src.get(i).copied(), Some(b'0'..=b'9')) {
                    return Err(self.err_at(SyntaxError::LeadingZero, i));
                }
            }
            Some(b'1'..=b'9') => {
                while matches!(src.get(i).copied(), Some(b'0'..=b'9')) {
                    i += 1;
                }
            }
            _ => return Err(self.err_at(SyntaxError::MalformedNumber, i)),
        }
        if src.get(i).copied() == Some(b'.') {
            i += 1;
            if !matches!(src.get(i).copied(), Some(b'0'..=b'9')) {
                return Err(self.err_at(SyntaxError::MalformedNumber, i));
            }
            while matches!(src.get(i).copied(), Some(b'0'..=b'9')) {
                i += 1;
            }
        }
        if matches!(src.get(i).copied(), Some(b'e' | b'E')) {
            i += 1;
            if matches!(src.get(i).copied(), Some(b'+' | b'-')) {
                i += 1;
            }
            if !matches!(src.get(i).copied(), Some(b'0'..=b'9')) {
                return Err(self.err_at(SyntaxError::MalformedNumber, i));
            }
            while matches!(src.get(i).copied(), Some(b'0'..=b'9')) {
                i += 1;
            }
        }
        self.pos = i;
        Ok(BStr::new(&src[start..i]))
    }

    /// Scans one of the case-sensitive literals `true`, `false`, `null`.
    fn scan_literal(&mut self) -> Result<&'a Node<'a>, ParseError<'a>> {
        let rest = &self.src[self.pos..];
        let (node, len) = if rest.starts_with(b"true") {
            (Node::bool(self.arena, true), 4)
        } else if rest.starts_with(b"false") {
            (Node::bool(self.arena, false), 5)
        } else if rest.starts_with(b"null") {
            (Node::null(self.arena), 4)
        } else {
            return Err(self.err(SyntaxError::InvalidCharacter));
        };
        self.pos += len;
        Ok(node)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b'\t' | b'\n' | b'\r' | b' ')) {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn err(&self, reason: SyntaxError) -> ParseError<'a> {
        self.err_at(reason, self.pos)
    }

    fn err_at(&self, reason: SyntaxError, at: usize) -> ParseError<'a> {
        ParseError {
            src: BStr::new(self.src),
            at,
            reason,
        }
    }
}
