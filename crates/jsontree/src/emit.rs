//! Compact and pretty emitters with matching size estimators.
//!
//! Each format is a single recursive visitor parameterized by a [`Sink`]:
//! run it over a writer and it emits bytes, run it over a counter and it
//! produces the size estimate. One implementation serves both, so the
//! estimate cannot drift from what the writer produces. The only
//! asymmetry is deliberate: string payloads go through the UTF-8 filter
//! when writing but are counted at face value when estimating. The filter
//! only shrinks, so the estimate is a safe upper bound and is exact
//! whenever the payloads are valid UTF-8.
//!
//! Estimates include one extra byte for a trailing NUL, so a caller can
//! allocate exactly the estimate and receive a NUL-terminated buffer from
//! the slice writers. The generic writers cover all three sinks: a
//! growable `Vec<u8>`, a caller-sized memory region (via [`Cursor`]), and
//! an arbitrary stream.

use std::io::{self, Cursor, Write};

use bstr::ByteSlice;

use crate::node::{Node, NodeKind};
use crate::utf8;

const DEFAULT_INDENT: usize = 2;

fn effective_step(step: usize) -> usize {
    if step == 0 { DEFAULT_INDENT } else { step }
}

impl<'a> Node<'a> {
    /// Writes the compact form to a stream.
    pub fn write_compact<W: Write>(&self, w: &mut W) -> io::Result<()> {
        compact(self, &mut Emitter(w))
    }

    /// Writes the pretty form to a stream. A `step` of 0 means two
    /// spaces.
    pub fn write_pretty<W: Write>(&self, w: &mut W, step: usize) -> io::Result<()> {
        pretty(self, &mut Emitter(w), 0, effective_step(step))
    }

    /// Upper bound on the compact output size, NUL terminator included.
    /// Exact (written bytes + 1) when every string payload is valid
    /// UTF-8.
    #[must_use]
    pub fn compact_size(&self) -> usize {
        let mut counter = Counter(0);
        compact(self, &mut counter).expect("counting cannot fail");
        counter.0 + 1
    }

    /// Upper bound on the pretty output size, NUL terminator included.
    #[must_use]
    pub fn pretty_size(&self, step: usize) -> usize {
        let mut counter = Counter(0);
        pretty(self, &mut counter, 0, effective_step(step)).expect("counting cannot fail");
        counter.0 + 1
    }

    /// The compact form in a growable buffer pre-sized by the estimate.
    #[must_use]
    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.compact_size());
        self.write_compact(&mut out).expect("writing to a Vec cannot fail");
        out
    }

    /// The pretty form in a growable buffer pre-sized by the estimate.
    #[must_use]
    pub fn to_vec_pretty(&self, step: usize) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pretty_size(step));
        self.write_pretty(&mut out, step).expect("writing to a Vec cannot fail");
        out
    }

    /// Writes the compact form plus a trailing NUL into a caller-sized
    /// region; returns the content length (NUL excluded). Fails with
    /// [`io::ErrorKind::WriteZero`] when the region is too small; sizing
    /// it by [`compact_size`](Self::compact_size) always fits.
    pub fn to_slice(&self, buf: &mut [u8]) -> io::Result<usize> {
        let mut cur = Cursor::new(&mut *buf);
        self.write_compact(&mut cur)?;
        finish_slice(cur)
    }

    /// Pretty counterpart of [`to_slice`](Self::to_slice).
    pub fn to_slice_pretty(&self, buf: &mut [u8], step: usize) -> io::Result<usize> {
        let mut cur = Cursor::new(&mut *buf);
        self.write_pretty(&mut cur, step)?;
        finish_slice(cur)
    }
}

fn finish_slice(cur: Cursor<&mut [u8]>) -> io::Result<usize> {
    let written = cur.position() as usize;
    let buf = cur.into_inner();
    if written == buf.len() {
        return Err(io::Error::new(
            io::ErrorKind::WriteZero,
            "no room for the trailing NUL",
        ));
    }
    buf[written] = 0;
    Ok(written)
}

/// Compact dump, lossily rendered. Mostly useful in logs and tests.
impl std::fmt::Display for Node<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut out = Vec::new();
        self.write_compact(&mut out).map_err(|_| std::fmt::Error)?;
        f.write_str(&String::from_utf8_lossy(&out))
    }
}

// ------------------------------------------------------------------------
// The accumulator: a byte writer or a byte counter
// ------------------------------------------------------------------------

trait Sink {
    fn put(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// A string payload: filtered when writing, face value when counting.
    fn put_payload(&mut self, bytes: &[u8]) -> io::Result<()>;

    fn put_indent(&mut self, width: usize) -> io::Result<()>;
}

struct Emitter<'w, W: Write>(&'w mut W);

impl<W: Write> Sink for Emitter<'_, W> {
    fn put(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.0.write_all(bytes)
    }

    fn put_payload(&mut self, bytes: &[u8]) -> io::Result<()> {
        utf8::write_filtered(self.0, bytes)
    }

    fn put_indent(&mut self, mut width: usize) -> io::Result<()> {
        const PAD: &[u8] = b"                ";
        while width > 0 {
            let n = width.min(PAD.len());
            self.0.write_all(&PAD[..n])?;
            width -= n;
        }
        Ok(())
    }
}

struct Counter(usize);

impl Sink for Counter {
    fn put(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.0 += bytes.len();
        Ok(())
    }

    fn put_payload(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.0 += bytes.len();
        Ok(())
    }

    fn put_indent(&mut self, width: usize) -> io::Result<()> {
        self.0 += width;
        Ok(())
    }
}

// ------------------------------------------------------------------------
// The visitors
// ------------------------------------------------------------------------

fn compact<S: Sink>(node: &Node<'_>, s: &mut S) -> io::Result<()> {
    match &node.kind {
        NodeKind::Error(_) => Ok(()),
        NodeKind::Null => s.put(b"null"),
        NodeKind::Bool(true) => s.put(b"true"),
        NodeKind::Bool(false) => s.put(b"false"),
        NodeKind::Zero => s.put(b"0"),
        NodeKind::Number(text) | NodeKind::Decimal(text) => s.put(text.as_bytes()),
        NodeKind::String(body) => {
            s.put(b"\"")?;
            s.put_payload(body.as_bytes())?;
            s.put(b"\"")
        }
        NodeKind::Object(o) => {
            s.put(b"{")?;
            let mut first = true;
            for e in o {
                if !first {
                    s.put(b",")?;
                }
                first = false;
                s.put(b"\"")?;
                s.put(e.key().as_bytes())?;
                s.put(b"\":")?;
                compact(e.value(), s)?;
            }
            s.put(b"}")
        }
        NodeKind::Array(a) => {
            s.put(b"[")?;
            let mut first = true;
            for e in a {
                if !first {
                    s.put(b",")?;
                }
                first = false;
                compact(e.value(), s)?;
            }
            s.put(b"]")
        }
    }
}

fn pretty<S: Sink>(node: &Node<'_>, s: &mut S, depth: usize, step: usize) -> io::Result<()> {
    match &node.kind {
        NodeKind::Object(o) => {
            if o.is_empty() {
                return s.put(b"{}");
            }
            s.put(b"{")?;
            let mut first = true;
            for e in o {
                if !first {
                    s.put(b",")?;
                }
                first = false;
                s.put(b"\n")?;
                s.put_indent((depth + 1) * step)?;
                s.put(b"\"")?;
                s.put(e.key().as_bytes())?;
                s.put(b"\": ")?;
                pretty(e.value(), s, depth + 1, step)?;
            }
            s.put(b"\n")?;
            s.put_indent(depth * step)?;
            s.put(b"}")
        }
        NodeKind::Array(a) => {
            if a.is_empty() {
                return s.put(b"[]");
            }
            s.put(b"[")?;
            let mut first = true;
            for e in a {
                if !first {
                    s.put(b",")?;
                }
                first = false;
                s.put(b"\n")?;
                s.put_indent((depth + 1) * step)?;
                pretty(e.value(), s, depth + 1, step)?;
            }
            s.put(b"\n")?;
            s.put_indent(depth * step)?;
            s.put(b"]")
        }
        _ => compact(node, s),
    }
}
