//! An arena-backed JSON document tree.
//!
//! [`parse`] materializes a tree of typed [`Node`]s inside a caller-owned
//! [`Bump`] arena in one pass over the input. Scalars keep their literal
//! text (numbers round-trip exactly as written; strings stay in their
//! escaped form until [`Node::decoded`] is asked for), objects preserve
//! insertion order with lazily built lookup indexes, and a family of
//! emitters writes compact or pretty output to streams, growable buffers,
//! or exactly pre-sized memory regions.
//!
//! ```
//! use jsontree::{Bump, parse_str};
//!
//! let arena = Bump::new();
//! let doc = parse_str(&arena, r#"{"name":"widget","count":3}"#);
//! assert_eq!(doc.path_view("count").map(|v| v.to_vec()), Some(b"3".to_vec()));
//! assert_eq!(doc.to_vec(), br#"{"name":"widget","count":3}"#);
//! ```
//!
//! Everything allocated during parsing and building — nodes, entries,
//! keys, duplicated strings, index storage — lives in the arena and is
//! freed collectively when the arena is dropped. The `'a` lifetime on
//! every handle enforces that at compile time, including the `*_ref`
//! string builders that alias caller-owned bytes.

mod array;
mod emit;
mod escape;
mod node;
mod object;
mod parser;
mod path;
mod utf8;

pub mod convert;

#[cfg(test)]
mod tests;

pub use array::{Array, ArrayEntry, ArrayIter};
pub use bumpalo::Bump;
pub use escape::{decode, encode, needs_escape};
pub use node::{Node, NodeType};
pub use object::{MapEntry, Object, ObjectIter};
pub use parser::{ParseError, SyntaxError, parse, parse_str};
