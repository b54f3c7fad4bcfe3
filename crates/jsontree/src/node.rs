//! The tagged document node.
//!
//! Every node lives in a [`Bump`] arena and is handed out as a shared
//! `&'a Node<'a>` bounded by the arena's lifetime. Mutation of containers
//! goes through interior `Cell`s, so a tree is single-owner data: it can be
//! read from anywhere that holds a reference, but it is `!Sync` and never
//! outlives its arena. Teardown is collective — dropping the arena frees
//! the whole tree at once.

use std::borrow::Cow;
use std::cell::Cell;

use bstr::{BStr, ByteSlice};
use bumpalo::Bump;

use crate::array::Array;
use crate::convert;
use crate::escape;
use crate::object::Object;
use crate::parser::ParseError;

/// The type tag of a [`Node`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeType {
    /// A failed parse; carries the source position of the failure.
    Error,
    /// An insertion-ordered object.
    Object,
    /// An array.
    Array,
    /// The literal `null`.
    Null,
    /// A string payload in its encoded (JSON-escaped) form.
    String,
    /// The literal `false`.
    False,
    /// Exactly the literal `0`.
    Zero,
    /// An integer literal, including `-0` and exponent forms.
    Number,
    /// A number literal containing a decimal point.
    Decimal,
    /// The literal `true`.
    True,
}

/// A JSON document node allocated in a [`Bump`] arena.
pub struct Node<'a> {
    pub(crate) parent: Cell<Option<&'a Node<'a>>>,
    pub(crate) kind: NodeKind<'a>,
}

pub(crate) enum NodeKind<'a> {
    Error(ParseError<'a>),
    Object(Object<'a>),
    Array(Array<'a>),
    Null,
    String(&'a BStr),
    Bool(bool),
    Zero,
    Number(&'a BStr),
    Decimal(&'a BStr),
}

macro_rules! scalar_conversions {
    ($($try_name:ident / $name:ident -> $ty:ty;)*) => {
        $(
            /// The scalar view parsed as the target type, or `None`.
            #[must_use]
            pub fn $try_name(&self) -> Option<$ty> {
                convert::$try_name(self.scalar_view()?)
            }

            /// The scalar view parsed as the target type, substituting
            /// `default` on any failure.
            #[must_use]
            pub fn $name(&self, default: $ty) -> $ty {
                self.$try_name().unwrap_or(default)
            }
        )*
    };
}

impl<'a> Node<'a> {
    pub(crate) fn new_in(arena: &'a Bump, kind: NodeKind<'a>) -> &'a Node<'a> {
        arena.alloc(Node {
            parent: Cell::new(None),
            kind,
        })
    }

    // --------------------------------------------------------------------
    // Builders
    // --------------------------------------------------------------------

    /// A `null` node.
    pub fn null(arena: &'a Bump) -> &'a Node<'a> {
        Self::new_in(arena, NodeKind::Null)
    }

    /// A `true` or `false` node.
    pub fn bool(arena: &'a Bump, value: bool) -> &'a Node<'a> {
        Self::new_in(arena, NodeKind::Bool(value))
    }

    /// The literal `0`.
    pub fn zero(arena: &'a Bump) -> &'a Node<'a> {
        Self::new_in(arena, NodeKind::Zero)
    }

    /// A number node formatted from a signed integer.
    pub fn from_i64(arena: &'a Bump, value: i64) -> &'a Node<'a> {
        if value == 0 {
            return Self::zero(arena);
        }
        let text = bumpalo::format!(in arena, "{}", value).into_bump_str();
        Self::new_in(arena, NodeKind::Number(BStr::new(text)))
    }

    /// A number node formatted from an unsigned integer.
    pub fn from_u64(arena: &'a Bump, value: u64) -> &'a Node<'a> {
        if value == 0 {
            return Self::zero(arena);
        }
        let text = bumpalo::format!(in arena, "{}", value).into_bump_str();
        Self::new_in(arena, NodeKind::Number(BStr::new(text)))
    }

    /// A number node formatted from a float; the tag follows the formatted
    /// literal (`Decimal` when it contains a point).
    pub fn from_f64(arena: &'a Bump, value: f64) -> &'a Node<'a> {
        let text = bumpalo::format!(in arena, "{}", value).into_bump_str();
        Self::number_from_text(arena, BStr::new(text))
    }

    /// A number node from literal text, classified as `Zero`, `Decimal`,
    /// or `Number`. The text is copied into the arena and is not
    /// validated; it round-trips exactly as given.
    pub fn number(arena: &'a Bump, text: &str) -> &'a Node<'a> {
        let text = &*arena.alloc_str(text);
        Self::number_from_text(arena, BStr::new(text))
    }

    /// A number node from literal text with the `Decimal` tag forced.
    pub fn decimal(arena: &'a Bump, text: &str) -> &'a Node<'a> {
        let text = &*arena.alloc_str(text);
        Self::new_in(arena, NodeKind::Decimal(BStr::new(text)))
    }

    pub(crate) fn number_from_text(arena: &'a Bump, text: &'a BStr) -> &'a Node<'a> {
        let kind = if text.as_bytes() == b"0" {
            NodeKind::Zero
        } else if text.contains(&b'.') {
            NodeKind::Decimal(text)
        } else {
            NodeKind::Number(text)
        };
        Self::new_in(arena, kind)
    }

    /// A string node; the text is escaped and copied into the arena.
    pub fn string(arena: &'a Bump, text: &str) -> &'a Node<'a> {
        let encoded: &'a [u8] = match escape::encode(text.as_bytes()) {
            Cow::Borrowed(b) => arena.alloc_slice_copy(b),
            Cow::Owned(v) => arena.alloc_slice_copy(&v),
        };
        Self::new_in(arena, NodeKind::String(BStr::new(encoded)))
    }

    /// A string node from text that is already in encoded form; copied into
    /// the arena verbatim.
    pub fn string_raw(arena: &'a Bump, encoded: &str) -> &'a Node<'a> {
        let encoded = &*arena.alloc_str(encoded);
        Self::new_in(arena, NodeKind::String(BStr::new(encoded)))
    }

    /// A string node that aliases the caller's bytes when no escaping is
    /// required. The `'a` bound makes the source outlive the tree.
    pub fn string_ref(arena: &'a Bump, text: &'a str) -> &'a Node<'a> {
        let encoded: &'a [u8] = match escape::encode(text.as_bytes()) {
            Cow::Borrowed(b) => b,
            Cow::Owned(v) => arena.alloc_slice_copy(&v),
        };
        Self::new_in(arena, NodeKind::String(BStr::new(encoded)))
    }

    /// A string node aliasing already-encoded caller bytes, no copy at all.
    pub fn string_raw_ref(arena: &'a Bump, encoded: &'a str) -> &'a Node<'a> {
        Self::new_in(arena, NodeKind::String(BStr::new(encoded.as_bytes())))
    }

    /// An empty object node.
    pub fn object(arena: &'a Bump) -> &'a Node<'a> {
        let node = Self::new_in(arena, NodeKind::Object(Object::new_in(arena)));
        if let NodeKind::Object(o) = &node.kind {
            o.bind(node);
        }
        node
    }

    /// An empty array node.
    pub fn array(arena: &'a Bump) -> &'a Node<'a> {
        let node = Self::new_in(arena, NodeKind::Array(Array::new_in(arena)));
        if let NodeKind::Array(a) = &node.kind {
            a.bind(node);
        }
        node
    }

    pub(crate) fn error(arena: &'a Bump, err: ParseError<'a>) -> &'a Node<'a> {
        Self::new_in(arena, NodeKind::Error(err))
    }

    // --------------------------------------------------------------------
    // Predicates and accessors
    // --------------------------------------------------------------------

    /// The node's type tag.
    #[must_use]
    pub fn node_type(&self) -> NodeType {
        match &self.kind {
            NodeKind::Error(_) => NodeType::Error,
            NodeKind::Object(_) => NodeType::Object,
            NodeKind::Array(_) => NodeType::Array,
            NodeKind::Null => NodeType::Null,
            NodeKind::String(_) => NodeType::String,
            NodeKind::Bool(false) => NodeType::False,
            NodeKind::Bool(true) => NodeType::True,
            NodeKind::Zero => NodeType::Zero,
            NodeKind::Number(_) => NodeType::Number,
            NodeKind::Decimal(_) => NodeType::Decimal,
        }
    }

    /// `true` for the error node of a failed parse.
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self.kind, NodeKind::Error(_))
    }

    /// `true` for an object node.
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self.kind, NodeKind::Object(_))
    }

    /// `true` for an array node.
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self.kind, NodeKind::Array(_))
    }

    /// `true` for a `null` node.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self.kind, NodeKind::Null)
    }

    /// `true` for either boolean node.
    #[must_use]
    pub fn is_bool(&self) -> bool {
        matches!(self.kind, NodeKind::Bool(_))
    }

    /// `true` for a string node.
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self.kind, NodeKind::String(_))
    }

    /// `true` for the `Zero`, `Number`, and `Decimal` tags.
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Zero | NodeKind::Number(_) | NodeKind::Decimal(_)
        )
    }

    /// The containing node, if this node has been attached to one.
    #[must_use]
    pub fn parent(&self) -> Option<&'a Node<'a>> {
        self.parent.get()
    }

    /// The object payload of an object node.
    #[must_use]
    pub fn as_object(&self) -> Option<&Object<'a>> {
        match &self.kind {
            NodeKind::Object(o) => Some(o),
            _ => None,
        }
    }

    /// The array payload of an array node.
    #[must_use]
    pub fn as_array(&self) -> Option<&Array<'a>> {
        match &self.kind {
            NodeKind::Array(a) => Some(a),
            _ => None,
        }
    }

    /// The parse failure carried by an error node.
    #[must_use]
    pub fn parse_error(&self) -> Option<ParseError<'a>> {
        match &self.kind {
            NodeKind::Error(e) => Some(*e),
            _ => None,
        }
    }

    /// The textual payload of a scalar: the encoded body for strings, the
    /// literal text for numbers, and the fixed literals for booleans and
    /// zero. `None` for null, containers, and error nodes.
    #[must_use]
    pub fn scalar_view(&self) -> Option<&'a BStr> {
        match &self.kind {
            NodeKind::String(s) | NodeKind::Number(s) | NodeKind::Decimal(s) => Some(*s),
            NodeKind::Bool(true) => Some(BStr::new("true")),
            NodeKind::Bool(false) => Some(BStr::new("false")),
            NodeKind::Zero => Some(BStr::new("0")),
            _ => None,
        }
    }

    /// The decoded form of the scalar payload, with escapes resolved on
    /// demand. Borrows the stored bytes when no escape is present.
    #[must_use]
    pub fn decoded(&self) -> Option<Cow<'a, [u8]>> {
        self.scalar_view().map(|v| escape::decode(v.as_ref()))
    }

    // --------------------------------------------------------------------
    // Extractors
    // --------------------------------------------------------------------

    scalar_conversions! {
        try_to_i32 / to_i32 -> i32;
        try_to_u32 / to_u32 -> u32;
        try_to_i64 / to_i64 -> i64;
        try_to_u64 / to_u64 -> u64;
        try_to_f32 / to_f32 -> f32;
        try_to_f64 / to_f64 -> f64;
    }

    /// The scalar view under the boolean policy of
    /// [`convert::try_to_bool`], or `None`.
    #[must_use]
    pub fn try_to_bool(&self) -> Option<bool> {
        convert::try_to_bool(self.scalar_view()?)
    }

    /// The scalar view under the boolean policy of [`convert::to_bool`].
    #[must_use]
    pub fn to_bool(&self, default: bool) -> bool {
        self.try_to_bool().unwrap_or(default)
    }

    /// An array node becomes its elements' decoded strings (non-scalar
    /// elements coerce to the empty string); a scalar becomes a
    /// single-element vector; anything else is empty.
    #[must_use]
    pub fn string_array(&self) -> Vec<Cow<'a, [u8]>> {
        if let Some(a) = self.as_array() {
            a.iter()
                .map(|e| e.value().decoded().unwrap_or_default())
                .collect()
        } else if let Some(one) = self.decoded() {
            vec![one]
        } else {
            Vec::new()
        }
    }

    /// An array node becomes its elements as floats (non-numeric elements
    /// coerce to 0.0); a scalar becomes a single-element vector; anything
    /// else is empty.
    #[must_use]
    pub fn float_array(&self) -> Vec<f64> {
        if let Some(a) = self.as_array() {
            a.iter().map(|e| e.value().to_f64(0.0)).collect()
        } else if self.scalar_view().is_some() {
            vec![self.to_f64(0.0)]
        } else {
            Vec::new()
        }
    }
}

impl std::fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            NodeKind::Error(e) => f.debug_tuple("Error").field(e).finish(),
            NodeKind::Object(o) => f.debug_tuple("Object").field(&o.len()).finish(),
            NodeKind::Array(a) => f.debug_tuple("Array").field(&a.len()).finish(),
            NodeKind::Null => f.write_str("Null"),
            NodeKind::String(s) => f.debug_tuple("String").field(s).finish(),
            NodeKind::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            NodeKind::Zero => f.write_str("Zero"),
            NodeKind::Number(s) => f.debug_tuple("Number").field(s).finish(),
            NodeKind::Decimal(s) => f.debug_tuple("Decimal").field(s).finish(),
        }
    }
}
