//! Textual value conversion.
//!
//! Scalars round-trip as their literal text, so turning them into numbers
//! or booleans is a separate, explicit step. The `try_to_*` functions
//! return `None` unless the *entire* input parses as the requested type
//! (overflow included); the `to_*` forms substitute a caller default.

use std::str;

macro_rules! numeric_conversions {
    ($($try_name:ident / $name:ident -> $ty:ty;)*) => {
        $(
            /// Parses the full byte string as the target type, or `None`.
            #[must_use]
            pub fn $try_name(s: &[u8]) -> Option<$ty> {
                str::from_utf8(s).ok()?.parse::<$ty>().ok()
            }

            /// Parses the full byte string, substituting `default` on any
            /// failure (bad syntax, partial parse, overflow).
            #[must_use]
            pub fn $name(s: &[u8], default: $ty) -> $ty {
                $try_name(s).unwrap_or(default)
            }
        )*
    };
}

numeric_conversions! {
    try_to_i32 / to_i32 -> i32;
    try_to_u32 / to_u32 -> u32;
    try_to_i64 / to_i64 -> i64;
    try_to_u64 / to_u64 -> u64;
    try_to_f32 / to_f32 -> f32;
    try_to_f64 / to_f64 -> f64;
}

/// Recognizes the case-insensitive truthy forms `true`/`yes`/`1` and falsy
/// forms `false`/`no`/`0`; anything else is `None`.
#[must_use]
pub fn try_to_bool(s: &[u8]) -> Option<bool> {
    if s.eq_ignore_ascii_case(b"true") || s.eq_ignore_ascii_case(b"yes") || s == b"1" {
        Some(true)
    } else if s.eq_ignore_ascii_case(b"false") || s.eq_ignore_ascii_case(b"no") || s == b"0" {
        Some(false)
    } else {
        None
    }
}

/// Boolean conversion with a default. `"0"` is false regardless of the
/// default; any other unrecognized input yields the default.
#[must_use]
pub fn to_bool(s: &[u8], default: bool) -> bool {
    try_to_bool(s).unwrap_or(default)
}
