use bstr::{BStr, ByteSlice};
use thiserror::Error;

/// Why a parse failed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxError {
    /// A byte that cannot start or continue any production.
    #[error("invalid character")]
    InvalidCharacter,
    /// Input ended inside an incomplete document.
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
    /// A string with no closing quote.
    #[error("unterminated string")]
    UnterminatedString,
    /// A number with a redundant leading zero.
    #[error("leading zero in number")]
    LeadingZero,
    /// A number body that stops mid-production.
    #[error("malformed number")]
    MalformedNumber,
    /// An object needed a quoted key.
    #[error("expected object key")]
    ExpectedKey,
    /// An object key without its `:`.
    #[error("expected ':'")]
    ExpectedColon,
    /// A container needed `,` or its closing bracket.
    #[error("expected ',' or a closing bracket")]
    ExpectedCommaOrClose,
    /// A UTF-8 byte order mark prefixing the document.
    #[error("byte order mark")]
    ByteOrderMark,
}

/// A parse failure, carried by the error node returned from a failed
/// parse. `offset` is the first byte not consumed by a successful
/// production.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseError<'a> {
    pub(crate) src: &'a BStr,
    pub(crate) at: usize,
    pub(crate) reason: SyntaxError,
}

impl ParseError<'_> {
    /// Byte offset of the failure within the parsed source.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.at
    }

    /// The failure reason.
    #[must_use]
    pub fn reason(&self) -> SyntaxError {
        self.reason
    }

    /// One-based row and column of the failure.
    ///
    /// Rows count newlines in the source prefix; a backslash makes the
    /// walk skip two bytes, which approximates ignoring escaped newlines
    /// inside string literals (and over-skips outside them — kept as
    /// observed behavior).
    #[must_use]
    pub fn row_column(&self) -> (usize, usize) {
        let src = self.src.as_bytes();
        let end = self.at.min(src.len());
        let mut row = 1;
        let mut col = 1;
        let mut i = 0;
        while i < end {
            match src[i] {
                b'\n' => {
                    row += 1;
                    col = 1;
                    i += 1;
                }
                b'\\' => {
                    col += 2;
                    i += 2;
                }
                _ => {
                    col += 1;
                    i += 1;
                }
            }
        }
        (row, col)
    }
}

impl std::fmt::Display for ParseError<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (row, col) = self.row_column();
        write!(
            f,
            "Error at row {row}, column: {col} ({} bytes into json)",
            self.at
        )
    }
}

impl std::error::Error for ParseError<'_> {}
