//! Lexer error types.

use std::fmt;

use dpl_ir::Span;

/// A lexical error: what went wrong and where.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LexError {
    pub span: Span,
    pub kind: LexErrorKind,
}

/// What kind of lexical error occurred.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LexErrorKind {
    /// A byte sequence no token rule recognizes.
    UnexpectedCharacter { ch: char },
    /// A string literal with no closing `"` before end of input.
    UnterminatedString,
}

impl LexError {
    /// Create an unexpected-character error.
    #[cold]
    pub fn unexpected_character(span: Span, ch: char) -> Self {
        Self {
            span,
            kind: LexErrorKind::UnexpectedCharacter { ch },
        }
    }

    /// Create an unterminated-string error.
    #[cold]
    pub fn unterminated_string(span: Span) -> Self {
        Self {
            span,
            kind: LexErrorKind::UnterminatedString,
        }
    }
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexErrorKind::UnexpectedCharacter { ch } => {
                write!(f, "unexpected character `{ch}`")
            }
            LexErrorKind::UnterminatedString => write!(f, "unterminated string literal"),
        }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.kind, self.span)
    }
}

impl std::error::Error for LexError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_span() {
        let err = LexError::unexpected_character(Span::new(3, 4), '@');
        assert_eq!(err.to_string(), "unexpected character `@` at 3..4");
    }

    #[test]
    fn unterminated_string_display() {
        let err = LexError::unterminated_string(Span::new(0, 4));
        assert_eq!(err.to_string(), "unterminated string literal at 0..4");
    }
}
