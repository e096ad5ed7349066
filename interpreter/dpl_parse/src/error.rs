//! Parse error type.

use std::fmt;

use dpl_ir::Span;

/// A parse error: what the parser expected, what it found, and where.
///
/// The parser halts on the first mismatch; there is no recovery.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub span: Span,
    pub expected: String,
    pub found: String,
}

impl ParseError {
    #[cold]
    pub fn new(span: Span, expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self {
            span,
            expected: expected.into(),
            found: found.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "expected {}, found {} at {}",
            self.expected, self.found, self.span
        )
    }
}

impl std::error::Error for ParseError {}
