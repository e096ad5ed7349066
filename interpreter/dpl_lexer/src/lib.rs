//! Lexer for dpl using logos with string interning.
//!
//! Produces a [`TokenList`] ending in `Eof`, or the first [`LexError`].
//! Identifiers and string contents may contain non-ASCII text; strings are
//! double-quoted, may span lines, and have no escape sequences.

mod lex_error;

pub use lex_error::{LexError, LexErrorKind};

use logos::Logos;

use dpl_ir::{Span, StringInterner, Token, TokenKind, TokenList};

/// Raw token from logos (before interning).
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"\s+")]
enum RawToken {
    #[token("if")]
    If,
    #[token("elif")]
    Elif,
    #[token("else")]
    Else,
    #[token("for")]
    For,
    #[token("in")]
    In,
    #[token("return")]
    Return,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,

    #[token("and")]
    And,
    #[token("or")]
    Or,
    #[token("not")]
    Not,

    #[token("+")]
    Plus,
    #[token("->")]
    Arrow,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("||")]
    PipePipe,
    #[token("==")]
    EqEq,
    #[token("=")]
    Eq,
    #[token("!=")]
    NotEq,
    #[token("<=")]
    LtEq,
    #[token("<")]
    Lt,
    #[token(">=")]
    GtEq,
    #[token(">")]
    Gt,
    #[token(":=")]
    ColonEq,
    #[token(":")]
    Colon,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,

    // Number literals: 123, 123.45, 123., .45 — no exponent form.
    #[regex(r"[0-9]+\.[0-9]*", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"\.[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),

    // Bare dot, only reachable when not starting a number.
    #[token(".")]
    Dot,

    // String literal: any characters except `"`, newlines included.
    #[regex(r#""[^"]*""#)]
    String,

    // Identifier: Unicode letters, digits, underscores.
    #[regex(r"[\p{L}_][\p{L}\p{N}_]*")]
    Ident,
}

/// Lex source text into a [`TokenList`].
///
/// Stops at the first unrecognized character or unterminated string and
/// reports it as a [`LexError`]; on success the stream ends with `Eof`.
pub fn lex(source: &str, interner: &StringInterner) -> Result<TokenList, LexError> {
    let mut result = TokenList::new();
    let mut logos = RawToken::lexer(source);

    while let Some(token_result) = logos.next() {
        let span = Span::from_range(logos.span());
        let slice = logos.slice();

        match token_result {
            Ok(raw) => {
                let kind = convert_token(raw, slice, interner);
                result.push(Token::new(kind, span));
            }
            Err(()) => return Err(lex_failure(source, span)),
        }
    }

    let eof_pos = u32::try_from(source.len())
        .unwrap_or_else(|_| panic!("source exceeds {} bytes", u32::MAX));
    result.push(Token::new(TokenKind::Eof, Span::point(eof_pos)));

    Ok(result)
}

/// Convert a raw token to a [`TokenKind`], interning identifier and string
/// payloads.
fn convert_token(raw: RawToken, slice: &str, interner: &StringInterner) -> TokenKind {
    match raw {
        RawToken::If => TokenKind::If,
        RawToken::Elif => TokenKind::Elif,
        RawToken::Else => TokenKind::Else,
        RawToken::For => TokenKind::For,
        RawToken::In => TokenKind::In,
        RawToken::Return => TokenKind::Return,
        RawToken::True => TokenKind::True,
        RawToken::False => TokenKind::False,
        RawToken::Null => TokenKind::Null,
        RawToken::And => TokenKind::And,
        RawToken::Or => TokenKind::Or,
        RawToken::Not => TokenKind::Not,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Percent => TokenKind::Percent,
        RawToken::PipePipe => TokenKind::PipePipe,
        RawToken::EqEq => TokenKind::EqEq,
        RawToken::Eq => TokenKind::Eq,
        RawToken::NotEq => TokenKind::NotEq,
        RawToken::LtEq => TokenKind::LtEq,
        RawToken::Lt => TokenKind::Lt,
        RawToken::GtEq => TokenKind::GtEq,
        RawToken::Gt => TokenKind::Gt,
        RawToken::ColonEq => TokenKind::ColonEq,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Arrow => TokenKind::Arrow,
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Dot => TokenKind::Dot,
        RawToken::Number(n) => TokenKind::Number(n.to_bits()),
        RawToken::String => {
            // Strip the quotes; no escape processing.
            let content = &slice[1..slice.len() - 1];
            TokenKind::Str(interner.intern(content))
        }
        RawToken::Ident => TokenKind::Ident(interner.intern(slice)),
    }
}

/// Classify a logos failure: an opening quote that never closes is an
/// unterminated string (spanning to end of input), anything else is an
/// unexpected character.
#[cold]
fn lex_failure(source: &str, span: Span) -> LexError {
    let rest = &source[span.start as usize..];
    if rest.starts_with('"') {
        let end = u32::try_from(source.len())
            .unwrap_or_else(|_| panic!("source exceeds {} bytes", u32::MAX));
        return LexError::unterminated_string(Span::new(span.start, end));
    }
    let ch = rest.chars().next().unwrap_or('\u{FFFD}');
    LexError::unexpected_character(span, ch)
}

#[cfg(test)]
mod tests;
