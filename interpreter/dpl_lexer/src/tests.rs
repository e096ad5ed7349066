use pretty_assertions::assert_eq;

use dpl_ir::{StringInterner, TokenKind};

use crate::{lex, LexErrorKind};

fn kinds(source: &str) -> Vec<TokenKind> {
    let interner = StringInterner::new();
    let tokens = lex(source, &interner).unwrap_or_else(|e| panic!("lex failed: {e}"));
    tokens.iter().map(|t| t.kind).collect()
}

fn num(n: f64) -> TokenKind {
    TokenKind::Number(n.to_bits())
}

#[test]
fn empty_source_is_just_eof() {
    assert_eq!(kinds(""), vec![TokenKind::Eof]);
    assert_eq!(kinds("   \n\t  "), vec![TokenKind::Eof]);
}

#[test]
fn keywords_and_words() {
    assert_eq!(
        kinds("if elif else for in return true false null and or not"),
        vec![
            TokenKind::If,
            TokenKind::Elif,
            TokenKind::Else,
            TokenKind::For,
            TokenKind::In,
            TokenKind::Return,
            TokenKind::True,
            TokenKind::False,
            TokenKind::Null,
            TokenKind::And,
            TokenKind::Or,
            TokenKind::Not,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn operators_and_delimiters() {
    assert_eq!(
        kinds("+ - * / % || == != < > <= >= := = -> ( ) [ ] { } ; : , ."),
        vec![
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Percent,
            TokenKind::PipePipe,
            TokenKind::EqEq,
            TokenKind::NotEq,
            TokenKind::Lt,
            TokenKind::Gt,
            TokenKind::LtEq,
            TokenKind::GtEq,
            TokenKind::ColonEq,
            TokenKind::Eq,
            TokenKind::Arrow,
            TokenKind::LParen,
            TokenKind::RParen,
            TokenKind::LBracket,
            TokenKind::RBracket,
            TokenKind::LBrace,
            TokenKind::RBrace,
            TokenKind::Semicolon,
            TokenKind::Colon,
            TokenKind::Comma,
            TokenKind::Dot,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn compound_operators_are_not_split() {
    // `->` is an arrow, not minus + greater; `:=` is not colon + equals.
    let tokens = kinds("a->b");
    assert!(matches!(tokens[0], TokenKind::Ident(_)));
    assert_eq!(tokens[1], TokenKind::Arrow);
    assert!(matches!(tokens[2], TokenKind::Ident(_)));
    assert_eq!(kinds(":=")[0], TokenKind::ColonEq);
    assert_eq!(kinds("==")[0], TokenKind::EqEq);
}

#[test]
fn number_forms() {
    assert_eq!(
        kinds("2187 2.187 2187. .2187 0 0.5"),
        vec![
            num(2187.0),
            num(2.187),
            num(2187.0),
            num(0.2187),
            num(0.0),
            num(0.5),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn adjacent_number_and_dot() {
    // `1.` lexes as one number, not number-then-dot.
    assert_eq!(kinds("1."), vec![num(1.0), TokenKind::Eof]);
}

#[test]
fn string_literals() {
    let interner = StringInterner::new();
    let tokens = lex("\"hello\" \"\" \"много слов\"", &interner)
        .unwrap_or_else(|e| panic!("lex failed: {e}"));
    let texts: Vec<&str> = tokens
        .iter()
        .filter_map(|t| match t.kind {
            TokenKind::Str(name) => Some(interner.lookup(name)),
            _ => None,
        })
        .collect();
    assert_eq!(texts, vec!["hello", "", "много слов"]);
}

#[test]
fn strings_may_span_lines_and_have_no_escapes() {
    let interner = StringInterner::new();
    let tokens =
        lex("\"a\nb\\c\"", &interner).unwrap_or_else(|e| panic!("lex failed: {e}"));
    match tokens[0].kind {
        TokenKind::Str(name) => assert_eq!(interner.lookup(name), "a\nb\\c"),
        other => panic!("expected string, got {other:?}"),
    }
}

#[test]
fn unicode_identifiers() {
    let interner = StringInterner::new();
    let tokens = lex("счётчик := 0", &interner).unwrap_or_else(|e| panic!("lex failed: {e}"));
    match tokens[0].kind {
        TokenKind::Ident(name) => assert_eq!(interner.lookup(name), "счётчик"),
        other => panic!("expected identifier, got {other:?}"),
    }
    assert_eq!(tokens[1].kind, TokenKind::ColonEq);
}

#[test]
fn keywords_are_not_identifier_prefixes() {
    let interner = StringInterner::new();
    let tokens = lex("iffy formal nullable", &interner)
        .unwrap_or_else(|e| panic!("lex failed: {e}"));
    for token in tokens.iter().take(3) {
        assert!(
            matches!(token.kind, TokenKind::Ident(_)),
            "expected identifier, got {:?}",
            token.kind
        );
    }
}

#[test]
fn spans_are_byte_offsets() {
    let interner = StringInterner::new();
    let tokens = lex("ab + cd", &interner).unwrap_or_else(|e| panic!("lex failed: {e}"));
    assert_eq!((tokens[0].span.start, tokens[0].span.end), (0, 2));
    assert_eq!((tokens[1].span.start, tokens[1].span.end), (3, 4));
    assert_eq!((tokens[2].span.start, tokens[2].span.end), (5, 7));
}

#[test]
fn unexpected_character_fails() {
    let interner = StringInterner::new();
    let err = match lex("a @ b", &interner) {
        Err(e) => e,
        Ok(_) => panic!("expected lex error"),
    };
    assert_eq!(err.kind, LexErrorKind::UnexpectedCharacter { ch: '@' });
    assert_eq!(err.span.start, 2);
}

#[test]
fn lone_pipe_fails() {
    let interner = StringInterner::new();
    let err = match lex("a | b", &interner) {
        Err(e) => e,
        Ok(_) => panic!("expected lex error"),
    };
    assert_eq!(err.kind, LexErrorKind::UnexpectedCharacter { ch: '|' });
}

#[test]
fn unterminated_string_fails() {
    let interner = StringInterner::new();
    let err = match lex("x := \"oops", &interner) {
        Err(e) => e,
        Ok(_) => panic!("expected lex error"),
    };
    assert_eq!(err.kind, LexErrorKind::UnterminatedString);
    assert_eq!(err.span.start, 5);
}

#[test]
fn sample_program_lexes() {
    let source = "factorial := (n) -> {\n\tif n <= 1 {\n\t\treturn 1;\n\t};\n\treturn n * factorial(n-1);\n};";
    let interner = StringInterner::new();
    let tokens = lex(source, &interner).unwrap_or_else(|e| panic!("lex failed: {e}"));
    assert_eq!(tokens[tokens.len() - 1].kind, TokenKind::Eof);
    assert!(tokens.len() > 20);
}
