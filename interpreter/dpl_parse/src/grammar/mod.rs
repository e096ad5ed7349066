//! Grammar: statement-level constructions and list plumbing.
//!
//! Expression parsing lives in [`expr`]; this module owns the parser state
//! and everything that is a statement (`construction` in the grammar):
//! `return`, `for`, the `if`/`elif`/`else` chain, and plain expressions.

mod expr;

use dpl_ir::{
    Branch, Expr, ExprArena, ExprId, ExprKind, Name, Program, Span, StringInterner, TokenKind,
    TokenList,
};

use crate::{Cursor, ParseError};

/// Recursive-descent parser building an [`ExprArena`].
pub struct Parser<'a> {
    pub(crate) cursor: Cursor<'a>,
    pub(crate) arena: ExprArena,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a TokenList, interner: &'a StringInterner) -> Self {
        Parser {
            cursor: Cursor::new(tokens, interner),
            arena: ExprArena::new(),
        }
    }

    pub(crate) fn alloc(&mut self, kind: ExprKind, span: Span) -> ExprId {
        self.arena.alloc(Expr::new(kind, span))
    }

    pub(crate) fn span_of(&self, id: ExprId) -> Span {
        self.arena.get(id).span
    }

    /// Parse the whole program: `;`-separated constructions up to `Eof`.
    pub fn program(&mut self) -> Result<ExprId, ParseError> {
        let start = self.cursor.current_span();
        let stmts = self.series(TokenKind::Semicolon, TokenKind::Eof, Self::construction)?;
        let end = self.cursor.current_span();
        let range = self.arena.alloc_list(&stmts);
        Ok(self.alloc(ExprKind::Block(range), start.merge(end)))
    }

    /// Parse one statement-level construction.
    pub(crate) fn construction(&mut self) -> Result<ExprId, ParseError> {
        match self.cursor.current_kind() {
            TokenKind::Return => self.return_stmt(),
            TokenKind::For => self.for_loop(),
            TokenKind::If => self.if_chain(),
            _ => self.expression(),
        }
    }

    fn return_stmt(&mut self) -> Result<ExprId, ParseError> {
        let start = self.cursor.current_span();
        self.cursor.advance();
        let value = self.expression()?;
        let span = start.merge(self.span_of(value));
        Ok(self.alloc(ExprKind::Return(value), span))
    }

    fn if_chain(&mut self) -> Result<ExprId, ParseError> {
        let start = self.cursor.current_span();
        let mut branches = Vec::new();

        loop {
            // At `if` on the first pass, `elif` afterwards.
            self.cursor.advance();
            let cond = self.expression()?;
            let body = self.braced_block()?;
            branches.push(Branch { cond, body });

            if !self.cursor.at(TokenKind::Elif) {
                break;
            }
        }

        let mut end = branches
            .last()
            .map_or(start, |branch| self.span_of(branch.body));
        let else_block = if self.cursor.eat(TokenKind::Else) {
            let block = self.braced_block()?;
            end = self.span_of(block);
            block
        } else {
            ExprId::INVALID
        };

        let range = self.arena.alloc_branches(&branches);
        Ok(self.alloc(
            ExprKind::If {
                branches: range,
                else_block,
            },
            start.merge(end),
        ))
    }

    fn for_loop(&mut self) -> Result<ExprId, ParseError> {
        let start = self.cursor.current_span();
        self.cursor.advance();

        let (binding, _) = self.cursor.expect_ident("a loop variable name")?;
        let extra = if self.cursor.eat(TokenKind::Comma) {
            let (name, _) = self.cursor.expect_ident("a loop variable name")?;
            name
        } else {
            Name::EMPTY
        };

        self.cursor.expect(TokenKind::In)?;
        let iter = self.expression()?;
        let body = self.braced_block()?;
        let span = start.merge(self.span_of(body));
        Ok(self.alloc(
            ExprKind::For {
                binding,
                extra,
                iter,
                body,
            },
            span,
        ))
    }

    /// Parse `{ stmt; stmt; }` into a `Block`.
    pub(crate) fn braced_block(&mut self) -> Result<ExprId, ParseError> {
        let start = self.cursor.expect(TokenKind::LBrace)?;
        let stmts = self.series(TokenKind::Semicolon, TokenKind::RBrace, Self::construction)?;
        // `series` consumed the closing brace; its span is one token back,
        // so approximate the block span from the statements.
        let end = stmts
            .last()
            .map_or(start, |&id| self.span_of(id));
        let range = self.arena.alloc_list(&stmts);
        Ok(self.alloc(ExprKind::Block(range), start.merge(end)))
    }

    /// Parse a `sep`-separated list of items up to (and including) `stop`.
    ///
    /// A trailing separator before `stop` is allowed; an empty list is
    /// `stop` alone.
    pub(crate) fn series(
        &mut self,
        sep: TokenKind,
        stop: TokenKind,
        mut item: impl FnMut(&mut Self) -> Result<ExprId, ParseError>,
    ) -> Result<Vec<ExprId>, ParseError> {
        if self.cursor.eat(stop) {
            return Ok(Vec::new());
        }

        let mut items = Vec::new();
        loop {
            items.push(item(self)?);

            if self.cursor.eat(sep) {
                if self.cursor.eat(stop) {
                    return Ok(items);
                }
                continue;
            }
            break;
        }

        self.cursor.expect(stop)?;
        Ok(items)
    }
}

/// Parse a token stream into a [`Program`].
///
/// Halts and reports the first mismatch; no error recovery.
pub fn parse(tokens: &TokenList, interner: &StringInterner) -> Result<Program, ParseError> {
    let mut parser = Parser::new(tokens, interner);
    let root = parser.program()?;
    tracing::debug!(exprs = parser.arena.len(), "parsed program");
    Ok(Program {
        arena: parser.arena,
        root,
    })
}
