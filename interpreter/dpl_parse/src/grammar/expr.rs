//! Expression grammar.
//!
//! Precedence ladder, loosest to tightest: declaration/assignment, `or`,
//! `and`, `not`, equality, relational, `||`, additive, multiplicative,
//! unary minus, call/index, primary.

use dpl_ir::{BinaryOp, ExprId, ExprKind, MapEntry, TokenKind, UnaryOp};
use dpl_stack::ensure_sufficient_stack;

use super::Parser;
use crate::ParseError;

impl Parser<'_> {
    /// Parse one expression.
    pub(crate) fn expression(&mut self) -> Result<ExprId, ParseError> {
        ensure_sufficient_stack(|| self.assignment())
    }

    /// `target := value` / `target = value` (right-associative), or the
    /// next-tighter level. The target must be a plain identifier; dpl has
    /// no indexed assignment.
    fn assignment(&mut self) -> Result<ExprId, ParseError> {
        let lhs = self.or_expr()?;

        let declaring = match self.cursor.current_kind() {
            TokenKind::ColonEq => true,
            TokenKind::Eq => false,
            _ => return Ok(lhs),
        };

        let ExprKind::Ident(name) = self.arena.get(lhs).kind else {
            return Err(self.cursor.error("an identifier before `:=` or `=`"));
        };
        self.cursor.advance();

        let value = self.assignment()?;
        let span = self.span_of(lhs).merge(self.span_of(value));
        let kind = if declaring {
            ExprKind::Declare { name, value }
        } else {
            ExprKind::Assign { name, value }
        };
        Ok(self.alloc(kind, span))
    }

    fn or_expr(&mut self) -> Result<ExprId, ParseError> {
        let mut lhs = self.and_expr()?;
        while self.cursor.eat(TokenKind::Or) {
            let rhs = self.and_expr()?;
            lhs = self.binary(BinaryOp::Or, lhs, rhs);
        }
        Ok(lhs)
    }

    fn and_expr(&mut self) -> Result<ExprId, ParseError> {
        let mut lhs = self.not_expr()?;
        while self.cursor.eat(TokenKind::And) {
            let rhs = self.not_expr()?;
            lhs = self.binary(BinaryOp::And, lhs, rhs);
        }
        Ok(lhs)
    }

    fn not_expr(&mut self) -> Result<ExprId, ParseError> {
        if self.cursor.at(TokenKind::Not) {
            let start = self.cursor.current_span();
            self.cursor.advance();
            let operand = self.not_expr()?;
            let span = start.merge(self.span_of(operand));
            return Ok(self.alloc(
                ExprKind::Unary {
                    op: UnaryOp::Not,
                    operand,
                },
                span,
            ));
        }
        self.equality()
    }

    fn equality(&mut self) -> Result<ExprId, ParseError> {
        let mut lhs = self.relational()?;
        loop {
            let op = match self.cursor.current_kind() {
                TokenKind::EqEq => BinaryOp::Eq,
                TokenKind::NotEq => BinaryOp::NotEq,
                _ => return Ok(lhs),
            };
            self.cursor.advance();
            let rhs = self.relational()?;
            lhs = self.binary(op, lhs, rhs);
        }
    }

    fn relational(&mut self) -> Result<ExprId, ParseError> {
        let mut lhs = self.concat()?;
        loop {
            let op = match self.cursor.current_kind() {
                TokenKind::Lt => BinaryOp::Lt,
                TokenKind::Gt => BinaryOp::Gt,
                TokenKind::LtEq => BinaryOp::LtEq,
                TokenKind::GtEq => BinaryOp::GtEq,
                _ => return Ok(lhs),
            };
            self.cursor.advance();
            let rhs = self.concat()?;
            lhs = self.binary(op, lhs, rhs);
        }
    }

    fn concat(&mut self) -> Result<ExprId, ParseError> {
        let mut lhs = self.additive()?;
        while self.cursor.eat(TokenKind::PipePipe) {
            let rhs = self.additive()?;
            lhs = self.binary(BinaryOp::Concat, lhs, rhs);
        }
        Ok(lhs)
    }

    fn additive(&mut self) -> Result<ExprId, ParseError> {
        let mut lhs = self.multiplicative()?;
        loop {
            let op = match self.cursor.current_kind() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.cursor.advance();
            let rhs = self.multiplicative()?;
            lhs = self.binary(op, lhs, rhs);
        }
    }

    fn multiplicative(&mut self) -> Result<ExprId, ParseError> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.cursor.current_kind() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Mod,
                _ => return Ok(lhs),
            };
            self.cursor.advance();
            let rhs = self.unary()?;
            lhs = self.binary(op, lhs, rhs);
        }
    }

    fn unary(&mut self) -> Result<ExprId, ParseError> {
        if self.cursor.at(TokenKind::Minus) {
            let start = self.cursor.current_span();
            self.cursor.advance();
            let operand = self.unary()?;
            let span = start.merge(self.span_of(operand));
            return Ok(self.alloc(
                ExprKind::Unary {
                    op: UnaryOp::Neg,
                    operand,
                },
                span,
            ));
        }
        self.postfix()
    }

    /// Chained calls and index accesses: `f(a)(b)[i]`.
    fn postfix(&mut self) -> Result<ExprId, ParseError> {
        let mut target = self.primary()?;

        loop {
            if self.cursor.at(TokenKind::LBracket) {
                self.cursor.advance();
                let index = self.expression()?;
                let end = self.cursor.expect(TokenKind::RBracket)?;
                let span = self.span_of(target).merge(end);
                target = self.alloc(ExprKind::Index { target, index }, span);
                continue;
            }

            if self.cursor.at(TokenKind::LParen) {
                self.cursor.advance();
                let args =
                    self.series(TokenKind::Comma, TokenKind::RParen, Self::expression)?;
                let range = self.arena.alloc_list(&args);
                let end = args
                    .last()
                    .map_or_else(|| self.span_of(target), |&id| self.span_of(id));
                let span = self.span_of(target).merge(end);
                target = self.alloc(
                    ExprKind::Call {
                        callee: target,
                        args: range,
                    },
                    span,
                );
                continue;
            }

            return Ok(target);
        }
    }

    fn primary(&mut self) -> Result<ExprId, ParseError> {
        let span = self.cursor.current_span();
        match self.cursor.current_kind() {
            TokenKind::Number(bits) => {
                self.cursor.advance();
                Ok(self.alloc(ExprKind::Number(bits), span))
            }
            TokenKind::Str(name) => {
                self.cursor.advance();
                Ok(self.alloc(ExprKind::Str(name), span))
            }
            TokenKind::Ident(name) => {
                self.cursor.advance();
                Ok(self.alloc(ExprKind::Ident(name), span))
            }
            TokenKind::True => {
                self.cursor.advance();
                Ok(self.alloc(ExprKind::Bool(true), span))
            }
            TokenKind::False => {
                self.cursor.advance();
                Ok(self.alloc(ExprKind::Bool(false), span))
            }
            TokenKind::Null => {
                self.cursor.advance();
                Ok(self.alloc(ExprKind::Null, span))
            }
            TokenKind::LBracket => self.array_literal(),
            TokenKind::LBrace => self.map_literal(),
            TokenKind::LParen => self.paren_or_function(),
            _ => Err(self.cursor.error("an expression")),
        }
    }

    fn array_literal(&mut self) -> Result<ExprId, ParseError> {
        let start = self.cursor.current_span();
        self.cursor.advance();
        let elements = self.series(TokenKind::Comma, TokenKind::RBracket, Self::expression)?;
        let end = elements
            .last()
            .map_or(start, |&id| self.span_of(id));
        let range = self.arena.alloc_list(&elements);
        Ok(self.alloc(ExprKind::Array(range), start.merge(end)))
    }

    /// `{ key: value, ... }` — keys are expressions evaluating to strings.
    fn map_literal(&mut self) -> Result<ExprId, ParseError> {
        let start = self.cursor.current_span();
        self.cursor.advance();

        let mut entries = Vec::new();
        if !self.cursor.eat(TokenKind::RBrace) {
            loop {
                let key = self.expression()?;
                self.cursor.expect(TokenKind::Colon)?;
                let value = self.expression()?;
                entries.push(MapEntry { key, value });

                if self.cursor.eat(TokenKind::Comma) {
                    if self.cursor.eat(TokenKind::RBrace) {
                        break;
                    }
                    continue;
                }
                self.cursor.expect(TokenKind::RBrace)?;
                break;
            }
        }

        let end = entries
            .last()
            .map_or(start, |entry| self.span_of(entry.value));
        let range = self.arena.alloc_entries(&entries);
        Ok(self.alloc(ExprKind::Map(range), start.merge(end)))
    }

    /// `( expr )` grouping, or `(params) -> { body }` function literal.
    fn paren_or_function(&mut self) -> Result<ExprId, ParseError> {
        let start = self.cursor.current_span();
        self.cursor.advance();
        let items = self.series(TokenKind::Comma, TokenKind::RParen, Self::expression)?;

        if self.cursor.at(TokenKind::Arrow) {
            self.cursor.advance();

            let mut params = Vec::with_capacity(items.len());
            for &item in &items {
                let ExprKind::Ident(name) = self.arena.get(item).kind else {
                    return Err(ParseError::new(
                        self.span_of(item),
                        "a parameter name",
                        "an expression",
                    ));
                };
                params.push(name);
            }

            let body = self.braced_block()?;
            let range = self.arena.alloc_names(&params);
            let span = start.merge(self.span_of(body));
            return Ok(self.alloc(
                ExprKind::Function {
                    params: range,
                    body,
                },
                span,
            ));
        }

        match items.as_slice() {
            [single] => Ok(*single),
            _ => Err(self.cursor.error("`->` after a parameter list")),
        }
    }

    fn binary(&mut self, op: BinaryOp, lhs: ExprId, rhs: ExprId) -> ExprId {
        let span = self.span_of(lhs).merge(self.span_of(rhs));
        self.alloc(ExprKind::Binary { op, lhs, rhs }, span)
    }
}
