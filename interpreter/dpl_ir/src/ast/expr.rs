//! Expression nodes.
//!
//! All children are arena indices, not boxes; variant payloads stay small
//! so `ExprKind` remains `Copy`.

use std::fmt;

use super::operators::{BinaryOp, UnaryOp};
use crate::{BranchRange, EntryRange, ExprId, ExprRange, Name, NameRange, Span};

/// Expression node.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {:?}", self.kind, self.span)
    }
}

/// Expression variants.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ExprKind {
    /// Numeric literal: 42, 2.5, .5 (stored as bits for Eq/Hash).
    Number(u64),

    /// String literal (interned).
    Str(Name),

    /// Boolean literal.
    Bool(bool),

    /// Null literal.
    Null,

    /// Variable reference.
    Ident(Name),

    /// Array literal: `[a, b, c]`.
    Array(ExprRange),

    /// Map literal: `{k: v, ...}`; keys are expressions evaluating to strings.
    Map(EntryRange),

    /// Declaration: `name := value`. Creates a binding in the current scope.
    Declare { name: Name, value: ExprId },

    /// Assignment: `name = value`. Mutates the nearest enclosing binding.
    Assign { name: Name, value: ExprId },

    /// Binary operation.
    Binary {
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
    },

    /// Unary operation.
    Unary { op: UnaryOp, operand: ExprId },

    /// Index access: `target[index]`.
    Index { target: ExprId, index: ExprId },

    /// Call: `callee(args...)`.
    Call { callee: ExprId, args: ExprRange },

    /// Function literal: `(params) -> { body }`. Body is a `Block`.
    Function { params: NameRange, body: ExprId },

    /// `if`/`elif`/`else` chain. Each branch is a `(condition, block)` pair;
    /// `else_block` is `ExprId::INVALID` when absent.
    If {
        branches: BranchRange,
        else_block: ExprId,
    },

    /// `for binding in iter { body }` / `for binding, extra in iter { body }`.
    /// `extra` is `Name::EMPTY` for the single-binding form.
    For {
        binding: Name,
        extra: Name,
        iter: ExprId,
        body: ExprId,
    },

    /// Statement sequence: `{ stmt; stmt; }`. Evaluates to the last
    /// statement's value, Null when empty.
    Block(ExprRange),

    /// `return expr` — valid only inside a function body.
    Return(ExprId),
}

/// One `(condition, block)` pair of an `if`/`elif` chain.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Branch {
    pub cond: ExprId,
    pub body: ExprId,
}

/// One `key: value` entry of a map literal.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct MapEntry {
    pub key: ExprId,
    pub value: ExprId,
}
