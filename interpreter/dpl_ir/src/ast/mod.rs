//! Abstract syntax tree: nodes, operators, and the expression arena.

mod arena;
mod expr;
mod operators;

pub use arena::{ExprArena, Program};
pub use expr::{Branch, Expr, ExprKind, MapEntry};
pub use operators::{BinaryOp, UnaryOp};
