//! dpl IR - shared data model for the dpl interpreter.
//!
//! This crate provides the types every pipeline stage agrees on:
//!
//! - [`Span`] - byte-offset source locations
//! - [`Name`] / [`StringInterner`] - interned identifiers and string literals
//! - [`Token`] / [`TokenKind`] / [`TokenList`] - lexer output
//! - [`ast`] - the index-addressed expression arena ([`ExprArena`],
//!   [`ExprKind`], [`ExprId`] and friends)

pub mod ast;
mod expr_id;
mod interner;
mod name;
mod span;
mod token;

pub use ast::{Branch, BinaryOp, Expr, ExprArena, ExprKind, MapEntry, Program, UnaryOp};
pub use expr_id::{BranchRange, EntryRange, ExprId, ExprRange, NameRange};
pub use interner::StringInterner;
pub use name::Name;
pub use span::Span;
pub use token::{Token, TokenKind, TokenList};
