//! Parser for dpl.
//!
//! Recursive descent over a [`TokenList`](dpl_ir::TokenList) with explicit
//! precedence climbing, producing an index-addressed
//! [`Program`](dpl_ir::Program). Halts on the first mismatch with a
//! [`ParseError`] carrying expected/found descriptions and the source span.

mod cursor;
mod error;
mod grammar;

pub use cursor::Cursor;
pub use error::ParseError;
pub use grammar::{parse, Parser};
