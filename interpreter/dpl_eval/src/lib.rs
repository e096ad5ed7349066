//! dpl Eval - tree-walking evaluator and host bridge for dpl.
//!
//! # Architecture
//!
//! - [`Value`]: dynamic values with factory-enforced heap sharing
//! - [`Environment`]: lexical scope chain; closures capture scope handles
//! - [`evaluate_binary`] / [`evaluate_unary`]: exhaustive operator dispatch
//! - [`Interpreter`]: the tree walk, with a step [`Budget`] and call-depth
//!   ceiling bounding runaway programs
//! - [`Host`]: the two-callback bridge (`output`, `draw`) to the embedder

mod budget;
mod environment;
pub mod errors;
mod host;
mod interpreter;
mod operators;
mod unary_operators;
mod value;

pub use budget::{Budget, DEFAULT_MAX_CALL_DEPTH, DEFAULT_STEP_BUDGET};
pub use environment::{BindError, Environment, LocalScope, Scope, ScopeHandle};
pub use errors::{ControlAction, EvalError, EvalErrorKind, EvalResult};
pub use host::{BufferHost, CallbackHost, DrawCommand, Host, NullHost};
pub use interpreter::Interpreter;
pub use operators::evaluate_binary;
pub use unary_operators::evaluate_unary;
pub use value::{Builtin, FunctionValue, Heap, MapValue, Value};

#[cfg(test)]
mod tests;
