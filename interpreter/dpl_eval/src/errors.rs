//! Evaluation errors and control transfer.
//!
//! `EvalErrorKind` gives every failure a structured category; `#[cold]`
//! factory functions populate both the kind and the rendered message.
//! `return` is not an error: it travels as [`ControlAction::Return`] and is
//! unwound exactly at the innermost function-call boundary.

use std::fmt;

use dpl_ir::{BinaryOp, Span, UnaryOp};

use crate::value::Value;

/// Result of one evaluation step.
pub type EvalResult = Result<Value, ControlAction>;

/// Control transfer out of an evaluation step: either a `return` travelling
/// to its call frame, or an error aborting the run.
#[derive(Clone, Debug, PartialEq)]
pub enum ControlAction {
    /// `return value` — unwound at the function-call boundary.
    Return(Value),
    /// A runtime error — aborts the whole run.
    Error(EvalError),
}

impl ControlAction {
    /// Attach a span if this is an error without one; return signals pass
    /// through untouched.
    #[must_use]
    pub fn with_span_if_error(self, span: Span) -> Self {
        match self {
            ControlAction::Error(e) if e.span.is_none() => {
                ControlAction::Error(e.with_span(span))
            }
            other => other,
        }
    }

    /// Collapse into an error: a `return` that escaped every call frame is
    /// itself an error.
    pub fn into_eval_error(self) -> EvalError {
        match self {
            ControlAction::Error(e) => e,
            ControlAction::Return(_) => return_outside_function(),
        }
    }
}

impl From<EvalError> for ControlAction {
    fn from(e: EvalError) -> Self {
        ControlAction::Error(e)
    }
}

/// Structured error category.
#[derive(Clone, Debug, PartialEq)]
pub enum EvalErrorKind {
    UndefinedVariable { name: String },
    RedeclaredVariable { name: String },
    Arity { expected: usize, got: usize },
    BinaryType { op: BinaryOp, lhs: &'static str, rhs: &'static str },
    UnaryType { op: UnaryOp, operand: &'static str },
    ArgumentType {
        builtin: &'static str,
        expected: &'static str,
        got: &'static str,
    },
    MapKeyType { got: &'static str },
    NotCallable { kind: &'static str },
    NotIterable { kind: &'static str },
    NoPairIteration { kind: &'static str },
    NotIndexable { kind: &'static str },
    IndexType { kind: &'static str, index: &'static str },
    NonIntegerIndex { index: f64 },
    IndexOutOfBounds { index: i64, len: usize },
    KeyNotFound { key: String },
    DivisionByZero,
    ReturnOutsideFunction,
    RecursionLimit { depth: usize },
    BudgetExhausted { budget: u64 },
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UndefinedVariable { name } => write!(f, "undefined variable `{name}`"),
            Self::RedeclaredVariable { name } => {
                write!(f, "variable `{name}` is already declared in this scope")
            }
            Self::Arity { expected, got } => {
                let word = if *expected == 1 { "argument" } else { "arguments" };
                write!(f, "expected {expected} {word}, got {got}")
            }
            Self::BinaryType { op, lhs, rhs } => {
                write!(
                    f,
                    "operator `{}` cannot be applied to {lhs} and {rhs}",
                    op.as_symbol()
                )
            }
            Self::UnaryType { op, operand } => {
                write!(
                    f,
                    "unary operator `{}` cannot be applied to {operand}",
                    op.as_symbol()
                )
            }
            Self::ArgumentType {
                builtin,
                expected,
                got,
            } => write!(f, "{builtin} expects {expected}, got {got}"),
            Self::MapKeyType { got } => write!(f, "map key must be a string, got {got}"),
            Self::NotCallable { kind } => write!(f, "{kind} is not callable"),
            Self::NotIterable { kind } => write!(f, "{kind} is not iterable"),
            Self::NoPairIteration { kind } => {
                write!(f, "{kind} does not support two-variable iteration")
            }
            Self::NotIndexable { kind } => write!(f, "{kind} is not indexable"),
            Self::IndexType { kind, index } => {
                write!(f, "cannot index {kind} with {index}")
            }
            Self::NonIntegerIndex { index } => {
                write!(f, "index {index} is not an integer")
            }
            Self::IndexOutOfBounds { index, len } => {
                write!(f, "index {index} out of bounds (length {len})")
            }
            Self::KeyNotFound { key } => write!(f, "key `{key}` not found"),
            Self::DivisionByZero => write!(f, "division by zero"),
            Self::ReturnOutsideFunction => {
                write!(f, "return is only allowed inside a function")
            }
            Self::RecursionLimit { depth } => {
                write!(f, "maximum call depth exceeded (limit {depth})")
            }
            Self::BudgetExhausted { budget } => {
                write!(f, "execution budget of {budget} steps exhausted")
            }
        }
    }
}

/// Evaluation error: category, rendered message, and the source span where
/// it surfaced (attached by the evaluator at the nearest enclosing node).
#[derive(Clone, Debug, PartialEq)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    pub message: String,
    pub span: Option<Span>,
}

impl EvalError {
    fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        EvalError {
            kind,
            message,
            span: None,
        }
    }

    /// Attach a source span.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.span {
            Some(span) => write!(f, "{} at {span}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for EvalError {}

#[cold]
pub fn undefined_variable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedVariable {
        name: name.to_owned(),
    })
}

#[cold]
pub fn redeclared_variable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::RedeclaredVariable {
        name: name.to_owned(),
    })
}

#[cold]
pub fn wrong_arity(expected: usize, got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Arity { expected, got })
}

#[cold]
pub fn binary_type_mismatch(op: BinaryOp, lhs: &Value, rhs: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::BinaryType {
        op,
        lhs: lhs.type_name(),
        rhs: rhs.type_name(),
    })
}

#[cold]
pub fn unary_type_mismatch(op: UnaryOp, operand: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnaryType {
        op,
        operand: operand.type_name(),
    })
}

#[cold]
pub fn argument_type(builtin: &'static str, expected: &'static str, got: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ArgumentType {
        builtin,
        expected,
        got: got.type_name(),
    })
}

#[cold]
pub fn map_key_not_string(got: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::MapKeyType {
        got: got.type_name(),
    })
}

#[cold]
pub fn not_callable(value: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotCallable {
        kind: value.type_name(),
    })
}

#[cold]
pub fn not_iterable(value: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotIterable {
        kind: value.type_name(),
    })
}

#[cold]
pub fn no_pair_iteration(value: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NoPairIteration {
        kind: value.type_name(),
    })
}

#[cold]
pub fn not_indexable(value: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotIndexable {
        kind: value.type_name(),
    })
}

#[cold]
pub fn index_type_mismatch(target: &Value, index: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IndexType {
        kind: target.type_name(),
        index: index.type_name(),
    })
}

#[cold]
pub fn non_integer_index(index: f64) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NonIntegerIndex { index })
}

#[cold]
pub fn index_out_of_bounds(index: i64, len: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IndexOutOfBounds { index, len })
}

#[cold]
pub fn key_not_found(key: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::KeyNotFound {
        key: key.to_owned(),
    })
}

#[cold]
pub fn division_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::DivisionByZero)
}

#[cold]
pub fn return_outside_function() -> EvalError {
    EvalError::from_kind(EvalErrorKind::ReturnOutsideFunction)
}

#[cold]
pub fn recursion_limit(depth: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::RecursionLimit { depth })
}

#[cold]
pub fn budget_exhausted(budget: u64) -> EvalError {
    EvalError::from_kind(EvalErrorKind::BudgetExhausted { budget })
}
