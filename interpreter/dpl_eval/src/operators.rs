//! Binary operator evaluation.
//!
//! Every pairing is matched exhaustively; there is no implicit coercion.
//! `and`/`or` are included for completeness over already-evaluated
//! operands — the interpreter short-circuits before reaching here.

use dpl_ir::BinaryOp;

use crate::errors::{binary_type_mismatch, division_by_zero, EvalError};
use crate::value::Value;

/// Evaluate a binary operation over two values.
pub fn evaluate_binary(lhs: &Value, rhs: &Value, op: BinaryOp) -> Result<Value, EvalError> {
    match op {
        BinaryOp::Add => match (lhs, rhs) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
            (Value::Str(a), Value::Str(b)) => {
                Ok(Value::string(format!("{}{}", a.as_str(), b.as_str())))
            }
            _ => Err(binary_type_mismatch(op, lhs, rhs)),
        },

        BinaryOp::Sub => numeric(lhs, rhs, op, |a, b| a - b),
        BinaryOp::Mul => numeric(lhs, rhs, op, |a, b| a * b),

        BinaryOp::Div => match (lhs, rhs) {
            (Value::Number(_), Value::Number(b)) if *b == 0.0 => Err(division_by_zero()),
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a / b)),
            _ => Err(binary_type_mismatch(op, lhs, rhs)),
        },

        BinaryOp::Mod => match (lhs, rhs) {
            (Value::Number(_), Value::Number(b)) if *b == 0.0 => Err(division_by_zero()),
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a % b)),
            _ => Err(binary_type_mismatch(op, lhs, rhs)),
        },

        // `||` concatenates display renderings of any kinds.
        BinaryOp::Concat => Ok(Value::string(format!(
            "{}{}",
            lhs.display(),
            rhs.display()
        ))),

        BinaryOp::Eq => equality(lhs, rhs, op).map(Value::Bool),
        BinaryOp::NotEq => equality(lhs, rhs, op).map(|eq| Value::Bool(!eq)),

        BinaryOp::Lt => ordering(lhs, rhs, op, |o| o == std::cmp::Ordering::Less),
        BinaryOp::Gt => ordering(lhs, rhs, op, |o| o == std::cmp::Ordering::Greater),
        BinaryOp::LtEq => ordering(lhs, rhs, op, |o| o != std::cmp::Ordering::Greater),
        BinaryOp::GtEq => ordering(lhs, rhs, op, |o| o != std::cmp::Ordering::Less),

        // Non-short-circuit forms over evaluated operands; the interpreter
        // normally decides these before evaluating the right side.
        BinaryOp::And => Ok(Value::Bool(lhs.is_truthy() && rhs.is_truthy())),
        BinaryOp::Or => Ok(Value::Bool(lhs.is_truthy() || rhs.is_truthy())),
    }
}

fn numeric(
    lhs: &Value,
    rhs: &Value,
    op: BinaryOp,
    f: impl FnOnce(f64, f64) -> f64,
) -> Result<Value, EvalError> {
    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(f(*a, *b))),
        _ => Err(binary_type_mismatch(op, lhs, rhs)),
    }
}

/// Structural equality, defined only between values of the same kind.
fn equality(lhs: &Value, rhs: &Value, op: BinaryOp) -> Result<bool, EvalError> {
    if std::mem::discriminant(lhs) != std::mem::discriminant(rhs) {
        return Err(binary_type_mismatch(op, lhs, rhs));
    }
    Ok(lhs == rhs)
}

/// Ordering, defined for number-number and string-string only.
fn ordering(
    lhs: &Value,
    rhs: &Value,
    op: BinaryOp,
    f: impl FnOnce(std::cmp::Ordering) -> bool,
) -> Result<Value, EvalError> {
    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => match a.partial_cmp(b) {
            Some(o) => Ok(Value::Bool(f(o))),
            // NaN comparisons are false in every direction.
            None => Ok(Value::Bool(false)),
        },
        (Value::Str(a), Value::Str(b)) => Ok(Value::Bool(f(a.as_str().cmp(b.as_str())))),
        _ => Err(binary_type_mismatch(op, lhs, rhs)),
    }
}
