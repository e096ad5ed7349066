//! Unary operator evaluation.

use dpl_ir::UnaryOp;

use crate::errors::{unary_type_mismatch, EvalError};
use crate::value::Value;

/// Evaluate a unary operation.
pub fn evaluate_unary(op: UnaryOp, operand: &Value) -> Result<Value, EvalError> {
    match op {
        UnaryOp::Neg => match operand {
            Value::Number(n) => Ok(Value::Number(-n)),
            _ => Err(unary_type_mismatch(op, operand)),
        },
        UnaryOp::Not => Ok(Value::Bool(!operand.is_truthy())),
    }
}
