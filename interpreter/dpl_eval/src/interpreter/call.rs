//! Function and builtin calls.

use smallvec::SmallVec;

use dpl_ir::{ExprId, ExprRange};

use crate::environment::Environment;
use crate::errors::{
    argument_type, not_callable, recursion_limit, wrong_arity, EvalError, EvalResult,
};
use crate::host::DrawCommand;
use crate::value::{Builtin, FunctionValue, Value};

use super::Interpreter;

impl Interpreter<'_> {
    pub(crate) fn eval_call(
        &mut self,
        callee: ExprId,
        args: ExprRange,
        env: &Environment,
    ) -> EvalResult {
        let callee = self.eval(callee, env)?;

        let arena = self.arena;
        let mut values: SmallVec<[Value; 8]> = SmallVec::with_capacity(args.len());
        for &arg in arena.list(args) {
            values.push(self.eval(arg, env)?);
        }

        match callee {
            Value::Function(f) => self.call_function(&f, &values),
            Value::Builtin(b) => self.call_builtin(b, &values).map_err(Into::into),
            other => Err(not_callable(&other).into()),
        }
    }

    /// Call a dpl function: exact arity, parameters bound positionally in a
    /// child of the captured scope, `return` unwound at this boundary.
    pub(crate) fn call_function(&mut self, f: &FunctionValue, args: &[Value]) -> EvalResult {
        if self.call_depth >= self.max_call_depth {
            return Err(recursion_limit(self.max_call_depth).into());
        }

        let params = self.arena.names(f.params);
        if params.len() != args.len() {
            return Err(wrong_arity(params.len(), args.len()).into());
        }

        let frame = Environment::from_handle(f.scope.clone()).child();
        for (&param, arg) in params.iter().zip(args) {
            frame.define(param, arg.clone());
        }

        self.call_depth += 1;
        tracing::trace!(depth = self.call_depth, "function call");
        let result = self.eval(f.body, &frame);
        self.call_depth -= 1;

        match result {
            // A return unwinds exactly to this frame and becomes the
            // call's value; a body that completes without one yields Null.
            Err(crate::ControlAction::Return(value)) => Ok(value),
            Ok(_) => Ok(Value::Null),
            other => other,
        }
    }

    fn call_builtin(&mut self, builtin: Builtin, args: &[Value]) -> Result<Value, EvalError> {
        match builtin {
            // One output chunk per call; no separators, no added newline.
            Builtin::Println => {
                let chunk: String = args.iter().map(Value::display).collect();
                self.host.output(&chunk);
                Ok(Value::Null)
            }

            // Returns a new array; the input is untouched.
            Builtin::Append => {
                let Some(first) = args.first() else {
                    return Err(wrong_arity(1, 0));
                };
                let Value::Array(items) = first else {
                    return Err(argument_type("append", "an array", first));
                };
                let mut next = items.as_slice().to_vec();
                next.extend_from_slice(&args[1..]);
                Ok(Value::array(next))
            }

            Builtin::Len => {
                let [value] = args else {
                    return Err(wrong_arity(1, args.len()));
                };
                let len = match value {
                    Value::Str(s) => s.chars().count(),
                    Value::Array(items) => items.len(),
                    Value::Map(map) => map.len(),
                    other => return Err(argument_type("len", "a string, array, or map", other)),
                };
                Ok(Value::Number(len_to_number(len)))
            }

            // Forward verbatim; chart semantics belong to the host.
            Builtin::Draw => {
                let [chart, rows, options] = args else {
                    return Err(wrong_arity(3, args.len()));
                };
                let Value::Str(tag) = chart else {
                    return Err(argument_type("draw", "a string chart tag", chart));
                };
                self.host.draw(DrawCommand {
                    chart: tag.as_str().to_owned(),
                    rows: rows.clone(),
                    options: options.clone(),
                });
                Ok(Value::Null)
            }
        }
    }
}

#[expect(
    clippy::cast_precision_loss,
    reason = "collection lengths are far below 2^52"
)]
fn len_to_number(len: usize) -> f64 {
    len as f64
}
