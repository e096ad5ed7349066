//! Tree-walking interpreter.
//!
//! Strict, eager evaluation over the expression arena. An [`Environment`]
//! is threaded through every step; scope-owning constructs (if branches,
//! loop iterations, function calls) derive children. Control transfer and
//! errors travel as [`ControlAction`](crate::ControlAction), unwound only
//! at function-call boundaries.

mod call;

use dpl_ir::{Expr, ExprArena, ExprId, ExprKind, Name, StringInterner};
use dpl_stack::ensure_sufficient_stack;

use crate::budget::{Budget, DEFAULT_MAX_CALL_DEPTH, DEFAULT_STEP_BUDGET};
use crate::environment::Environment;
use crate::errors::{
    index_out_of_bounds, index_type_mismatch, key_not_found, map_key_not_string, no_pair_iteration,
    non_integer_index, not_indexable, not_iterable, redeclared_variable, undefined_variable,
    ControlAction, EvalError, EvalResult,
};
use crate::host::Host;
use crate::operators::evaluate_binary;
use crate::unary_operators::evaluate_unary;
use crate::value::{FunctionValue, MapValue, Value};

/// Tree-walking interpreter for one run.
///
/// Owns the step budget and call-depth counter; borrows the arena,
/// interner, and host for the duration of the run.
pub struct Interpreter<'a> {
    pub(crate) interner: &'a StringInterner,
    pub(crate) arena: &'a ExprArena,
    pub(crate) host: &'a mut dyn Host,
    pub(crate) budget: Budget,
    pub(crate) call_depth: usize,
    pub(crate) max_call_depth: usize,
}

impl<'a> Interpreter<'a> {
    /// Create an interpreter with the default step budget and call-depth
    /// ceiling.
    pub fn new(
        interner: &'a StringInterner,
        arena: &'a ExprArena,
        host: &'a mut dyn Host,
    ) -> Self {
        Self::with_limits(interner, arena, host, DEFAULT_STEP_BUDGET, DEFAULT_MAX_CALL_DEPTH)
    }

    /// Create an interpreter with explicit limits.
    pub fn with_limits(
        interner: &'a StringInterner,
        arena: &'a ExprArena,
        host: &'a mut dyn Host,
        step_budget: u64,
        max_call_depth: usize,
    ) -> Self {
        Interpreter {
            interner,
            arena,
            host,
            budget: Budget::new(step_budget),
            call_depth: 0,
            max_call_depth,
        }
    }

    /// Run a program root in a fresh global scope with the builtins bound.
    ///
    /// Each run gets its own globals; nothing survives between runs.
    pub fn run(&mut self, root: ExprId) -> Result<Value, EvalError> {
        let globals = Environment::new();
        self.install_builtins(&globals);
        let result = self
            .eval(root, &globals)
            .map_err(ControlAction::into_eval_error);
        tracing::debug!(steps = self.budget.spent(), ok = result.is_ok(), "run finished");
        result
    }

    fn install_builtins(&self, globals: &Environment) {
        for builtin in crate::value::Builtin::ALL {
            let name = self.interner.intern(builtin.name());
            globals.define(name, Value::Builtin(builtin));
        }
    }

    /// Evaluate one expression.
    ///
    /// Spends one budget step, grows the stack if needed, and attaches the
    /// node's span to any error that surfaces without one.
    pub(crate) fn eval(&mut self, id: ExprId, env: &Environment) -> EvalResult {
        let expr = *self.arena.get(id);
        if let Err(e) = self.budget.tick() {
            return Err(ControlAction::from(e.with_span(expr.span)));
        }
        ensure_sufficient_stack(|| self.eval_expr(&expr, env))
            .map_err(|action| action.with_span_if_error(expr.span))
    }

    fn eval_expr(&mut self, expr: &Expr, env: &Environment) -> EvalResult {
        match expr.kind {
            ExprKind::Number(bits) => Ok(Value::Number(f64::from_bits(bits))),
            ExprKind::Str(name) => Ok(Value::string(self.interner.lookup(name))),
            ExprKind::Bool(b) => Ok(Value::Bool(b)),
            ExprKind::Null => Ok(Value::Null),

            ExprKind::Ident(name) => env
                .lookup(name)
                .ok_or_else(|| undefined_variable(self.interner.lookup(name)).into()),

            ExprKind::Array(range) => {
                let arena = self.arena;
                let mut items = Vec::with_capacity(range.len());
                for &element in arena.list(range) {
                    items.push(self.eval(element, env)?);
                }
                Ok(Value::array(items))
            }

            ExprKind::Map(range) => {
                let arena = self.arena;
                let mut map = MapValue::new();
                for entry in arena.entries(range) {
                    let key = self.eval(entry.key, env)?;
                    let Value::Str(key) = key else {
                        return Err(map_key_not_string(&key).into());
                    };
                    let value = self.eval(entry.value, env)?;
                    map.insert(key.as_str().to_owned(), value);
                }
                Ok(Value::map(map))
            }

            ExprKind::Declare { name, value } => {
                let value = self.eval(value, env)?;
                env.declare(name, value.clone()).map_err(|_| {
                    ControlAction::from(redeclared_variable(self.interner.lookup(name)))
                })?;
                Ok(value)
            }

            ExprKind::Assign { name, value } => {
                let value = self.eval(value, env)?;
                env.assign(name, value.clone()).map_err(|_| {
                    ControlAction::from(undefined_variable(self.interner.lookup(name)))
                })?;
                Ok(value)
            }

            ExprKind::Binary { op, lhs, rhs } => {
                use dpl_ir::BinaryOp;
                // `and`/`or` short-circuit: the right side is only
                // evaluated when the left side has not decided the result.
                match op {
                    BinaryOp::And => {
                        let lhs = self.eval(lhs, env)?;
                        if !lhs.is_truthy() {
                            return Ok(Value::Bool(false));
                        }
                        let rhs = self.eval(rhs, env)?;
                        Ok(Value::Bool(rhs.is_truthy()))
                    }
                    BinaryOp::Or => {
                        let lhs = self.eval(lhs, env)?;
                        if lhs.is_truthy() {
                            return Ok(Value::Bool(true));
                        }
                        let rhs = self.eval(rhs, env)?;
                        Ok(Value::Bool(rhs.is_truthy()))
                    }
                    _ => {
                        let lhs = self.eval(lhs, env)?;
                        let rhs = self.eval(rhs, env)?;
                        evaluate_binary(&lhs, &rhs, op).map_err(Into::into)
                    }
                }
            }

            ExprKind::Unary { op, operand } => {
                let operand = self.eval(operand, env)?;
                evaluate_unary(op, &operand).map_err(Into::into)
            }

            ExprKind::Index { target, index } => {
                let target = self.eval(target, env)?;
                let index = self.eval(index, env)?;
                eval_index(&target, &index).map_err(Into::into)
            }

            ExprKind::Call { callee, args } => self.eval_call(callee, args, env),

            ExprKind::Function { params, body } => Ok(Value::Function(FunctionValue::new(
                params,
                body,
                env.handle(),
            ))),

            ExprKind::If {
                branches,
                else_block,
            } => {
                let arena = self.arena;
                for branch in arena.branches(branches) {
                    let cond = self.eval(branch.cond, env)?;
                    if cond.is_truthy() {
                        let child = env.child();
                        return self.eval(branch.body, &child);
                    }
                }
                if else_block.is_valid() {
                    let child = env.child();
                    return self.eval(else_block, &child);
                }
                Ok(Value::Null)
            }

            ExprKind::For {
                binding,
                extra,
                iter,
                body,
            } => {
                let iterable = self.eval(iter, env)?;
                self.eval_for(binding, extra, &iterable, body, env)?;
                // Loops are statements, not value-producing.
                Ok(Value::Null)
            }

            ExprKind::Block(range) => {
                let arena = self.arena;
                let mut last = Value::Null;
                for &stmt in arena.list(range) {
                    last = self.eval(stmt, env)?;
                }
                Ok(last)
            }

            ExprKind::Return(value) => {
                let value = self.eval(value, env)?;
                Err(ControlAction::Return(value))
            }
        }
    }

    /// Run a loop body over an iterable. Each iteration gets a fresh child
    /// scope so loop-local declarations do not leak across iterations.
    fn eval_for(
        &mut self,
        binding: Name,
        extra: Name,
        iterable: &Value,
        body: ExprId,
        env: &Environment,
    ) -> Result<(), ControlAction> {
        let pair = extra != Name::EMPTY;

        match iterable {
            // `for i in n` walks the half-open range [0, trunc(n)).
            Value::Number(n) => {
                if pair {
                    return Err(no_pair_iteration(iterable).into());
                }
                let count = n.trunc();
                let mut i = 0.0f64;
                while i < count {
                    let child = env.child();
                    child.define(binding, Value::Number(i));
                    self.eval(body, &child)?;
                    i += 1.0;
                }
                Ok(())
            }

            // `for x in array` binds elements; `for i, x in array` adds the
            // index.
            Value::Array(items) => {
                for (index, element) in items.iter().enumerate() {
                    let child = env.child();
                    if pair {
                        child.define(binding, Value::Number(index_to_number(index)));
                        child.define(extra, element.clone());
                    } else {
                        child.define(binding, element.clone());
                    }
                    self.eval(body, &child)?;
                }
                Ok(())
            }

            // `for v in map` binds values in insertion order;
            // `for k, v in map` binds key and value.
            Value::Map(map) => {
                for (key, value) in map.iter() {
                    let child = env.child();
                    if pair {
                        child.define(binding, Value::string(key));
                        child.define(extra, value.clone());
                    } else {
                        child.define(binding, value.clone());
                    }
                    self.eval(body, &child)?;
                }
                Ok(())
            }

            other => Err(not_iterable(other).into()),
        }
    }
}

#[expect(
    clippy::cast_precision_loss,
    reason = "array lengths are far below 2^52"
)]
fn index_to_number(index: usize) -> f64 {
    index as f64
}

/// Index access: arrays and strings by integral number, maps by string key.
/// Failures are loud; a missing key never silently yields Null.
fn eval_index(target: &Value, index: &Value) -> Result<Value, EvalError> {
    match target {
        Value::Array(items) => {
            let i = integral_index(target, index)?;
            element_at(items.len(), i)
                .and_then(|idx| items.get(idx).cloned())
                .ok_or_else(|| index_out_of_bounds(i, items.len()))
        }
        Value::Str(s) => {
            let i = integral_index(target, index)?;
            let count = s.chars().count();
            element_at(count, i)
                .and_then(|idx| s.chars().nth(idx))
                .map(|c| Value::string(c.to_string()))
                .ok_or_else(|| index_out_of_bounds(i, count))
        }
        Value::Map(map) => match index {
            Value::Str(key) => map
                .get(key.as_str())
                .cloned()
                .ok_or_else(|| key_not_found(key.as_str())),
            other => Err(index_type_mismatch(target, other)),
        },
        other => Err(not_indexable(other)),
    }
}

/// Require an integral numeric index.
fn integral_index(target: &Value, index: &Value) -> Result<i64, EvalError> {
    match index {
        Value::Number(n) if n.is_finite() && n.fract() == 0.0 => Ok(number_to_index(*n)),
        Value::Number(n) => Err(non_integer_index(*n)),
        other => Err(index_type_mismatch(target, other)),
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "fract()==0 was checked and the as-cast saturates at i64 bounds"
)]
fn number_to_index(n: f64) -> i64 {
    n as i64
}

fn element_at(len: usize, index: i64) -> Option<usize> {
    let idx = usize::try_from(index).ok()?;
    (idx < len).then_some(idx)
}
