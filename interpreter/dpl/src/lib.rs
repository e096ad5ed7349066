//! dpl - a small dynamically-typed scripting language.
//!
//! The host-facing surface of the interpreter. One [`exec`] call runs the
//! full pipeline (lex → parse → evaluate) synchronously against a fresh
//! global scope, reporting output and chart data through the two-callback
//! [`Host`] bridge. On any failure exactly one diagnostic line goes
//! through the output callback and the run stops.
//!
//! ```no_run
//! let result = dpl::exec_with(
//!     "println(\"hello\");",
//!     |chunk| print!("{chunk}"),
//!     |command| println!("{:?}", command.chart),
//! );
//! assert!(result.is_ok());
//! ```

mod json;

use std::fmt;

use dpl_ir::StringInterner;

pub use dpl_eval::{
    BufferHost, CallbackHost, DrawCommand, EvalError, EvalErrorKind, Host, NullHost, Value,
    DEFAULT_MAX_CALL_DEPTH, DEFAULT_STEP_BUDGET,
};
use dpl_eval::Interpreter;
pub use dpl_lexer::LexError;
pub use dpl_parse::ParseError;
pub use json::{draw_to_json, value_to_json};

/// Failure from any pipeline stage.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    Lex(LexError),
    Parse(ParseError),
    Eval(EvalError),
}

impl fmt::Display for Error {
    /// One diagnostic line: stage, message, and source position when
    /// available.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Lex(e) => write!(f, "lex error: {e}"),
            Error::Parse(e) => write!(f, "parse error: {e}"),
            Error::Eval(e) => write!(f, "runtime error: {e}"),
        }
    }
}

impl std::error::Error for Error {}

/// Per-run resource limits.
#[derive(Clone, Copy, Debug)]
pub struct ExecOptions {
    /// Evaluation step quota.
    pub step_budget: u64,
    /// Ceiling on nested call frames.
    pub max_call_depth: usize,
}

impl Default for ExecOptions {
    fn default() -> Self {
        ExecOptions {
            step_budget: DEFAULT_STEP_BUDGET,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

/// Run the pipeline without diagnostic forwarding.
///
/// Lower-level than [`exec`]: errors are returned, not sent through the
/// output callback.
pub fn run(source: &str, host: &mut dyn Host) -> Result<Value, Error> {
    run_with(source, host, ExecOptions::default())
}

/// [`run`] with explicit resource limits.
pub fn run_with(
    source: &str,
    host: &mut dyn Host,
    options: ExecOptions,
) -> Result<Value, Error> {
    let interner = StringInterner::new();
    let tokens = dpl_lexer::lex(source, &interner).map_err(Error::Lex)?;
    tracing::debug!(tokens = tokens.len(), "lexed");
    let program = dpl_parse::parse(&tokens, &interner).map_err(Error::Parse)?;
    Interpreter::with_limits(
        &interner,
        &program.arena,
        host,
        options.step_budget,
        options.max_call_depth,
    )
    .run(program.root)
    .map_err(Error::Eval)
}

/// Execute one dpl program against a host.
///
/// Runs synchronously to completion, to an error, or until the execution
/// budget aborts the run. On failure, formats one diagnostic line and
/// sends it through the host's output callback before returning; each call
/// starts a brand-new global scope.
pub fn exec(source: &str, host: &mut dyn Host) -> Result<Value, Error> {
    exec_opts(source, host, ExecOptions::default())
}

/// [`exec`] with explicit resource limits.
pub fn exec_opts(
    source: &str,
    host: &mut dyn Host,
    options: ExecOptions,
) -> Result<Value, Error> {
    let result = run_with(source, host, options);
    if let Err(ref error) = result {
        host.output(&error.to_string());
    }
    result
}

/// [`exec`] over two plain closures instead of a [`Host`] value.
pub fn exec_with(
    source: &str,
    on_output: impl FnMut(&str),
    on_draw: impl FnMut(DrawCommand),
) -> Result<Value, Error> {
    let mut host = CallbackHost::new(on_output, on_draw);
    exec(source, &mut host)
}
