//! Host bridge.
//!
//! The language core talks to its embedder through exactly two callbacks:
//! ordered text chunks and draw commands. The evaluator forwards draw data
//! verbatim; chart semantics belong entirely to the host.

use crate::value::Value;

/// A `draw(chartType, rows, options)` call, forwarded verbatim.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawCommand {
    /// Chart tag, e.g. `"line"` or `"bar"`.
    pub chart: String,
    /// Ordered sequence of records.
    pub rows: Value,
    /// Chart options (id field, value fields, title).
    pub options: Value,
}

/// The embedder's side of the bridge.
pub trait Host {
    /// Receive one output chunk. Order-preserving; called exactly once per
    /// `println`.
    fn output(&mut self, chunk: &str);

    /// Receive one draw command.
    fn draw(&mut self, command: DrawCommand);
}

/// Host that captures everything, for tests and result-style embeddings.
#[derive(Debug, Default)]
pub struct BufferHost {
    chunks: Vec<String>,
    draws: Vec<DrawCommand>,
}

impl BufferHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured chunks concatenated.
    pub fn output(&self) -> String {
        self.chunks.concat()
    }

    /// Captured chunks, one per `println` call.
    pub fn chunks(&self) -> &[String] {
        &self.chunks
    }

    /// Captured draw commands in order.
    pub fn draws(&self) -> &[DrawCommand] {
        &self.draws
    }
}

impl Host for BufferHost {
    fn output(&mut self, chunk: &str) {
        self.chunks.push(chunk.to_owned());
    }

    fn draw(&mut self, command: DrawCommand) {
        self.draws.push(command);
    }
}

/// Host adapting two closures, for callback-style embeddings.
pub struct CallbackHost<F, G>
where
    F: FnMut(&str),
    G: FnMut(DrawCommand),
{
    on_output: F,
    on_draw: G,
}

impl<F, G> CallbackHost<F, G>
where
    F: FnMut(&str),
    G: FnMut(DrawCommand),
{
    pub fn new(on_output: F, on_draw: G) -> Self {
        CallbackHost { on_output, on_draw }
    }
}

impl<F, G> Host for CallbackHost<F, G>
where
    F: FnMut(&str),
    G: FnMut(DrawCommand),
{
    fn output(&mut self, chunk: &str) {
        (self.on_output)(chunk);
    }

    fn draw(&mut self, command: DrawCommand) {
        (self.on_draw)(command);
    }
}

/// Host that discards everything.
#[derive(Debug, Default)]
pub struct NullHost;

impl Host for NullHost {
    fn output(&mut self, _chunk: &str) {}

    fn draw(&mut self, _command: DrawCommand) {}
}
