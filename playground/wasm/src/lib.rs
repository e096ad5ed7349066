//! dpl Playground WASM Bindings
//!
//! Exposes the dpl interpreter to JavaScript for browser-based execution.
//! One [`run_dpl`] call runs a program and returns everything the page
//! needs as JSON: output chunks in order, draw commands, and the single
//! diagnostic line on failure.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use dpl::{draw_to_json, BufferHost};

/// Result of running dpl code, serialized as JSON for JavaScript.
#[derive(Serialize)]
pub struct RunResult {
    pub success: bool,
    /// Output-callback chunks, in order.
    pub chunks: Vec<String>,
    /// Draw commands as `{chart, rows, options}` objects, in order.
    pub draws: Vec<serde_json::Value>,
    pub error: Option<String>,
}

/// Initialize the WASM module (called once on load).
#[wasm_bindgen(start)]
pub fn init() {
    std::panic::set_hook(Box::new(|info| {
        web_sys_log(&info.to_string());
    }));
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console, js_name = log)]
    fn web_sys_log(s: &str);
}

/// Run dpl source and return the result as JSON.
///
/// The diagnostic line for a failed run is both the final chunk (as the
/// output callback saw it) and the `error` field.
#[wasm_bindgen]
pub fn run_dpl(source: &str) -> String {
    let result = run_dpl_internal(source);
    serde_json::to_string(&result).unwrap_or_else(|e| {
        format!(r#"{{"success":false,"chunks":[],"draws":[],"error":"serialization error: {e}"}}"#)
    })
}

fn run_dpl_internal(source: &str) -> RunResult {
    let mut host = BufferHost::new();
    let outcome = dpl::exec(source, &mut host);

    RunResult {
        success: outcome.is_ok(),
        chunks: host.chunks().to_vec(),
        draws: host.draws().iter().map(draw_to_json).collect(),
        error: outcome.err().map(|e| e.to_string()),
    }
}

/// Get version information.
#[wasm_bindgen]
pub fn version() -> String {
    "dpl 0.1.0".to_string()
}
