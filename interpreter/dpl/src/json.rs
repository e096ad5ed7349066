//! JSON conversion for host-boundary data.
//!
//! Draw commands cross the bridge verbatim as values; embedders that speak
//! JSON (the CLI, the wasm playground) convert them here. Function values
//! have no JSON form and degrade to their display string.

use dpl_eval::{DrawCommand, Value};

/// Convert a runtime value to JSON.
pub fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Number(n) => serde_json::Number::from_f64(*n)
            .map_or(serde_json::Value::Null, serde_json::Value::Number),
        Value::Str(s) => serde_json::Value::String(s.as_str().to_owned()),
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Null => serde_json::Value::Null,
        Value::Array(items) => {
            serde_json::Value::Array(items.iter().map(value_to_json).collect())
        }
        Value::Map(map) => {
            let mut object = serde_json::Map::with_capacity(map.len());
            for (key, entry) in map.iter() {
                object.insert(key.to_owned(), value_to_json(entry));
            }
            serde_json::Value::Object(object)
        }
        Value::Function(_) | Value::Builtin(_) => {
            serde_json::Value::String(value.display())
        }
    }
}

/// Convert a draw command to a JSON object.
pub fn draw_to_json(command: &DrawCommand) -> serde_json::Value {
    let mut object = serde_json::Map::with_capacity(3);
    object.insert(
        "chart".to_owned(),
        serde_json::Value::String(command.chart.clone()),
    );
    object.insert("rows".to_owned(), value_to_json(&command.rows));
    object.insert("options".to_owned(), value_to_json(&command.options));
    serde_json::Value::Object(object)
}
