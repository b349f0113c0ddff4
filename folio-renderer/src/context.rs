//! Template context — maps arbitrary JSON data onto a [`tera::Context`].

use serde_json::Value;

/// Variable name under which non-object data is exposed to templates.
pub const DATA_VAR: &str = "data";

/// Build a [`tera::Context`] from a JSON value.
///
/// Objects contribute each key as a top-level variable. Any other value
/// (string, number, array, null) is bound as `data`.
pub fn to_tera_context(data: &Value) -> tera::Context {
    let mut ctx = tera::Context::new();
    match data {
        Value::Object(map) => {
            for (key, value) in map {
                ctx.insert(key.as_str(), value);
            }
        }
        other => ctx.insert(DATA_VAR, other),
    }
    ctx
}
