//! Shape-tolerant access into generic JSON trees
//!
//! Every accessor returns `None` on a missing key or an unexpected shape
//! instead of failing, so post-processing passes can skip what they do not
//! recognise.

use serde_json::{Map, Value};

/// Walk `path` through nested objects and return the object found there
pub fn object_at_mut<'a>(value: &'a mut Value, path: &[&str]) -> Option<&'a mut Map<String, Value>> {
    descend(value, path)?.as_object_mut()
}

/// Walk `path` through nested objects and return the array found there
pub fn array_at_mut<'a>(value: &'a mut Value, path: &[&str]) -> Option<&'a mut Vec<Value>> {
    descend(value, path)?.as_array_mut()
}

fn descend<'a>(value: &'a mut Value, path: &[&str]) -> Option<&'a mut Value> {
    path.iter()
        .try_fold(value, |current, key| current.as_object_mut()?.get_mut(*key))
}

/// Describe the shape of a value for diagnostics
pub fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
