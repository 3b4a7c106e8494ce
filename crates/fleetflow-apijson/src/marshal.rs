//! Structural marshaling of typed models
//!
//! [`marshal_root`] encodes a whole model for create/replace calls.
//! [`marshal_for_update`] encodes only what changed between the prior state
//! and the desired state.

use crate::error::Result;
use serde::Serialize;
use serde_json::{Map, Value};

/// Convert a model into a generic tree
pub fn to_tree<T: Serialize + ?Sized>(model: &T) -> Result<Value> {
    Ok(serde_json::to_value(model)?)
}

/// Encode a whole model as a request body
pub fn marshal_root<T: Serialize + ?Sized>(model: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(&to_tree(model)?)?)
}

/// Encode the changes from `prior` to `desired` as a request body
pub fn marshal_for_update<T: Serialize + ?Sized>(desired: &T, prior: &T) -> Result<Vec<u8>> {
    let diff = diff_tree(&to_tree(desired)?, &to_tree(prior)?);
    tracing::debug!(
        "update diff carries {} top-level field(s)",
        diff.as_object().map(|m| m.len()).unwrap_or(0)
    );
    Ok(serde_json::to_vec(&diff)?)
}

/// Compute the update tree between two generic trees.
///
/// Objects are compared key by key:
///
/// - a key whose value changed carries the desired value
/// - nested objects are diffed recursively and dropped when nothing changed
/// - arrays and scalars are carried whole
/// - a key that disappeared (or became `null`) is carried as `null`
///
/// A non-object root is carried whole.
pub fn diff_tree(desired: &Value, prior: &Value) -> Value {
    match (desired, prior) {
        (Value::Object(desired), Value::Object(prior)) => Value::Object(diff_object(desired, prior)),
        _ => desired.clone(),
    }
}

fn diff_object(desired: &Map<String, Value>, prior: &Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::new();

    for (key, value) in desired {
        match prior.get(key) {
            Some(old) if old == value => {}
            Some(Value::Object(old)) => match value {
                Value::Object(new) => {
                    let nested = diff_object(new, old);
                    if !nested.is_empty() {
                        out.insert(key.clone(), Value::Object(nested));
                    }
                }
                _ => {
                    out.insert(key.clone(), value.clone());
                }
            },
            Some(_) => {
                out.insert(key.clone(), value.clone());
            }
            None if value.is_null() => {}
            None => {
                out.insert(key.clone(), value.clone());
            }
        }
    }

    for (key, old) in prior {
        if old.is_null() || desired.contains_key(key) {
            continue;
        }
        out.insert(key.clone(), Value::Null);
    }

    out
}
