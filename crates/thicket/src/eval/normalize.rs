//! Child list normalization

use crate::Value;

/// Flatten evaluated children into the list an element carries.
///
/// Arrays and fragments are spliced in place (recursively), and `false`,
/// `null` and `undefined` are dropped so `{cond && <X/>}` renders nothing
/// when `cond` is false. Everything else, including `true`, `0` and `""`,
/// is kept in order.
///
/// Normalization is associative: normalizing concatenated lists equals
/// concatenating normalized lists.
///
/// # Example
///
/// ```
/// use thicket::{normalize_children, Value};
///
/// let children = normalize_children(vec![
///     Value::Bool(false),
///     Value::array(vec![Value::Number(1.0), Value::Null]),
///     Value::string("x"),
/// ]);
/// assert_eq!(children, vec![Value::Number(1.0), Value::string("x")]);
/// ```
pub fn normalize_children(values: Vec<Value>) -> Vec<Value> {
    let mut out = Vec::with_capacity(values.len());
    for value in values {
        push_normalized(&mut out, value);
    }
    out
}

fn push_normalized(out: &mut Vec<Value>, value: Value) {
    match value {
        Value::Bool(false) | Value::Null | Value::Undefined => {}
        Value::Array(items) | Value::Fragment(items) => {
            for item in items.iter() {
                push_normalized(out, item.clone());
            }
        }
        other => out.push(other),
    }
}
