//! Member access evaluation (`a.b`, `a[b]`)

use crate::ast::{Node, Property};
use crate::value::format_number;
use crate::{ComponentRegistry, EvalContext, Result, Scope, Value};

use super::Evaluate;

/// Evaluate a member access.
///
/// Accessing anything on `null` or `undefined` yields `undefined` rather
/// than failing, so `user.profile.name` is safe on partial data.
pub fn eval_member(
    object: &Node,
    property: &Property,
    scope: &mut Scope,
    ctx: &EvalContext,
    registry: &ComponentRegistry,
) -> Result<Value> {
    let target = object.eval(scope, ctx, registry)?;
    let key = match property {
        Property::Static(name) => name.clone(),
        Property::Computed(expr) => property_key(&expr.eval(scope, ctx, registry)?),
    };
    Ok(get_member(&target, &key))
}

/// Convert a computed key to the property name it addresses.
fn property_key(key: &Value) -> String {
    match key {
        Value::Number(n) => format_number(*n),
        other => other.to_js_string(),
    }
}

/// Parse a canonical array index (`"0"`, `"12"`, not `"01"` or `"-1"`).
fn array_index(key: &str) -> Option<usize> {
    if key.len() > 1 && key.starts_with('0') {
        return None;
    }
    key.parse().ok()
}

/// Read a property from a value.
pub fn get_member(target: &Value, key: &str) -> Value {
    match target {
        Value::Object(map) => map.get(key).cloned().unwrap_or_default(),
        Value::Array(items) => {
            if key == "length" {
                return Value::from(items.len());
            }
            array_index(key)
                .and_then(|i| items.get(i))
                .cloned()
                .unwrap_or_default()
        }
        Value::String(s) => {
            let units: Vec<u16> = s.encode_utf16().collect();
            if key == "length" {
                return Value::from(units.len());
            }
            array_index(key)
                .and_then(|i| units.get(i))
                .map(|unit| Value::string(String::from_utf16_lossy(&[*unit])))
                .unwrap_or_default()
        }
        Value::Undefined
        | Value::Null
        | Value::Bool(_)
        | Value::Number(_)
        | Value::Element(_)
        | Value::Fragment(_) => Value::Undefined,
    }
}
