//! Object literal evaluation

use indexmap::IndexMap;
use tracing::warn;

use crate::ast::{ObjectEntry, PropertyKey};
use crate::value::format_number;
use crate::{ComponentRegistry, EvalContext, Result, Scope, Value};

use super::Evaluate;

/// Evaluate an object literal in source order; later keys overwrite
/// earlier ones in place. Spread entries are ignored.
pub fn eval_object(
    entries: &[ObjectEntry],
    scope: &mut Scope,
    ctx: &EvalContext,
    registry: &ComponentRegistry,
) -> Result<Value> {
    let mut map = IndexMap::with_capacity(entries.len());
    for entry in entries {
        match entry {
            ObjectEntry::Property { key, value } => {
                let key = match key {
                    PropertyKey::Static(name) => name.clone(),
                    PropertyKey::Computed(expr) => match expr.eval(scope, ctx, registry)? {
                        Value::Number(n) => format_number(n),
                        other => other.to_js_string(),
                    },
                };
                let value = value.eval(scope, ctx, registry)?;
                map.insert(key, value);
            }
            ObjectEntry::Spread(_) => {
                warn!("ignoring spread entry in object literal");
            }
        }
    }
    Ok(Value::object(map))
}
