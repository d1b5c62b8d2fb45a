//! Array literal evaluation

use crate::ast::Node;
use crate::{ComponentRegistry, EvalContext, Result, Scope, Value};

use super::Evaluate;

/// Evaluate an array literal. Holes become `null`; spreads are rejected.
pub fn eval_array(
    items: &[Option<Node>],
    scope: &mut Scope,
    ctx: &EvalContext,
    registry: &ComponentRegistry,
) -> Result<Value> {
    let values = items
        .iter()
        .map(|item| match item {
            Some(node) => node.eval(scope, ctx, registry),
            None => Ok(Value::Null),
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Value::array(values))
}
