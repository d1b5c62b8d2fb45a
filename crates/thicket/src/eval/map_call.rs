//! `.map()` evaluation: the only iteration construct templates have

use crate::ast::{Callback, CallbackBody, Node, Statement};
use crate::error::TemplateError;
use crate::{ComponentRegistry, EvalContext, Result, Scope, Value};

use super::Evaluate;

/// Evaluate `target.map((item, index) => body)`.
///
/// A target that is not an array maps to an empty array. Each item gets a
/// fresh frame binding the callback's parameters, so nothing leaks between
/// iterations or back into the enclosing scope.
pub fn eval_map_call(
    target: &Node,
    callback: &Callback,
    scope: &mut Scope,
    ctx: &EvalContext,
    registry: &ComponentRegistry,
) -> Result<Value> {
    if callback.params.len() > 2 {
        return Err(TemplateError::UnsupportedExpression {
            construct: "map callback with more than two parameters".to_string(),
            position: Some(callback.position),
        });
    }

    let items = match target.eval(scope, ctx, registry)? {
        Value::Array(items) => items,
        _ => return Ok(Value::array(Vec::new())),
    };

    let mut results = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let mut frame = scope.frame();
        if let Some(name) = callback.params.first() {
            frame.bind(name.as_str(), item.clone());
        }
        if let Some(name) = callback.params.get(1) {
            frame.bind(name.as_str(), Value::from(index));
        }
        results.push(eval_body(&callback.body, &mut frame, ctx, registry)?);
    }
    Ok(Value::array(results))
}

/// Evaluate a callback body.
///
/// Block bodies are not executed statement by statement: the value is that
/// of the first `return`, or `null` if there is none.
fn eval_body(
    body: &CallbackBody,
    scope: &mut Scope,
    ctx: &EvalContext,
    registry: &ComponentRegistry,
) -> Result<Value> {
    match body {
        CallbackBody::Expression(expr) => expr.eval(scope, ctx, registry),
        CallbackBody::Block(statements) => {
            let returned = statements.iter().find_map(|statement| match statement {
                Statement::Return(value) => Some(value),
                Statement::Expression(_) | Statement::Empty => None,
            });
            match returned {
                Some(Some(expr)) => expr.eval(scope, ctx, registry),
                Some(None) | None => Ok(Value::Null),
            }
        }
    }
}
