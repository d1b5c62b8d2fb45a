//! Conditional (`?:`) evaluation

use crate::ast::Node;
use crate::{ComponentRegistry, EvalContext, Result, Scope, Value};

use super::Evaluate;

/// Evaluate `test ? consequent : alternate`; only the taken branch runs.
pub fn eval_conditional(
    test: &Node,
    consequent: &Node,
    alternate: &Node,
    scope: &mut Scope,
    ctx: &EvalContext,
    registry: &ComponentRegistry,
) -> Result<Value> {
    if test.eval(scope, ctx, registry)?.is_truthy() {
        consequent.eval(scope, ctx, registry)
    } else {
        alternate.eval(scope, ctx, registry)
    }
}
