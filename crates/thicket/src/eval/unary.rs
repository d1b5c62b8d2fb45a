//! Unary operation evaluation

use crate::ast::{Node, UnaryOperator};
use crate::error::TemplateError;
use crate::{ComponentRegistry, EvalContext, Result, Scope, Value};

use super::Evaluate;

/// Evaluate a prefix operator.
pub fn eval_unary(
    op: UnaryOperator,
    operand: &Node,
    scope: &mut Scope,
    ctx: &EvalContext,
    registry: &ComponentRegistry,
) -> Result<Value> {
    match op {
        UnaryOperator::Not => {
            let value = operand.eval(scope, ctx, registry)?;
            Ok(Value::Bool(!value.is_truthy()))
        }
        UnaryOperator::Plus => {
            let value = operand.eval(scope, ctx, registry)?;
            Ok(Value::Number(value.to_number()))
        }
        UnaryOperator::Minus => {
            let value = operand.eval(scope, ctx, registry)?;
            Ok(Value::Number(-value.to_number()))
        }
        UnaryOperator::BitNot | UnaryOperator::Typeof | UnaryOperator::Void => Err(
            TemplateError::unsupported(format!("operator `{}`", op.as_str())),
        ),
    }
}
