//! Binary and logical operation evaluation

use crate::ast::{BinaryOperator, LogicalOperator, Node};
use crate::error::TemplateError;
use crate::value::{loose_equals, strict_equals};
use crate::{ComponentRegistry, EvalContext, Result, Scope, Value};

use super::Evaluate;

/// Evaluate a binary operation. Both operands are always evaluated.
pub fn eval_binary(
    op: BinaryOperator,
    left: &Node,
    right: &Node,
    scope: &mut Scope,
    ctx: &EvalContext,
    registry: &ComponentRegistry,
) -> Result<Value> {
    // Reject before evaluating anything
    if !is_supported(op) {
        return Err(unsupported_operator(op.as_str()));
    }

    let left = left.eval(scope, ctx, registry)?;
    let right = right.eval(scope, ctx, registry)?;

    let value = match op {
        BinaryOperator::Add => eval_add(&left, &right),
        BinaryOperator::Sub => Value::Number(left.to_number() - right.to_number()),
        BinaryOperator::Mul => Value::Number(left.to_number() * right.to_number()),
        BinaryOperator::Div => Value::Number(left.to_number() / right.to_number()),
        BinaryOperator::Rem => Value::Number(left.to_number() % right.to_number()),

        // Equality
        BinaryOperator::Eq => Value::Bool(loose_equals(&left, &right)),
        BinaryOperator::NotEq => Value::Bool(!loose_equals(&left, &right)),
        BinaryOperator::StrictEq => Value::Bool(strict_equals(&left, &right)),
        BinaryOperator::StrictNotEq => Value::Bool(!strict_equals(&left, &right)),

        // Relational comparisons are always numeric
        BinaryOperator::Lt => Value::Bool(left.to_number() < right.to_number()),
        BinaryOperator::Gt => Value::Bool(left.to_number() > right.to_number()),
        BinaryOperator::LtEq => Value::Bool(left.to_number() <= right.to_number()),
        BinaryOperator::GtEq => Value::Bool(left.to_number() >= right.to_number()),

        BinaryOperator::Exp
        | BinaryOperator::BitAnd
        | BinaryOperator::BitOr
        | BinaryOperator::BitXor
        | BinaryOperator::Shl
        | BinaryOperator::Shr
        | BinaryOperator::UShr => return Err(unsupported_operator(op.as_str())),
    };
    Ok(value)
}

fn is_supported(op: BinaryOperator) -> bool {
    !matches!(
        op,
        BinaryOperator::Exp
            | BinaryOperator::BitAnd
            | BinaryOperator::BitOr
            | BinaryOperator::BitXor
            | BinaryOperator::Shl
            | BinaryOperator::Shr
            | BinaryOperator::UShr
    )
}

/// Evaluate `+`: concatenation if either side is a string, else addition.
///
/// Concatenation renders `null` and `undefined` as empty strings.
pub(crate) fn eval_add(left: &Value, right: &Value) -> Value {
    if matches!(left, Value::String(_)) || matches!(right, Value::String(_)) {
        let mut out = left.to_interpolated_string();
        out.push_str(&right.to_interpolated_string());
        return Value::string(out);
    }
    Value::Number(left.to_number() + right.to_number())
}

/// Evaluate a short-circuiting operator.
///
/// `&&` and `||` return the operand that decided the result, not a boolean.
pub fn eval_logical(
    op: LogicalOperator,
    left: &Node,
    right: &Node,
    scope: &mut Scope,
    ctx: &EvalContext,
    registry: &ComponentRegistry,
) -> Result<Value> {
    match op {
        LogicalOperator::And => {
            let left = left.eval(scope, ctx, registry)?;
            if !left.is_truthy() {
                return Ok(left);
            }
            right.eval(scope, ctx, registry)
        }
        LogicalOperator::Or => {
            let left = left.eval(scope, ctx, registry)?;
            if left.is_truthy() {
                return Ok(left);
            }
            right.eval(scope, ctx, registry)
        }
        LogicalOperator::Nullish => Err(unsupported_operator(op.as_str())),
    }
}

fn unsupported_operator(op: &str) -> TemplateError {
    TemplateError::unsupported(format!("operator `{}`", op))
}
