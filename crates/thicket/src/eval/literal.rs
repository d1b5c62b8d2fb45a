//! Literal and template string evaluation

use crate::ast::{Literal, Node};
use crate::{ComponentRegistry, EvalContext, Result, Scope, Value};

use super::Evaluate;

/// Evaluate a literal.
pub fn eval_literal(lit: &Literal) -> Value {
    match lit {
        Literal::Null => Value::Null,
        Literal::Bool(b) => Value::Bool(*b),
        Literal::Number(n) => Value::Number(*n),
        Literal::String(s) => Value::string(s),
    }
}

/// Evaluate a template string: literal runs interleaved with interpolated
/// values, where `null` and `undefined` interpolate as nothing.
pub fn eval_template_string(
    quasis: &[String],
    expressions: &[Node],
    scope: &mut Scope,
    ctx: &EvalContext,
    registry: &ComponentRegistry,
) -> Result<Value> {
    let mut out = String::new();
    for (i, quasi) in quasis.iter().enumerate() {
        out.push_str(quasi);
        if let Some(expr) = expressions.get(i) {
            let value = expr.eval(scope, ctx, registry)?;
            out.push_str(&value.to_interpolated_string());
        }
    }
    Ok(Value::string(out))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::Value;
    use serde_json::json;

    #[test]
    fn test_literals() {
        assert_eq!(eval("42").unwrap(), Value::Number(42.0));
        assert_eq!(eval("'hi'").unwrap(), Value::string("hi"));
        assert_eq!(eval("true").unwrap(), Value::Bool(true));
        assert_eq!(eval("null").unwrap(), Value::Null);
    }

    #[test]
    fn test_template_string_interpolation() {
        let value = eval_with("`${n} items for ${user.name}`", json!({"n": 3, "user": {"name": "Ada"}}));
        assert_eq!(value.unwrap(), Value::string("3 items for Ada"));
    }

    #[test]
    fn test_template_string_nullish_is_empty() {
        let value = eval_with("`[${a}|${b}]`", json!({"a": null}));
        assert_eq!(value.unwrap(), Value::string("[|]"));
    }

    #[test]
    fn test_template_string_formats_values() {
        let value = eval_with("`${xs} ${ok} ${x}`", json!({"xs": [1, 2], "ok": false, "x": 1.5}));
        assert_eq!(value.unwrap(), Value::string("1,2 false 1.5"));
    }
}
