//! Markup evaluation: elements, fragments and their children

use tracing::{debug, trace, warn};

use crate::ast::{Attribute, AttributeValue, ElementNode, Node};
use crate::error::TemplateError;
use crate::value::{Element, Props};
use crate::{ComponentRegistry, EvalContext, Result, Scope, Value};

use super::normalize::normalize_children;
use super::Evaluate;

impl Evaluate for ElementNode {
    fn eval(
        &self,
        scope: &mut Scope,
        ctx: &EvalContext,
        registry: &ComponentRegistry,
    ) -> Result<Value> {
        // Resolve first so an unknown tag fails before any of its subtree runs
        let component = registry
            .get(&self.tag)
            .cloned()
            .ok_or_else(|| TemplateError::UnknownComponent {
                tag: self.tag.clone(),
                position: Some(self.position),
            })?;

        if ctx.trace {
            trace!(tag = %self.tag, depth = scope.depth(), "evaluating element");
        }

        let props = eval_attributes(&self.attributes, scope, ctx, registry)?;
        let mut children = eval_children(&self.children, scope, ctx, registry)?;

        if registry.is_leaf(&self.tag) && !children.is_empty() {
            debug!(
                tag = %self.tag,
                count = children.len(),
                "discarding children of leaf component"
            );
            children.clear();
        }

        Ok(Value::element(Element {
            tag: self.tag.clone(),
            component,
            props,
            children,
        }))
    }
}

/// Evaluate attributes in source order into props.
///
/// A bare attribute is `true`; a later duplicate replaces the earlier value.
fn eval_attributes(
    attributes: &[Attribute],
    scope: &mut Scope,
    ctx: &EvalContext,
    registry: &ComponentRegistry,
) -> Result<Props> {
    let mut props = Props::with_capacity(attributes.len());
    for attribute in attributes {
        match attribute {
            Attribute::Named { name, value } => {
                let value = match value {
                    AttributeValue::Flag => Value::Bool(true),
                    AttributeValue::Literal(s) => Value::string(s),
                    AttributeValue::Expression(expr) => expr.eval(scope, ctx, registry)?,
                };
                props.insert(name.clone(), value);
            }
            Attribute::Spread(_) => {
                warn!("ignoring spread attribute in template markup");
            }
        }
    }
    Ok(props)
}

/// Evaluate markup children and normalize the results.
pub fn eval_children(
    children: &[Node],
    scope: &mut Scope,
    ctx: &EvalContext,
    registry: &ComponentRegistry,
) -> Result<Vec<Value>> {
    let mut values = Vec::with_capacity(children.len());
    for child in children {
        match child {
            Node::Spread { .. } => {
                warn!("ignoring spread child in template markup");
            }
            other => values.push(other.eval(scope, ctx, registry)?),
        }
    }
    Ok(normalize_children(values))
}

/// Evaluate a fragment to its normalized children.
pub fn eval_fragment(
    children: &[Node],
    scope: &mut Scope,
    ctx: &EvalContext,
    registry: &ComponentRegistry,
) -> Result<Value> {
    let children = eval_children(children, scope, ctx, registry)?;
    Ok(Value::fragment(children))
}

/// Report raw text between tags. Text is never rendered; content belongs in
/// the `value` prop of a text component.
pub fn check_text_run(text: &str) {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if !collapsed.is_empty() {
        warn!(
            text = %collapsed,
            "text nodes are not allowed in widget templates; use a text component"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::{ComponentDef, Element, ErrorKind, Value};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tracing_test::traced_test;

    fn el(tag: &str) -> Element {
        Element::new(tag, ComponentDef::shared(tag))
    }

    #[test]
    fn test_attribute_kinds() {
        let value = eval_with(
            r#"<Box flag label="a &lt; b" n={count + 1} nested={{a: 1}} />"#,
            json!({"count": 1}),
        )
        .unwrap();
        let expected = el("Box")
            .with_prop("flag", true)
            .with_prop("label", "a < b")
            .with_prop("n", 2.0)
            .with_prop("nested", Value::object_from([("a", Value::Number(1.0))]));
        assert_eq!(value, Value::element(expected));
    }

    #[test]
    fn test_children_in_order() {
        let value = eval("<Row><Col/><Box/></Row>").unwrap();
        assert_eq!(
            value,
            Value::element(el("Row").with_child(el("Col")).with_child(el("Box")))
        );
    }

    #[test]
    fn test_conditional_children_dropped() {
        let src = "<Row>{show && <Col/>}{missing}{null}</Row>";
        assert_eq!(
            eval_with(src, json!({"show": false})).unwrap(),
            Value::element(el("Row"))
        );
    }

    #[test]
    fn test_array_children_spliced() {
        let src = "<ListView>{items.map(i => <Box key={i} />)}</ListView>";
        let value = eval_with(src, json!({"items": [1, 2]})).unwrap();
        let expected = el("ListView")
            .with_child(el("Box").with_prop("key", 1.0))
            .with_child(el("Box").with_prop("key", 2.0));
        assert_eq!(value, Value::element(expected));
    }

    #[test]
    fn test_nested_fragment_flattened() {
        let value = eval("<Row><><Col/><Box/></></Row>").unwrap();
        assert_eq!(
            value,
            Value::element(el("Row").with_child(el("Col")).with_child(el("Box")))
        );
    }

    #[test]
    fn test_root_fragment() {
        let value = eval("<><Col/>{false}</>").unwrap();
        assert_eq!(value, Value::fragment(vec![Value::element(el("Col"))]));
    }

    #[test]
    fn test_leaf_children_discarded() {
        let value = eval("<Text value='x'><Box/></Text>").unwrap();
        assert_eq!(value, Value::element(el("Text").with_prop("value", "x")));
    }

    #[test]
    fn test_leaf_children_still_evaluated() {
        // Children of a leaf are evaluated before being dropped
        let err = eval("<Text><Missing/></Text>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownComponent);
    }

    #[test]
    fn test_member_tag_resolves_last_segment() {
        let value = eval("<UI.Card />").unwrap();
        assert_eq!(value, Value::element(el("Card")));
    }

    #[test]
    fn test_unknown_component_position() {
        let err = eval("<Row>\n  <Nope />\n</Row>").unwrap_err();
        assert_eq!(err.to_string(), "Unknown widget component: Nope at 2:3");
    }

    #[test]
    fn test_primitive_children_kept() {
        let value = eval("<Row>{0}{'s'}{true}</Row>").unwrap();
        let expected = el("Row")
            .with_child(0.0)
            .with_child("s")
            .with_child(true);
        assert_eq!(value, Value::element(expected));
    }

    #[traced_test]
    #[test]
    fn test_text_run_warns_and_is_dropped() {
        let value = eval("<Row>  Hello   there  <Col/></Row>").unwrap();
        assert_eq!(value, Value::element(el("Row").with_child(el("Col"))));
        assert!(logs_contain("text nodes are not allowed"));
        assert!(logs_contain("Hello there"));
    }

    #[traced_test]
    #[test]
    fn test_whitespace_text_is_silent() {
        eval("<Row>\n   <Col/>\n</Row>").unwrap();
        assert!(!logs_contain("text nodes are not allowed"));
    }

    #[traced_test]
    #[test]
    fn test_spread_attribute_ignored() {
        let value = eval_with("<Box {...rest} a='1' />", json!({"rest": {"b": 2}})).unwrap();
        assert_eq!(value, Value::element(el("Box").with_prop("a", "1")));
        assert!(logs_contain("ignoring spread attribute"));
    }

    #[test]
    fn test_spread_child_ignored() {
        let value = eval_with("<Row>{...items}</Row>", json!({"items": [1]})).unwrap();
        assert_eq!(value, Value::element(el("Row")));
    }
}
