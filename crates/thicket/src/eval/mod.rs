//! Template evaluation

pub mod array;
pub mod binary;
pub mod conditional;
pub mod identifier;
pub mod literal;
pub mod map_call;
pub mod markup;
pub mod member;
pub mod normalize;
pub mod object;
pub mod unary;

use crate::ast::Node;
use crate::error::{Position, TemplateError};
use crate::{ComponentRegistry, EvalContext, Result, Scope, Value};

/// Trait for evaluating syntax tree nodes to values.
///
/// This is the core abstraction for the tree-walking interpreter. Element
/// tags resolve against the registry; names resolve against the scope.
pub trait Evaluate {
    /// Evaluate this node.
    fn eval(
        &self,
        scope: &mut Scope,
        ctx: &EvalContext,
        registry: &ComponentRegistry,
    ) -> Result<Value>;
}

// ═══════════════════════════════════════════════════════════════════════
// Main Dispatcher
// ═══════════════════════════════════════════════════════════════════════

impl Evaluate for Node {
    fn eval(
        &self,
        scope: &mut Scope,
        ctx: &EvalContext,
        registry: &ComponentRegistry,
    ) -> Result<Value> {
        scope.enter(ctx.max_depth)?;
        let result = dispatch(self, scope, ctx, registry);
        scope.exit();
        result
    }
}

fn dispatch(
    node: &Node,
    scope: &mut Scope,
    ctx: &EvalContext,
    registry: &ComponentRegistry,
) -> Result<Value> {
    match node {
        Node::Literal(lit) => Ok(literal::eval_literal(lit)),
        Node::Identifier(name) => Ok(identifier::eval_identifier(name, scope)),
        Node::TemplateString {
            quasis,
            expressions,
        } => literal::eval_template_string(quasis, expressions, scope, ctx, registry),
        Node::BinaryOp { op, left, right } => {
            binary::eval_binary(*op, left, right, scope, ctx, registry)
        }
        Node::LogicalOp { op, left, right } => {
            binary::eval_logical(*op, left, right, scope, ctx, registry)
        }
        Node::UnaryOp { op, operand } => unary::eval_unary(*op, operand, scope, ctx, registry),
        Node::Conditional {
            test,
            consequent,
            alternate,
        } => conditional::eval_conditional(test, consequent, alternate, scope, ctx, registry),
        Node::MemberAccess { object, property } => {
            member::eval_member(object, property, scope, ctx, registry)
        }
        Node::ArrayLiteral(items) => array::eval_array(items, scope, ctx, registry),
        Node::ObjectLiteral(entries) => object::eval_object(entries, scope, ctx, registry),
        Node::MapCall { target, callback } => {
            map_call::eval_map_call(target, callback, scope, ctx, registry)
        }

        // Markup
        Node::Element(element) => element.eval(scope, ctx, registry),
        Node::Fragment(children) => markup::eval_fragment(children, scope, ctx, registry),
        Node::ExpressionSlot(Some(expr)) => expr.eval(scope, ctx, registry),
        Node::ExpressionSlot(None) => Ok(Value::Undefined),
        Node::TextRun(text) => {
            markup::check_text_run(text);
            Ok(Value::Undefined)
        }

        // Accepted by the parser, never executed
        Node::Call { position, .. } => Err(unsupported(node, Some(*position))),
        Node::Arrow(callback) => Err(unsupported(node, Some(callback.position))),
        Node::Function(callback) => Err(unsupported(node, Some(callback.position))),
        Node::New { position, .. } => Err(unsupported(node, Some(*position))),
        Node::Assign { position, .. } => Err(unsupported(node, Some(*position))),
        Node::Spread { position, .. } => Err(unsupported(node, Some(*position))),
        Node::OptionalMember { position, .. } => Err(unsupported(node, Some(*position))),
    }
}

/// Create an unsupported-construct error naming the node's kind.
fn unsupported(node: &Node, position: Option<Position>) -> TemplateError {
    TemplateError::UnsupportedExpression {
        construct: node.kind_name().to_string(),
        position,
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Convenience Functions
// ═══════════════════════════════════════════════════════════════════════

/// Evaluate a node (convenience wrapper).
pub fn eval_expr(
    node: &Node,
    scope: &mut Scope,
    ctx: &EvalContext,
    registry: &ComponentRegistry,
) -> Result<Value> {
    node.eval(scope, ctx, registry)
}

pub use normalize::normalize_children;

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::parser::parse;

    /// Registry with a handful of container and leaf tags.
    pub fn registry() -> ComponentRegistry {
        let mut registry = ComponentRegistry::new();
        for tag in ["Row", "Col", "Box", "Card", "ListView", "Text", "Title", "Button"] {
            registry.register_named(tag);
        }
        for tag in ["Text", "Title", "Button"] {
            registry.mark_leaf(tag);
        }
        registry
    }

    /// Parse and evaluate `src` against `scope`.
    pub fn eval_in(src: &str, scope: &mut Scope) -> Result<Value> {
        let ast = parse(src)?;
        eval_expr(&ast, scope, &EvalContext::default(), &registry())
    }

    /// Parse and evaluate `src` against JSON data.
    pub fn eval_with(src: &str, data: serde_json::Value) -> Result<Value> {
        eval_in(src, &mut Scope::from_json(data))
    }

    /// Parse and evaluate `src` against an empty scope.
    pub fn eval(src: &str) -> Result<Value> {
        eval_in(src, &mut Scope::new())
    }
}
