//! Render entry points: parse (through the cache), then evaluate

use std::sync::Arc;

use crate::ast::Node;
use crate::cache::{self, TemplateCache};
use crate::eval::eval_expr;
use crate::parser::parse;
use crate::{ComponentRegistry, EvalContext, Result, Scope, Value};

/// Render a template against a scope with the default settings.
///
/// The parsed template is kept in the process-wide cache. Rendering the
/// same template twice with equal inputs yields equal trees.
///
/// # Example
///
/// ```
/// use thicket::{render, ComponentRegistry, Scope, Value};
///
/// let mut registry = ComponentRegistry::new();
/// registry.register_named("Text");
///
/// let mut scope = Scope::new();
/// scope.insert("greeting", Value::string("hi"));
///
/// let tree = render("<Text value={greeting} />", &scope, &registry).unwrap();
/// let element = tree.as_element().unwrap();
/// assert_eq!(element.prop("value"), Some(&Value::string("hi")));
/// ```
pub fn render(template: &str, scope: &Scope, registry: &ComponentRegistry) -> Result<Value> {
    let ast = cache::global().get_or_parse(template)?;
    evaluate(&ast, scope, &EvalContext::default(), registry)
}

/// Evaluate a parsed template against a private copy of `scope`.
fn evaluate(
    ast: &Node,
    scope: &Scope,
    ctx: &EvalContext,
    registry: &ComponentRegistry,
) -> Result<Value> {
    let mut scope = scope.clone();
    eval_expr(ast, &mut scope, ctx, registry)
}

/// A configured renderer: registry, evaluation settings and cache.
#[derive(Debug, Clone)]
pub struct Renderer {
    registry: ComponentRegistry,
    context: EvalContext,
    /// `None` uses the process-wide cache
    cache: Option<Arc<TemplateCache>>,
}

impl Renderer {
    /// Create a renderer over `registry` using the global cache.
    pub fn new(registry: ComponentRegistry) -> Self {
        Self {
            registry,
            context: EvalContext::default(),
            cache: None,
        }
    }

    /// Resolve tags against a different registry (builder pattern).
    pub fn with_registry(mut self, registry: ComponentRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Use the given evaluation settings (builder pattern).
    pub fn with_context(mut self, context: EvalContext) -> Self {
        self.context = context;
        self
    }

    /// Use a private cache instead of the global one (builder pattern).
    pub fn with_cache(mut self, cache: Arc<TemplateCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// The registry tags resolve against.
    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// The evaluation settings.
    pub fn context(&self) -> &EvalContext {
        &self.context
    }

    /// The cache parsed templates go to.
    pub fn cache(&self) -> &TemplateCache {
        match &self.cache {
            Some(cache) => cache.as_ref(),
            None => cache::global(),
        }
    }

    /// Render a template against a scope.
    pub fn render(&self, template: &str, scope: &Scope) -> Result<Value> {
        let ast = self.cache().get_or_parse(template)?;
        evaluate(&ast, scope, &self.context, &self.registry)
    }

    /// Render a template against a data object; its entries become the
    /// root bindings.
    pub fn render_data(&self, template: &str, data: &Value) -> Result<Value> {
        self.render(template, &Scope::from_value(data))
    }

    /// Render without consulting or filling the cache.
    pub fn render_uncached(&self, template: &str, scope: &Scope) -> Result<Value> {
        let ast = parse(template)?;
        evaluate(&ast, scope, &self.context, &self.registry)
    }
}
