//! Widget rendering: the host-facing layer over the interpreter
//!
//! [`WidgetRenderer`] combines the base widget registry with caller
//! overrides, validates incoming data through an optional
//! [`DataValidator`], shapes the data into a scope, and renders. Failures
//! never escape [`WidgetRenderer::render`]: they come back as a small
//! diagnostic panel built from the same widget components, so a broken
//! template shows up in the chat instead of taking the host down.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::cache::TemplateCache;
use crate::render::Renderer;
use crate::value::Element;
use crate::{ComponentDef, ComponentRegistry, EvalContext, Scope, TemplateError, Value};

/// Tags of the base widget set, in registration order.
pub const WIDGET_TAGS: [&str; 29] = [
    "Basic",
    "Card",
    "ListView",
    "ListViewItem",
    "Box",
    "Row",
    "Col",
    "Divider",
    "Icon",
    "Image",
    "Button",
    "Checkbox",
    "Chart",
    "Spacer",
    "Select",
    "DatePicker",
    "Form",
    "Input",
    "Label",
    "RadioGroup",
    "Textarea",
    "Transition",
    "Text",
    "Title",
    "Caption",
    "Badge",
    "Markdown",
    "Avatar",
    "Progress",
];

/// Text-bearing widgets that render from props only.
pub const LEAF_TAGS: [&str; 7] = ["Text", "Title", "Caption", "Badge", "Button", "Label", "Markdown"];

/// Title of the panel shown for parse and evaluation failures.
pub const TEMPLATE_ERROR_TITLE: &str = "Template error";

/// Title of the panel shown when the validator rejects the data.
pub const VALIDATION_ERROR_TITLE: &str = "Schema validation failed";

/// The base widget registry.
pub fn widget_registry() -> ComponentRegistry {
    let mut registry = ComponentRegistry::new();
    for tag in WIDGET_TAGS {
        registry.register_named(tag);
    }
    for tag in LEAF_TAGS {
        registry.mark_leaf(tag);
    }
    registry
}

/// Turn widget data into the scope templates see.
///
/// An object's entries become the root bindings and the whole object is
/// also bound as `data`. If the object already has a `data` entry, the whole
/// object is bound as `state` instead. Any other value is bound as `value`.
pub fn shape_scope(data: &Value) -> Scope {
    match data {
        Value::Object(map) => {
            let mut scope = Scope::from_value(data);
            let alias = if map.contains_key("data") { "state" } else { "data" };
            scope.insert(alias, data.clone());
            scope
        }
        other => {
            let mut scope = Scope::new();
            scope.insert("value", other.clone());
            scope
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Validation
// ═══════════════════════════════════════════════════════════════════════

/// One problem found by a [`DataValidator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Path to the offending value; empty for the root
    pub path: Vec<String>,

    /// What is wrong with it
    pub message: String,
}

impl ValidationIssue {
    /// Create an issue at `path`.
    pub fn new<P: Into<String>>(
        path: impl IntoIterator<Item = P>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into_iter().map(Into::into).collect(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "root: {}", self.message)
        } else {
            write!(f, "{}: {}", self.path.join("."), self.message)
        }
    }
}

/// Schema hook run on widget data before rendering.
///
/// Returns the data to render (validators may normalize it) or the issues
/// that make it unrenderable. Closures of the right shape implement this.
pub trait DataValidator: Send + Sync {
    /// Validate `data`.
    fn validate(&self, data: &Value) -> Result<Value, Vec<ValidationIssue>>;
}

impl<F> DataValidator for F
where
    F: Fn(&Value) -> Result<Value, Vec<ValidationIssue>> + Send + Sync,
{
    fn validate(&self, data: &Value) -> Result<Value, Vec<ValidationIssue>> {
        self(data)
    }
}

/// Why a widget failed to render.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WidgetError {
    /// The validator rejected the data
    #[error("{}", join_issues(.0))]
    Validation(Vec<ValidationIssue>),

    /// Parsing or evaluating the template failed
    #[error(transparent)]
    Template(#[from] TemplateError),
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl WidgetError {
    /// Title of the diagnostic panel for this error.
    pub fn title(&self) -> &'static str {
        match self {
            WidgetError::Validation(_) => VALIDATION_ERROR_TITLE,
            WidgetError::Template(_) => TEMPLATE_ERROR_TITLE,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Widget Renderer
// ═══════════════════════════════════════════════════════════════════════

/// Fail-soft renderer for widget templates.
///
/// # Example
///
/// ```
/// use thicket::widget::WidgetRenderer;
/// use thicket::Value;
///
/// let widget = WidgetRenderer::new();
/// let data = Value::from(serde_json::json!({ "title": "Hello" }));
///
/// let tree = widget.render("<Card><Title value={title} /></Card>", &data);
/// assert_eq!(tree.as_element().unwrap().tag, "Card");
///
/// // Errors come back as a panel, never as a panic or an Err
/// let panel = widget.render("<Nope />", &data);
/// assert_eq!(panel.as_element().unwrap().tag, "Card");
/// ```
#[derive(Clone)]
pub struct WidgetRenderer {
    /// Base components; also used to draw diagnostic panels
    registry: ComponentRegistry,

    /// Caller components, winning over the base on collision
    overrides: ComponentRegistry,

    validator: Option<Arc<dyn DataValidator>>,

    /// Renders over the merged registry
    renderer: Renderer,
}

impl fmt::Debug for WidgetRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetRenderer")
            .field("registry", &self.registry)
            .field("overrides", &self.overrides)
            .field("validator", &self.validator.as_ref().map(|_| ".."))
            .field("context", self.renderer.context())
            .finish()
    }
}

impl Default for WidgetRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl WidgetRenderer {
    /// Create a renderer over the base widget registry.
    pub fn new() -> Self {
        Self::with_registry(widget_registry())
    }

    /// Create a renderer over a custom base registry.
    pub fn with_registry(registry: ComponentRegistry) -> Self {
        let renderer = Renderer::new(registry.clone());
        Self {
            registry,
            overrides: ComponentRegistry::new(),
            validator: None,
            renderer,
        }
    }

    /// Add caller components on top of the base (builder pattern).
    pub fn with_overrides(mut self, overrides: ComponentRegistry) -> Self {
        self.overrides = overrides;
        let merged = self.registry.merged(&self.overrides);
        self.renderer = self.renderer.with_registry(merged);
        self
    }

    /// Validate data before rendering (builder pattern).
    pub fn with_validator(mut self, validator: impl DataValidator + 'static) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Use the given evaluation settings (builder pattern).
    pub fn with_context(mut self, context: EvalContext) -> Self {
        self.renderer = self.renderer.with_context(context);
        self
    }

    /// Use a private template cache (builder pattern).
    pub fn with_cache(mut self, cache: Arc<TemplateCache>) -> Self {
        self.renderer = self.renderer.with_cache(cache);
        self
    }

    /// The registry templates resolve against (base plus overrides).
    pub fn registry(&self) -> &ComponentRegistry {
        self.renderer.registry()
    }

    /// Render a widget, turning any failure into a diagnostic panel.
    pub fn render(&self, template: &str, data: &Value) -> Value {
        match self.try_render(template, data) {
            Ok(tree) => tree,
            Err(err) => {
                debug!(error = %err, "rendering diagnostic panel");
                self.error_panel(err.title(), &err.to_string())
            }
        }
    }

    /// Render a widget, returning failures to the caller.
    ///
    /// Surrounding whitespace in the template is ignored.
    pub fn try_render(&self, template: &str, data: &Value) -> Result<Value, WidgetError> {
        let data = match &self.validator {
            Some(validator) => validator.validate(data).map_err(WidgetError::Validation)?,
            None => data.clone(),
        };
        let scope = shape_scope(&data);
        Ok(self.renderer.render(template.trim(), &scope)?)
    }

    /// Build the diagnostic panel from the base components.
    pub fn error_panel(&self, title: &str, message: &str) -> Value {
        let title = Element::new("Title", self.component("Title"))
            .with_prop("value", title)
            .with_prop("size", "sm");
        let text = Element::new("Text", self.component("Text"))
            .with_prop("value", message)
            .with_prop("size", "sm")
            .with_prop("color", "secondary");
        let card = Element::new("Card", self.component("Card"))
            .with_prop("size", "md")
            .with_prop("padding", 4.0)
            .with_child(title)
            .with_child(text);
        Value::element(card)
    }

    fn component(&self, tag: &str) -> crate::ComponentRef {
        self.registry
            .get(tag)
            .cloned()
            .unwrap_or_else(|| ComponentDef::shared(tag))
    }
}
