//! # Thicket
//!
//! A sandboxed tree-walking interpreter for JSX-style widget templates.
//!
//! Widget templates are markup with embedded expressions, authored by
//! untrusted parties and rendered inside a chat client. Thicket parses a
//! template once (caching the syntax tree), then evaluates it against a
//! data scope and a registry of renderable components, producing a tree of
//! [`Element`]s for the host to draw.
//!
//! ## Architecture
//!
//! - **Parser**: [`lexer`] and [`parser`] turn template text into an [`ast::Node`]
//! - **Cache**: [`cache::TemplateCache`] shares parsed trees between renders
//! - **Evaluator**: [`eval`] walks the tree against a [`Scope`]; anything
//!   outside the template subset is rejected, never executed
//! - **Widgets**: [`widget::WidgetRenderer`] is the fail-soft host entry point
//!
//! ## Example
//!
//! ```
//! use thicket::widget::WidgetRenderer;
//! use thicket::Value;
//!
//! let widget = WidgetRenderer::new();
//! let data = Value::from(serde_json::json!({
//!     "items": [{ "name": "A" }, { "name": "B" }]
//! }));
//!
//! let tree = widget.render(
//!     "<ListView>{items.map(item => <Text value={item.name} />)}</ListView>",
//!     &data,
//! );
//! let list = tree.as_element().unwrap();
//! assert_eq!(list.children.len(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ast;
pub mod cache;
pub mod context;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod registry;
pub mod render;
pub mod scope;
pub mod value;
pub mod widget;

// Re-export main types
pub use cache::{CacheConfig, TemplateCache};
pub use context::EvalContext;
pub use error::{ErrorKind, ParseError, Position, Result, TemplateError};
pub use eval::{eval_expr, normalize_children, Evaluate};
pub use parser::parse;
pub use registry::{Component, ComponentDef, ComponentRef, ComponentRegistry};
pub use render::{render, Renderer};
pub use scope::{Binding, Scope, ScopeGuard};
pub use value::{Element, Props, Value};
pub use widget::{
    shape_scope, widget_registry, DataValidator, ValidationIssue, WidgetError, WidgetRenderer,
};

/// Thicket version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_shared_types_are_thread_safe() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Value>();
        assert_send_sync::<ast::Node>();
        assert_send_sync::<ComponentRegistry>();
        assert_send_sync::<TemplateCache>();
        assert_send_sync::<WidgetRenderer>();
    }
}
