//! Evaluation scope: name lookup for template expressions

mod frame;

pub use frame::ScopeGuard;

use indexmap::IndexMap;

use crate::error::TemplateError;
use crate::Value;

/// A binding introduced by a `.map()` callback parameter.
#[derive(Debug, Clone)]
pub struct Binding {
    /// The binding's name
    pub name: String,

    /// The bound value
    pub value: Value,
}

/// The name-to-value mapping templates are evaluated against.
///
/// The root bindings come from the data object. Each `.map()` iteration
/// pushes a frame holding its item and index bindings, evaluates the
/// callback, and pops the frame again, so siblings never observe each
/// other's bindings. Lookups search the innermost frame first and fall back
/// outward to the root; a name bound nowhere is `undefined`.
///
/// # Example
///
/// ```
/// use thicket::{Scope, Value};
///
/// let mut scope = Scope::new();
/// scope.insert("title", Value::string("Inbox"));
///
/// {
///     let mut frame = scope.frame();
///     frame.bind("item", Value::Number(1.0));
///     frame.bind("title", Value::string("Shadowed"));
///     assert_eq!(frame.lookup("title"), Value::string("Shadowed"));
/// }
///
/// assert_eq!(scope.lookup("title"), Value::string("Inbox"));
/// assert_eq!(scope.lookup("item"), Value::Undefined);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Scope {
    /// Root bindings (the data object)
    root: IndexMap<String, Value>,

    /// Callback bindings in a flat array (most recent at end)
    bindings: Vec<Binding>,

    /// Frame boundaries (indices into bindings)
    frames: Vec<usize>,

    /// Current nesting depth of evaluation
    depth: usize,
}

impl Scope {
    /// Create an empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scope whose root bindings are the entries of a data object.
    ///
    /// Non-object data contributes no bindings.
    pub fn from_value(data: &Value) -> Self {
        let root = match data {
            Value::Object(map) => map.as_ref().clone(),
            _ => IndexMap::new(),
        };
        Self {
            root,
            ..Default::default()
        }
    }

    /// Create a scope from JSON data.
    pub fn from_json(data: serde_json::Value) -> Self {
        Self::from_value(&Value::from(data))
    }

    /// Set a root binding.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.root.insert(name.into(), value);
    }

    // ═══════════════════════════════════════════════════════════════════
    // Frame Management
    // ═══════════════════════════════════════════════════════════════════

    /// Enter a callback frame.
    pub fn push_frame(&mut self) {
        self.frames.push(self.bindings.len());
    }

    /// Exit the current callback frame, dropping its bindings.
    ///
    /// Does nothing at the root.
    pub fn pop_frame(&mut self) {
        if let Some(boundary) = self.frames.pop() {
            self.bindings.truncate(boundary);
        }
    }

    /// Bind a name in the current frame, shadowing outer bindings.
    pub fn bind(&mut self, name: impl Into<String>, value: Value) {
        if self.frames.is_empty() {
            self.root.insert(name.into(), value);
            return;
        }
        self.bindings.push(Binding {
            name: name.into(),
            value,
        });
    }

    /// Number of open callback frames.
    pub fn frame_depth(&self) -> usize {
        self.frames.len()
    }

    // ═══════════════════════════════════════════════════════════════════
    // Nesting Depth Tracking
    // ═══════════════════════════════════════════════════════════════════

    /// Enter a nested node. Returns an error past `max_depth`.
    pub fn enter(&mut self, max_depth: usize) -> Result<(), TemplateError> {
        if self.depth >= max_depth {
            return Err(TemplateError::unsupported(format!(
                "nesting deeper than {} levels",
                max_depth
            )));
        }
        self.depth += 1;
        Ok(())
    }

    /// Leave a nested node.
    pub fn exit(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Current nesting depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    // ═══════════════════════════════════════════════════════════════════
    // Lookup
    // ═══════════════════════════════════════════════════════════════════

    /// Look up a name; missing names are `undefined`.
    pub fn lookup(&self, name: &str) -> Value {
        self.get(name).cloned().unwrap_or(Value::Undefined)
    }

    /// Look up a name, distinguishing "bound" from "missing".
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings
            .iter()
            .rev()
            .find(|b| b.name == name)
            .map(|b| &b.value)
            .or_else(|| self.root.get(name))
    }

    /// Check if a name is bound anywhere.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// All visible names, innermost first, without duplicates.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        let inner = self.bindings.iter().rev().map(|b| b.name.as_str());
        for name in inner.chain(self.root.keys().map(String::as_str)) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EvalContext;

    #[test]
    fn test_missing_is_undefined() {
        let scope = Scope::new();
        assert_eq!(scope.lookup("nope"), Value::Undefined);
        assert!(!scope.contains("nope"));
    }

    #[test]
    fn test_from_value_object() {
        let data = Value::object_from([("a", Value::Number(1.0))]);
        let scope = Scope::from_value(&data);
        assert_eq!(scope.lookup("a"), Value::Number(1.0));
    }

    #[test]
    fn test_from_value_non_object() {
        let scope = Scope::from_value(&Value::Number(3.0));
        assert!(scope.names().is_empty());
    }

    #[test]
    fn test_bind_at_root_inserts() {
        let mut scope = Scope::new();
        scope.bind("x", Value::Bool(true));
        assert_eq!(scope.frame_depth(), 0);
        assert_eq!(scope.lookup("x"), Value::Bool(true));
    }

    #[test]
    fn test_pop_frame_at_root_is_noop() {
        let mut scope = Scope::new();
        scope.insert("x", Value::Null);
        scope.pop_frame();
        assert!(scope.contains("x"));
    }

    #[test]
    fn test_names_innermost_first() {
        let mut scope = Scope::new();
        scope.insert("a", Value::Null);
        scope.push_frame();
        scope.bind("b", Value::Null);
        scope.bind("a", Value::Null);
        assert_eq!(scope.names(), vec!["a", "b"]);
    }

    #[test]
    fn test_depth_limit() {
        let ctx = EvalContext::with_max_depth(2);
        let mut scope = Scope::new();
        scope.enter(ctx.max_depth).unwrap();
        scope.enter(ctx.max_depth).unwrap();
        let err = scope.enter(ctx.max_depth).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::UnsupportedExpression);
        scope.exit();
        assert_eq!(scope.depth(), 1);
    }
}
