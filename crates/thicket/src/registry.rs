//! Component registry: the host-supplied table of renderable definitions
//!
//! The interpreter resolves every element tag through a [`ComponentRegistry`]
//! and never looks inside the definitions it finds there. Hosts implement
//! [`Component`] for whatever their renderer invokes with props and
//! children, register it under a tag, and optionally mark tags as leaves
//! (text-bearing components that render only from their props).

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

/// A renderable definition supplied by the embedding host.
pub trait Component: Send + Sync {
    /// Name used in diagnostics and debugging output.
    fn display_name(&self) -> &str;
}

/// Shared handle to a registered component.
pub type ComponentRef = Arc<dyn Component>;

impl fmt::Debug for dyn Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<component {}>", self.display_name())
    }
}

/// A component known only by name.
///
/// Useful when the host renderer dispatches on the element tag itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentDef {
    /// The component's name
    pub name: String,
}

impl ComponentDef {
    /// Create a named definition.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Create a named definition behind a shared handle.
    pub fn shared(name: impl Into<String>) -> ComponentRef {
        Arc::new(Self::new(name))
    }
}

impl Component for ComponentDef {
    fn display_name(&self) -> &str {
        &self.name
    }
}

/// Mapping from tag name to component definition.
///
/// # Example
///
/// ```
/// use thicket::{ComponentDef, ComponentRegistry};
///
/// let mut base = ComponentRegistry::new();
/// base.register_named("Card");
/// base.register_named("Text");
/// base.mark_leaf("Text");
///
/// let mut overrides = ComponentRegistry::new();
/// overrides.register("Card", ComponentDef::shared("FancyCard"));
///
/// let merged = base.merged(&overrides);
/// assert_eq!(merged.get("Card").unwrap().display_name(), "FancyCard");
/// assert!(merged.is_leaf("Text"));
/// ```
#[derive(Clone, Default)]
pub struct ComponentRegistry {
    /// Registered components, in registration order
    components: IndexMap<String, ComponentRef>,

    /// Tags whose explicit children are discarded
    leaf_tags: HashSet<String>,
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("tags", &self.components.keys().collect::<Vec<_>>())
            .field("leaf_tags", &self.leaf_tags)
            .finish()
    }
}

impl ComponentRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component under a tag, replacing any previous entry.
    pub fn register(&mut self, tag: impl Into<String>, component: ComponentRef) {
        self.components.insert(tag.into(), component);
    }

    /// Register a [`ComponentDef`] named after its tag.
    pub fn register_named(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        let def = ComponentDef::shared(tag.clone());
        self.components.insert(tag, def);
    }

    /// Add a tag to the leaf allowlist.
    pub fn mark_leaf(&mut self, tag: impl Into<String>) {
        self.leaf_tags.insert(tag.into());
    }

    /// Look up the component for a tag.
    pub fn get(&self, tag: &str) -> Option<&ComponentRef> {
        self.components.get(tag)
    }

    /// Check if a tag is registered.
    pub fn contains(&self, tag: &str) -> bool {
        self.components.contains_key(tag)
    }

    /// Check if a tag's explicit children are discarded.
    pub fn is_leaf(&self, tag: &str) -> bool {
        self.leaf_tags.contains(tag)
    }

    /// Registered tags in registration order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }

    /// Number of registered tags.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Combine this registry with caller overrides; overrides win on collision.
    ///
    /// Leaf markings are unioned.
    pub fn merged(&self, overrides: &ComponentRegistry) -> ComponentRegistry {
        let mut merged = self.clone();
        for (tag, component) in &overrides.components {
            merged.components.insert(tag.clone(), Arc::clone(component));
        }
        merged
            .leaf_tags
            .extend(overrides.leaf_tags.iter().cloned());
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_get() {
        let mut registry = ComponentRegistry::new();
        registry.register_named("Row");
        assert!(registry.contains("Row"));
        assert_eq!(registry.get("Row").unwrap().display_name(), "Row");
        assert!(registry.get("Col").is_none());
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = ComponentRegistry::new();
        registry.register_named("Row");
        registry.register("Row", ComponentDef::shared("CustomRow"));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("Row").unwrap().display_name(), "CustomRow");
    }

    #[test]
    fn test_merge_override_wins() {
        let mut base = ComponentRegistry::new();
        base.register_named("Card");
        base.register_named("Row");

        let mut overrides = ComponentRegistry::new();
        overrides.register("Row", ComponentDef::shared("MyRow"));
        overrides.register_named("Extra");
        overrides.mark_leaf("Extra");

        let merged = base.merged(&overrides);
        assert_eq!(merged.tags().collect::<Vec<_>>(), vec!["Card", "Row", "Extra"]);
        assert_eq!(merged.get("Row").unwrap().display_name(), "MyRow");
        assert!(merged.is_leaf("Extra"));
        // The base is untouched
        assert_eq!(base.get("Row").unwrap().display_name(), "Row");
    }
}
