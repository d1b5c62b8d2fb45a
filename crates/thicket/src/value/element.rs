//! Output element nodes

use indexmap::IndexMap;

use super::Value;
use crate::registry::ComponentRef;

/// Resolved attributes of an element, in template order.
pub type Props = IndexMap<String, Value>;

/// A rendered element: the unit handed to the host renderer.
///
/// Produced fresh on every render. Equality compares `tag`, `props` and
/// `children` only; the component definition is an opaque host handle.
#[derive(Clone)]
pub struct Element {
    /// Tag name as written in the template
    pub tag: String,

    /// Registry definition the tag resolved to
    pub component: ComponentRef,

    /// Resolved attributes
    pub props: Props,

    /// Normalized children: elements and primitives, never arrays or fragments
    pub children: Vec<Value>,
}

impl Element {
    /// Create an element with no props or children.
    pub fn new(tag: impl Into<String>, component: ComponentRef) -> Self {
        Self {
            tag: tag.into(),
            component,
            props: Props::new(),
            children: Vec::new(),
        }
    }

    /// Add a prop (builder pattern)
    pub fn with_prop(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(name.into(), value.into());
        self
    }

    /// Add a child (builder pattern)
    pub fn with_child(mut self, child: impl Into<Value>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Get a prop by name
    pub fn prop(&self, name: &str) -> Option<&Value> {
        self.props.get(name)
    }

    /// Iterate over the children that are elements.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Value::as_element)
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag && self.props == other.props && self.children == other.children
    }
}
