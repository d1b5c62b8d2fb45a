//! Value representation for runtime values

mod coerce;
mod display;
mod element;
mod impls;
mod serde_impls;

pub use coerce::{format_number, loose_equals, strict_equals, string_to_number};
pub use element::{Element, Props};

use indexmap::IndexMap;
use std::sync::Arc;

/// Runtime value produced by evaluating a template.
///
/// Values mirror the data model of the JSON-like scope objects templates are
/// evaluated against, plus the two markup results:
/// - Primitives: `undefined`, `null`, booleans, numbers, strings
/// - Compound data: arrays and objects (Arc-wrapped, cheap to clone)
/// - Markup: rendered elements and tagless fragments
#[derive(Clone, Default)]
pub enum Value {
    // ═══════════════════════════════════════════════════════════════════
    // Primitives
    // ═══════════════════════════════════════════════════════════════════
    /// Absent value: missing identifiers, missing properties
    #[default]
    Undefined,

    /// Explicit `null`
    Null,

    /// Boolean: `true` or `false`
    Bool(bool),

    /// All numbers are double precision, as in the data the templates consume
    Number(f64),

    /// Immutable string
    String(Arc<str>),

    // ═══════════════════════════════════════════════════════════════════
    // Compound Data
    // ═══════════════════════════════════════════════════════════════════
    /// Ordered sequence
    Array(Arc<Vec<Value>>),

    /// Insertion-ordered key/value mapping
    Object(Arc<IndexMap<String, Value>>),

    // ═══════════════════════════════════════════════════════════════════
    // Markup Results
    // ═══════════════════════════════════════════════════════════════════
    /// A rendered element node
    Element(Arc<Element>),

    /// Flattened children of a fragment, with no tag of their own
    Fragment(Arc<Vec<Value>>),
}
