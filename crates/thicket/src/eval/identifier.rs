//! Identifier evaluation

use crate::{Scope, Value};

/// Resolve a name in scope. Unbound names are `undefined`, never an error.
pub fn eval_identifier(name: &str, scope: &Scope) -> Value {
    if name == "undefined" {
        return Value::Undefined;
    }
    scope.lookup(name)
}
