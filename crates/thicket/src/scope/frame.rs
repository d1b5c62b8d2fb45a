//! RAII scope guard for automatic frame cleanup

use super::Scope;

/// RAII guard that pops a callback frame when dropped.
///
/// Used by `.map()` evaluation so a failing callback still leaves the
/// scope balanced.
///
/// # Example
///
/// ```
/// use thicket::{Scope, Value};
///
/// let mut scope = Scope::new();
/// scope.insert("x", Value::Number(1.0));
///
/// {
///     let mut guard = scope.frame();
///     guard.bind("y", Value::Number(2.0));
///     // y is visible here
/// }
/// // guard dropped, frame popped, y is gone
/// assert!(!scope.contains("y"));
/// assert!(scope.contains("x"));
/// ```
pub struct ScopeGuard<'a> {
    scope: &'a mut Scope,
}

impl Scope {
    /// Push a frame now and pop it when the returned guard drops.
    pub fn frame(&mut self) -> ScopeGuard<'_> {
        self.push_frame();
        ScopeGuard { scope: self }
    }
}

impl<'a> Drop for ScopeGuard<'a> {
    fn drop(&mut self) {
        self.scope.pop_frame();
    }
}

impl<'a> std::ops::Deref for ScopeGuard<'a> {
    type Target = Scope;

    fn deref(&self) -> &Self::Target {
        self.scope
    }
}

impl<'a> std::ops::DerefMut for ScopeGuard<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.scope
    }
}
