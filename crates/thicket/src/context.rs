//! Evaluation context configuration

/// Default nesting limit for expressions and markup.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Configuration for evaluation.
///
/// This is passed through all evaluation calls and controls
/// behavior like the nesting limit and tracing.
#[derive(Debug, Clone)]
pub struct EvalContext {
    /// Maximum nesting depth of evaluated nodes
    pub max_depth: usize,

    /// Whether to trace evaluation (for debugging)
    pub trace: bool,
}

impl Default for EvalContext {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            trace: false,
        }
    }
}

impl EvalContext {
    /// Create a new context with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context with a custom nesting limit.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            max_depth,
            ..Default::default()
        }
    }

    /// Enable or disable evaluation tracing (builder pattern).
    pub fn traced(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }
}
