//! Evaluation context configuration

/// Default maximum tree depth walked by the evaluator.
pub const DEFAULT_MAX_DEPTH: usize = 1000;

/// Configuration for evaluation.
///
/// This is passed through all evaluation calls and controls
/// behavior like recursion limits and tracing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalContext {
    /// Maximum operation depth (stack overflow protection)
    pub max_depth: usize,

    /// Whether to trace evaluation of every operation node
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

    /// Create a context with a custom depth limit.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            max_depth,
            ..Default::default()
        }
    }

    /// Enable or disable per-node tracing (builder pattern).
    pub fn traced(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let ctx = EvalContext::new();
        assert_eq!(ctx.max_depth, DEFAULT_MAX_DEPTH);
        assert!(!ctx.trace);
    }

    #[test]
    fn test_builders() {
        let ctx = EvalContext::with_max_depth(3).traced(true);
        assert_eq!(ctx.max_depth, 3);
        assert!(ctx.trace);
    }
}
