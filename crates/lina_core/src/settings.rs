use serde::{Deserialize, Serialize};

/// Limits applied by `Operand::evaluate_with`. Plain `evaluate` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationSettings {
    /// Deepest operation nesting `evaluate_with` accepts. A lone value has depth 0.
    pub max_depth: usize,
}

impl Default for EvaluationSettings {
    fn default() -> Self {
        Self { max_depth: 1024 }
    }
}

impl EvaluationSettings {
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }
}
