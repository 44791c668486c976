use crate::value::Width;

/// Error type for building, evaluating and solving expressions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AlgebraError {
    #[error("unimplemented operation: {0}")]
    Unimplemented(&'static str),

    #[error("division by zero")]
    DivisionByZero,

    #[error("non-finite value: {0}")]
    NonFinite(String),

    #[error("isolation target {0} does not appear in the equation")]
    TargetNotFound(String),

    #[error("expression is deeper than the configured maximum of {max_depth}")]
    DepthExceeded { max_depth: usize },

    #[error("expected a {expected} value, found {found}")]
    WidthMismatch { expected: Width, found: Width },
}

pub type Result<T> = std::result::Result<T, AlgebraError>;
