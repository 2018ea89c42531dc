use thiserror::Error;

use crate::support::constraint::ConstraintError;

/// Errors raised by state and algebraic variable containers.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum VariableError {
    /// A boundary value was set twice, is missing, or is not physical.
    #[error("invalid boundary for {quantity}: {issue}")]
    InvalidBoundary {
        quantity: &'static str,
        issue: BoundaryIssue,
    },

    /// A commit targeted a step other than the one the variable expects next.
    #[error("inconsistent step for {quantity}: expected step {expected}, found {found}")]
    InconsistentStep {
        quantity: &'static str,
        expected: usize,
        found: usize,
    },
}

/// What was wrong with a boundary value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BoundaryIssue {
    #[error("boundary value already set")]
    AlreadySet,

    /// The derivative column was seeded before the value column.
    #[error("boundary value missing")]
    ValueMissing,

    #[error("{0}")]
    OutOfRange(ConstraintError),

    #[error("value is not finite")]
    NonFinite,
}
