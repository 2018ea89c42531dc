use thiserror::Error;

use crate::support::constraint::ConstraintError;

/// Invalid mass fractions.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CompositionError {
    /// A single fraction lies outside `[0, 1]`.
    #[error("{name} fraction is invalid: {source}")]
    Fraction {
        name: &'static str,
        source: ConstraintError,
    },

    /// Hydrogen, helium and metals add up to more than one.
    #[error("mass fractions sum to {sum}, which exceeds one")]
    SumExceedsOne { sum: f64 },
}

/// Invalid integration settings.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} is out of range: {source}")]
    OutOfRange {
        field: &'static str,
        source: ConstraintError,
    },

    /// The minimum step exceeds the maximum step, or the maximum is unbounded.
    #[error("invalid step range: min={min} m, max={max} m")]
    StepRange { min: f64, max: f64 },
}

/// Unrecognized core type token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown core type `{token}` (expected H, He or C)")]
pub struct CoreTypeError {
    pub token: String,
}
