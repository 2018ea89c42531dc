use std::num::ParseFloatError;

use thiserror::Error;

use crate::models::stellar::core::config::CoreTypeError;

/// A star list line that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StarSpecError {
    #[error("expected 3 comma-separated fields, found {found}")]
    FieldCount { found: usize },

    #[error("invalid {field}")]
    Number {
        field: &'static str,
        source: ParseFloatError,
    },

    #[error(transparent)]
    Core(#[from] CoreTypeError),
}
