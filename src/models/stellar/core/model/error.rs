use thiserror::Error;

use crate::models::stellar::core::{
    config::ConfigError, integrate::DivergenceError, variable::VariableError,
};

/// Errors that end a single stellar model integration.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SolveError {
    #[error("invalid step settings")]
    Config(#[from] ConfigError),

    /// A boundary value was invalid or the variables fell out of step.
    #[error("variable error")]
    Variable(#[from] VariableError),

    #[error("integration diverged")]
    Divergence(#[from] DivergenceError),
}
