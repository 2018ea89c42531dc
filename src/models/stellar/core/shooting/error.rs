use thiserror::Error;
use twine_solvers::equation::bisection;

use crate::models::stellar::core::{model::SolveError, profile::Termination};

/// The surface luminosity mismatch could not be formed for a trial.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ObjectiveError {
    /// The integration stopped before reaching the photosphere.
    #[error("central density {density} kg/m^3 did not reach the photosphere ({termination:?})")]
    Unclosed {
        density: f64,
        termination: Termination,
    },

    /// The surface luminosity or temperature is not usable.
    #[error("surface luminosity is not usable at central density {density} kg/m^3")]
    Undefined { density: f64 },
}

/// Errors that prevent a central density search from running.
#[derive(Debug, Error)]
pub enum ShootingError {
    /// The bracket is not a positive, finite, increasing pair.
    #[error("invalid central density bracket [{low}, {high}] kg/m^3")]
    InvalidBracket { low: f64, high: f64 },

    /// The star cannot be set up at any central density.
    #[error("invalid star configuration")]
    Star(#[from] SolveError),

    /// The bisection solver encountered an error.
    #[error("bisection solver error")]
    Bisection(#[from] bisection::Error),
}
