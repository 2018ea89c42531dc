use thiserror::Error;

/// The step size controller produced a non-finite step.
///
/// This happens when the truncation error estimate is itself not a number,
/// typically because the state left the physical domain mid-step.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("step size diverged at r={radius} m: step={step} m, error={error}")]
pub struct DivergenceError {
    /// Radius at the start of the failed attempt.
    pub radius: f64,
    /// Step size of the failed attempt.
    pub step: f64,
    /// Error estimate of the failed attempt.
    pub error: f64,
}
