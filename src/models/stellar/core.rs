//! Stellar interior structure integration and central density shooting.
//!
//! A [`StellarModel`] integrates density, temperature, mass, luminosity and
//! optical depth outward from a small starting radius with an adaptive
//! RKF45 step, stops near the photosphere and trims its histories to
//! `τ_∞ − τ = 2/3`. [`shoot`] bisects the central density until the trimmed
//! surface radiates like a blackbody.

mod batch;
mod config;
mod integrate;
mod model;
mod physics;
mod profile;
mod relation;
mod shooting;
mod variable;

#[cfg(test)]
mod test_support;

pub use batch::{BatchEntry, StarOutcome, StarSpec, StarSpecError, build_star, run_batch};
pub use config::{
    Composition, CompositionError, ConfigError, CoreType, CoreTypeError, StarConfig, StepConfig,
};
pub use integrate::DivergenceError;
pub use model::{SolveError, Stats, StellarModel, StepEvent, StepRecord};
pub use physics::{EnergyRates, Physics};
pub use profile::{Column, Profile, Solution, Surface, Termination};
pub use relation::{Algebraic, Derivative};
pub use shooting::{
    Bracket, ObjectiveError, SearchStatus, ShootingConfig, ShootingError, Shot, Trial,
    TrialOutcome, shoot,
};
pub use variable::{AlgebraicVariable, BoundaryIssue, Order, StateVariable, VariableError};
