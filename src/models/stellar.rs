//! Stellar interior structure models.
//!
//! This module provides [`twine_core::Model`] implementations that build a
//! star from its central temperature and core type.
//! The computational core is in the internal `core` module.
//!
//! # Example
//!
//! ```no_run
//! use stellar_structure::models::stellar::{CoreType, StarConfig, StellarStructure};
//! use twine_core::Model;
//! use uom::si::{
//!     f64::{MassDensity, ThermodynamicTemperature},
//!     mass_density::kilogram_per_cubic_meter,
//!     thermodynamic_temperature::kelvin,
//! };
//!
//! let star = StarConfig::new(
//!     ThermodynamicTemperature::new::<kelvin>(1.5e7),
//!     MassDensity::new::<kilogram_per_cubic_meter>(1.0e5),
//!     CoreType::Hydrogen,
//! );
//!
//! let shot = StellarStructure::default().call(&star).unwrap();
//! if let Some(surface) = shot.solution.surface() {
//!     println!("R = {:?}, L = {:?}", surface.radius, surface.luminosity);
//! }
//! ```

pub(crate) mod core;

use twine_core::Model;

pub use self::core::{
    Algebraic, AlgebraicVariable, BatchEntry, BoundaryIssue, Bracket, Column, Composition,
    CompositionError, ConfigError, CoreType, CoreTypeError, Derivative, DivergenceError,
    EnergyRates, ObjectiveError, Order, Physics, Profile, SearchStatus, ShootingConfig,
    ShootingError, Shot, Solution, SolveError, StarConfig, StarOutcome, StarSpec, StarSpecError,
    StateVariable, Stats, StellarModel, StepConfig, StepEvent, StepRecord, Surface, Termination,
    Trial, TrialOutcome, VariableError, build_star, run_batch, shoot,
};

/// Builds a star by bisecting its central density.
///
/// The central density of the input only matters when it is used as a
/// [`FixedCentralDensity`] input; here the search bracket comes from
/// [`ShootingConfig`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StellarStructure {
    pub shooting: ShootingConfig,
}

impl Model for StellarStructure {
    type Input = StarConfig;
    type Output = Shot;
    type Error = ShootingError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        shoot(input, &self.shooting)
    }
}

/// Integrates a single star at the configured central density.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedCentralDensity;

impl Model for FixedCentralDensity {
    type Input = StarConfig;
    type Output = Solution;
    type Error = SolveError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        StellarModel::new(input)?.solve()
    }
}
