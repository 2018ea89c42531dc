//! Configuration for a single stellar structure integration.

mod error;

pub use error::{CompositionError, ConfigError, CoreTypeError};

use std::{fmt, str::FromStr};

use uom::si::{
    f64::{Length, MassDensity, ThermodynamicTemperature},
    length::meter,
    mass_density::kilogram_per_cubic_meter,
    thermodynamic_temperature::kelvin,
};

use crate::support::constraint::{
    Constrained, Constraint, NonNegative, StrictlyPositive, UnitInterval,
};

use super::variable::{BoundaryIssue, VariableError};

/// Nuclear fuel assumed to dominate energy generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoreType {
    /// Proton-proton chain plus CNO cycle.
    Hydrogen,
    /// Triple-alpha process.
    Helium,
    /// Carbon-carbon fusion.
    Carbon,
}

impl CoreType {
    /// Short symbol used in star lists and generated names.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Hydrogen => "H",
            Self::Helium => "He",
            Self::Carbon => "C",
        }
    }
}

impl fmt::Display for CoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for CoreType {
    type Err = CoreTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "h" | "hydrogen" => Ok(Self::Hydrogen),
            "he" | "helium" => Ok(Self::Helium),
            "c" | "carbon" => Ok(Self::Carbon),
            _ => Err(CoreTypeError {
                token: s.trim().to_owned(),
            }),
        }
    }
}

/// Mass fractions of the stellar material.
///
/// Hydrogen (X), helium (Y) and metals (Z) must sum to at most one.
/// The carbon fraction only feeds carbon burning and is independent of the sum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Composition {
    hydrogen: Constrained<f64, UnitInterval>,
    helium: Constrained<f64, UnitInterval>,
    metals: Constrained<f64, UnitInterval>,
    carbon: Constrained<f64, UnitInterval>,
}

/// Slack allowed when checking `X + Y + Z ≤ 1`.
const FRACTION_SUM_SLACK: f64 = 1e-9;

impl Composition {
    /// Creates a composition from mass fractions.
    ///
    /// # Errors
    ///
    /// Returns a [`CompositionError`] if any fraction is outside `[0, 1]`
    /// or if `X + Y + Z` exceeds one.
    pub fn new(
        hydrogen: f64,
        helium: f64,
        metals: f64,
        carbon: f64,
    ) -> Result<Self, CompositionError> {
        let fraction = |name: &'static str, value: f64| {
            UnitInterval::new(value).map_err(|source| CompositionError::Fraction { name, source })
        };

        let composition = Self {
            hydrogen: fraction("hydrogen", hydrogen)?,
            helium: fraction("helium", helium)?,
            metals: fraction("metals", metals)?,
            carbon: fraction("carbon", carbon)?,
        };

        let sum = hydrogen + helium + metals;
        if sum > 1.0 + FRACTION_SUM_SLACK {
            return Err(CompositionError::SumExceedsOne { sum });
        }

        Ok(composition)
    }

    /// Typical composition for the given burning regime.
    ///
    /// Hydrogen burning uses the default mix; helium and carbon cores are
    /// hydrogen-free.
    #[must_use]
    pub fn for_core(core: CoreType) -> Self {
        let (x, y, z, c) = match core {
            CoreType::Hydrogen => (0.55, 0.43, 0.02, 0.0),
            CoreType::Helium => (0.0, 0.98, 0.02, 0.0),
            CoreType::Carbon => (0.0, 0.0, 1.0, 0.5),
        };
        Self::new(x, y, z, c).unwrap_or_default()
    }

    #[must_use]
    pub fn hydrogen(&self) -> f64 {
        self.hydrogen.into_inner()
    }

    #[must_use]
    pub fn helium(&self) -> f64 {
        self.helium.into_inner()
    }

    #[must_use]
    pub fn metals(&self) -> f64 {
        self.metals.into_inner()
    }

    #[must_use]
    pub fn carbon(&self) -> f64 {
        self.carbon.into_inner()
    }
}

impl Default for Composition {
    /// X = 0.55, Y = 0.43, Z = 0.02, no carbon.
    fn default() -> Self {
        let fraction = |value: f64| UnitInterval::new(value).unwrap_or(UnitInterval::zero());
        Self {
            hydrogen: fraction(0.55),
            helium: fraction(0.43),
            metals: fraction(0.02),
            carbon: UnitInterval::zero(),
        }
    }
}

/// Adaptive step control settings.
#[derive(Debug, Clone, Copy)]
pub struct StepConfig {
    /// Step size of the first attempt.
    pub initial: Length,

    /// Smallest step the controller may take.
    pub min: Length,

    /// Largest step the controller may take.
    pub max: Length,

    /// Maximum accepted relative truncation error per step.
    pub error_threshold: f64,

    /// Accepted step count after which the integration gives up.
    pub max_steps: usize,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            initial: Length::new::<meter>(1.4e3),
            min: Length::new::<meter>(1.0e-2),
            max: Length::new::<meter>(5.0e6),
            error_threshold: 1e-5,
            max_steps: 5000,
        }
    }
}

/// Step settings reduced to SI numbers for the integrator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepLimits {
    pub initial: f64,
    pub min: f64,
    pub max: f64,
    pub error_threshold: f64,
    pub max_steps: usize,
}

impl StepConfig {
    /// Validates the settings and converts them into [`StepLimits`].
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a size or the threshold is not strictly
    /// positive, or if `min > max`.
    pub fn limits(&self) -> Result<StepLimits, ConfigError> {
        let positive = |field: &'static str, value: f64| {
            StrictlyPositive::new(value)
                .map(Constrained::into_inner)
                .map_err(|source| ConfigError::OutOfRange { field, source })
        };

        let min = positive("step.min", self.min.get::<meter>())?;
        let max = positive("step.max", self.max.get::<meter>())?;
        if min > max || !max.is_finite() {
            return Err(ConfigError::StepRange { min, max });
        }

        Ok(StepLimits {
            initial: positive("step.initial", self.initial.get::<meter>())?.clamp(min, max),
            min,
            max,
            error_threshold: positive("step.error_threshold", self.error_threshold)?,
            max_steps: self.max_steps,
        })
    }
}

/// Inputs for one integration from the centre outwards.
#[derive(Debug, Clone, Copy)]
pub struct StarConfig {
    pub central_temperature: ThermodynamicTemperature,

    /// Central density (the shooting parameter).
    pub central_density: MassDensity,

    /// Optical depth assigned to the starting radius.
    pub central_optical_depth: f64,

    /// Radius where integration starts; must be small but non-zero.
    pub start_radius: Length,

    pub core: CoreType,
    pub composition: Composition,
    pub steps: StepConfig,
}

impl StarConfig {
    /// Creates a configuration with default composition and step settings for `core`.
    #[must_use]
    pub fn new(
        central_temperature: ThermodynamicTemperature,
        central_density: MassDensity,
        core: CoreType,
    ) -> Self {
        Self {
            central_temperature,
            central_density,
            central_optical_depth: 0.0,
            start_radius: Length::new::<meter>(700.0),
            core,
            composition: Composition::for_core(core),
            steps: StepConfig::default(),
        }
    }

    /// Returns a copy with a different central density.
    #[must_use]
    pub fn with_central_density(&self, central_density: MassDensity) -> Self {
        Self {
            central_density,
            ..*self
        }
    }

    /// Validated central boundary values in SI units.
    ///
    /// # Errors
    ///
    /// Returns [`VariableError::InvalidBoundary`] if a central value is not
    /// physically meaningful.
    pub(super) fn central(&self) -> Result<Central, VariableError> {
        fn check<C: Constraint<f64>>(
            quantity: &'static str,
            value: f64,
        ) -> Result<f64, VariableError> {
            if !value.is_finite() {
                return Err(VariableError::InvalidBoundary {
                    quantity,
                    issue: BoundaryIssue::NonFinite,
                });
            }
            Constrained::<f64, C>::new(value)
                .map(Constrained::into_inner)
                .map_err(|source| VariableError::InvalidBoundary {
                    quantity,
                    issue: BoundaryIssue::OutOfRange(source),
                })
        }

        Ok(Central {
            radius: check::<StrictlyPositive>("radius", self.start_radius.get::<meter>())?,
            density: check::<StrictlyPositive>(
                "density",
                self.central_density.get::<kilogram_per_cubic_meter>(),
            )?,
            temperature: check::<StrictlyPositive>(
                "temperature",
                self.central_temperature.get::<kelvin>(),
            )?,
            optical_depth: check::<NonNegative>("optical depth", self.central_optical_depth)?,
        })
    }
}

/// Central boundary values in SI units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Central {
    pub radius: f64,
    pub density: f64,
    pub temperature: f64,
    pub optical_depth: f64,
}
