//! Sequential processing of star lists.
//!
//! A star list has one star per line: `central_temperature, central_density_guess, core_type`.
//! Blank lines and lines containing `#` are skipped.

mod error;

pub use error::StarSpecError;

use log::{info, warn};
use uom::si::{
    f64::{MassDensity, ThermodynamicTemperature},
    mass_density::kilogram_per_cubic_meter,
    thermodynamic_temperature::kelvin,
};

use super::{
    config::{CoreType, StarConfig},
    shooting::{ShootingConfig, ShootingError, Shot, shoot},
};

/// One parsed star list entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarSpec {
    pub central_temperature: ThermodynamicTemperature,
    pub central_density: MassDensity,
    pub core: CoreType,
}

impl StarSpec {
    /// Parses one star list line; comments and blank lines give `None`.
    ///
    /// # Errors
    ///
    /// Returns a [`StarSpecError`] if the line does not have three fields or a
    /// field does not parse.
    pub fn from_line(line: &str) -> Result<Option<Self>, StarSpecError> {
        if line.contains('#') || line.trim().is_empty() {
            return Ok(None);
        }

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let [temperature, density, core] = fields.as_slice() else {
            return Err(StarSpecError::FieldCount {
                found: fields.len(),
            });
        };

        let number = |field: &'static str, text: &str| {
            text.parse::<f64>()
                .map_err(|source| StarSpecError::Number { field, source })
        };

        Ok(Some(Self {
            central_temperature: ThermodynamicTemperature::new::<kelvin>(number(
                "central temperature",
                temperature,
            )?),
            central_density: MassDensity::new::<kilogram_per_cubic_meter>(number(
                "central density",
                density,
            )?),
            core: core.parse()?,
        }))
    }

    /// Identifier built from the central values and core type.
    #[must_use]
    pub fn name(&self) -> String {
        format!(
            "Tc_{:.2e}_rhoc_guess{:.2e}_Core_{}",
            self.central_temperature.get::<kelvin>(),
            self.central_density.get::<kilogram_per_cubic_meter>(),
            self.core
        )
    }

    /// Configuration with the default composition and steps for the core type.
    #[must_use]
    pub fn config(&self) -> StarConfig {
        StarConfig::new(self.central_temperature, self.central_density, self.core)
    }
}

/// Result of building one star.
#[derive(Debug)]
pub enum StarOutcome {
    /// A closed star matched the blackbody within tolerance.
    Converged(Shot),
    /// The best model found, which either missed the tolerance or stopped short of the photosphere.
    Unconverged(Shot),
    Failed(ShootingError),
}

impl StarOutcome {
    #[must_use]
    pub fn shot(&self) -> Option<&Shot> {
        match self {
            Self::Converged(shot) | Self::Unconverged(shot) => Some(shot),
            Self::Failed(_) => None,
        }
    }
}

/// Runs the central density search for one star.
#[must_use]
pub fn build_star(spec: &StarSpec, config: &ShootingConfig) -> StarOutcome {
    match shoot(&spec.config(), config) {
        Ok(shot) if shot.converged() => StarOutcome::Converged(shot),
        Ok(shot) => StarOutcome::Unconverged(shot),
        Err(error) => StarOutcome::Failed(error),
    }
}

/// One non-skipped line of a star list.
#[derive(Debug)]
pub enum BatchEntry {
    Built { spec: StarSpec, outcome: StarOutcome },
    /// `line` is one-based.
    Malformed { line: usize, error: StarSpecError },
}

/// Builds every star in `list`, one after another.
///
/// Failures are logged and collected; they never stop the batch.
pub fn run_batch(list: &str, config: &ShootingConfig) -> Vec<BatchEntry> {
    let mut entries = Vec::new();

    for (index, line) in list.lines().enumerate() {
        let spec = match StarSpec::from_line(line) {
            Ok(Some(spec)) => spec,
            Ok(None) => continue,
            Err(error) => {
                warn!("skipping line {}: {error}", index + 1);
                entries.push(BatchEntry::Malformed {
                    line: index + 1,
                    error,
                });
                continue;
            }
        };

        let name = spec.name();
        info!("building {name}");
        let outcome = build_star(&spec, config);
        match &outcome {
            StarOutcome::Converged(_) => info!("{name} converged"),
            StarOutcome::Unconverged(shot) => {
                warn!("{name} did not converge (mismatch {:.3e})", shot.residual);
            }
            StarOutcome::Failed(error) => warn!("{name} failed: {error}"),
        }
        entries.push(BatchEntry::Built { spec, outcome });
    }

    entries
}
