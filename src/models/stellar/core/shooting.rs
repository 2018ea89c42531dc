//! Central density search matching the surface to a blackbody.
//!
//! The central temperature is fixed; the central density is bisected until
//! the integrated surface luminosity agrees with `4πR²σT⁴` at the trimmed
//! surface radius and temperature.
//!
//! Trials that never reach the photosphere are dilute stars that do not
//! close, so they count as lying below the root. Trials that diverge count
//! as lying above it.

mod config;
mod error;
mod problem;
mod trial;

pub use config::ShootingConfig;
pub use error::{ObjectiveError, ShootingError};
pub use trial::{Bracket, Trial, TrialOutcome};

use log::{info, warn};
use twine_solvers::equation::bisection;
use uom::si::{f64::MassDensity, mass_density::kilogram_per_cubic_meter};

use crate::support::constraint::StrictlyPositive;

use super::{config::StarConfig, model::StellarModel, profile::Solution};

use problem::{LuminosityProblem, TrialModel};
use trial::bracket_history;

/// How a search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchStatus {
    /// A trial that reached the photosphere matched the blackbody within tolerance.
    Converged,
    /// The bracket narrowed below the relative tolerance without a match.
    ///
    /// This happens when the sign change is a jump, typically between stars
    /// that close and stars that do not.
    BracketCollapsed,
    /// The iteration cap was reached first.
    MaxIters,
}

impl SearchStatus {
    #[must_use]
    pub fn is_converged(self) -> bool {
        self == Self::Converged
    }
}

/// Outcome of a central density search.
#[derive(Debug, Clone, PartialEq)]
pub struct Shot {
    /// Closed solution with the smallest luminosity mismatch seen.
    pub solution: Solution,
    /// Luminosity mismatch of `solution`.
    pub residual: f64,
    pub status: SearchStatus,
    /// Iterations performed by the bisection.
    pub iters: usize,
    /// Every trial, in evaluation order.
    pub trials: Vec<Trial>,
    /// Starting bracket followed by the bracket after each midpoint.
    pub brackets: Vec<Bracket>,
}

impl Shot {
    #[must_use]
    pub fn converged(&self) -> bool {
        self.status.is_converged()
    }

    #[must_use]
    pub fn central_density(&self) -> MassDensity {
        self.solution.central_density
    }
}

/// Bisects the central density of `star` until the surface luminosity matches a blackbody.
///
/// The central density in `star` is ignored; the bracket comes from `config`.
///
/// # Errors
///
/// Returns a [`ShootingError`] if the bracket is invalid, the star cannot be
/// set up, or the solver fails (for example when the endpoints do not
/// straddle the root).
pub fn shoot(star: &StarConfig, config: &ShootingConfig) -> Result<Shot, ShootingError> {
    let [low, high] = config.bracket_for(star.core);
    let valid = |density: f64| density.is_finite() && StrictlyPositive::new(density).is_ok();
    if !valid(low) || !valid(high) || low >= high {
        return Err(ShootingError::InvalidBracket { low, high });
    }

    // Setup problems do not depend on the central density.
    let lowest = MassDensity::new::<kilogram_per_cubic_meter>(low);
    StellarModel::new(&star.with_central_density(lowest))?;

    let model = TrialModel::new(star);
    let problem = LuminosityProblem;

    let solution = bisection::solve(
        &model,
        &problem,
        [low, high],
        &config.bisection(),
        |event: &bisection::Event<'_, _, _>| {
            // Unusable trials are placed by why they failed.
            if event.result().is_err() {
                let high_side = model
                    .last_trial()
                    .is_none_or(|trial| trial.outcome.is_high());
                return Some(if high_side {
                    bisection::Action::assume_positive()
                } else {
                    bisection::Action::assume_negative()
                });
            }
            None
        },
    )?;

    let residual = solution.residual;
    let best = solution.snapshot.output;
    let status = if solution.status != bisection::Status::Converged {
        SearchStatus::MaxIters
    } else if best.success() && residual.abs() < config.residual_tol {
        SearchStatus::Converged
    } else {
        SearchStatus::BracketCollapsed
    };

    let trials = model.into_trials();
    let shot = Shot {
        brackets: bracket_history(&trials, low, high),
        trials,
        solution: best,
        residual,
        status,
        iters: solution.iters,
    };

    let density = shot.central_density().get::<kilogram_per_cubic_meter>();
    match shot.status {
        SearchStatus::Converged => info!(
            "central density converged to {density:.6e} kg/m^3 after {} iterations (mismatch {:.3e})",
            shot.iters, shot.residual
        ),
        SearchStatus::BracketCollapsed => warn!(
            "central density bracket collapsed at {density:.6e} kg/m^3 without a match (mismatch {:.3e})",
            shot.residual
        ),
        SearchStatus::MaxIters => warn!(
            "central density search stopped after {} iterations at {density:.6e} kg/m^3 (mismatch {:.3e})",
            shot.iters, shot.residual
        ),
    }

    Ok(shot)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{f64::ThermodynamicTemperature, thermodynamic_temperature::kelvin};
    use twine_core::Model;

    use crate::models::stellar::core::{
        config::CoreType,
        model::SolveError,
        profile::Column,
        relation::Derivative,
        test_support::sun_like,
        variable::VariableError,
    };

    fn with_bracket(low: f64, high: f64) -> ShootingConfig {
        ShootingConfig {
            bracket: Some([
                MassDensity::new::<kilogram_per_cubic_meter>(low),
                MassDensity::new::<kilogram_per_cubic_meter>(high),
            ]),
            ..ShootingConfig::default()
        }
    }

    fn star(temperature: f64, core: CoreType) -> StarConfig {
        StarConfig::new(
            ThermodynamicTemperature::new::<kelvin>(temperature),
            MassDensity::new::<kilogram_per_cubic_meter>(1.0e5),
            core,
        )
    }

    #[test]
    fn rejects_inverted_bracket() {
        let err = shoot(&sun_like(), &with_bracket(5.0e6, 3.0e2)).unwrap_err();
        assert!(matches!(err, ShootingError::InvalidBracket { .. }));

        let err = shoot(&sun_like(), &with_bracket(0.0, 3.0e2)).unwrap_err();
        assert!(matches!(err, ShootingError::InvalidBracket { .. }));
    }

    #[test]
    fn invalid_star_is_rejected_before_searching() {
        let star = StarConfig {
            central_temperature: ThermodynamicTemperature::new::<kelvin>(-1.0),
            ..sun_like()
        };
        let err = shoot(&star, &ShootingConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            ShootingError::Star(SolveError::Variable(VariableError::InvalidBoundary { .. }))
        ));
    }

    #[test]
    fn matches_a_blackbody_surface() {
        // The tolerance sits above the jitter that trimming to a grid point
        // puts on the mismatch.
        let config = ShootingConfig {
            residual_tol: 0.1,
            ..with_bracket(3.0e4, 1.0e5)
        };
        let shot = shoot(&star(5.0e6, CoreType::Hydrogen), &config).unwrap();

        assert!(shot.converged(), "{:?} {}", shot.status, shot.residual);
        assert!(shot.residual.abs() < config.residual_tol);
        assert!(shot.solution.success());
        assert!(
            shot.solution
                .luminosity_mismatch()
                .is_some_and(|f| f.abs() < config.residual_tol)
        );

        let surface = shot.solution.surface().unwrap();
        assert_relative_eq!(
            surface.luminosity.value,
            surface.blackbody_luminosity().value,
            max_relative = 0.15
        );

        let density = shot.central_density().get::<kilogram_per_cubic_meter>();
        assert!(density > 3.0e4 && density < 1.0e5);
        assert_eq!(
            shot.solution.profile.column(Column::Value(Derivative::Density))[0],
            density
        );
    }

    #[test]
    fn every_bracket_straddles_the_root() {
        let config = ShootingConfig {
            max_iters: 8,
            ..with_bracket(3.0e4, 1.0e5)
        };
        let shot = shoot(&star(5.0e6, CoreType::Hydrogen), &config).unwrap();

        let first = shot.brackets[0];
        assert_eq!(first.low.density, 3.0e4);
        assert_eq!(first.high.density, 1.0e5);
        assert!(matches!(first.low.outcome, TrialOutcome::Unclosed(_)));
        assert!(first.high.outcome.residual().is_some_and(|f| f > 0.0));

        assert!(shot.brackets.len() > 1);
        assert!(shot.brackets.iter().all(Bracket::changes_sign));
        for pair in shot.brackets.windows(2) {
            let (before, after) = (pair[0], pair[1]);
            assert!(after.width() <= before.width());
            // The new bracket keeps one end of the old one.
            assert!(after.low == before.low || after.high == before.high);
        }
    }

    #[test]
    fn step_jump_is_not_reported_as_a_match() {
        // Near 1.5e7 K every closed hydrogen star is overluminous; the sign
        // change is the jump to stars that do not close.
        let shot = shoot(&sun_like(), &ShootingConfig::default()).unwrap();

        assert!(!shot.converged());
        assert!(shot.residual.abs() >= ShootingConfig::default().residual_tol);
        assert!(shot.solution.success());
        assert!(shot.residual > 0.0);
    }

    #[test]
    fn default_brackets_straddle_the_root() {
        let cases = [
            (CoreType::Hydrogen, 1.5e7),
            (CoreType::Hydrogen, 3.5e7),
            (CoreType::Helium, 1.0e8),
            (CoreType::Helium, 2.0e8),
            (CoreType::Carbon, 6.0e8),
            (CoreType::Carbon, 1.0e9),
        ];

        for (core, temperature) in cases {
            let star = star(temperature, core);
            let [low, high] = ShootingConfig::default().bracket_for(core);
            let model = TrialModel::new(&star);
            for density in [low, high] {
                let _ = model.call(&MassDensity::new::<kilogram_per_cubic_meter>(density));
            }

            let trials = model.into_trials();
            assert!(
                !trials[0].outcome.is_high(),
                "{core} at {temperature:e} K: low end {:?}",
                trials[0].outcome
            );
            assert!(
                trials[1].outcome.residual().is_some_and(|f| f > 0.0),
                "{core} at {temperature:e} K: high end {:?}",
                trials[1].outcome
            );
        }
    }
}
