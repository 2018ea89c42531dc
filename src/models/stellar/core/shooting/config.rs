use twine_solvers::equation::bisection;
use uom::si::{f64::MassDensity, mass_density::kilogram_per_cubic_meter};

use crate::models::stellar::core::config::CoreType;

/// Solver configuration for the central density search.
#[derive(Debug, Clone, Copy)]
pub struct ShootingConfig {
    /// Central density bracket `[low, high]`.
    ///
    /// When `None`, a bracket suited to the core type is used.
    pub bracket: Option<[MassDensity; 2]>,

    /// Maximum iteration count for the bisection.
    pub max_iters: usize,

    /// Tolerance on the normalized luminosity mismatch.
    pub residual_tol: f64,

    /// Bracket width, relative to the trial density, below which the search stops.
    pub density_rel_tol: f64,
}

impl Default for ShootingConfig {
    fn default() -> Self {
        Self {
            bracket: None,
            max_iters: 60,
            residual_tol: 1e-3,
            density_rel_tol: 1e-12,
        }
    }
}

impl ShootingConfig {
    /// Bracket in kg/m³ for the given core type.
    ///
    /// The default low ends are dilute enough that the star never closes
    /// within the default step budget, and the high ends always reach the
    /// photosphere overluminous, so the pair straddles the root.
    pub(super) fn bracket_for(&self, core: CoreType) -> [f64; 2] {
        if let Some(bracket) = self.bracket {
            return bracket.map(|density| density.get::<kilogram_per_cubic_meter>());
        }
        match core {
            CoreType::Hydrogen => [1.0e2, 1.0e7],
            CoreType::Helium => [1.0e1, 1.0e10],
            CoreType::Carbon => [1.0e1, 1.0e12],
        }
    }

    /// Converts this configuration into a bisection solver configuration.
    pub(super) fn bisection(&self) -> bisection::Config {
        bisection::Config {
            max_iters: self.max_iters,
            x_abs_tol: 0.0,
            x_rel_tol: self.density_rel_tol,
            residual_tol: self.residual_tol,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_bracket_wins() {
        let config = ShootingConfig {
            bracket: Some([
                MassDensity::new::<kilogram_per_cubic_meter>(1.0e3),
                MassDensity::new::<kilogram_per_cubic_meter>(2.0e3),
            ]),
            ..ShootingConfig::default()
        };
        assert_eq!(config.bracket_for(CoreType::Carbon), [1.0e3, 2.0e3]);

        let defaults = ShootingConfig::default();
        assert_eq!(defaults.bracket_for(CoreType::Helium), [1.0e1, 1.0e10]);
    }

    #[test]
    fn converts_to_bisection_config() {
        let config = ShootingConfig {
            max_iters: 7,
            ..ShootingConfig::default()
        }
        .bisection();
        assert_eq!(config.max_iters, 7);
        assert_eq!(config.x_rel_tol, 1e-12);
        assert_eq!(config.residual_tol, 1e-3);
    }
}
