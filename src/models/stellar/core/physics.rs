//! Constitutive physics: equation of state, opacity and nuclear energy rates.
//!
//! Every law here is a pure function of local density and temperature plus
//! the immutable composition captured in [`Physics`].
//! All quantities are SI: kg m⁻³, K, m² kg⁻¹, W kg⁻¹, Pa.

use std::f64::consts::PI;

use super::config::{Composition, CoreType};

/// Gravitational constant \[m³ kg⁻¹ s⁻²\].
pub const G: f64 = 6.674e-11;
/// Speed of light \[m s⁻¹\].
pub const C: f64 = 2.998e8;
/// Reduced Planck constant \[J s\].
pub const HBAR: f64 = 1.055e-34;
/// Electron mass \[kg\].
pub const M_E: f64 = 9.109e-31;
/// Proton mass \[kg\].
pub const M_P: f64 = 1.673e-27;
/// Boltzmann constant \[J K⁻¹\].
pub const K_B: f64 = 1.381e-23;
/// Radiation constant \[J m⁻³ K⁻⁴\].
pub const A_RAD: f64 = 7.566e-16;
/// Stefan–Boltzmann constant \[W m⁻² K⁻⁴\].
pub const SIGMA: f64 = 5.670e-8;
/// Adiabatic index of a monatomic ideal gas.
pub const GAMMA: f64 = 5.0 / 3.0;

/// Electron scattering opacity coefficient \[m² kg⁻¹\].
const KAPPA_ES: f64 = 0.02;
/// Free-free (Kramers) opacity coefficient.
const KAPPA_FF: f64 = 1.0e24;
/// H⁻ opacity coefficient.
const KAPPA_H_MINUS: f64 = 2.5e-32;

/// Proton-proton chain coefficient \[W kg⁻¹\].
const EPSILON_PP: f64 = 1.07e-7;
/// CNO cycle coefficient \[W kg⁻¹\].
const EPSILON_CNO: f64 = 8.24e-26;
/// CNO catalyst mass fraction relative to hydrogen.
const CNO_FRACTION_OF_X: f64 = 0.03;
/// Triple-alpha coefficient \[W m⁶ kg⁻³\].
const EPSILON_3ALPHA: f64 = 3.86e-18;
/// Carbon burning coefficient \[W kg⁻¹\].
const EPSILON_CARBON: f64 = 1.0e-20;

/// Immutable physics table for one model run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Physics {
    hydrogen: f64,
    helium: f64,
    metals: f64,
    carbon: f64,
    mu: f64,
    core: CoreType,
}

impl Physics {
    /// Builds the physics table for a composition and burning regime.
    #[must_use]
    pub fn new(composition: &Composition, core: CoreType) -> Self {
        let hydrogen = composition.hydrogen();
        let helium = composition.helium();
        let metals = composition.metals();
        Self {
            hydrogen,
            helium,
            metals,
            carbon: composition.carbon(),
            mu: 1.0 / (2.0 * hydrogen + 0.75 * helium + 0.5 * metals),
            core,
        }
    }

    /// Mean molecular weight of a fully ionized gas.
    #[must_use]
    pub fn mean_molecular_weight(&self) -> f64 {
        self.mu
    }

    /// Burning regime that feeds the total energy generation.
    #[must_use]
    pub fn core(&self) -> CoreType {
        self.core
    }

    /// Total pressure: non-relativistic electron degeneracy, ideal gas and radiation.
    #[must_use]
    pub fn pressure(&self, density: f64, temperature: f64) -> f64 {
        let degeneracy = degeneracy_coefficient() / (5.0 * M_E) * (density / M_P).powf(5.0 / 3.0);
        let gas = density * K_B * temperature / (self.mu * M_P);
        let radiation = A_RAD * temperature.powi(4) / 3.0;
        degeneracy + gas + radiation
    }

    /// Partial derivative of pressure with respect to temperature at fixed density.
    #[must_use]
    pub fn pressure_temperature_gradient(&self, density: f64, temperature: f64) -> f64 {
        density * K_B / (self.mu * M_P) + 4.0 * A_RAD * temperature.powi(3) / 3.0
    }

    /// Partial derivative of pressure with respect to density at fixed temperature.
    #[must_use]
    pub fn pressure_density_gradient(&self, density: f64, temperature: f64) -> f64 {
        degeneracy_coefficient() / (3.0 * M_E * M_P) * (density / M_P).powf(2.0 / 3.0)
            + K_B * temperature / (self.mu * M_P)
    }

    #[must_use]
    pub fn opacity_electron_scattering(&self) -> f64 {
        KAPPA_ES * (1.0 + self.hydrogen)
    }

    #[must_use]
    pub fn opacity_free_free(&self, density: f64, temperature: f64) -> f64 {
        KAPPA_FF * (self.metals + 1.0e-4) * (density / 1.0e3).powf(0.7) * temperature.powf(-3.5)
    }

    #[must_use]
    pub fn opacity_hydrogen_ion(&self, density: f64, temperature: f64) -> f64 {
        KAPPA_H_MINUS * (self.metals / 0.02) * (density / 1.0e3).sqrt() * temperature.powi(9)
    }

    #[must_use]
    pub fn energy_proton_proton(&self, density: f64, temperature: f64) -> f64 {
        EPSILON_PP * (density / 1.0e5) * self.hydrogen.powi(2) * (temperature / 1.0e6).powi(4)
    }

    #[must_use]
    pub fn energy_cno(&self, density: f64, temperature: f64) -> f64 {
        let x_cno = CNO_FRACTION_OF_X * self.hydrogen;
        EPSILON_CNO * (density / 1.0e5) * self.hydrogen * x_cno * (temperature / 1.0e6).powf(19.9)
    }

    #[must_use]
    pub fn energy_triple_alpha(&self, density: f64, temperature: f64) -> f64 {
        EPSILON_3ALPHA * density.powi(2) * self.helium.powi(3) * (temperature / 1.0e8).powi(41)
    }

    #[must_use]
    pub fn energy_carbon(&self, density: f64, temperature: f64) -> f64 {
        EPSILON_CARBON * (density / 1.0e5) * self.carbon.powi(2) * (temperature / 1.0e8).powi(26)
    }

    /// Selects the energy generation rate for the configured burning regime.
    ///
    /// The arguments are the four individual rates; exactly one path contributes.
    #[must_use]
    pub fn energy_generation(&self, rates: EnergyRates) -> f64 {
        match self.core {
            CoreType::Hydrogen => rates.proton_proton + rates.cno,
            CoreType::Helium => rates.triple_alpha,
            CoreType::Carbon => rates.carbon,
        }
    }

    /// Temperature gradient magnitude for radiative transport.
    #[must_use]
    pub fn radiative_gradient(
        &self,
        radius: f64,
        density: f64,
        temperature: f64,
        luminosity: f64,
        opacity: f64,
    ) -> f64 {
        3.0 * opacity * density * luminosity
            / (16.0 * PI * A_RAD * C * temperature.powi(3) * radius.powi(2))
    }

    /// Temperature gradient magnitude for adiabatic convection.
    #[must_use]
    pub fn convective_gradient(
        &self,
        radius: f64,
        density: f64,
        temperature: f64,
        mass: f64,
        pressure: f64,
    ) -> f64 {
        (1.0 - 1.0 / GAMMA) * temperature * G * mass * density / (pressure * radius.powi(2))
    }
}

/// Individual nuclear energy generation rates at one point \[W kg⁻¹\].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyRates {
    pub proton_proton: f64,
    pub cno: f64,
    pub triple_alpha: f64,
    pub carbon: f64,
}

/// Combines the three opacity sources.
///
/// Harmonic mean of the H⁻ opacity and the larger of electron scattering and
/// free-free opacity.
#[must_use]
pub fn combined_opacity(electron_scattering: f64, free_free: f64, hydrogen_ion: f64) -> f64 {
    (1.0 / hydrogen_ion + 1.0 / electron_scattering.max(free_free)).recip()
}

/// Luminosity of a blackbody sphere \[W\].
#[must_use]
pub fn blackbody_luminosity(radius: f64, temperature: f64) -> f64 {
    4.0 * PI * radius.powi(2) * SIGMA * temperature.powi(4)
}

fn degeneracy_coefficient() -> f64 {
    (3.0 * PI * PI).powf(2.0 / 3.0) * HBAR.powi(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn solar() -> Physics {
        Physics::new(&Composition::default(), CoreType::Hydrogen)
    }

    #[test]
    fn mean_molecular_weight_of_default_mix() {
        // X = 0.55, Y = 0.43, Z = 0.02
        assert_relative_eq!(
            solar().mean_molecular_weight(),
            1.0 / (1.1 + 0.3225 + 0.01),
            max_relative = 1e-12
        );
    }

    #[test]
    fn pressure_gradients_match_finite_differences() {
        let physics = solar();
        let (rho, t) = (1.622e5, 1.5e7);

        let dt = t * 1e-6;
        let numeric_t =
            (physics.pressure(rho, t + dt) - physics.pressure(rho, t - dt)) / (2.0 * dt);
        assert_relative_eq!(
            physics.pressure_temperature_gradient(rho, t),
            numeric_t,
            max_relative = 1e-6
        );

        let drho = rho * 1e-6;
        let numeric_rho =
            (physics.pressure(rho + drho, t) - physics.pressure(rho - drho, t)) / (2.0 * drho);
        assert_relative_eq!(
            physics.pressure_density_gradient(rho, t),
            numeric_rho,
            max_relative = 1e-6
        );
    }

    #[test]
    fn opacity_is_harmonic_mean_with_larger_of_es_and_ff() {
        assert_relative_eq!(combined_opacity(0.03, 0.05, 0.05), 0.025);
        assert_relative_eq!(combined_opacity(0.05, 0.03, 0.05), 0.025);

        // An overwhelming H⁻ opacity leaves the other term in charge.
        assert_relative_eq!(combined_opacity(0.03, 0.01, 1e30), 0.03, max_relative = 1e-12);
    }

    #[test]
    fn energy_generation_follows_core_type() {
        let composition = Composition::new(0.5, 0.3, 0.1, 0.1).unwrap();
        let rates = EnergyRates {
            proton_proton: 1.0,
            cno: 2.0,
            triple_alpha: 4.0,
            carbon: 8.0,
        };

        let hydrogen = Physics::new(&composition, CoreType::Hydrogen);
        let helium = Physics::new(&composition, CoreType::Helium);
        let carbon = Physics::new(&composition, CoreType::Carbon);

        assert_eq!(hydrogen.energy_generation(rates), 3.0);
        assert_eq!(helium.energy_generation(rates), 4.0);
        assert_eq!(carbon.energy_generation(rates), 8.0);
        assert_eq!(carbon.core(), CoreType::Carbon);
    }

    #[test]
    fn blackbody_of_the_sun() {
        let l = blackbody_luminosity(6.957e8, 5772.0);
        assert_relative_eq!(l, 3.828e26, max_relative = 1e-2);
    }
}
