//! Closed set of relations wiring the physics into the coupled system.
//!
//! [`Derivative`] relations give `d/dr` of each integrated quantity.
//! [`Algebraic`] relations give derived quantities at the same radius and are
//! listed in dependency order, so evaluating [`Algebraic::ALL`] front to back
//! always finds its inputs ready.

use std::f64::consts::PI;

use super::physics::{EnergyRates, G, Physics, combined_opacity};

/// Integrated quantities, in storage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Derivative {
    Density,
    Temperature,
    Mass,
    Luminosity,
    OpticalDepth,
}

impl Derivative {
    pub const COUNT: usize = 5;

    pub const ALL: [Self; Self::COUNT] = [
        Self::Density,
        Self::Temperature,
        Self::Mass,
        Self::Luminosity,
        Self::OpticalDepth,
    ];

    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Column name of the value.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Density => "density",
            Self::Temperature => "temperature",
            Self::Mass => "mass",
            Self::Luminosity => "luminosity",
            Self::OpticalDepth => "opticaldepth",
        }
    }

    /// Column name of the first derivative.
    #[must_use]
    pub fn derivative_name(self) -> &'static str {
        match self {
            Self::Density => "ddensity/dr",
            Self::Temperature => "dtemperature/dr",
            Self::Mass => "dmass/dr",
            Self::Luminosity => "dluminosity/dr",
            Self::OpticalDepth => "dopticaldepth/dr",
        }
    }

    /// Evaluates `d/dr` of this quantity.
    #[must_use]
    pub fn evaluate(self, ctx: &Context<'_>) -> f64 {
        let r = ctx.radius();
        let rho = ctx.state(Self::Density);
        let shell = 4.0 * PI * r.powi(2) * rho;

        match self {
            Self::Mass => shell,
            Self::Luminosity => shell * ctx.algebraic(Algebraic::EnergyGeneration),
            Self::OpticalDepth => ctx.algebraic(Algebraic::Opacity) * rho,
            Self::Temperature => {
                let physics = ctx.physics();
                let t = ctx.state(Self::Temperature);
                let radiative = physics.radiative_gradient(
                    r,
                    rho,
                    t,
                    ctx.state(Self::Luminosity),
                    ctx.algebraic(Algebraic::Opacity),
                );
                let convective = physics.convective_gradient(
                    r,
                    rho,
                    t,
                    ctx.state(Self::Mass),
                    ctx.algebraic(Algebraic::Pressure),
                );
                -radiative.min(convective)
            }
            Self::Density => {
                let gravity = G * ctx.state(Self::Mass) * rho / r.powi(2);
                let thermal = ctx.algebraic(Algebraic::PressureTemperatureGradient)
                    * Self::Temperature.evaluate(ctx);
                -(gravity + thermal) / ctx.algebraic(Algebraic::PressureDensityGradient)
            }
        }
    }
}

/// Derived quantities, in dependency order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algebraic {
    Pressure,
    PressureTemperatureGradient,
    PressureDensityGradient,
    OpacityElectronScattering,
    OpacityFreeFree,
    OpacityHydrogenIon,
    Opacity,
    EnergyProtonProton,
    EnergyCno,
    EnergyTripleAlpha,
    EnergyCarbon,
    EnergyGeneration,
}

impl Algebraic {
    pub const COUNT: usize = 12;

    pub const ALL: [Self; Self::COUNT] = [
        Self::Pressure,
        Self::PressureTemperatureGradient,
        Self::PressureDensityGradient,
        Self::OpacityElectronScattering,
        Self::OpacityFreeFree,
        Self::OpacityHydrogenIon,
        Self::Opacity,
        Self::EnergyProtonProton,
        Self::EnergyCno,
        Self::EnergyTripleAlpha,
        Self::EnergyCarbon,
        Self::EnergyGeneration,
    ];

    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Pressure => "pressure",
            Self::PressureTemperatureGradient => "pressure_temp_grad",
            Self::PressureDensityGradient => "pressure_density_grad",
            Self::OpacityElectronScattering => "opacity_es",
            Self::OpacityFreeFree => "opacity_ff",
            Self::OpacityHydrogenIon => "opacity_hminus",
            Self::Opacity => "opacity",
            Self::EnergyProtonProton => "energy_pp",
            Self::EnergyCno => "energy_cno",
            Self::EnergyTripleAlpha => "energy_3alpha",
            Self::EnergyCarbon => "energy_carbon",
            Self::EnergyGeneration => "energygen",
        }
    }

    /// Evaluates this quantity; every earlier entry of [`Algebraic::ALL`]
    /// must already be present in `ctx`.
    #[must_use]
    pub fn evaluate(self, ctx: &Context<'_>) -> f64 {
        let physics = ctx.physics();
        let rho = ctx.state(Derivative::Density);
        let t = ctx.state(Derivative::Temperature);

        match self {
            Self::Pressure => physics.pressure(rho, t),
            Self::PressureTemperatureGradient => physics.pressure_temperature_gradient(rho, t),
            Self::PressureDensityGradient => physics.pressure_density_gradient(rho, t),
            Self::OpacityElectronScattering => physics.opacity_electron_scattering(),
            Self::OpacityFreeFree => physics.opacity_free_free(rho, t),
            Self::OpacityHydrogenIon => physics.opacity_hydrogen_ion(rho, t),
            Self::Opacity => combined_opacity(
                ctx.algebraic(Self::OpacityElectronScattering),
                ctx.algebraic(Self::OpacityFreeFree),
                ctx.algebraic(Self::OpacityHydrogenIon),
            ),
            Self::EnergyProtonProton => physics.energy_proton_proton(rho, t),
            Self::EnergyCno => physics.energy_cno(rho, t),
            Self::EnergyTripleAlpha => physics.energy_triple_alpha(rho, t),
            Self::EnergyCarbon => physics.energy_carbon(rho, t),
            Self::EnergyGeneration => physics.energy_generation(EnergyRates {
                proton_proton: ctx.algebraic(Self::EnergyProtonProton),
                cno: ctx.algebraic(Self::EnergyCno),
                triple_alpha: ctx.algebraic(Self::EnergyTripleAlpha),
                carbon: ctx.algebraic(Self::EnergyCarbon),
            }),
        }
    }

    /// Evaluates every derived quantity at one point.
    #[must_use]
    pub fn evaluate_all(
        radius: f64,
        state: &[f64; Derivative::COUNT],
        physics: &Physics,
    ) -> [f64; Self::COUNT] {
        let mut values = [f64::NAN; Self::COUNT];
        for quantity in Self::ALL {
            let value = quantity.evaluate(&Context::new(radius, state, &values, physics));
            values[quantity.index()] = value;
        }
        values
    }
}

/// Read-only view of one point of the coupled system.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    radius: f64,
    state: &'a [f64; Derivative::COUNT],
    algebraic: &'a [f64; Algebraic::COUNT],
    physics: &'a Physics,
}

impl<'a> Context<'a> {
    #[must_use]
    pub fn new(
        radius: f64,
        state: &'a [f64; Derivative::COUNT],
        algebraic: &'a [f64; Algebraic::COUNT],
        physics: &'a Physics,
    ) -> Self {
        Self {
            radius,
            state,
            algebraic,
            physics,
        }
    }

    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[must_use]
    pub fn state(&self, quantity: Derivative) -> f64 {
        self.state[quantity.index()]
    }

    #[must_use]
    pub fn algebraic(&self, quantity: Algebraic) -> f64 {
        self.algebraic[quantity.index()]
    }

    #[must_use]
    pub fn physics(&self) -> &'a Physics {
        self.physics
    }

    /// Evaluates every derivative relation.
    #[must_use]
    pub fn derivatives(&self) -> [f64; Derivative::COUNT] {
        Derivative::ALL.map(|quantity| quantity.evaluate(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::models::stellar::core::config::{Composition, CoreType};

    fn central_state() -> [f64; Derivative::COUNT] {
        let (r, rho): (f64, f64) = (700.0, 1.622e5);
        let mass = 4.0 / 3.0 * PI * r.powi(3) * rho;
        [rho, 1.5e7, mass, mass * 1e-3, 0.0]
    }

    #[test]
    fn core_type_selects_one_energy_term() {
        let state = central_state();
        let composition = Composition::new(0.5, 0.3, 0.1, 0.1).unwrap();

        for core in [CoreType::Hydrogen, CoreType::Helium, CoreType::Carbon] {
            let physics = Physics::new(&composition, core);
            let values = Algebraic::evaluate_all(700.0, &state, &physics);
            let get = |quantity: Algebraic| values[quantity.index()];

            let expected = match core {
                CoreType::Hydrogen => {
                    get(Algebraic::EnergyProtonProton) + get(Algebraic::EnergyCno)
                }
                CoreType::Helium => get(Algebraic::EnergyTripleAlpha),
                CoreType::Carbon => get(Algebraic::EnergyCarbon),
            };
            assert_eq!(get(Algebraic::EnergyGeneration), expected);

            // Unused paths are still recorded.
            assert!(get(Algebraic::EnergyTripleAlpha) > 0.0);
            assert!(get(Algebraic::EnergyCarbon) > 0.0);
        }
    }

    #[test]
    fn central_derivatives_point_outward_and_down() {
        let state = central_state();
        let physics = Physics::new(&Composition::default(), CoreType::Hydrogen);
        let values = Algebraic::evaluate_all(700.0, &state, &physics);
        let ctx = Context::new(700.0, &state, &values, &physics);
        let derivatives = ctx.derivatives();

        assert!(derivatives[Derivative::Density.index()] < 0.0);
        assert!(derivatives[Derivative::Temperature.index()] < 0.0);
        assert!(derivatives[Derivative::OpticalDepth.index()] > 0.0);
        assert_relative_eq!(
            derivatives[Derivative::Mass.index()],
            4.0 * PI * 700.0_f64.powi(2) * 1.622e5
        );
        assert_relative_eq!(
            derivatives[Derivative::Luminosity.index()],
            derivatives[Derivative::Mass.index()] * values[Algebraic::EnergyGeneration.index()]
        );
    }

    #[test]
    fn names_follow_storage_order() {
        for (i, quantity) in Derivative::ALL.into_iter().enumerate() {
            assert_eq!(quantity.index(), i);
        }
        for (i, quantity) in Algebraic::ALL.into_iter().enumerate() {
            assert_eq!(quantity.index(), i);
        }
        assert_eq!(Algebraic::OpacityHydrogenIon.name(), "opacity_hminus");
    }
}
