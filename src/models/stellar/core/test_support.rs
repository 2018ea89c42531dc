use uom::si::{
    f64::{Length, MassDensity, ThermodynamicTemperature},
    length::meter,
    mass_density::kilogram_per_cubic_meter,
    thermodynamic_temperature::kelvin,
};

use super::config::{CoreType, StarConfig, StepConfig};

/// Hydrogen-burning star with a solar-like centre.
pub(super) fn sun_like() -> StarConfig {
    StarConfig::new(
        ThermodynamicTemperature::new::<kelvin>(1.5e7),
        MassDensity::new::<kilogram_per_cubic_meter>(1.622e5),
        CoreType::Hydrogen,
    )
}

/// Steps pinned to a single size that are always accepted.
pub(super) fn fixed_steps(step: f64) -> StepConfig {
    let step = Length::new::<meter>(step);
    StepConfig {
        initial: step,
        min: step,
        max: step,
        error_threshold: 1.0,
        ..StepConfig::default()
    }
}
