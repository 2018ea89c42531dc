//! Converged stellar profiles and their tabular view.

use uom::si::{
    f64::{Length, Mass, MassDensity, Power, ThermodynamicTemperature},
    length::meter,
    mass::kilogram,
    power::watt,
    thermodynamic_temperature::kelvin,
};

use super::{
    model::Stats,
    physics::blackbody_luminosity,
    relation::{Algebraic, Derivative},
};

/// Why the integration stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Termination {
    /// The optical depth to the surface became negligible.
    Photosphere,
    /// The accepted step cap was reached first.
    StepLimit,
    /// A step at the minimum size was rejected.
    Stalled,
}

/// One column of a [`Profile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Radius,
    Value(Derivative),
    Derivative(Derivative),
    Algebraic(Algebraic),
}

impl Column {
    /// All columns in table order.
    pub fn all() -> impl Iterator<Item = Self> {
        std::iter::once(Self::Radius)
            .chain(Derivative::ALL.map(Self::Value))
            .chain(Derivative::ALL.map(Self::Derivative))
            .chain(Algebraic::ALL.map(Self::Algebraic))
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Radius => "radius",
            Self::Value(quantity) => quantity.name(),
            Self::Derivative(quantity) => quantity.derivative_name(),
            Self::Algebraic(quantity) => quantity.name(),
        }
    }
}

/// Accepted histories of one integrated star, all of equal length.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    radius: Vec<f64>,
    values: [Vec<f64>; Derivative::COUNT],
    derivatives: [Vec<f64>; Derivative::COUNT],
    algebraic: [Vec<f64>; Algebraic::COUNT],
}

impl Profile {
    pub(super) fn new(
        radius: Vec<f64>,
        values: [Vec<f64>; Derivative::COUNT],
        derivatives: [Vec<f64>; Derivative::COUNT],
        algebraic: [Vec<f64>; Algebraic::COUNT],
    ) -> Self {
        Self {
            radius,
            values,
            derivatives,
            algebraic,
        }
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.radius.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.radius.is_empty()
    }

    /// SI values of one column.
    #[must_use]
    pub fn column(&self, column: Column) -> &[f64] {
        match column {
            Column::Radius => &self.radius,
            Column::Value(quantity) => &self.values[quantity.index()],
            Column::Derivative(quantity) => &self.derivatives[quantity.index()],
            Column::Algebraic(quantity) => &self.algebraic[quantity.index()],
        }
    }

    /// Column names in table order.
    #[must_use]
    pub fn header() -> Vec<&'static str> {
        Column::all().map(Column::name).collect()
    }

    /// One point with every column in table order.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<Vec<f64>> {
        (index < self.len()).then(|| {
            Column::all()
                .map(|column| self.column(column)[index])
                .collect()
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = Vec<f64>> + '_ {
        (0..self.len()).filter_map(|index| self.row(index))
    }

    /// Values at the outermost point.
    #[must_use]
    pub fn surface(&self) -> Option<Surface> {
        let last = self.len().checked_sub(1)?;
        let value = |quantity: Derivative| self.values[quantity.index()][last];
        Some(Surface {
            radius: Length::new::<meter>(self.radius[last]),
            temperature: ThermodynamicTemperature::new::<kelvin>(value(Derivative::Temperature)),
            luminosity: Power::new::<watt>(value(Derivative::Luminosity)),
            mass: Mass::new::<kilogram>(value(Derivative::Mass)),
        })
    }

    /// Normalized gap between the surface luminosity and the blackbody luminosity.
    ///
    /// Returns `(L − L_bb) / sqrt(L · L_bb)`, or `None` if either luminosity
    /// is not strictly positive and finite.
    #[must_use]
    pub fn luminosity_mismatch(&self) -> Option<f64> {
        let surface = self.surface()?;
        let luminosity = surface.luminosity.get::<watt>();
        let blackbody = surface.blackbody_luminosity().get::<watt>();

        let usable = |l: f64| l.is_finite() && l > 0.0;
        if !usable(luminosity) || !usable(blackbody) {
            return None;
        }
        Some((luminosity - blackbody) / (luminosity * blackbody).sqrt())
    }
}

/// Outermost point of a profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub radius: Length,
    pub temperature: ThermodynamicTemperature,
    pub luminosity: Power,
    pub mass: Mass,
}

impl Surface {
    /// `4πR²σT⁴` at this radius and temperature.
    #[must_use]
    pub fn blackbody_luminosity(&self) -> Power {
        Power::new::<watt>(blackbody_luminosity(
            self.radius.get::<meter>(),
            self.temperature.get::<kelvin>(),
        ))
    }
}

/// A trimmed profile plus how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub profile: Profile,
    pub termination: Termination,
    pub central_density: MassDensity,
    pub stats: Stats,
}

impl Solution {
    /// Whether the integration reached the photosphere.
    #[must_use]
    pub fn success(&self) -> bool {
        self.termination == Termination::Photosphere
    }

    /// See [`Profile::luminosity_mismatch`].
    #[must_use]
    pub fn luminosity_mismatch(&self) -> Option<f64> {
        self.profile.luminosity_mismatch()
    }

    #[must_use]
    pub fn surface(&self) -> Option<Surface> {
        self.profile.surface()
    }
}
