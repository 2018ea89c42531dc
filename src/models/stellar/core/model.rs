//! A single stellar model integrated outward from the centre.

mod error;

pub use error::SolveError;

use std::{array, f64::consts::PI};

use log::debug;
use uom::si::{f64::MassDensity, mass_density::kilogram_per_cubic_meter};

use super::{
    config::{StarConfig, StepLimits},
    integrate::{CoupledSystem, Rkf45},
    physics::Physics,
    profile::{Profile, Solution, Termination},
    relation::{Algebraic, Context, Derivative},
    variable::{AlgebraicVariable, Order, StateVariable},
};

/// The integration stops once the optical depth left to the surface,
/// estimated as `κρ² / |dρ/dr|`, drops below this.
const PHOTOSPHERE_DEPTH: f64 = 1e-3;

/// Optical depth below the surface that defines the photosphere.
const PHOTOSPHERE_TAU: f64 = 2.0 / 3.0;

/// Accepted steps between progress messages.
const LOG_INTERVAL: usize = 500;

/// One accepted step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepRecord {
    /// Radius at the start of the step.
    pub radius: f64,
    pub step: f64,
    pub error: f64,
}

/// Integration statistics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stats {
    pub accepted: Vec<StepRecord>,
    pub rejected: usize,
    /// Derivative evaluations, including the one after each accepted step.
    pub evaluations: usize,
}

/// Result of a single call to [`StellarModel::step`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepEvent {
    /// The step was committed; `radius` is the new outermost radius.
    Accepted { radius: f64, step: f64, error: f64 },
    /// The step was discarded; `radius` is unchanged.
    Rejected { radius: f64, step: f64, error: f64 },
}

/// Owns every variable of one star and drives the step loop.
#[derive(Debug, Clone)]
pub struct StellarModel {
    physics: Physics,
    stepper: Rkf45,
    limits: StepLimits,
    central_density: f64,
    radius: Vec<f64>,
    state: [StateVariable; Derivative::COUNT],
    algebraic: [AlgebraicVariable; Algebraic::COUNT],
    step: f64,
    tau_infinity: Option<f64>,
    stats: Stats,
}

impl StellarModel {
    /// Seeds a model at the starting radius.
    ///
    /// The central mass is a uniform sphere of the starting radius, and the
    /// central luminosity is that mass times the central energy generation.
    ///
    /// # Errors
    ///
    /// Returns a [`SolveError`] if the step settings or a central value are invalid.
    pub fn new(config: &StarConfig) -> Result<Self, SolveError> {
        let limits = config.steps.limits()?;
        let central = config.central()?;
        let physics = Physics::new(&config.composition, config.core);

        let r0 = central.radius;
        let mass = 4.0 / 3.0 * PI * r0.powi(3) * central.density;

        let mut boundary = [0.0; Derivative::COUNT];
        boundary[Derivative::Density.index()] = central.density;
        boundary[Derivative::Temperature.index()] = central.temperature;
        boundary[Derivative::Mass.index()] = mass;
        boundary[Derivative::OpticalDepth.index()] = central.optical_depth;

        // Derived quantities depend on density and temperature only.
        let algebraic = Algebraic::evaluate_all(r0, &boundary, &physics);
        boundary[Derivative::Luminosity.index()] =
            mass * algebraic[Algebraic::EnergyGeneration.index()];

        let mut model = Self {
            physics,
            stepper: Rkf45::new(&limits),
            limits,
            central_density: central.density,
            radius: vec![r0],
            state: Derivative::ALL.map(|quantity| StateVariable::new(quantity.name())),
            algebraic: Algebraic::ALL.map(|quantity| AlgebraicVariable::new(quantity.name())),
            step: limits.initial,
            tau_infinity: None,
            stats: Stats::default(),
        };

        for (variable, value) in model.state.iter_mut().zip(boundary) {
            variable.seed(value)?;
        }
        let derivatives = model.evaluate(r0, &boundary);
        for variable in &mut model.algebraic {
            variable.commit(0)?;
        }
        for (variable, derivative) in model.state.iter_mut().zip(derivatives) {
            variable.seed_derivative(derivative)?;
        }

        Ok(model)
    }

    /// Accepted radius grid.
    #[must_use]
    pub fn radius(&self) -> &[f64] {
        &self.radius
    }

    /// Accepted history of an integrated quantity.
    #[must_use]
    pub fn history(&self, quantity: Derivative, order: Order) -> &[f64] {
        self.state[quantity.index()].history(order)
    }

    /// Accepted history of a derived quantity.
    #[must_use]
    pub fn algebraic_history(&self, quantity: Algebraic) -> &[f64] {
        self.algebraic[quantity.index()].history()
    }

    /// Current (candidate) value of an integrated quantity.
    #[must_use]
    pub fn current(&self, quantity: Derivative, order: Order) -> f64 {
        self.state[quantity.index()].current(order)
    }

    #[must_use]
    pub fn accepted_steps(&self) -> usize {
        self.radius.len() - 1
    }

    /// Step size of the next attempt.
    #[must_use]
    pub fn step_size(&self) -> f64 {
        self.step
    }

    #[must_use]
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    #[must_use]
    pub fn physics(&self) -> &Physics {
        &self.physics
    }

    fn outermost(&self) -> f64 {
        self.radius.last().copied().unwrap_or(f64::NAN)
    }

    /// Attempts one adaptive step.
    ///
    /// An accepted step appends one point to every history.
    /// A rejected step leaves all histories untouched and shrinks the step.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError::Divergence`] if the step size controller breaks down.
    pub fn step(&mut self) -> Result<StepEvent, SolveError> {
        let radius = self.outermost();
        let (stepper, step) = (self.stepper, self.step);
        let attempt = stepper.attempt::<{ Derivative::COUNT }, _>(self, radius, step)?;
        self.step = attempt.next_step;

        if !attempt.accepted {
            self.stats.rejected += 1;
            return Ok(StepEvent::Rejected {
                radius,
                step: attempt.step,
                error: attempt.error,
            });
        }

        let next_radius = radius + attempt.step;
        let derivatives = self.evaluate(next_radius, &attempt.solution);
        let index = self.radius.len();

        for ((variable, value), derivative) in
            self.state.iter_mut().zip(attempt.solution).zip(derivatives)
        {
            variable.commit(index, value, derivative)?;
        }
        for variable in &mut self.algebraic {
            variable.commit(index)?;
        }
        self.radius.push(next_radius);
        self.stats.accepted.push(StepRecord {
            radius,
            step: attempt.step,
            error: attempt.error,
        });

        if index % LOG_INTERVAL == 0 {
            debug!(
                "step {index}: r={next_radius:.4e} m, h={:.3e} m, T={:.4e} K",
                attempt.step,
                self.current(Derivative::Temperature, Order::Value)
            );
        }

        Ok(StepEvent::Accepted {
            radius: next_radius,
            step: attempt.step,
            error: attempt.error,
        })
    }

    /// Optical depth left to the surface, estimated at the outermost point.
    ///
    /// Returns infinity where the density gradient vanishes.
    #[must_use]
    pub fn optical_depth_to_surface(&self) -> f64 {
        let opacity = self.algebraic[Algebraic::Opacity.index()].current();
        let density = self.current(Derivative::Density, Order::Value);
        let gradient = self.current(Derivative::Density, Order::Derivative).abs();
        if gradient == 0.0 {
            return f64::INFINITY;
        }
        opacity * density.powi(2) / gradient
    }

    #[must_use]
    pub fn photosphere_reached(&self) -> bool {
        self.optical_depth_to_surface() < PHOTOSPHERE_DEPTH
    }

    /// Steps until the photosphere, the step cap, or a stall at the minimum step.
    ///
    /// Running out of steps is reported through [`Solution::success`], not as an error.
    ///
    /// # Errors
    ///
    /// Returns a [`SolveError`] if the integration diverges.
    pub fn run(&mut self) -> Result<Termination, SolveError> {
        let termination = loop {
            if self.accepted_steps() >= self.limits.max_steps {
                break Termination::StepLimit;
            }
            match self.step()? {
                StepEvent::Accepted { .. } => {
                    if self.photosphere_reached() {
                        break Termination::Photosphere;
                    }
                }
                StepEvent::Rejected { step, .. } => {
                    if step <= self.stepper.min_step() {
                        break Termination::Stalled;
                    }
                }
            }
        };

        debug!(
            "integration ended ({termination:?}) after {} accepted and {} rejected steps at r={:.4e} m",
            self.accepted_steps(),
            self.stats.rejected,
            self.outermost()
        );
        Ok(termination)
    }

    /// Integrates, trims to the photosphere and hands back the profile.
    ///
    /// # Errors
    ///
    /// Returns a [`SolveError`] if the integration diverges.
    pub fn solve(mut self) -> Result<Solution, SolveError> {
        let termination = self.run()?;
        self.trim_to_photosphere();
        Ok(self.into_solution(termination))
    }

    /// Truncates every history after the point closest to `τ_∞ − τ = 2/3`.
    ///
    /// `τ_∞` is the optical depth of the outermost point the first time this
    /// is called, so trimming twice keeps the same points.
    pub fn trim_to_photosphere(&mut self) {
        let tau = self.state[Derivative::OpticalDepth.index()].history(Order::Value);
        let Some(&last) = tau.last() else {
            return;
        };
        let tau_infinity = *self.tau_infinity.get_or_insert(last);
        let keep = photosphere_index(tau, tau_infinity) + 1;

        self.radius.truncate(keep);
        for variable in &mut self.state {
            variable.truncate(keep);
        }
        for variable in &mut self.algebraic {
            variable.truncate(keep);
        }
    }

    fn into_solution(self, termination: Termination) -> Solution {
        let profile = Profile::new(
            self.radius,
            self.state
                .each_ref()
                .map(|variable| variable.history(Order::Value).to_vec()),
            self.state
                .each_ref()
                .map(|variable| variable.history(Order::Derivative).to_vec()),
            self.algebraic
                .each_ref()
                .map(|variable| variable.history().to_vec()),
        );

        Solution {
            profile,
            termination,
            central_density: MassDensity::new::<kilogram_per_cubic_meter>(self.central_density),
            stats: self.stats,
        }
    }
}

impl CoupledSystem<{ Derivative::COUNT }> for StellarModel {
    fn committed(&self) -> [f64; Derivative::COUNT] {
        array::from_fn(|i| {
            self.state[i]
                .history(Order::Value)
                .last()
                .copied()
                .unwrap_or(f64::NAN)
        })
    }

    fn evaluate(
        &mut self,
        radius: f64,
        state: &[f64; Derivative::COUNT],
    ) -> [f64; Derivative::COUNT] {
        for (variable, &value) in self.state.iter_mut().zip(state) {
            variable.use_intermediate(value);
        }

        let algebraic = Algebraic::evaluate_all(radius, state, &self.physics);
        for (variable, value) in self.algebraic.iter_mut().zip(algebraic) {
            variable.set(value);
        }

        self.stats.evaluations += 1;
        Context::new(radius, state, &algebraic, &self.physics).derivatives()
    }

    fn restore(&mut self) {
        for variable in &mut self.state {
            variable.use_original();
        }
        for variable in &mut self.algebraic {
            variable.use_original();
        }
    }
}

/// Index minimizing `|τ_∞ − τ − 2/3|`; the first one wins ties.
fn photosphere_index(tau: &[f64], tau_infinity: f64) -> usize {
    let mut best = (0, f64::INFINITY);
    for (i, &t) in tau.iter().enumerate() {
        let distance = (tau_infinity - t - PHOTOSPHERE_TAU).abs();
        if distance < best.1 {
            best = (i, distance);
        }
    }
    best.0
}
