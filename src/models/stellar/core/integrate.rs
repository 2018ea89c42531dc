//! Embedded Runge-Kutta-Fehlberg 4(5) step over a coupled system.
//!
//! Unlike a plain `dy/dx = f(x, y)` integrator, the stellar system carries
//! derived quantities that must be recomputed at every stage point.
//! [`CoupledSystem`] exposes that: each stage pushes its trial state into the
//! system, which refreshes its derived quantities and returns derivatives.

mod error;
mod tableau;

pub use error::DivergenceError;

use super::config::StepLimits;

use tableau::{A, B4, B5, C, STAGES};

/// Below this magnitude the step error uses the absolute difference.
const RELATIVE_ERROR_FLOOR: f64 = 1e-12;

/// A set of state variables integrated together.
pub trait CoupledSystem<const N: usize> {
    /// Last accepted state.
    fn committed(&self) -> [f64; N];

    /// Makes `state` current at `radius` and returns its derivatives.
    fn evaluate(&mut self, radius: f64, state: &[f64; N]) -> [f64; N];

    /// Restores every current value to the last accepted point.
    fn restore(&mut self);
}

/// Step size controller.
///
/// `h' = h · safety · (threshold / error)^exponent`, with `growth` applied
/// instead when the error is exactly zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepController {
    pub safety: f64,
    pub exponent: f64,
    /// Factor used when the error estimate is zero.
    pub growth: f64,
    /// An accepted step only grows when `error < threshold · grow_below`.
    pub grow_below: f64,
}

impl Default for StepController {
    fn default() -> Self {
        Self {
            safety: 0.8,
            exponent: 0.2,
            growth: 10.0,
            grow_below: 0.1,
        }
    }
}

impl StepController {
    /// Proposes the next step size before clamping.
    #[must_use]
    pub fn propose(&self, step: f64, error: f64, threshold: f64, accepted: bool) -> f64 {
        if accepted && error >= threshold * self.grow_below {
            return step;
        }
        if error == 0.0 {
            return step * self.growth;
        }
        step * self.safety * (threshold / error).powf(self.exponent)
    }
}

/// Outcome of one step attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepAttempt<const N: usize> {
    /// Radius at the start of the attempt.
    pub radius: f64,
    /// Step size actually used.
    pub step: f64,
    /// Fourth-order solution at `radius + step`.
    pub solution: [f64; N],
    /// Largest relative truncation error across the variables.
    pub error: f64,
    pub accepted: bool,
    /// Step size for the next attempt, already clamped.
    pub next_step: f64,
}

/// Adaptive RKF45 stepper.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rkf45 {
    controller: StepController,
    min: f64,
    max: f64,
    threshold: f64,
}

impl Rkf45 {
    #[must_use]
    pub fn new(limits: &StepLimits) -> Self {
        Self {
            controller: StepController::default(),
            min: limits.min,
            max: limits.max,
            threshold: limits.error_threshold,
        }
    }

    #[must_use]
    pub fn min_step(&self) -> f64 {
        self.min
    }

    /// Attempts one step from the committed state of `system`.
    ///
    /// The system is always restored before returning, so acceptance is left
    /// to the caller.
    ///
    /// # Errors
    ///
    /// Returns a [`DivergenceError`] if the proposed next step is not finite.
    #[allow(clippy::needless_range_loop)]
    pub fn attempt<const N: usize, S: CoupledSystem<N>>(
        &self,
        system: &mut S,
        radius: f64,
        step: f64,
    ) -> Result<StepAttempt<N>, DivergenceError> {
        let h = step.clamp(self.min, self.max);
        let y = system.committed();

        let mut k = [[0.0; N]; STAGES];
        for i in 0..STAGES {
            let mut stage = y;
            for j in 0..i {
                for n in 0..N {
                    stage[n] += A[i][j] * k[j][n];
                }
            }
            let derivative = system.evaluate(radius + C[i] * h, &stage);
            k[i] = derivative.map(|d| d * h);
        }
        system.restore();

        let fifth = combine(&y, &k, &B5);
        let fourth = combine(&y, &k, &B4);
        let error = step_error(&fifth, &fourth);
        let accepted = error <= self.threshold;

        let next = self.controller.propose(h, error, self.threshold, accepted);
        if !next.is_finite() {
            return Err(DivergenceError {
                radius,
                step: h,
                error,
            });
        }

        Ok(StepAttempt {
            radius,
            step: h,
            solution: fourth,
            error,
            accepted,
            next_step: next.clamp(self.min, self.max),
        })
    }
}

fn combine<const N: usize>(
    y: &[f64; N],
    k: &[[f64; N]; STAGES],
    weights: &[f64; STAGES],
) -> [f64; N] {
    let mut out = *y;
    for (stage, weight) in k.iter().zip(weights) {
        for (value, increment) in out.iter_mut().zip(stage) {
            *value += weight * increment;
        }
    }
    out
}

/// Relative difference between the two embedded solutions of one variable.
#[must_use]
pub fn relative_error(fifth: f64, fourth: f64) -> f64 {
    let difference = (fifth - fourth).abs();
    if fifth.abs() < RELATIVE_ERROR_FLOOR {
        difference
    } else {
        difference / fifth.abs()
    }
}

/// Largest per-variable error; any `NaN` makes the whole estimate `NaN`.
fn step_error<const N: usize>(fifth: &[f64; N], fourth: &[f64; N]) -> f64 {
    fifth
        .iter()
        .zip(fourth)
        .map(|(&high, &low)| relative_error(high, low))
        .fold(0.0, |acc: f64, e| {
            if acc.is_nan() || e.is_nan() {
                f64::NAN
            } else {
                acc.max(e)
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    /// `dy/dx = y`, no derived quantities.
    struct Exponential {
        committed: [f64; 1],
        evaluations: usize,
        restored: bool,
    }

    impl CoupledSystem<1> for Exponential {
        fn committed(&self) -> [f64; 1] {
            self.committed
        }

        fn evaluate(&mut self, _radius: f64, state: &[f64; 1]) -> [f64; 1] {
            self.evaluations += 1;
            self.restored = false;
            *state
        }

        fn restore(&mut self) {
            self.restored = true;
        }
    }

    struct Poisoned;

    impl CoupledSystem<2> for Poisoned {
        fn committed(&self) -> [f64; 2] {
            [1.0, 1.0]
        }

        fn evaluate(&mut self, _radius: f64, _state: &[f64; 2]) -> [f64; 2] {
            [1.0, f64::NAN]
        }

        fn restore(&mut self) {}
    }

    fn stepper(threshold: f64) -> Rkf45 {
        Rkf45::new(&StepLimits {
            initial: 0.1,
            min: 1e-6,
            max: 1.0,
            error_threshold: threshold,
            max_steps: 100,
        })
    }

    #[test]
    fn fourth_order_step_tracks_exponential() {
        let mut system = Exponential {
            committed: [1.0],
            evaluations: 0,
            restored: false,
        };

        let attempt = stepper(1e-5).attempt(&mut system, 0.0, 0.1).unwrap();

        assert!(attempt.accepted);
        assert!(system.restored);
        assert_eq!(system.evaluations, STAGES);
        assert_relative_eq!(attempt.solution[0], 0.1_f64.exp(), max_relative = 1e-6);
        assert!(attempt.error < 1e-6);
    }

    #[test]
    fn step_is_clamped_to_limits() {
        let mut system = Exponential {
            committed: [1.0],
            evaluations: 0,
            restored: false,
        };

        let attempt = stepper(1.0).attempt(&mut system, 0.0, 50.0).unwrap();
        assert_eq!(attempt.step, 1.0);
        assert!(attempt.next_step <= 1.0);
    }

    #[test]
    fn nan_error_is_divergence() {
        let err = stepper(1e-5).attempt(&mut Poisoned, 2.0, 0.5).unwrap_err();
        assert_eq!(err.radius, 2.0);
        assert_eq!(err.step, 0.5);
        assert!(err.error.is_nan());
    }

    #[test]
    fn controller_follows_acceptance_rules() {
        let controller = StepController::default();

        // Accepted with plenty of margin: grow.
        let grown = controller.propose(1.0, 1e-8, 1e-5, true);
        assert_relative_eq!(grown, 0.8 * 1000.0_f64.powf(0.2));

        // Accepted near the threshold: keep.
        assert_eq!(controller.propose(1.0, 5e-6, 1e-5, true), 1.0);

        // Rejected: shrink.
        assert!(controller.propose(1.0, 1e-3, 1e-5, false) < 1.0);

        // Exact solution: fixed growth.
        assert_eq!(controller.propose(1.0, 0.0, 1e-5, true), 10.0);

        // An infinite error collapses the step; NaN poisons it.
        assert_eq!(controller.propose(1.0, f64::INFINITY, 1e-5, false), 0.0);
        assert!(controller.propose(1.0, f64::NAN, 1e-5, false).is_nan());
    }

    #[test]
    fn relative_error_uses_absolute_difference_near_zero() {
        assert_relative_eq!(relative_error(2.0, 1.0), 0.5);
        assert_relative_eq!(relative_error(0.0, 1e-3), 1e-3);
        assert_eq!(step_error(&[1.0, 1.0], &[1.0, 1.0]), 0.0);
        assert!(step_error(&[f64::NAN, 1.0], &[1.0, 0.0]).is_nan());
        assert!(step_error(&[1.0, f64::NAN], &[1.0, 0.0]).is_nan());
    }
}
