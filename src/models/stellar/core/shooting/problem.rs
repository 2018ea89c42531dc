//! Problem formulation for central density shooting.

use std::cell::RefCell;

use log::{debug, warn};
use twine_core::{EquationProblem, Model};
use uom::si::{f64::MassDensity, mass_density::kilogram_per_cubic_meter};

use crate::models::stellar::core::{
    config::StarConfig,
    model::{SolveError, StellarModel},
    profile::Solution,
};

use super::{
    ObjectiveError,
    trial::{Trial, TrialOutcome},
};

/// Model adapter exposing the central density as the sole input.
///
/// Every call builds and integrates a fresh [`StellarModel`] and records how
/// the trial turned out, so the search can tell why a trial was unusable.
pub(super) struct TrialModel<'a> {
    base: &'a StarConfig,
    trials: RefCell<Vec<Trial>>,
}

impl<'a> TrialModel<'a> {
    pub(super) fn new(base: &'a StarConfig) -> Self {
        Self {
            base,
            trials: RefCell::new(Vec::new()),
        }
    }

    /// Most recent trial.
    pub(super) fn last_trial(&self) -> Option<Trial> {
        self.trials.borrow().last().copied()
    }

    /// Every trial in evaluation order.
    pub(super) fn into_trials(self) -> Vec<Trial> {
        self.trials.into_inner()
    }
}

impl Model for TrialModel<'_> {
    type Input = MassDensity;
    type Output = Solution;
    type Error = SolveError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        let density = input.get::<kilogram_per_cubic_meter>();
        let result = StellarModel::new(&self.base.with_central_density(*input))
            .and_then(StellarModel::solve);

        let outcome = match &result {
            Ok(solution) if !solution.success() => TrialOutcome::Unclosed(solution.termination),
            Ok(solution) => usable_mismatch(solution)
                .map_or(TrialOutcome::Failed, |residual| TrialOutcome::Closed { residual }),
            Err(_) => TrialOutcome::Failed,
        };

        match (&outcome, &result) {
            (TrialOutcome::Closed { residual }, _) => {
                debug!("trial {density:.6e} kg/m^3: mismatch {residual:.4e}");
            }
            (TrialOutcome::Unclosed(termination), _) => {
                debug!("trial {density:.6e} kg/m^3 did not close ({termination:?})");
            }
            (TrialOutcome::Failed, Err(error)) => {
                warn!("trial {density:.6e} kg/m^3 failed, assumed too high: {error}");
            }
            (TrialOutcome::Failed, Ok(_)) => {
                warn!("trial {density:.6e} kg/m^3 has no usable surface, assumed too high");
            }
        }

        self.trials.borrow_mut().push(Trial { density, outcome });
        result
    }
}

/// Residual is the normalized surface luminosity mismatch.
///
/// Only solutions that reached the photosphere have one.
pub(super) struct LuminosityProblem;

impl EquationProblem<1> for LuminosityProblem {
    type Input = MassDensity;
    type Output = Solution;
    type Error = ObjectiveError;

    fn input(&self, x: &[f64; 1]) -> Result<Self::Input, Self::Error> {
        Ok(MassDensity::new::<kilogram_per_cubic_meter>(x[0]))
    }

    fn residuals(
        &self,
        input: &Self::Input,
        output: &Self::Output,
    ) -> Result<[f64; 1], Self::Error> {
        let density = input.get::<kilogram_per_cubic_meter>();
        if !output.success() {
            return Err(ObjectiveError::Unclosed {
                density,
                termination: output.termination,
            });
        }
        usable_mismatch(output)
            .map(|mismatch| [mismatch])
            .ok_or(ObjectiveError::Undefined { density })
    }
}

fn usable_mismatch(solution: &Solution) -> Option<f64> {
    solution
        .luminosity_mismatch()
        .filter(|mismatch| mismatch.is_finite())
}
