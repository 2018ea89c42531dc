//! Record of the central densities tried during a search.

use crate::models::stellar::core::profile::Termination;

/// How one trial central density turned out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrialOutcome {
    /// The integration reached the photosphere with this luminosity mismatch.
    Closed { residual: f64 },
    /// The integration ended before the photosphere.
    ///
    /// The star never closes, so the central density is taken to be too low.
    Unclosed(Termination),
    /// The integration diverged or the mismatch could not be formed.
    ///
    /// Such densities are taken to be too high.
    Failed,
}

impl TrialOutcome {
    /// Luminosity mismatch, for trials that reached the photosphere.
    #[must_use]
    pub fn residual(self) -> Option<f64> {
        match self {
            Self::Closed { residual } => Some(residual),
            Self::Unclosed(_) | Self::Failed => None,
        }
    }

    /// Whether the trial lies above the root.
    #[must_use]
    pub fn is_high(self) -> bool {
        match self {
            Self::Closed { residual } => residual > 0.0,
            Self::Unclosed(_) => false,
            Self::Failed => true,
        }
    }
}

/// One evaluated central density.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trial {
    /// Central density in kg/m³.
    pub density: f64,
    pub outcome: TrialOutcome,
}

/// Bracket held by the search after an iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    pub low: Trial,
    pub high: Trial,
}

impl Bracket {
    /// Width in kg/m³.
    #[must_use]
    pub fn width(&self) -> f64 {
        (self.high.density - self.low.density).abs()
    }

    /// Whether the endpoints were observed on opposite sides of the root.
    #[must_use]
    pub fn changes_sign(&self) -> bool {
        !self.low.outcome.is_high() && self.high.outcome.is_high()
    }
}

/// Replays the bisection over `trials` in evaluation order.
///
/// The first entry is the starting bracket `[low, high]`; each later entry
/// follows one midpoint. Returns nothing if an endpoint was never evaluated.
pub(super) fn bracket_history(trials: &[Trial], low: f64, high: f64) -> Vec<Bracket> {
    let endpoint = |density: f64| trials.iter().find(|trial| trial.density == density).copied();
    let (Some(mut low), Some(mut high)) = (endpoint(low), endpoint(high)) else {
        return Vec::new();
    };

    let mut history = vec![Bracket { low, high }];
    for &trial in trials {
        if trial.density <= low.density || trial.density >= high.density {
            continue;
        }
        if trial.outcome.is_high() == high.outcome.is_high() {
            high = trial;
        } else {
            low = trial;
        }
        history.push(Bracket { low, high });
    }
    history
}
