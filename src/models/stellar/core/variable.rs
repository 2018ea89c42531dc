//! History containers for integrated and derived quantities.
//!
//! A [`StateVariable`] holds one integrated quantity with a value column and
//! a first-derivative column. An [`AlgebraicVariable`] holds one quantity
//! computed directly from the state at the same radius.
//!
//! Both keep the accepted history separate from a *current* value. During a
//! Runge-Kutta step the current value moves through the trial stages while
//! the history stays untouched until every variable commits the same step.

mod error;

pub use error::{BoundaryIssue, VariableError};

/// Derivative order of a stored column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Order {
    Value,
    Derivative,
}

impl Order {
    fn index(self) -> usize {
        match self {
            Self::Value => 0,
            Self::Derivative => 1,
        }
    }
}

/// One integrated quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct StateVariable {
    name: &'static str,
    history: [Vec<f64>; 2],
    current: [f64; 2],
}

impl StateVariable {
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            history: [Vec::new(), Vec::new()],
            current: [f64::NAN; 2],
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Sets the boundary value.
    ///
    /// # Errors
    ///
    /// Returns [`VariableError::InvalidBoundary`] if the value was already
    /// seeded or is not finite.
    pub fn seed(&mut self, value: f64) -> Result<(), VariableError> {
        self.seed_order(Order::Value, value)
    }

    /// Sets the boundary derivative.
    ///
    /// Central derivatives depend on the whole central state, so this is
    /// called only after every variable has its boundary value.
    ///
    /// # Errors
    ///
    /// Returns [`VariableError::InvalidBoundary`] if the value column is not
    /// seeded yet, the derivative was already seeded, or it is not finite.
    pub fn seed_derivative(&mut self, derivative: f64) -> Result<(), VariableError> {
        if self.history[0].is_empty() {
            return Err(self.boundary(BoundaryIssue::ValueMissing));
        }
        self.seed_order(Order::Derivative, derivative)
    }

    fn seed_order(&mut self, order: Order, value: f64) -> Result<(), VariableError> {
        let i = order.index();
        if !self.history[i].is_empty() {
            return Err(self.boundary(BoundaryIssue::AlreadySet));
        }
        if !value.is_finite() {
            return Err(self.boundary(BoundaryIssue::NonFinite));
        }
        self.history[i].push(value);
        self.current[i] = value;
        Ok(())
    }

    fn boundary(&self, issue: BoundaryIssue) -> VariableError {
        VariableError::InvalidBoundary {
            quantity: self.name,
            issue,
        }
    }

    /// Candidate value at the given order.
    #[must_use]
    pub fn current(&self, order: Order) -> f64 {
        self.current[order.index()]
    }

    /// Accepted values at the given order.
    #[must_use]
    pub fn history(&self, order: Order) -> &[f64] {
        &self.history[order.index()]
    }

    /// Number of accepted points, including the boundary.
    #[must_use]
    pub fn len(&self) -> usize {
        self.history[0].len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.history[0].is_empty()
    }

    /// Appends an accepted point and makes it current.
    ///
    /// `step` is the index of the new point; the boundary is step zero.
    ///
    /// # Errors
    ///
    /// Returns [`VariableError::InconsistentStep`] if `step` is not the next
    /// index, or [`VariableError::InvalidBoundary`] if the boundary derivative
    /// was never seeded.
    pub fn commit(
        &mut self,
        step: usize,
        value: f64,
        derivative: f64,
    ) -> Result<(), VariableError> {
        if self.history[1].len() != self.history[0].len() {
            return Err(self.boundary(BoundaryIssue::ValueMissing));
        }
        let expected = self.len();
        if step != expected || expected == 0 {
            return Err(VariableError::InconsistentStep {
                quantity: self.name,
                expected,
                found: step,
            });
        }
        self.history[0].push(value);
        self.history[1].push(derivative);
        self.current = [value, derivative];
        Ok(())
    }

    /// Makes a trial value current without committing it.
    pub fn use_intermediate(&mut self, value: f64) {
        self.current[0] = value;
    }

    /// Restores the current values to the last accepted point.
    pub fn use_original(&mut self) {
        for (current, history) in self.current.iter_mut().zip(&self.history) {
            if let Some(&last) = history.last() {
                *current = last;
            }
        }
    }

    /// Keeps the first `len` accepted points and restores the current values.
    pub fn truncate(&mut self, len: usize) {
        for history in &mut self.history {
            history.truncate(len);
        }
        self.use_original();
    }
}

/// One quantity computed from the state at the same radius.
#[derive(Debug, Clone, PartialEq)]
pub struct AlgebraicVariable {
    name: &'static str,
    history: Vec<f64>,
    current: f64,
}

impl AlgebraicVariable {
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            history: Vec::new(),
            current: f64::NAN,
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Sets the trial value.
    pub fn set(&mut self, value: f64) {
        self.current = value;
    }

    /// Appends the current value as accepted point `step`.
    ///
    /// # Errors
    ///
    /// Returns [`VariableError::InconsistentStep`] if `step` is not the next index.
    pub fn commit(&mut self, step: usize) -> Result<(), VariableError> {
        let expected = self.history.len();
        if step != expected {
            return Err(VariableError::InconsistentStep {
                quantity: self.name,
                expected,
                found: step,
            });
        }
        self.history.push(self.current);
        Ok(())
    }

    #[must_use]
    pub fn current(&self) -> f64 {
        self.current
    }

    #[must_use]
    pub fn history(&self) -> &[f64] {
        &self.history
    }

    pub fn use_original(&mut self) {
        if let Some(&last) = self.history.last() {
            self.current = last;
        }
    }

    pub fn truncate(&mut self, len: usize) {
        self.history.truncate(len);
        self.use_original();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(value: f64, derivative: f64) -> StateVariable {
        let mut variable = StateVariable::new("mass");
        variable.seed(value).unwrap();
        variable.seed_derivative(derivative).unwrap();
        variable
    }

    #[test]
    fn boundary_can_only_be_set_once() {
        let mut variable = seeded(1.0, 2.0);
        assert_eq!(
            variable.seed(3.0),
            Err(VariableError::InvalidBoundary {
                quantity: "mass",
                issue: BoundaryIssue::AlreadySet
            })
        );
        assert!(variable.seed_derivative(3.0).is_err());
        assert_eq!(variable.history(Order::Value), &[1.0]);
        assert_eq!(variable.history(Order::Derivative), &[2.0]);
    }

    #[test]
    fn boundary_must_be_finite_and_ordered() {
        let mut variable = StateVariable::new("density");
        assert_eq!(
            variable.seed_derivative(1.0),
            Err(VariableError::InvalidBoundary {
                quantity: "density",
                issue: BoundaryIssue::ValueMissing
            })
        );
        assert!(matches!(
            variable.seed(f64::NAN),
            Err(VariableError::InvalidBoundary {
                issue: BoundaryIssue::NonFinite,
                ..
            })
        ));
        assert!(variable.is_empty());
    }

    #[test]
    fn commit_requires_the_next_step() {
        let mut variable = seeded(1.0, 2.0);
        assert_eq!(
            variable.commit(2, 5.0, 6.0),
            Err(VariableError::InconsistentStep {
                quantity: "mass",
                expected: 1,
                found: 2
            })
        );
        variable.commit(1, 5.0, 6.0).unwrap();
        assert_eq!(variable.len(), 2);
        assert_eq!(variable.current(Order::Value), 5.0);
        assert_eq!(variable.current(Order::Derivative), 6.0);
    }

    #[test]
    fn intermediate_values_do_not_touch_history() {
        let mut variable = seeded(1.0, 2.0);
        variable.use_intermediate(7.5);
        assert_eq!(variable.current(Order::Value), 7.5);
        assert_eq!(variable.history(Order::Value), &[1.0]);

        variable.use_original();
        assert_eq!(variable.current(Order::Value), 1.0);
    }

    #[test]
    fn truncate_restores_last_kept_point() {
        let mut variable = seeded(1.0, 2.0);
        variable.commit(1, 3.0, 4.0).unwrap();
        variable.commit(2, 5.0, 6.0).unwrap();
        variable.truncate(2);
        assert_eq!(variable.history(Order::Value), &[1.0, 3.0]);
        assert_eq!(variable.current(Order::Derivative), 4.0);
        variable.commit(2, 9.0, 9.0).unwrap();
    }

    #[test]
    fn algebraic_commits_in_order() {
        let mut pressure = AlgebraicVariable::new("pressure");
        pressure.set(10.0);
        pressure.commit(0).unwrap();
        pressure.set(8.0);
        assert!(pressure.commit(2).is_err());
        pressure.use_original();
        assert_eq!(pressure.current(), 10.0);
        pressure.set(9.0);
        pressure.commit(1).unwrap();
        assert_eq!(pressure.history(), &[10.0, 9.0]);
    }
}
