//! Objective-based incumbent detection.

/// Whether we are maximizing or minimizing the objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectiveDirection {
    Maximize,
    Minimize,
}

impl Default for ObjectiveDirection {
    fn default() -> Self {
        Self::Minimize
    }
}

/// Tracks the best objective seen so far.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncumbentTracker {
    pub direction: ObjectiveDirection,
    pub best: Option<f64>,
}

impl IncumbentTracker {
    pub fn new(direction: ObjectiveDirection) -> Self {
        Self {
            direction,
            best: None,
        }
    }

    /// Strictly better than the current best. NaN never improves.
    pub fn improves(&self, objective: f64) -> bool {
        if objective.is_nan() {
            return false;
        }
        match self.best {
            None => true,
            Some(best) => match self.direction {
                ObjectiveDirection::Maximize => objective > best,
                ObjectiveDirection::Minimize => objective < best,
            },
        }
    }

    /// Update the best objective if `objective` improves on it.
    pub fn update_best(&mut self, objective: f64) -> bool {
        let improved = self.improves(objective);
        if improved {
            self.best = Some(objective);
        }
        improved
    }
}
