//! Propagation counters for diagnostics and tests.

use serde::{Deserialize, Serialize};

/// Work done by one propagator since creation or the last reset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropagationStats {
    /// Positions re-evaluated by the value pass.
    pub value_evaluations: u64,

    /// Positions re-evaluated by the legal pass.
    pub legal_evaluations: u64,

    /// Source flips that marked the value dirty-set.
    pub value_marks: u64,

    /// Source flips that marked the legal dirty-set.
    pub legal_marks: u64,

    /// Transition steps taken.
    pub transitions: u64,
}

impl PropagationStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all counters to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Total positions evaluated by both passes.
    #[must_use]
    pub fn total_evaluations(&self) -> u64 {
        self.value_evaluations + self.legal_evaluations
    }

    /// Average value-pass evaluations per transition.
    #[must_use]
    pub fn evaluations_per_transition(&self) -> f64 {
        if self.transitions == 0 {
            0.0
        } else {
            self.value_evaluations as f64 / self.transitions as f64
        }
    }
}
