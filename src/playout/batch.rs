//! Concurrent rollouts across independent instances, plus aggregation.

use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::charge::{ChargeOutcome, DepthCharge};
use crate::core::{MachineConfig, MachineState, RoleIndex, SimRng};
use crate::machine::PropNetStateMachine;

/// Aggregate statistics over many rollouts.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChargeSummary {
    /// Rollouts attempted.
    pub charges: u32,
    /// Rollouts that reached a terminal state.
    pub completed: u32,
    /// Rollouts that faulted.
    pub failed: u32,
    /// Total joint moves played.
    pub total_depth: u64,
    /// Total legal joint moves seen across all steps.
    pub total_joint_moves: u64,
    /// Per-role sum of goal values over completed rollouts.
    pub goal_sums: Vec<u64>,
}

impl ChargeSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a finished rollout.
    pub fn record(&mut self, outcome: &ChargeOutcome) {
        self.charges += 1;
        self.total_depth += u64::from(outcome.depth);
        self.total_joint_moves += outcome.joint_moves_seen;

        if let Some(goals) = &outcome.goals {
            self.completed += 1;
            if self.goal_sums.len() < goals.role_count() {
                self.goal_sums.resize(goals.role_count(), 0);
            }
            for (role, &value) in goals.iter() {
                self.goal_sums[role.index()] += u64::from(value);
            }
        }
    }

    /// Count a faulted rollout.
    pub fn record_failure(&mut self) {
        self.charges += 1;
        self.failed += 1;
    }

    /// Mean goal of a role over completed rollouts.
    #[must_use]
    pub fn mean_goal(&self, role: RoleIndex) -> Option<f64> {
        if self.completed == 0 {
            return None;
        }
        let sum = self.goal_sums.get(role.index())?;
        Some(*sum as f64 / f64::from(self.completed))
    }

    /// Mean joint moves per rollout (failed ones excluded).
    #[must_use]
    pub fn mean_depth(&self) -> f64 {
        let finished = self.charges - self.failed;
        if finished == 0 {
            0.0
        } else {
            self.total_depth as f64 / f64::from(finished)
        }
    }

    /// Mean number of legal joint moves per step.
    #[must_use]
    pub fn mean_branching(&self) -> f64 {
        if self.total_depth == 0 {
            0.0
        } else {
            self.total_joint_moves as f64 / self.total_depth as f64
        }
    }
}

/// Outcomes of a parallel batch, in instance order.
#[derive(Clone, Debug)]
pub struct ChargeBatch {
    /// `None` where the rollout faulted.
    pub outcomes: Vec<Option<ChargeOutcome>>,
    pub summary: ChargeSummary,
}

/// The RNG streams `run_parallel_charges` hands to each instance.
///
/// Replaying a batch single-threaded with these streams reproduces it.
pub fn fork_streams(seed: u64, count: usize) -> Vec<SimRng> {
    let mut master = SimRng::new(seed);
    (0..count).map(|_| master.fork()).collect()
}

fn total_evaluations(instances: &[PropNetStateMachine]) -> u64 {
    instances.iter().map(|m| m.stats().total_evaluations()).sum()
}

/// One rollout per instance, concurrently on the rayon pool.
///
/// The RNG streams come from `config.seed` and each rollout is bounded by
/// `config.playout`. Each instance is driven by exactly one worker. A
/// faulting rollout is logged and counted without affecting the others.
pub fn run_parallel_charges(
    instances: &mut [PropNetStateMachine],
    state: &MachineState,
    config: &MachineConfig,
    deadline: Option<Instant>,
) -> ChargeBatch {
    let start = Instant::now();
    let evaluations_before = total_evaluations(instances);
    let charge = DepthCharge::new(config.playout);
    let streams = fork_streams(config.seed, instances.len());

    let outcomes: Vec<Option<ChargeOutcome>> = instances
        .par_iter_mut()
        .zip(streams)
        .enumerate()
        .map(|(index, (machine, mut rng))| {
            match charge.run(machine, state, &mut rng, deadline) {
                Ok(outcome) => Some(outcome),
                Err(err) => {
                    warn!(instance = index, error = %err, "charge failed");
                    None
                }
            }
        })
        .collect();

    let mut summary = ChargeSummary::new();
    for outcome in &outcomes {
        match outcome {
            Some(outcome) => summary.record(outcome),
            None => summary.record_failure(),
        }
    }

    info!(
        charges = summary.charges,
        completed = summary.completed,
        failed = summary.failed,
        evaluations = total_evaluations(instances).saturating_sub(evaluations_before),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "charge batch finished"
    );
    ChargeBatch { outcomes, summary }
}
