//! Random rollouts ("depth charges") to a terminal state.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{
    JointMove, MachineResult, MachineState, PlayoutConfig, RoleIndex, RoleMap, SimRng,
    StateMachineError,
};
use crate::machine::{PropNetStateMachine, StateMachine};

/// Result of one rollout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeOutcome {
    /// Goal values, present only when a terminal state was reached.
    pub goals: Option<RoleMap<u32>>,
    /// Joint moves played.
    pub depth: u32,
    /// Sum over steps of the number of legal joint moves.
    pub joint_moves_seen: u64,
    /// Whether the rollout reached a terminal state.
    pub completed: bool,
}

/// Rollout driver.
///
/// Stops at a terminal state, after `max_depth` steps (0 = unlimited), or
/// when the deadline is closer than `time_buffer_ms`. The deadline is only
/// checked between steps.
#[derive(Clone, Copy, Debug, Default)]
pub struct DepthCharge {
    config: PlayoutConfig,
}

impl DepthCharge {
    pub fn new(config: PlayoutConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &PlayoutConfig {
        &self.config
    }

    /// Roll out from `state` on the loaded-state fast path.
    pub fn run(
        &self,
        machine: &mut PropNetStateMachine,
        state: &MachineState,
        rng: &mut SimRng,
        deadline: Option<Instant>,
    ) -> MachineResult<ChargeOutcome> {
        machine.load_state(state);
        let role_count = machine.roles().role_count();
        let mut depth = 0;
        let mut joint_moves_seen = 0u64;

        loop {
            if machine.current_is_terminal()? {
                let goals = machine.current_goals()?;
                debug!(
                    depth,
                    evaluations_per_transition = machine.stats().evaluations_per_transition(),
                    "charge reached terminal state"
                );
                return Ok(ChargeOutcome {
                    goals: Some(goals),
                    depth,
                    joint_moves_seen,
                    completed: true,
                });
            }
            if self.should_stop(depth, deadline) {
                debug!(depth, "charge stopped early");
                return Ok(ChargeOutcome {
                    goals: None,
                    depth,
                    joint_moves_seen,
                    completed: false,
                });
            }

            let mut moves = Vec::with_capacity(role_count);
            let mut combinations = 1u64;
            for role in RoleIndex::all(role_count) {
                let legal = machine.current_legal_moves(role)?;
                combinations = combinations.saturating_mul(legal.len() as u64);
                let mv = rng.choose(&legal).cloned().ok_or_else(|| {
                    StateMachineError::move_definition(&machine.roles()[role], "no legal moves")
                })?;
                moves.push(mv);
            }
            joint_moves_seen += combinations;

            machine.advance(&JointMove::new(moves))?;
            depth += 1;
        }
    }

    /// Roll out through the reload-every-query `StateMachine` interface.
    ///
    /// Works with any implementation; slower than `run` on a propnet.
    pub fn run_facade<M: StateMachine + ?Sized>(
        &self,
        machine: &mut M,
        state: &MachineState,
        rng: &mut SimRng,
        deadline: Option<Instant>,
    ) -> MachineResult<ChargeOutcome> {
        let mut current = state.clone();
        let mut depth = 0;
        let mut joint_moves_seen = 0u64;

        loop {
            if machine.is_terminal(&current)? {
                return Ok(ChargeOutcome {
                    goals: Some(machine.goals(&current)?),
                    depth,
                    joint_moves_seen,
                    completed: true,
                });
            }
            if self.should_stop(depth, deadline) {
                return Ok(ChargeOutcome {
                    goals: None,
                    depth,
                    joint_moves_seen,
                    completed: false,
                });
            }

            let joints = machine.all_legal_joint_moves(&current)?;
            joint_moves_seen += joints.len() as u64;
            let joint = rng
                .choose(&joints)
                .ok_or_else(|| StateMachineError::transition("no legal joint moves"))?;
            current = machine.next_state(&current, joint)?;
            depth += 1;
        }
    }

    fn should_stop(&self, depth: u32, deadline: Option<Instant>) -> bool {
        if self.config.max_depth > 0 && depth >= self.config.max_depth {
            return true;
        }
        let buffer = Duration::from_millis(self.config.time_buffer_ms);
        deadline.is_some_and(|deadline| Instant::now() + buffer >= deadline)
    }
}
