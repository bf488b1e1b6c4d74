//! Error types for circuit construction and state-machine queries.
//!
//! Nothing here is retried: every variant is a defect in the circuit or in
//! the caller's input, surfaced to whoever issued the operation.

use thiserror::Error;

use super::role::Role;
use super::term::Term;
use crate::circuit::CompId;

/// Result type for state-machine queries.
pub type MachineResult<T> = Result<T, StateMachineError>;

/// Construction faults. Fatal: no partially built instance is usable.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The circuit minus transitions is not acyclic.
    #[error("combinational cycle: {remaining} propositions cannot be ordered (stuck at {stuck})")]
    CombinationalCycle { remaining: usize, stuck: Term },

    /// A node's wiring violates the circuit shape rules.
    #[error("malformed {node}: {reason}")]
    MalformedNode { node: CompId, reason: String },

    /// An edge points outside the node arena.
    #[error("{node} references missing component {target}")]
    DanglingEdge { node: CompId, target: CompId },

    /// The circuit declares no roles.
    #[error("circuit declares no roles")]
    NoRoles,

    /// No terminal proposition was designated.
    #[error("circuit has no terminal proposition")]
    MissingTerminal,

    /// No init proposition was designated.
    #[error("circuit has no init proposition")]
    MissingInit,

    /// A role has no legal or no goal propositions.
    #[error("role {role} has no {kind} propositions")]
    MissingRolePropositions { role: Role, kind: &'static str },

    /// More roles than a role index can address.
    #[error("game has {count} roles, at most 255 are supported")]
    TooManyRoles { count: usize },

    /// A per-role table does not have one entry per role.
    #[error("{kind} table has {found} entries for {expected} roles")]
    RoleTableMismatch {
        kind: &'static str,
        expected: usize,
        found: usize,
    },

    /// A goal proposition's second component is not an integer literal.
    #[error("goal proposition {term} has no integer value")]
    InvalidGoalValue { term: Term },

    /// A legal or action proposition's term does not carry a move.
    #[error("proposition {term} does not name a move")]
    InvalidMoveTerm { term: Term },

    /// The same role was declared twice.
    #[error("role {role} declared twice")]
    DuplicateRole { role: Role },

    /// The init sequence failed to propagate.
    #[error("initial state computation failed: {0}")]
    InitialState(#[source] PropagationError),

    /// A factory was asked for zero instances.
    #[error("instance count must be positive")]
    NoInstances,
}

/// Propagation-engine logic errors.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PropagationError {
    /// A derived proposition was read while its position was still dirty.
    #[error("read of {prop} at order position {position} before propagation")]
    StaleRead { prop: CompId, position: usize },

    /// A transition step was requested before the value pass drained.
    #[error("transition step with {pending} positions still pending")]
    PendingPropagation { pending: usize },
}

/// Query faults, one class per state-machine operation family.
#[derive(Debug, Error)]
pub enum StateMachineError {
    /// Legal moves could not be computed.
    #[error("move definition fault for role {role}: {reason}")]
    MoveDefinition {
        role: Role,
        reason: String,
        #[source]
        source: Option<PropagationError>,
    },

    /// The successor state could not be computed.
    #[error("transition definition fault: {reason}")]
    TransitionDefinition {
        reason: String,
        #[source]
        source: Option<PropagationError>,
    },

    /// The goal value is ill-defined (zero or several true goal propositions).
    #[error("goal definition fault for role {role}: {reason}")]
    GoalDefinition {
        role: Role,
        reason: String,
        #[source]
        source: Option<PropagationError>,
    },
}

impl StateMachineError {
    pub fn move_definition(role: &Role, reason: impl Into<String>) -> Self {
        StateMachineError::MoveDefinition {
            role: role.clone(),
            reason: reason.into(),
            source: None,
        }
    }

    pub fn transition(reason: impl Into<String>) -> Self {
        StateMachineError::TransitionDefinition {
            reason: reason.into(),
            source: None,
        }
    }

    pub fn goal_definition(role: &Role, reason: impl Into<String>) -> Self {
        StateMachineError::GoalDefinition {
            role: role.clone(),
            reason: reason.into(),
            source: None,
        }
    }

    /// Wrap an engine error as a move-definition fault.
    pub fn move_propagation(role: &Role, err: PropagationError) -> Self {
        StateMachineError::MoveDefinition {
            role: role.clone(),
            reason: "legal pass failed".to_string(),
            source: Some(err),
        }
    }

    /// Wrap an engine error as a transition fault.
    pub fn transition_propagation(err: PropagationError) -> Self {
        StateMachineError::TransitionDefinition {
            reason: "value pass or transition step failed".to_string(),
            source: Some(err),
        }
    }

    /// Wrap an engine error as a goal-definition fault.
    pub fn goal_propagation(role: &Role, err: PropagationError) -> Self {
        StateMachineError::GoalDefinition {
            role: role.clone(),
            reason: "value pass failed".to_string(),
            source: Some(err),
        }
    }
}
