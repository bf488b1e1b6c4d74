//! # propnet-ggp
//!
//! A propositional-network state machine for general game playing search.
//!
//! ## Design Principles
//!
//! 1. **Compile Once, Propagate Incrementally**: The circuit is ordered and
//!    its dependency bit-sets are computed at construction. Queries only
//!    re-evaluate what changed.
//!
//! 2. **Errors, Not Defaults**: Ill-defined goals, unknown moves and engine
//!    faults surface as errors. Nothing is silently resolved to zero.
//!
//! 3. **One Instance Per Worker**: Instances mutate in place. Parallel
//!    search builds one per thread instead of sharing behind locks.
//!
//! ## Architecture
//!
//! - **Arena Circuit**: Components live in a flat `Vec` addressed by
//!   `CompId`, so transition feedback edges need no shared ownership.
//!
//! - **Two Passes**: A value pass for real truth and a legal pass that
//!   holds every action true, each with its own dirty-set.
//!
//! - **Persistent States**: `MachineState` uses `im-rs` for O(1) cloning.
//!
//! ## Modules
//!
//! - `core`: Terms, roles, moves, states, RNG, configuration, errors
//! - `circuit`: The boolean circuit and its builder
//! - `engine`: Evaluation order, dependency map, propagation
//! - `machine`: StateMachine trait, propnet implementation, instance factory
//! - `playout`: Random rollouts and parallel batches
//! - `games`: Reference game circuits

pub mod core;
pub mod circuit;
pub mod engine;
pub mod machine;
pub mod playout;
pub mod games;

// Re-export commonly used types
pub use crate::core::{
    Term, Role, RoleIndex, RoleMap,
    Move, JointMove, MachineState,
    SimRng, MachineConfig, PlayoutConfig,
    BuildError, PropagationError, StateMachineError, MachineResult,
};

pub use crate::circuit::{Circuit, CircuitBuilder, CompId, Node, NodeKind, PropKind};

pub use crate::engine::{
    BitSet, EvaluationOrder, DependencyMap,
    CompiledNet, Propagator, PropagationStats,
};

pub use crate::machine::{StateMachine, PropNetStateMachine, InstanceFactory};

pub use crate::playout::{
    DepthCharge, ChargeOutcome, ChargeSummary, ChargeBatch,
    run_parallel_charges,
};

pub use crate::games::{TicTacToeBuilder, ButtonsBuilder, PenniesBuilder};
