//! Core types: terms, roles, moves, states, RNG, configuration, errors.
//!
//! These are the opaque domain values the state machine translates to and
//! from circuit inputs. They know nothing about circuits.

pub mod term;
pub mod role;
pub mod action;
pub mod state;
pub mod rng;
pub mod config;
pub mod error;

pub use term::Term;
pub use role::{Role, RoleIndex, RoleMap};
pub use action::{JointMove, Move};
pub use state::MachineState;
pub use rng::SimRng;
pub use config::{MachineConfig, PlayoutConfig};
pub use error::{BuildError, MachineResult, PropagationError, StateMachineError};
