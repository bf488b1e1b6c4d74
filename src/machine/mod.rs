//! State-machine facade over the propagation engine.
//!
//! - `StateMachine`: the interface search strategies consume
//! - `PropNetStateMachine`: the circuit-backed implementation
//! - `InstanceFactory`: one independent instance per worker

pub mod traits;
pub mod propnet;
pub mod factory;

pub use traits::{cross_product, StateMachine};
pub use propnet::PropNetStateMachine;
pub use factory::InstanceFactory;
