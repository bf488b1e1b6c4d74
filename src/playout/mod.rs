//! Random rollouts over state machines.
//!
//! Rollouts are long sequences of queries, so they check the caller's
//! deadline between steps; the machines themselves never time out.

pub mod charge;
pub mod batch;

pub use charge::{ChargeOutcome, DepthCharge};
pub use batch::{fork_streams, run_parallel_charges, ChargeBatch, ChargeSummary};
