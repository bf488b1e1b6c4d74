//! Circuit ordering and incremental propagation.
//!
//! ## Compilation (once per instance)
//!
//! - `EvaluationOrder`: topological order over derived propositions
//! - `DependencyMap`: per-source bit-set of dependent order positions
//! - `CompiledNet`: the immutable bundle, shared by forks through `Arc`
//!
//! ## Runtime (mutated on every query)
//!
//! - `Propagator`: value and legal fields, the two dirty-sets, counters

pub mod bitset;
pub mod ordering;
pub mod dependency;
pub mod compiled;
pub mod propagation;
pub mod stats;

pub use bitset::BitSet;
pub use ordering::EvaluationOrder;
pub use dependency::DependencyMap;
pub use compiled::{CompiledNet, GoalEntry, LegalEntry};
pub use propagation::Propagator;
pub use stats::PropagationStats;
