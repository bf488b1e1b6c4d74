//! The boolean circuit consumed by the engine.
//!
//! Propositions, AND/OR/NOT gates, constants and transitions stored in an
//! arena, together with the designated base, input, init, terminal, legal
//! and goal propositions.

pub mod node;
pub mod graph;
pub mod builder;

pub use node::{CompId, Node, NodeKind, PropKind};
pub use graph::Circuit;
pub use builder::CircuitBuilder;
