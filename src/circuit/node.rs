//! Circuit components.
//!
//! Uses arena-based storage with index references (`CompId`) instead of a
//! pointer-linked graph, so transition feedback edges need no shared
//! ownership.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::Term;

/// Index into the circuit's component arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CompId(pub u32);

impl CompId {
    /// Sentinel value representing no component.
    pub const NONE: CompId = CompId(u32::MAX);

    /// Create a new component ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Check if this is the NONE sentinel.
    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    /// Arena index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CompId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "CompId(NONE)")
        } else {
            write!(f, "CompId({})", self.0)
        }
    }
}

/// What a proposition is for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropKind {
    /// Persistent state bit, fed by a transition.
    Base,
    /// Action bit `(does role move)`, set per query.
    Input,
    /// The synthetic init proposition.
    Init,
    /// Everything computed combinationally (legal, goal, terminal, views).
    Derived,
}

impl PropKind {
    /// Externally settable propositions are excluded from the evaluation order.
    #[must_use]
    pub const fn is_source(self) -> bool {
        !matches!(self, PropKind::Derived)
    }
}

/// Component variants.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// A named boolean node.
    Proposition { name: Term, kind: PropKind },
    /// Conjunction of all inputs.
    And,
    /// Disjunction of all inputs.
    Or,
    /// Negation of the single input.
    Not,
    /// One-step delay into a base proposition.
    Transition,
    /// Fixed truth value.
    Constant(bool),
}

impl NodeKind {
    /// Gates and constants are evaluated transparently through their owner.
    #[must_use]
    pub fn is_gate(&self) -> bool {
        matches!(
            self,
            NodeKind::And | NodeKind::Or | NodeKind::Not | NodeKind::Constant(_)
        )
    }
}

/// A component with its structural edges.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    /// Components this one reads.
    pub inputs: SmallVec<[CompId; 2]>,
    /// Components reading this one.
    pub outputs: SmallVec<[CompId; 4]>,
}

impl Node {
    /// Create an unconnected node.
    #[must_use]
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            inputs: SmallVec::new(),
            outputs: SmallVec::new(),
        }
    }

    /// Proposition kind, if this node is a proposition.
    #[must_use]
    pub fn prop_kind(&self) -> Option<PropKind> {
        match &self.kind {
            NodeKind::Proposition { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Proposition name, if this node is a proposition.
    #[must_use]
    pub fn name(&self) -> Option<&Term> {
        match &self.kind {
            NodeKind::Proposition { name, .. } => Some(name),
            _ => None,
        }
    }

    /// The single structural input, if there is exactly one.
    #[must_use]
    pub fn single_input(&self) -> Option<CompId> {
        match self.inputs.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comp_id_none() {
        assert!(CompId::NONE.is_none());
        assert!(!CompId::new(0).is_none());
        assert_eq!(CompId::NONE.to_string(), "CompId(NONE)");
        assert_eq!(CompId::new(3).to_string(), "CompId(3)");
    }

    #[test]
    fn test_source_kinds() {
        assert!(PropKind::Base.is_source());
        assert!(PropKind::Input.is_source());
        assert!(PropKind::Init.is_source());
        assert!(!PropKind::Derived.is_source());
    }

    #[test]
    fn test_single_input() {
        let mut node = Node::new(NodeKind::Not);
        assert_eq!(node.single_input(), None);
        node.inputs.push(CompId::new(4));
        assert_eq!(node.single_input(), Some(CompId::new(4)));
        node.inputs.push(CompId::new(5));
        assert_eq!(node.single_input(), None);
    }
}
