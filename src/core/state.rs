//! Game state snapshots.
//!
//! A `MachineState` is the sparse set of base facts that are true; anything
//! absent is false. Uses an `im` persistent ordered set so search consumers
//! can clone states in O(1) and iterate them in a deterministic order.

use std::fmt;

use im::OrdSet;
use serde::{Deserialize, Serialize};

use super::term::Term;

/// Set of true base facts.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MachineState {
    contents: OrdSet<Term>,
}

impl MachineState {
    /// Create an empty state (every base fact false).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a fact is true in this state.
    #[must_use]
    pub fn contains(&self, fact: &Term) -> bool {
        self.contents.contains(fact)
    }

    /// Mark a fact as true.
    pub fn insert(&mut self, fact: Term) {
        self.contents.insert(fact);
    }

    /// Number of true facts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contents.len()
    }

    /// Check if no fact is true.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Iterate over true facts in term order.
    pub fn iter(&self) -> impl Iterator<Item = &Term> {
        self.contents.iter()
    }
}

impl FromIterator<Term> for MachineState {
    fn from_iter<I: IntoIterator<Item = Term>>(iter: I) -> Self {
        Self {
            contents: iter.into_iter().collect(),
        }
    }
}

impl fmt::Debug for MachineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.contents.iter()).finish()
    }
}

impl fmt::Display for MachineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, fact) in self.contents.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{fact}")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fact(name: &str) -> Term {
        Term::compound("lit", [Term::atom(name)])
    }

    #[test]
    fn test_contains() {
        let state: MachineState = [fact("p"), fact("q")].into_iter().collect();

        assert!(state.contains(&fact("p")));
        assert!(!state.contains(&fact("r")));
        assert_eq!(state.len(), 2);
    }

    #[test]
    fn test_equality_ignores_insertion_order() {
        let a: MachineState = [fact("p"), fact("q")].into_iter().collect();
        let b: MachineState = [fact("q"), fact("p")].into_iter().collect();

        assert_eq!(a, b);
        assert_eq!(a.to_string(), "{(lit p) (lit q)}");
    }

    #[test]
    fn test_clone_is_independent() {
        let mut a = MachineState::new();
        a.insert(fact("p"));
        let mut b = a.clone();
        b.insert(fact("q"));

        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 2);
    }

    #[test]
    fn test_serialization() {
        let state: MachineState = [fact("p")].into_iter().collect();
        let json = serde_json::to_string(&state).unwrap();
        let deserialized: MachineState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, deserialized);
    }
}
