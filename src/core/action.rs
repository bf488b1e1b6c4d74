//! Moves and joint moves.
//!
//! A `Move` is the action term a role plays (`noop`, `(mark 1 1)`).
//! A `JointMove` holds one move per role, in role order, for a single
//! simultaneous time step.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::role::RoleIndex;
use super::term::Term;

/// A single role's action.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Move(pub Term);

impl Move {
    /// Create a move from an atom name.
    #[must_use]
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Term::atom(name))
    }

    /// The move's identifying term.
    #[must_use]
    pub fn term(&self) -> &Term {
        &self.0
    }
}

impl From<Term> for Move {
    fn from(term: Term) -> Self {
        Self(term)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One move per role, in role order.
///
/// SmallVec keeps the common 1-4 role case off the heap.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JointMove {
    moves: SmallVec<[Move; 4]>,
}

impl JointMove {
    /// Create a joint move from moves in role order.
    #[must_use]
    pub fn new(moves: impl IntoIterator<Item = Move>) -> Self {
        Self {
            moves: moves.into_iter().collect(),
        }
    }

    /// Number of moves (should equal the role count).
    #[must_use]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Check if there are no moves.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Moves in role order.
    #[must_use]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves
    }

    /// Iterate over (RoleIndex, &Move) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (RoleIndex, &Move)> {
        self.moves
            .iter()
            .enumerate()
            .map(|(i, m)| (RoleIndex::new(i as u8), m))
    }
}

impl fmt::Display for JointMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, mv) in self.moves.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{mv}")?;
        }
        write!(f, "]")
    }
}
