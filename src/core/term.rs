//! Identifying terms for propositions, roles and moves.
//!
//! A `Term` is either an atom (`x`, `100`, `noop`) or a compound
//! `(name arg...)`. Terms are what the circuit uses to name propositions,
//! and what the state machine decodes back into roles, moves and goal values.
//!
//! ```
//! use propnet_ggp::core::Term;
//!
//! let cell = Term::compound("cell", [Term::atom("1"), Term::atom("2"), Term::atom("b")]);
//! assert_eq!(cell.to_string(), "(cell 1 2 b)");
//! assert_eq!(cell.arg(2), Some(&Term::atom("b")));
//! ```

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A ground logic term.
///
/// `Arc`-backed so clones are cheap and terms can cross worker threads.
/// Ordering is total and structural, which keeps state snapshots in a
/// deterministic order.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Term {
    /// A constant symbol.
    Atom(Arc<str>),
    /// A function symbol applied to arguments.
    Compound {
        name: Arc<str>,
        args: Arc<[Term]>,
    },
}

impl Term {
    /// Create an atom.
    #[must_use]
    pub fn atom(name: impl AsRef<str>) -> Self {
        Term::Atom(Arc::from(name.as_ref()))
    }

    /// Create an integer atom.
    #[must_use]
    pub fn int(value: u32) -> Self {
        Term::atom(value.to_string())
    }

    /// Create a compound term.
    #[must_use]
    pub fn compound(name: impl AsRef<str>, args: impl IntoIterator<Item = Term>) -> Self {
        Term::Compound {
            name: Arc::from(name.as_ref()),
            args: args.into_iter().collect(),
        }
    }

    /// The head symbol: the atom itself, or the function name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Term::Atom(name) | Term::Compound { name, .. } => &**name,
        }
    }

    /// Arguments of a compound term (empty for atoms).
    #[must_use]
    pub fn args(&self) -> &[Term] {
        match self {
            Term::Atom(_) => &[],
            Term::Compound { args, .. } => &**args,
        }
    }

    /// Get the `index`-th argument (0-based).
    #[must_use]
    pub fn arg(&self, index: usize) -> Option<&Term> {
        self.args().get(index)
    }

    /// Number of arguments.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.args().len()
    }

    /// Parse this term as a non-negative integer literal.
    ///
    /// Only atoms qualify; `(f 1)` is not an integer.
    #[must_use]
    pub fn as_int(&self) -> Option<u32> {
        match self {
            Term::Atom(name) => name.parse().ok(),
            Term::Compound { .. } => None,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Atom(name) => write!(f, "{name}"),
            Term::Compound { name, args } => {
                write!(f, "({name}")?;
                for arg in args.iter() {
                    write!(f, " {arg}")?;
                }
                write!(f, ")")
            }
        }
    }
}

impl fmt::Debug for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Term({self})")
    }
}

impl From<&str> for Term {
    fn from(name: &str) -> Self {
        Term::atom(name)
    }
}
