//! Roles and per-role data storage.
//!
//! ## Role
//!
//! A named participant of the game, identified by its term (`x`, `white`).
//!
//! ## RoleIndex / RoleMap
//!
//! Roles are listed once per circuit; `RoleIndex` is a role's 0-based
//! position in that list and `RoleMap<T>` stores one value per role,
//! backed by a `Vec` for O(1) access.

use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use super::term::Term;

/// A game role.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Role(pub Term);

impl Role {
    /// Create a role from its name.
    #[must_use]
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Term::atom(name))
    }

    /// The role's identifying term.
    #[must_use]
    pub fn term(&self) -> &Term {
        &self.0
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position of a role in the circuit's role list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoleIndex(pub u8);

impl RoleIndex {
    /// Create a new role index.
    #[must_use]
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    /// Get the raw index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all role indices for a game with `role_count` roles.
    ///
    /// ```
    /// use propnet_ggp::core::RoleIndex;
    ///
    /// let roles: Vec<_> = RoleIndex::all(2).collect();
    /// assert_eq!(roles, vec![RoleIndex::new(0), RoleIndex::new(1)]);
    /// ```
    pub fn all(role_count: usize) -> impl Iterator<Item = RoleIndex> {
        (0..role_count as u8).map(RoleIndex)
    }
}

impl fmt::Display for RoleIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Role #{}", self.0)
    }
}

/// Per-role data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use propnet_ggp::core::{RoleIndex, RoleMap};
///
/// let mut goals: RoleMap<u32> = RoleMap::new(2, |_| 0);
/// goals[RoleIndex::new(1)] = 100;
/// assert_eq!(goals.values().copied().collect::<Vec<_>>(), vec![0, 100]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleMap<T> {
    data: Vec<T>,
}

impl<T> RoleMap<T> {
    /// Create a new RoleMap with values from a factory function.
    pub fn new(role_count: usize, factory: impl Fn(RoleIndex) -> T) -> Self {
        assert!(role_count > 0, "Must have at least 1 role");
        assert!(role_count <= 255, "At most 255 roles supported");

        let data = (0..role_count as u8).map(|i| factory(RoleIndex(i))).collect();

        Self { data }
    }

    /// Build a RoleMap from one value per role, in role order.
    ///
    /// Returns `None` if `values` is empty or has more than 255 entries.
    pub fn from_vec(values: Vec<T>) -> Option<Self> {
        if values.is_empty() || values.len() > 255 {
            return None;
        }
        Some(Self { data: values })
    }

    /// Get the number of roles.
    #[must_use]
    pub fn role_count(&self) -> usize {
        self.data.len()
    }

    /// Iterate over (RoleIndex, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (RoleIndex, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (RoleIndex(i as u8), v))
    }

    /// Iterate over values in role order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    /// Iterate over all role indices.
    pub fn role_indices(&self) -> impl Iterator<Item = RoleIndex> {
        RoleIndex::all(self.data.len())
    }
}

impl<T> Index<RoleIndex> for RoleMap<T> {
    type Output = T;

    fn index(&self, role: RoleIndex) -> &Self::Output {
        &self.data[role.index()]
    }
}

impl<T> IndexMut<RoleIndex> for RoleMap<T> {
    fn index_mut(&mut self, role: RoleIndex) -> &mut Self::Output {
        &mut self.data[role.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_display() {
        assert_eq!(Role::new("white").to_string(), "white");
        assert_eq!(RoleIndex::new(1).to_string(), "Role #1");
    }

    #[test]
    fn test_role_map_new() {
        let map: RoleMap<usize> = RoleMap::new(3, |r| r.index() * 10);

        assert_eq!(map[RoleIndex::new(0)], 0);
        assert_eq!(map[RoleIndex::new(1)], 10);
        assert_eq!(map[RoleIndex::new(2)], 20);
    }

    #[test]
    fn test_role_map_mutation() {
        let mut map: RoleMap<Vec<u32>> = RoleMap::new(2, |_| Vec::new());
        map[RoleIndex::new(1)].push(7);

        assert!(map[RoleIndex::new(0)].is_empty());
        assert_eq!(map[RoleIndex::new(1)], vec![7]);
    }

    #[test]
    fn test_role_map_from_vec() {
        let map = RoleMap::from_vec(vec![50, 50]).unwrap();
        assert_eq!(map.role_count(), 2);
        assert!(RoleMap::<u32>::from_vec(Vec::new()).is_none());
    }

    #[test]
    fn test_role_map_iter() {
        let map: RoleMap<u32> = RoleMap::new(2, |r| r.index() as u32);
        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs, vec![(RoleIndex::new(0), &0), (RoleIndex::new(1), &1)]);
    }

    #[test]
    #[should_panic(expected = "Must have at least 1 role")]
    fn test_role_map_zero_roles() {
        let _: RoleMap<u32> = RoleMap::new(0, |_| 0);
    }
}
