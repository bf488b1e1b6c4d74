//! Fixed-length bit set over evaluation-order positions.

use serde::{Deserialize, Serialize};

const WORD_BITS: usize = 64;

/// A fixed-length set of positions backed by `u64` words.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BitSet {
    words: Vec<u64>,
    len: usize,
}

impl BitSet {
    /// Create an empty set over positions `0..len`.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(WORD_BITS)],
            len,
        }
    }

    /// Create a set with every position in `0..len`.
    #[must_use]
    pub fn full(len: usize) -> Self {
        let mut set = Self::new(len);
        for word in &mut set.words {
            *word = u64::MAX;
        }
        let tail = len % WORD_BITS;
        if tail != 0 {
            if let Some(last) = set.words.last_mut() {
                *last = (1u64 << tail) - 1;
            }
        }
        set
    }

    /// Add a position.
    #[inline]
    pub fn set(&mut self, pos: usize) {
        debug_assert!(pos < self.len, "position {pos} out of range {}", self.len);
        self.words[pos / WORD_BITS] |= 1 << (pos % WORD_BITS);
    }

    /// Check whether a position is present.
    #[inline]
    #[must_use]
    pub fn contains(&self, pos: usize) -> bool {
        pos < self.len && self.words[pos / WORD_BITS] & (1 << (pos % WORD_BITS)) != 0
    }

    /// Add every position of `other`. Both sets must have the same length.
    #[inline]
    pub fn union_with(&mut self, other: &BitSet) {
        debug_assert_eq!(self.len, other.len);
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            *a |= *b;
        }
    }

    /// Remove every position.
    pub fn clear(&mut self) {
        self.words.fill(0);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Number of positions present.
    #[must_use]
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Iterate over present positions in ascending order.
    pub fn ones(&self) -> Ones<'_> {
        Ones {
            words: &self.words,
            index: 0,
            current: self.words.first().copied().unwrap_or(0),
        }
    }
}

impl std::fmt::Debug for BitSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.ones()).finish()
    }
}

/// Ascending iterator over the positions of a `BitSet`.
pub struct Ones<'a> {
    words: &'a [u64],
    index: usize,
    current: u64,
}

impl Iterator for Ones<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        loop {
            if self.current != 0 {
                let bit = self.current.trailing_zeros() as usize;
                self.current &= self.current - 1;
                return Some(self.index * WORD_BITS + bit);
            }
            self.index += 1;
            self.current = *self.words.get(self.index)?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_contains() {
        let mut set = BitSet::new(130);
        set.set(0);
        set.set(64);
        set.set(129);

        assert!(set.contains(0));
        assert!(set.contains(64));
        assert!(set.contains(129));
        assert!(!set.contains(1));
        assert!(!set.contains(500));
        assert_eq!(set.count_ones(), 3);
    }

    #[test]
    fn test_ones_ascending() {
        let mut set = BitSet::new(200);
        for pos in [150, 3, 64, 63, 199] {
            set.set(pos);
        }
        assert_eq!(set.ones().collect::<Vec<_>>(), vec![3, 63, 64, 150, 199]);
    }

    #[test]
    fn test_union_and_clear() {
        let mut a = BitSet::new(10);
        let mut b = BitSet::new(10);
        a.set(1);
        b.set(7);

        a.union_with(&b);
        assert_eq!(a.ones().collect::<Vec<_>>(), vec![1, 7]);

        a.clear();
        assert!(a.is_empty());
    }

    #[test]
    fn test_full_respects_length() {
        let set = BitSet::full(70);
        assert_eq!(set.count_ones(), 70);
        assert!(set.contains(69));
        assert!(!set.contains(70));

        assert_eq!(BitSet::full(64).count_ones(), 64);
        assert!(BitSet::full(0).is_empty());
    }

    #[test]
    fn test_empty_iteration() {
        let set = BitSet::new(0);
        assert_eq!(set.ones().count(), 0);
        assert!(set.is_empty());
    }
}
