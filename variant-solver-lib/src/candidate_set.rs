//! A set over the N^3 candidate universe, backed by a bit vector.

use crate::candidate_id::CandidateId;
use bitvec::prelude::*;

/// Membership set for candidates. One row of the link graph is a
/// `CandidateSet`; the deduction tactics also use them as scratch sets.
#[derive(Clone, Debug)]
pub struct CandidateSet {
    bits: BitVec,
    size: usize,
}

impl CandidateSet {
    /// An empty set sized for an NxN grid.
    pub fn new(size: usize) -> Self {
        Self {
            bits: bitvec![0; size * size * size],
            size,
        }
    }

    pub fn contains(&self, candidate: CandidateId) -> bool {
        self.bits[candidate.index()]
    }

    /// Adds a candidate; returns true if it was not already present.
    pub fn insert(&mut self, candidate: CandidateId) -> bool {
        if self.bits[candidate.index()] {
            return false;
        }
        self.bits.set(candidate.index(), true);
        true
    }

    /// Removes a candidate; returns true if it was present.
    pub fn remove(&mut self, candidate: CandidateId) -> bool {
        if !self.bits[candidate.index()] {
            return false;
        }
        self.bits.set(candidate.index(), false);
        true
    }

    pub fn union_with(&mut self, other: &Self) {
        self.bits |= &other.bits;
    }

    pub fn intersect_with(&mut self, other: &Self) {
        self.bits &= &other.bits;
    }

    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones()
    }

    /// Members in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = CandidateId> + '_ {
        let size = self.size;
        self.bits
            .iter_ones()
            .map(move |index| CandidateId::new(index, size))
    }
}

impl std::fmt::Display for CandidateSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for candidate in self.iter() {
            write!(f, " {}", candidate)?;
        }
        write!(f, " }}")
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use itertools::assert_equal;

    #[test]
    fn insert_remove_iterate() {
        let mut set = CandidateSet::new(9);
        let a = CandidateId::new(10, 9);
        let b = CandidateId::new(700, 9);
        assert!(set.insert(a));
        assert!(!set.insert(a));
        assert!(set.insert(b));
        assert_eq!(set.len(), 2);
        assert_equal(set.iter(), [a, b]);
        assert!(set.remove(a));
        assert!(!set.remove(a));
        assert!(!set.is_empty());
    }

    #[test]
    fn union_and_intersection() {
        let mut a = CandidateSet::new(4);
        let mut b = CandidateSet::new(4);
        a.insert(CandidateId::new(1, 4));
        a.insert(CandidateId::new(2, 4));
        b.insert(CandidateId::new(2, 4));
        b.insert(CandidateId::new(3, 4));

        let mut union = a.clone();
        union.union_with(&b);
        assert_eq!(union.len(), 3);

        a.intersect_with(&b);
        assert_equal(a.iter(), [CandidateId::new(2, 4)]);
    }
}
