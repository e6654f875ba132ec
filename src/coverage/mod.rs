//! # Coverage Set
//!
//! A bit vector over the `C(n,d)` target ranks. Bit `r` is set when the target subset of rank
//! `r` is contained in some accepted ticket. A construction run owns exactly one
//! `CoverageSet` and is its only writer; bits only ever go from clear to set while the run
//! lasts. Workers never see the live set. They read a [`CoverageSnapshot`], an immutable
//! point-in-time copy that is cheap to share across threads.

pub mod verifier;

pub use verifier::{verify, CoverageReport, CoverageVerifier};

use std::sync::Arc;

use crate::combinatorics::{CombinationIndexer, Rank};
use crate::error::{CoverError, Result};
use crate::ticket::Ticket;

const WORD_BITS: usize = u64::BITS as usize;

#[derive(Debug, Clone)]
pub struct CoverageSet {
    words: Vec<u64>,
    size: usize,
    covered: u64,
}

impl CoverageSet {
    /// An empty coverage set over `size` targets.
    ///
    /// # Errors
    ///
    /// Returns `ResourceAcquisition` if the bit vector cannot be allocated.
    pub fn new(size: usize) -> Result<Self> {
        let word_count = size.div_ceil(WORD_BITS);
        let mut words = Vec::new();
        words.try_reserve_exact(word_count).map_err(|e| {
            CoverError::ResourceAcquisition(format!(
                "cannot allocate coverage bits for {} targets: {}",
                size, e
            ))
        })?;
        words.resize(word_count, 0);
        Ok(Self {
            words,
            size,
            covered: 0,
        })
    }

    /// An empty coverage set sized for `indexer`'s target space.
    pub fn for_indexer(indexer: &CombinationIndexer) -> Result<Self> {
        Self::new(indexer.total() as usize)
    }

    /// Number of targets tracked.
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    #[inline]
    pub fn test(&self, rank: Rank) -> bool {
        let rank = rank as usize;
        debug_assert!(rank < self.size);
        self.words[rank / WORD_BITS] & (1 << (rank % WORD_BITS)) != 0
    }

    /// Sets bit `rank`. Returns `true` if the bit was previously clear.
    #[inline]
    pub fn mark(&mut self, rank: Rank) -> bool {
        let rank = rank as usize;
        debug_assert!(rank < self.size);
        let word = &mut self.words[rank / WORD_BITS];
        let bit = 1 << (rank % WORD_BITS);
        if *word & bit != 0 {
            return false;
        }
        *word |= bit;
        self.covered += 1;
        true
    }

    /// Marks every target subset contained in `ticket`; returns how many were new.
    pub fn mark_ticket(&mut self, indexer: &CombinationIndexer, ticket: &Ticket) -> u64 {
        let mut newly = 0;
        indexer.for_each_subset_rank(ticket.elements(), |rank| {
            if self.mark(rank) {
                newly += 1;
            }
        });
        newly
    }

    /// Number of set bits.
    pub fn count(&self) -> u64 {
        self.covered
    }

    /// Lowest rank whose bit is clear, if any.
    pub fn first_uncovered(&self) -> Option<Rank> {
        self.words
            .iter()
            .enumerate()
            .find(|(_, word)| **word != u64::MAX)
            .map(|(i, word)| (i * WORD_BITS + word.trailing_ones() as usize) as Rank)
            .filter(|&rank| (rank as usize) < self.size)
    }

    /// Clears every bit. Only used on scratch sets that are reused between recomputations,
    /// never on a construction run's live set.
    pub fn clear(&mut self) {
        self.words.fill(0);
        self.covered = 0;
    }

    /// An immutable copy for concurrent readers.
    pub fn snapshot(&self) -> CoverageSnapshot {
        CoverageSnapshot {
            words: Arc::from(self.words.as_slice()),
            size: self.size,
            covered: self.covered,
        }
    }
}

/// A frozen copy of a [`CoverageSet`]; clones share the same bits.
#[derive(Debug, Clone)]
pub struct CoverageSnapshot {
    words: Arc<[u64]>,
    size: usize,
    covered: u64,
}

impl CoverageSnapshot {
    #[inline]
    pub fn test(&self, rank: Rank) -> bool {
        let rank = rank as usize;
        debug_assert!(rank < self.size);
        self.words[rank / WORD_BITS] & (1 << (rank % WORD_BITS)) != 0
    }

    pub fn count(&self) -> u64 {
        self.covered
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_is_idempotent() {
        let mut set = CoverageSet::new(130).unwrap();
        assert_eq!(set.len(), 130);
        assert!(!set.test(129));
        assert!(set.mark(129));
        assert!(!set.mark(129));
        assert!(set.test(129));
        assert!(set.mark(0));
        assert!(set.mark(64));
        assert_eq!(set.count(), 3);
    }

    #[test]
    fn test_snapshot_is_frozen() {
        let mut set = CoverageSet::new(10).unwrap();
        set.mark(3);
        let snapshot = set.snapshot();
        set.mark(4);
        assert!(snapshot.test(3));
        assert!(!snapshot.test(4));
        assert_eq!(snapshot.count(), 1);
        assert_eq!(set.count(), 2);
    }

    #[test]
    fn test_clear() {
        let mut set = CoverageSet::new(70).unwrap();
        set.mark(1);
        set.mark(69);
        set.clear();
        assert_eq!(set.count(), 0);
        assert!(!set.test(69));
    }

    #[test]
    fn test_mark_ticket() {
        let indexer = CombinationIndexer::new(6, 2).unwrap();
        let mut set = CoverageSet::for_indexer(&indexer).unwrap();
        let first = Ticket::new(vec![1, 2, 3], 6).unwrap();
        let second = Ticket::new(vec![1, 2, 4], 6).unwrap();
        assert_eq!(set.mark_ticket(&indexer, &first), 3);
        // (1,2) is shared.
        assert_eq!(set.mark_ticket(&indexer, &second), 2);
        assert_eq!(set.count(), 5);
    }

    #[test]
    fn test_first_uncovered() {
        let mut set = CoverageSet::new(66).unwrap();
        assert_eq!(set.first_uncovered(), Some(0));
        for rank in 0..65 {
            set.mark(rank);
        }
        assert_eq!(set.first_uncovered(), Some(65));
        set.mark(65);
        assert_eq!(set.first_uncovered(), None);
    }
}
