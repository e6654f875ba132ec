//! # Combinatorial Indexer
//!
//! A bijection between the sorted `d`-element subsets of the universe `{1..n}` and the
//! dense integers `[0, C(n,d))`, ordered lexicographically. The first subset `{1..d}`
//! ranks to `0` and the last subset `{n-d+1..n}` ranks to `C(n,d) - 1`.
//!
//! Ranks are computed with the combinatorial number system: for a sorted subset
//! `c_0 < c_1 < ... < c_{d-1}`,
//!
//! ```text
//! rank = C(n,d) - 1 - sum_i C(n - c_i, d - i)
//! ```
//!
//! which equals the lexicographic position of the subset. Binomial coefficients are memoized
//! in a Pascal table built with saturating additions, so no intermediate product can overflow.
//!
//! ## Example
//!
//! ```rust
//! use covergen::combinatorics::CombinationIndexer;
//!
//! let indexer = CombinationIndexer::new(60, 6).unwrap();
//! assert_eq!(indexer.total(), 50_063_860);
//! assert_eq!(indexer.rank(&[1, 2, 3, 4, 5, 6]).unwrap(), 0);
//! assert_eq!(indexer.rank(&[55, 56, 57, 58, 59, 60]).unwrap(), 50_063_859);
//! assert_eq!(indexer.unrank(0).unwrap(), vec![1, 2, 3, 4, 5, 6]);
//! ```

use crate::error::{CoverError, Result};

/// An element of the universe. Valid elements are `1..=n`.
pub type Element = u32;

/// The dense identity of a target subset.
pub type Rank = u64;

/// Ranks and unranks `subset_size`-element subsets of `{1..universe_size}`.
#[derive(Debug, Clone)]
pub struct CombinationIndexer {
    universe_size: u32,
    subset_size: usize,
    total: Rank,
    /// `binomials[a * (subset_size + 1) + b] = C(a, b)` for `a <= n`, `b <= d`.
    binomials: Vec<Rank>,
    /// `terms[i * (n + 1) + c] = C(n - c, d - i)`, the rank contribution of element `c`
    /// at sorted position `i`.
    terms: Vec<Rank>,
}

impl CombinationIndexer {
    /// Builds the indexer for `subset_size`-subsets of a universe of `universe_size` elements.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `subset_size` is zero, exceeds the universe, or if
    /// `C(n,d)` does not fit in 64 bits.
    pub fn new(universe_size: u32, subset_size: usize) -> Result<Self> {
        if subset_size == 0 {
            return Err(CoverError::Configuration(
                "Subset size must be at least 1".to_string(),
            ));
        }
        if subset_size > universe_size as usize {
            return Err(CoverError::Configuration(format!(
                "Subset size {} exceeds universe size {}",
                subset_size, universe_size
            )));
        }

        let n = universe_size as usize;
        let width = subset_size + 1;
        let mut binomials: Vec<Rank> = vec![0; (n + 1) * width];
        for a in 0..=n {
            binomials[a * width] = 1;
            for b in 1..=subset_size.min(a) {
                binomials[a * width + b] =
                    binomials[(a - 1) * width + b - 1].saturating_add(binomials[(a - 1) * width + b]);
            }
        }

        let total = binomials[n * width + subset_size];
        if total == Rank::MAX {
            return Err(CoverError::Configuration(format!(
                "C({}, {}) does not fit in 64 bits",
                universe_size, subset_size
            )));
        }

        let mut terms: Vec<Rank> = vec![0; subset_size * (n + 1)];
        for i in 0..subset_size {
            for c in 1..=n {
                let (a, b) = (n - c, subset_size - i);
                terms[i * (n + 1) + c] = if b > a { 0 } else { binomials[a * width + b] };
            }
        }

        Ok(Self {
            universe_size,
            subset_size,
            total,
            binomials,
            terms,
        })
    }

    pub fn universe_size(&self) -> u32 {
        self.universe_size
    }

    pub fn subset_size(&self) -> usize {
        self.subset_size
    }

    /// The number of target subsets, `C(n,d)`.
    pub fn total(&self) -> Rank {
        self.total
    }

    /// Returns `C(a, b)` for `a <= n` and `b <= d`, and `0` when `b > a`.
    pub fn binomial(&self, a: usize, b: usize) -> Rank {
        if b > a || b > self.subset_size || a > self.universe_size as usize {
            return 0;
        }
        self.binomials[a * (self.subset_size + 1) + b]
    }

    /// Ranks a strictly increasing subset of `d` elements from `[1, n]`.
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfRange` if the subset has the wrong length, is not strictly
    /// increasing, or contains an element outside the universe.
    pub fn rank(&self, subset: &[Element]) -> Result<Rank> {
        if subset.len() != self.subset_size {
            return Err(CoverError::IndexOutOfRange(format!(
                "subset {:?} has {} elements, expected {}",
                subset,
                subset.len(),
                self.subset_size
            )));
        }
        let mut previous = 0;
        for &element in subset {
            if element <= previous || element > self.universe_size {
                return Err(CoverError::IndexOutOfRange(format!(
                    "subset {:?} is not strictly increasing within [1, {}]",
                    subset, self.universe_size
                )));
            }
            previous = element;
        }
        Ok(self.rank_sorted(subset))
    }

    /// Ranks a subset already known to be valid.
    #[inline]
    pub(crate) fn rank_sorted(&self, subset: &[Element]) -> Rank {
        debug_assert_eq!(subset.len(), self.subset_size);
        let stride = self.universe_size as usize + 1;
        let sum: Rank = subset
            .iter()
            .enumerate()
            .map(|(i, &c)| self.terms[i * stride + c as usize])
            .sum();
        self.total - 1 - sum
    }

    /// Inverse of [`rank`](Self::rank).
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfRange` if `rank >= C(n,d)`.
    pub fn unrank(&self, rank: Rank) -> Result<Vec<Element>> {
        if rank >= self.total {
            return Err(CoverError::IndexOutOfRange(format!(
                "rank {} is outside [0, {})",
                rank, self.total
            )));
        }

        let stride = self.universe_size as usize + 1;
        let mut remainder = self.total - 1 - rank;
        let mut subset = Vec::with_capacity(self.subset_size);
        let mut candidate = 1;
        for i in 0..self.subset_size {
            // Contributions shrink as the element grows; take the first that fits.
            while self.terms[i * stride + candidate as usize] > remainder {
                candidate += 1;
            }
            remainder -= self.terms[i * stride + candidate as usize];
            subset.push(candidate);
            candidate += 1;
        }
        Ok(subset)
    }

    /// Calls `f` with the rank of every `d`-subset of `ticket`, in increasing rank order.
    ///
    /// `ticket` must be strictly increasing with elements in `[1, n]`. Tickets smaller than
    /// `d` contain no target subset and produce no calls.
    pub fn for_each_subset_rank<F>(&self, ticket: &[Element], mut f: F)
    where
        F: FnMut(Rank),
    {
        let k = self.subset_size;
        let t = ticket.len();
        if t < k {
            return;
        }
        debug_assert!(ticket.windows(2).all(|w| w[0] < w[1]));

        let stride = self.universe_size as usize + 1;
        let term = |i: usize, position: usize| self.terms[i * stride + ticket[position] as usize];

        let mut positions: Vec<usize> = (0..k).collect();
        let mut partial: Vec<Rank> = vec![0; k + 1];
        for i in 0..k {
            partial[i + 1] = partial[i] + term(i, positions[i]);
        }

        loop {
            f(self.total - 1 - partial[k]);

            let mut i = k;
            loop {
                if i == 0 {
                    return;
                }
                i -= 1;
                if positions[i] < t - k + i {
                    break;
                }
            }

            positions[i] += 1;
            partial[i + 1] = partial[i] + term(i, positions[i]);
            for j in i + 1..k {
                positions[j] = positions[j - 1] + 1;
                partial[j + 1] = partial[j] + term(j, positions[j]);
            }
        }
    }

    /// Collects the ranks of every `d`-subset of `ticket`.
    pub fn subset_ranks(&self, ticket: &[Element]) -> Vec<Rank> {
        let mut ranks = Vec::with_capacity(self.binomial(ticket.len(), self.subset_size) as usize);
        self.for_each_subset_rank(ticket, |rank| ranks.push(rank));
        ranks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// Lexicographic ranking by direct counting, used as an oracle.
    fn counting_rank(n: u32, k: usize, subset: &[Element]) -> Rank {
        fn choose(n: u64, k: u64) -> u64 {
            if k > n {
                return 0;
            }
            (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
        }
        let mut rank = 0;
        let mut previous = 0;
        for (i, &c) in subset.iter().enumerate() {
            for j in previous + 1..c {
                rank += choose(u64::from(n - j), (k - 1 - i) as u64);
            }
            previous = c;
        }
        rank
    }

    fn all_subsets(n: u32, k: usize) -> Vec<Vec<Element>> {
        let mut out = Vec::new();
        let mut current = Vec::new();
        fn walk(n: u32, k: usize, start: u32, current: &mut Vec<Element>, out: &mut Vec<Vec<Element>>) {
            if current.len() == k {
                out.push(current.clone());
                return;
            }
            for e in start..=n {
                current.push(e);
                walk(n, k, e + 1, current, out);
                current.pop();
            }
        }
        walk(n, k, 1, &mut current, &mut out);
        out
    }

    #[test]
    fn test_bijection_small_universe() {
        let indexer = CombinationIndexer::new(10, 3).unwrap();
        assert_eq!(indexer.total(), 120);

        let subsets = all_subsets(10, 3);
        let mut seen = HashSet::new();
        for (position, subset) in subsets.iter().enumerate() {
            let rank = indexer.rank(subset).unwrap();
            assert_eq!(rank, position as Rank, "lexicographic position of {:?}", subset);
            assert!(seen.insert(rank));
            assert_eq!(&indexer.unrank(rank).unwrap(), subset);
        }
        assert_eq!(seen.len(), 120);
    }

    #[test]
    fn test_boundary_ranks() {
        let indexer = CombinationIndexer::new(60, 6).unwrap();
        assert_eq!(indexer.rank(&[1, 2, 3, 4, 5, 6]).unwrap(), 0);
        assert_eq!(
            indexer.rank(&[55, 56, 57, 58, 59, 60]).unwrap(),
            indexer.total() - 1
        );
        assert_eq!(indexer.unrank(indexer.total() - 1).unwrap(), vec![55, 56, 57, 58, 59, 60]);
    }

    #[test]
    fn test_matches_counting_rank() {
        let indexer = CombinationIndexer::new(60, 6).unwrap();
        for subset in [
            vec![1, 2, 3, 4, 5, 7],
            vec![3, 9, 17, 22, 41, 60],
            vec![10, 20, 30, 40, 50, 59],
            vec![1, 30, 31, 32, 33, 34],
        ] {
            assert_eq!(indexer.rank(&subset).unwrap(), counting_rank(60, 6, &subset));
        }
    }

    #[test]
    fn test_rank_rejects_invalid_subsets() {
        let indexer = CombinationIndexer::new(10, 3).unwrap();
        assert!(matches!(indexer.rank(&[1, 2]), Err(CoverError::IndexOutOfRange(_))));
        assert!(indexer.rank(&[1, 1, 2]).is_err());
        assert!(indexer.rank(&[3, 2, 1]).is_err());
        assert!(indexer.rank(&[0, 2, 3]).is_err());
        assert!(indexer.rank(&[1, 2, 11]).is_err());
        assert!(matches!(indexer.unrank(120), Err(CoverError::IndexOutOfRange(_))));
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(CombinationIndexer::new(10, 0).is_err());
        assert!(CombinationIndexer::new(5, 6).is_err());
        assert!(CombinationIndexer::new(200, 100).is_err());
        // Large intermediate coefficients saturate without affecting a representable total.
        let wide = CombinationIndexer::new(100, 99).unwrap();
        assert_eq!(wide.total(), 100);
        assert_eq!(wide.rank(&(2..=100).collect::<Vec<_>>()).unwrap(), 99);
    }

    #[test]
    fn test_subset_ranks_of_ticket() {
        let indexer = CombinationIndexer::new(10, 3).unwrap();
        let ticket = [2, 4, 5, 9, 10];
        let ranks = indexer.subset_ranks(&ticket);
        assert_eq!(ranks.len(), 10);
        assert!(ranks.windows(2).all(|w| w[0] < w[1]));

        let expected: Vec<Rank> = all_subsets(10, 3)
            .iter()
            .filter(|s| s.iter().all(|e| ticket.contains(e)))
            .map(|s| indexer.rank(s).unwrap())
            .collect();
        assert_eq!(ranks, expected);
    }

    #[test]
    fn test_short_ticket_has_no_subsets() {
        let indexer = CombinationIndexer::new(10, 3).unwrap();
        assert!(indexer.subset_ranks(&[1, 2]).is_empty());
        assert_eq!(indexer.subset_ranks(&[4, 6, 8]), vec![indexer.rank(&[4, 6, 8]).unwrap()]);
    }
}
