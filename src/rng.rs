//! # Random Number Generation
//!
//! `RandomNumberGenerator` is the coordinator-owned master generator: it hands out batch
//! seeds and drives evolutionary operators. `TicketSampler` turns a single seed into a
//! uniformly random ticket without touching any shared generator, so concurrent callers
//! never contend and every sampled ticket is reproducible from its seed alone.
//!
//! ## Example
//!
//! ```rust
//! use covergen::rng::{RandomNumberGenerator, TicketSampler};
//!
//! let mut rng = RandomNumberGenerator::from_seed(42);
//! let sampler = TicketSampler::new(60, 30);
//!
//! let seed = rng.next_seed();
//! let ticket = sampler.sample(seed);
//! assert_eq!(ticket.len(), 30);
//! assert_eq!(ticket, sampler.sample(seed));
//! ```

use rand::{rngs::StdRng, seq::index, Rng, SeedableRng};

use crate::combinatorics::Element;
use crate::ticket::Ticket;

/// A wrapper around the `rand` crate's `StdRng`.
#[derive(Clone)]
pub struct RandomNumberGenerator {
    pub rng: StdRng,
}

impl RandomNumberGenerator {
    /// Creates a new generator seeded from system entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a new generator with a specific seed, for reproducible runs and tests.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seeded when `seed` is given, entropy otherwise.
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::new, Self::from_seed)
    }

    /// Draws a fresh seed for a candidate or a child generator.
    pub fn next_seed(&mut self) -> u64 {
        self.rng.gen()
    }

    /// Draws `count` candidate seeds.
    pub fn fetch_seeds(&mut self, count: usize) -> Vec<u64> {
        (0..count).map(|_| self.next_seed()).collect()
    }

    /// Uniform index in `0..bound`; `bound` must be positive.
    pub fn index(&mut self, bound: usize) -> usize {
        self.rng.gen_range(0..bound)
    }

    /// `amount` distinct indices from `0..length`, in random order.
    pub fn distinct_indices(&mut self, length: usize, amount: usize) -> Vec<usize> {
        index::sample(&mut self.rng, length, amount).into_vec()
    }

    /// True with probability `probability` (clamped to `[0, 1]`).
    pub fn chance(&mut self, probability: f64) -> bool {
        self.rng.gen_bool(probability.clamp(0.0, 1.0))
    }
}

impl Default for RandomNumberGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Draws uniformly random `ticket_size`-element tickets from `{1..universe_size}`.
#[derive(Debug, Clone, Copy)]
pub struct TicketSampler {
    universe_size: u32,
    ticket_size: usize,
}

impl TicketSampler {
    pub fn new(universe_size: u32, ticket_size: usize) -> Self {
        debug_assert!(ticket_size <= universe_size as usize);
        Self {
            universe_size,
            ticket_size,
        }
    }

    pub fn universe_size(&self) -> u32 {
        self.universe_size
    }

    pub fn ticket_size(&self) -> usize {
        self.ticket_size
    }

    /// Samples a ticket determined entirely by `seed`.
    pub fn sample(&self, seed: u64) -> Ticket {
        let mut rng = StdRng::seed_from_u64(seed);
        self.sample_with(&mut rng)
    }

    /// Samples a ticket from a caller-supplied generator.
    pub fn sample_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Ticket {
        let mut elements: Vec<Element> =
            index::sample(rng, self.universe_size as usize, self.ticket_size)
                .into_iter()
                .map(|i| i as Element + 1)
                .collect();
        elements.sort_unstable();
        Ticket::from_sorted(elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sample_is_valid_ticket() {
        let sampler = TicketSampler::new(60, 30);
        for seed in 0..50 {
            let ticket = sampler.sample(seed);
            assert_eq!(ticket.len(), 30);
            assert!(ticket.elements().windows(2).all(|w| w[0] < w[1]));
            assert!(ticket.elements().iter().all(|&e| (1..=60).contains(&e)));
        }
    }

    #[test]
    fn test_sample_is_deterministic_per_seed() {
        let sampler = TicketSampler::new(60, 30);
        assert_eq!(sampler.sample(7), sampler.sample(7));
        let distinct: HashSet<_> = (0..20).map(|seed| sampler.sample(seed)).collect();
        assert!(distinct.len() > 1);
    }

    #[test]
    fn test_full_ticket() {
        let sampler = TicketSampler::new(5, 5);
        assert_eq!(sampler.sample(3).elements(), &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_clone() {
        let mut rng1 = RandomNumberGenerator::from_seed(42);
        let mut rng2 = rng1.clone();
        assert_eq!(rng1.fetch_seeds(5), rng2.fetch_seeds(5));
    }

    #[test]
    fn test_distinct_indices() {
        let mut rng = RandomNumberGenerator::from_seed(1);
        let picked = rng.distinct_indices(10, 4);
        assert_eq!(picked.len(), 4);
        assert_eq!(picked.iter().collect::<HashSet<_>>().len(), 4);
        assert!(picked.iter().all(|&i| i < 10));
    }

    #[test]
    fn test_chance_extremes() {
        let mut rng = RandomNumberGenerator::from_seed(3);
        assert!((0..100).all(|_| !rng.chance(0.0)));
        assert!((0..100).all(|_| rng.chance(1.0)));
    }
}
