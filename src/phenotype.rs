//! # Phenotype Trait
//!
//! The `Phenotype` trait defines the operations the evolutionary launcher needs from an
//! individual: two-child crossover and in-place mutation. [`Individual`] is the covering-design
//! phenotype: a fixed-length sequence of tickets evolved as a whole.
//!
//! ## Example
//!
//! ```rust
//! use covergen::phenotype::{Individual, Phenotype};
//! use covergen::rng::{RandomNumberGenerator, TicketSampler};
//!
//! let mut rng = RandomNumberGenerator::from_seed(5);
//! let sampler = TicketSampler::new(20, 8);
//! let a = Individual::random(&sampler, 6, 0.1, &mut rng);
//! let b = Individual::random(&sampler, 6, 0.1, &mut rng);
//!
//! let (mut child, _) = a.crossover(&b, &mut rng);
//! child.mutate(&mut rng);
//! assert_eq!(child.tickets().len(), 6);
//! ```

use std::fmt::Debug;

use crate::combinatorics::Element;
use crate::rng::{RandomNumberGenerator, TicketSampler};
use crate::ticket::{Ticket, TicketCollection};

/// Trait for types that represent individuals in an evolutionary algorithm.
///
/// Types implementing this trait must also implement `Clone`, `Debug`, `Send`, and `Sync`
/// so that populations can be scored in parallel.
pub trait Phenotype: Clone + Debug + Send + Sync {
    /// Recombines `self` with `other`, producing two children.
    fn crossover(&self, other: &Self, rng: &mut RandomNumberGenerator) -> (Self, Self);

    /// Introduces random changes in place.
    fn mutate(&mut self, rng: &mut RandomNumberGenerator);
}

/// A candidate collection: `tickets_per_individual` tickets evolved together.
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    tickets: Vec<Ticket>,
    universe_size: u32,
    /// Per-ticket probability of a one-element swap during mutation.
    mutation_rate: f64,
}

impl Individual {
    pub fn new(tickets: Vec<Ticket>, universe_size: u32, mutation_rate: f64) -> Self {
        Self {
            tickets,
            universe_size,
            mutation_rate,
        }
    }

    /// `count` freshly sampled tickets.
    pub fn random(
        sampler: &TicketSampler,
        count: usize,
        mutation_rate: f64,
        rng: &mut RandomNumberGenerator,
    ) -> Self {
        let tickets = (0..count).map(|_| sampler.sample_with(&mut rng.rng)).collect();
        Self {
            tickets,
            universe_size: sampler.universe_size(),
            mutation_rate,
        }
    }

    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    pub fn into_collection(self) -> TicketCollection {
        self.tickets.into()
    }

    /// Swaps one random element of `ticket` for a random element it does not hold.
    fn swap_element(&self, ticket: &Ticket, rng: &mut RandomNumberGenerator) -> Option<Ticket> {
        let unused = self.universe_size as usize - ticket.len();
        if unused == 0 || ticket.is_empty() {
            return None;
        }
        let removed = ticket.elements()[rng.index(ticket.len())];
        let nth = rng.index(unused);
        let added = (1..=self.universe_size)
            .filter(|&e: &Element| !ticket.contains(e))
            .nth(nth)?;
        Some(ticket.with_replacement(removed, added))
    }
}

impl Phenotype for Individual {
    /// Single-point crossover: children swap every ticket at or after a uniform cut in
    /// `[1, len - 1]`. Individuals of fewer than two tickets are copied unchanged.
    fn crossover(&self, other: &Self, rng: &mut RandomNumberGenerator) -> (Self, Self) {
        debug_assert_eq!(self.tickets.len(), other.tickets.len());
        let len = self.tickets.len().min(other.tickets.len());
        if len < 2 {
            return (self.clone(), other.clone());
        }
        let cut = 1 + rng.index(len - 1);

        let splice = |head: &Individual, tail: &Individual| Individual {
            tickets: head.tickets[..cut]
                .iter()
                .chain(&tail.tickets[cut..])
                .cloned()
                .collect(),
            universe_size: head.universe_size,
            mutation_rate: head.mutation_rate,
        };
        (splice(self, other), splice(other, self))
    }

    fn mutate(&mut self, rng: &mut RandomNumberGenerator) {
        for i in 0..self.tickets.len() {
            if rng.chance(self.mutation_rate) {
                if let Some(mutated) = self.swap_element(&self.tickets[i], rng) {
                    self.tickets[i] = mutated;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn individual(seed: u64, count: usize, rate: f64) -> Individual {
        let mut rng = RandomNumberGenerator::from_seed(seed);
        Individual::random(&TicketSampler::new(20, 8), count, rate, &mut rng)
    }

    #[test]
    fn test_crossover_swaps_tails() {
        let a = individual(1, 10, 0.0);
        let b = individual(2, 10, 0.0);
        let mut rng = RandomNumberGenerator::from_seed(3);
        let (c1, c2) = a.crossover(&b, &mut rng);

        let cut = (0..10).find(|&i| c1.tickets()[i] != a.tickets()[i]).unwrap();
        assert!(cut >= 1);
        for i in 0..10 {
            if i < cut {
                assert_eq!(c1.tickets()[i], a.tickets()[i]);
                assert_eq!(c2.tickets()[i], b.tickets()[i]);
            } else {
                assert_eq!(c1.tickets()[i], b.tickets()[i]);
                assert_eq!(c2.tickets()[i], a.tickets()[i]);
            }
        }
    }

    #[test]
    fn test_crossover_single_ticket_copies() {
        let a = individual(1, 1, 0.0);
        let b = individual(2, 1, 0.0);
        let mut rng = RandomNumberGenerator::from_seed(3);
        let (c1, c2) = a.crossover(&b, &mut rng);
        assert_eq!(c1, a);
        assert_eq!(c2, b);
    }

    #[test]
    fn test_mutation_preserves_ticket_shape() {
        let original = individual(4, 30, 1.0);
        let mut mutated = original.clone();
        let mut rng = RandomNumberGenerator::from_seed(9);
        mutated.mutate(&mut rng);

        for (before, after) in original.tickets().iter().zip(mutated.tickets()) {
            assert_eq!(after.len(), 8);
            assert!(after.elements().windows(2).all(|w| w[0] < w[1]));
            assert!(after.elements().iter().all(|&e| (1..=20).contains(&e)));
            let shared = after.elements().iter().filter(|&&e| before.contains(e)).count();
            assert_eq!(shared, 7, "exactly one element swapped");
        }
    }

    #[test]
    fn test_zero_rate_never_mutates() {
        let original = individual(4, 30, 0.0);
        let mut mutated = original.clone();
        let mut rng = RandomNumberGenerator::from_seed(9);
        mutated.mutate(&mut rng);
        assert_eq!(original, mutated);
    }

    #[test]
    fn test_full_ticket_cannot_swap() {
        let full = Ticket::new((1..=5).collect(), 5).unwrap();
        let mut individual = Individual::new(vec![full.clone()], 5, 1.0);
        let mut rng = RandomNumberGenerator::from_seed(1);
        individual.mutate(&mut rng);
        assert_eq!(individual.tickets()[0], full);
    }
}
