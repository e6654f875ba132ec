//! # Batch Evaluator
//!
//! Scores a batch of candidate tickets against a read-only [`CoverageSnapshot`]. Each
//! candidate is identified by its seed and position in the batch; sampling, rank enumeration
//! and gain counting happen independently per candidate on a rayon worker pool, so no two
//! evaluations share mutable state.
//!
//! Every candidate in a round is scored against the same snapshot. A candidate's gain may
//! therefore count ranks that another candidate, committed in the same round, also covers;
//! the coordinator's commit is idempotent and reported coverage always comes from the
//! verifier, so the staleness only affects search quality.

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::combinatorics::Rank;
use crate::config::DesignContext;
use crate::coverage::CoverageSnapshot;
use crate::error::{CoverError, Result};
use crate::rng::TicketSampler;
use crate::ticket::Ticket;

/// A fixed-size rayon pool shared by the evaluation phases of both coordinators.
#[derive(Debug)]
pub struct WorkerPool {
    pool: ThreadPool,
}

impl WorkerPool {
    /// Builds a pool of `num_threads` workers; `0` means one per available CPU.
    ///
    /// # Errors
    ///
    /// Returns `ResourceAcquisition` if the threads cannot be spawned.
    pub fn new(num_threads: usize) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|i| format!("covergen-worker-{}", i))
            .build()
            .map_err(|e| CoverError::ResourceAcquisition(format!("worker pool: {}", e)))?;
        Ok(Self { pool })
    }

    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Runs `op` inside the pool; parallel iterators in `op` use its workers.
    pub fn install<OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        self.pool.install(op)
    }
}

/// The outcome of scoring one candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateEvaluation {
    /// Position of the candidate within its batch.
    pub position: usize,
    pub seed: u64,
    pub ticket: Ticket,
    /// Number of snapshot-uncovered targets the ticket contains.
    pub gain: u64,
    /// Ranks of those targets, ascending.
    pub newly_covered: Vec<Rank>,
}

/// Picks the larger gain; equal gains go to the earlier batch position.
fn better(a: Scored, b: Scored) -> Scored {
    if b.gain > a.gain || (b.gain == a.gain && b.position < a.position) {
        b
    } else {
        a
    }
}

#[derive(Debug, Clone)]
struct Scored {
    position: usize,
    seed: u64,
    ticket: Ticket,
    gain: u64,
}

#[derive(Debug)]
pub struct BatchEvaluator<'a> {
    context: &'a DesignContext,
    sampler: TicketSampler,
    pool: &'a WorkerPool,
}

impl<'a> BatchEvaluator<'a> {
    pub fn new(context: &'a DesignContext, pool: &'a WorkerPool) -> Self {
        let params = context.params();
        Self {
            context,
            sampler: TicketSampler::new(params.universe_size(), params.ticket_size()),
            pool,
        }
    }

    pub fn sampler(&self) -> &TicketSampler {
        &self.sampler
    }

    /// Scores every seed, returning results in batch order with their newly covered ranks.
    pub fn evaluate(&self, snapshot: &CoverageSnapshot, seeds: &[u64]) -> Vec<CandidateEvaluation> {
        self.pool.install(|| {
            seeds
                .par_iter()
                .enumerate()
                .map(|(position, &seed)| self.evaluate_one(snapshot, position, seed))
                .collect()
        })
    }

    /// Scores every seed and returns only the winner: the strictly largest gain, ties broken
    /// by the earliest batch position. Returns `None` for an empty batch.
    ///
    /// Losing candidates are scored by counting alone; only the winner's ranks are
    /// materialized.
    pub fn evaluate_best(
        &self,
        snapshot: &CoverageSnapshot,
        seeds: &[u64],
    ) -> Option<CandidateEvaluation> {
        let winner = self.pool.install(|| {
            seeds
                .par_iter()
                .enumerate()
                .map(|(position, &seed)| {
                    let ticket = self.sampler.sample(seed);
                    let gain = self.gain(snapshot, &ticket);
                    Scored {
                        position,
                        seed,
                        ticket,
                        gain,
                    }
                })
                .reduce_with(better)
        })?;

        let newly_covered = self.uncovered_ranks(snapshot, &winner.ticket);
        Some(CandidateEvaluation {
            position: winner.position,
            seed: winner.seed,
            ticket: winner.ticket,
            gain: winner.gain,
            newly_covered,
        })
    }

    fn evaluate_one(
        &self,
        snapshot: &CoverageSnapshot,
        position: usize,
        seed: u64,
    ) -> CandidateEvaluation {
        let ticket = self.sampler.sample(seed);
        let newly_covered = self.uncovered_ranks(snapshot, &ticket);
        CandidateEvaluation {
            position,
            seed,
            gain: newly_covered.len() as u64,
            ticket,
            newly_covered,
        }
    }

    fn gain(&self, snapshot: &CoverageSnapshot, ticket: &Ticket) -> u64 {
        let mut gain = 0;
        self.context
            .indexer()
            .for_each_subset_rank(ticket.elements(), |rank| {
                if !snapshot.test(rank) {
                    gain += 1;
                }
            });
        gain
    }

    fn uncovered_ranks(&self, snapshot: &CoverageSnapshot, ticket: &Ticket) -> Vec<Rank> {
        let mut ranks = Vec::new();
        self.context
            .indexer()
            .for_each_subset_rank(ticket.elements(), |rank| {
                if !snapshot.test(rank) {
                    ranks.push(rank);
                }
            });
        ranks
    }
}
