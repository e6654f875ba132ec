use std::time::Instant;

use tracing::{debug, info};

use super::options::GreedyOptions;
use crate::combinatorics::Rank;
use crate::config::DesignContext;
use crate::construction::{Construction, ConstructionStrategy, RunStatistics, Termination};
use crate::coverage::{CoverageSet, CoverageSnapshot, CoverageVerifier};
use crate::error::{CoverError, Result};
use crate::evaluator::{BatchEvaluator, WorkerPool};
use crate::rng::RandomNumberGenerator;
use crate::ticket::{Ticket, TicketCollection};

/// The coordinator-owned state of one greedy run: the live coverage set, the accepted
/// collection and the stall counter. Only [`commit`](Self::commit) and
/// [`commit_ticket`](Self::commit_ticket) write to the coverage set.
#[derive(Debug, Clone)]
pub struct GreedyState {
    coverage: CoverageSet,
    accepted: TicketCollection,
    stall_count: usize,
    progress: Vec<Rank>,
}

impl GreedyState {
    pub fn new(context: &DesignContext) -> Result<Self> {
        Ok(Self {
            coverage: CoverageSet::for_indexer(context.indexer())?,
            accepted: TicketCollection::new(),
            stall_count: 0,
            progress: Vec::new(),
        })
    }

    /// A state that already holds `initial`, committed in order.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTicket` if a ticket lies outside the universe.
    pub fn seeded(context: &DesignContext, initial: &TicketCollection) -> Result<Self> {
        context.check_tickets(initial.iter())?;
        let mut state = Self::new(context)?;
        for ticket in initial {
            state.commit_ticket(context, ticket.clone());
        }
        Ok(state)
    }

    /// Marks `newly_covered` and appends `ticket`. Ranks already set are skipped, so a winner
    /// whose gain overlaps another commit is still safe. Resets the stall counter and returns
    /// the number of bits actually set.
    pub fn commit(&mut self, ticket: Ticket, newly_covered: &[Rank]) -> u64 {
        let newly = newly_covered
            .iter()
            .filter(|&&rank| self.coverage.mark(rank))
            .count() as u64;
        self.accepted.push(ticket);
        self.stall_count = 0;
        self.progress.push(self.coverage.count());
        newly
    }

    /// Commits `ticket`, deriving its ranks from the ticket itself.
    pub fn commit_ticket(&mut self, context: &DesignContext, ticket: Ticket) -> u64 {
        let newly = self.coverage.mark_ticket(context.indexer(), &ticket);
        self.accepted.push(ticket);
        self.stall_count = 0;
        self.progress.push(self.coverage.count());
        newly
    }

    pub fn record_stall(&mut self) {
        self.stall_count += 1;
    }

    pub fn covered(&self) -> Rank {
        self.coverage.count()
    }

    pub fn is_covered(&self, rank: Rank) -> bool {
        self.coverage.test(rank)
    }

    pub fn accepted(&self) -> &TicketCollection {
        &self.accepted
    }

    pub fn stall_count(&self) -> usize {
        self.stall_count
    }

    /// Covered count after each commit so far.
    pub fn progress(&self) -> &[Rank] {
        &self.progress
    }

    pub fn snapshot(&self) -> CoverageSnapshot {
        self.coverage.snapshot()
    }
}

/// Synchronous-round greedy construction.
///
/// Each round draws a batch of seeds, scores the sampled tickets in parallel against a
/// snapshot of the live coverage, and commits the candidate with the largest gain. Rounds
/// never overlap: round `i + 1` sees exactly what round `i` committed.
#[derive(Debug, Clone)]
pub struct GreedyCoordinator<'a> {
    context: &'a DesignContext,
    options: GreedyOptions,
    initial: TicketCollection,
}

impl<'a> GreedyCoordinator<'a> {
    pub fn new(context: &'a DesignContext, options: GreedyOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            context,
            options,
            initial: TicketCollection::new(),
        })
    }

    /// Starts every run from `initial`. Its tickets count toward the ticket limit.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTicket` if a ticket holds elements outside the universe.
    pub fn with_initial_tickets(mut self, initial: TicketCollection) -> Result<Self> {
        self.context.check_tickets(initial.iter())?;
        self.initial = initial;
        Ok(self)
    }

    pub fn options(&self) -> &GreedyOptions {
        &self.options
    }

    /// Runs `restarts` independent constructions and returns the best one.
    ///
    /// A run that reached its target beats one that did not; among runs that did, fewer
    /// tickets win; otherwise higher verified coverage wins.
    pub fn run(&self, rng: &mut RandomNumberGenerator) -> Result<Construction> {
        let pool = WorkerPool::new(self.options.num_threads())?;
        let required = self.context.required_count(self.options.target_coverage())?;
        let log_level = self.options.log_level();

        let mut best: Option<Construction> = None;
        for start in 0..self.options.restarts() {
            let mut run_rng = RandomNumberGenerator::from_seed(rng.next_seed());
            let construction = self.run_once(&pool, required, &mut run_rng)?;
            if log_level.minimal() && self.options.restarts() > 1 {
                info!(
                    start,
                    tickets = construction.tickets.len(),
                    covered = construction.report.covered,
                    "greedy start finished"
                );
            }
            best = match best {
                Some(incumbent) if !is_better(&construction, &incumbent, required) => Some(incumbent),
                _ => Some(construction),
            };
        }

        best.ok_or_else(|| CoverError::Other("no greedy start was run".to_string()))
    }

    fn run_once(
        &self,
        pool: &WorkerPool,
        required: Rank,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Construction> {
        let started = Instant::now();
        let log_level = self.options.log_level();
        let evaluator = BatchEvaluator::new(self.context, pool);
        let mut state = GreedyState::seeded(self.context, &self.initial)?;
        let mut statistics = RunStatistics::default();

        if log_level.minimal() {
            info!(
                target_count = self.context.target_count(),
                required,
                batch_size = self.options.batch_size(),
                workers = pool.num_threads(),
                seeded = self.initial.len(),
                "greedy construction started"
            );
        }

        let termination = loop {
            if let Some(termination) = self.termination(&state, required, started) {
                break termination;
            }

            let seeds = rng.fetch_seeds(self.options.batch_size());
            let snapshot = state.snapshot();
            let best = evaluator.evaluate_best(&snapshot, &seeds);
            statistics.steps += 1;
            statistics.evaluations += seeds.len() as u64;

            match best {
                Some(winner) if winner.gain > 0 => {
                    let gain = winner.gain;
                    state.commit(winner.ticket, &winner.newly_covered);
                    if log_level.verbose() {
                        let elapsed = started.elapsed().as_secs_f64();
                        debug!(
                            round = statistics.steps,
                            tickets = state.accepted().len(),
                            gain,
                            covered = state.covered(),
                            remaining = required.saturating_sub(state.covered()),
                            combos_per_sec = if elapsed > 0.0 {
                                state.covered() as f64 / elapsed
                            } else {
                                0.0
                            },
                            "committed ticket"
                        );
                    }
                }
                _ => {
                    state.record_stall();
                    if log_level.verbose() {
                        debug!(
                            round = statistics.steps,
                            stalls = state.stall_count(),
                            "no candidate improved coverage"
                        );
                    }
                }
            }
        };
        statistics.elapsed = started.elapsed();

        let tracked = state.covered();
        let GreedyState {
            accepted, progress, ..
        } = state;
        let report = CoverageVerifier::new(self.context)?.verify(&accepted)?;
        debug_assert_eq!(report.covered, tracked);

        if log_level.minimal() {
            info!(
                %termination,
                tickets = accepted.len(),
                covered = report.covered,
                fraction = report.fraction(),
                rounds = statistics.steps,
                elapsed_ms = statistics.elapsed.as_millis() as u64,
                "greedy construction finished"
            );
        }

        Ok(Construction {
            tickets: accepted,
            report,
            termination,
            statistics,
            progress,
        })
    }

    fn termination(&self, state: &GreedyState, required: Rank, started: Instant) -> Option<Termination> {
        if state.covered() >= required {
            Some(Termination::TargetReached)
        } else if state.accepted().len() >= self.options.max_tickets() {
            Some(Termination::TicketLimit)
        } else if state.stall_count() > self.options.stall_limit() {
            Some(Termination::Stalled)
        } else if self
            .options
            .time_limit()
            .is_some_and(|limit| started.elapsed() >= limit)
        {
            Some(Termination::TimeLimit)
        } else {
            None
        }
    }
}

impl ConstructionStrategy for GreedyCoordinator<'_> {
    fn construct(&self, rng: &mut RandomNumberGenerator) -> Result<Construction> {
        self.run(rng)
    }
}

fn is_better(candidate: &Construction, incumbent: &Construction, required: Rank) -> bool {
    let reached = |c: &Construction| c.report.covered >= required;
    match (reached(candidate), reached(incumbent)) {
        (true, false) => true,
        (false, true) => false,
        (true, true) => {
            (candidate.tickets.len(), std::cmp::Reverse(candidate.report.covered))
                < (incumbent.tickets.len(), std::cmp::Reverse(incumbent.report.covered))
        }
        (false, false) => {
            (candidate.report.covered, std::cmp::Reverse(candidate.tickets.len()))
                > (incumbent.report.covered, std::cmp::Reverse(incumbent.tickets.len()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DesignParameters;

    fn tiny_context() -> DesignContext {
        DesignContext::new(DesignParameters::new(6, 2, 3)).unwrap()
    }

    fn ticket(elements: &[u32]) -> Ticket {
        Ticket::new(elements.to_vec(), 6).unwrap()
    }

    #[test]
    fn test_commit_counts_only_new_bits() {
        let context = tiny_context();
        let mut state = GreedyState::new(&context).unwrap();
        let first = ticket(&[1, 2, 3]);
        let ranks = context.indexer().subset_ranks(first.elements());
        assert_eq!(state.commit(first.clone(), &ranks), 3);
        // Committing overlapping ranks is harmless.
        assert_eq!(state.commit(first, &ranks), 0);
        assert_eq!(state.covered(), 3);
        assert_eq!(state.accepted().len(), 2);
    }

    #[test]
    fn test_stall_counter_resets_on_commit() {
        let context = tiny_context();
        let mut state = GreedyState::new(&context).unwrap();
        state.record_stall();
        state.record_stall();
        assert_eq!(state.stall_count(), 2);
        state.commit_ticket(&context, ticket(&[4, 5, 6]));
        assert_eq!(state.stall_count(), 0);
    }

    #[test]
    fn test_initial_tickets_outside_universe_rejected() {
        let context = tiny_context();
        let coordinator = GreedyCoordinator::new(&context, GreedyOptions::default()).unwrap();
        let outside: TicketCollection = vec![Ticket::new(vec![1, 2, 9], 9).unwrap()].into();
        assert!(matches!(
            coordinator.with_initial_tickets(outside.clone()),
            Err(CoverError::InvalidTicket(_))
        ));
        assert!(matches!(
            GreedyState::seeded(&context, &outside),
            Err(CoverError::InvalidTicket(_))
        ));
    }

    #[test]
    fn test_seeded_state_already_at_target_terminates_immediately() {
        let context = tiny_context();
        let options = GreedyOptions::builder()
            .target_coverage(0.5)
            .num_threads(1)
            .build();
        let initial: TicketCollection = vec![
            ticket(&[1, 2, 3]),
            ticket(&[1, 4, 5]),
            ticket(&[2, 5, 6]),
        ]
        .into();
        let coordinator = GreedyCoordinator::new(&context, options)
            .unwrap()
            .with_initial_tickets(initial)
            .unwrap();
        let mut rng = RandomNumberGenerator::from_seed(1);
        let construction = coordinator.run(&mut rng).unwrap();
        assert_eq!(construction.termination, Termination::TargetReached);
        assert_eq!(construction.tickets.len(), 3);
        assert_eq!(construction.report.covered, 9);
        assert_eq!(construction.statistics.steps, 0);
    }

    #[test]
    fn test_termination_order() {
        let context = tiny_context();
        let options = GreedyOptions::builder()
            .target_coverage(1.0)
            .max_tickets(2)
            .stall_limit(1)
            .build();
        let coordinator = GreedyCoordinator::new(&context, options).unwrap();
        let required = context.required_count(1.0).unwrap();
        let started = Instant::now();

        let mut state = GreedyState::new(&context).unwrap();
        assert_eq!(coordinator.termination(&state, required, started), None);
        state.record_stall();
        assert_eq!(coordinator.termination(&state, required, started), None);
        state.record_stall();
        assert_eq!(
            coordinator.termination(&state, required, started),
            Some(Termination::Stalled)
        );

        state.commit_ticket(&context, ticket(&[1, 2, 3]));
        state.commit_ticket(&context, ticket(&[4, 5, 6]));
        assert_eq!(
            coordinator.termination(&state, required, started),
            Some(Termination::TicketLimit)
        );
        assert_eq!(
            coordinator.termination(&state, 6, started),
            Some(Termination::TargetReached)
        );
    }
}
