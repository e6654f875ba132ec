//! # Exact-solver binding
//!
//! Covers every target with as few candidate tickets as an external optimizer can find. The
//! optimizer sees a [`CoverProblem`]: candidate tickets and "coverage rows", each row a
//! target subset as a bitmask that at least one selected ticket must contain. Listing all
//! `C(n,d)` rows up front is too large, so [`ExactConstruction`] starts from a random sample
//! of rows and then repeats: solve, find the first target the selection misses, add it as a
//! row. It stops once the selection covers everything.
//!
//! No solver ships with this crate. Anything implementing [`ExactSolver`] can be plugged in.

use std::collections::HashSet;
use std::time::Instant;

use tracing::{debug, info};

use crate::combinatorics::{Element, Rank};
use crate::config::{DesignContext, LogLevel};
use crate::construction::{Construction, ConstructionStrategy, RunStatistics, Termination};
use crate::coverage::{CoverageSet, CoverageVerifier};
use crate::error::{CoverError, Result};
use crate::rng::RandomNumberGenerator;
use crate::ticket::TicketCollection;

/// Largest universe whose subsets fit in a `u64` mask.
pub const MAX_MASK_UNIVERSE: u32 = u64::BITS;

/// Bitmask of `elements`; element `e` sets bit `e - 1`.
pub fn mask(elements: &[Element]) -> u64 {
    elements.iter().fold(0, |mask, &e| mask | 1 << (e - 1))
}

/// A set-cover instance over candidate tickets.
#[derive(Debug, Clone)]
pub struct CoverProblem {
    ticket_masks: Vec<u64>,
    rows: Vec<u64>,
    row_set: HashSet<u64>,
}

impl CoverProblem {
    /// A problem with no rows over `candidates`.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the universe is larger than 64 elements or there are no
    /// candidates.
    pub fn new(context: &DesignContext, candidates: &TicketCollection) -> Result<Self> {
        let universe_size = context.params().universe_size();
        if universe_size > MAX_MASK_UNIVERSE {
            return Err(CoverError::Configuration(format!(
                "Exact construction needs a universe of at most {} elements, got {}",
                MAX_MASK_UNIVERSE, universe_size
            )));
        }
        if candidates.is_empty() {
            return Err(CoverError::Configuration(
                "Exact construction needs at least one candidate ticket".to_string(),
            ));
        }
        Ok(Self {
            ticket_masks: candidates.iter().map(|t| mask(t.elements())).collect(),
            rows: Vec::new(),
            row_set: HashSet::new(),
        })
    }

    pub fn ticket_masks(&self) -> &[u64] {
        &self.ticket_masks
    }

    /// Rows in insertion order.
    pub fn rows(&self) -> &[u64] {
        &self.rows
    }

    /// Indices of the candidates containing `row`.
    pub fn covering_tickets(&self, row: u64) -> impl Iterator<Item = usize> + '_ {
        self.ticket_masks
            .iter()
            .enumerate()
            .filter(move |(_, &ticket)| ticket & row == row)
            .map(|(i, _)| i)
    }

    /// Adds `row`. Returns `false` if it was already present.
    ///
    /// # Errors
    ///
    /// Returns `Solver` if no candidate contains the row, since no selection could satisfy it.
    pub fn add_row(&mut self, row: u64) -> Result<bool> {
        if self.row_set.contains(&row) {
            return Ok(false);
        }
        if self.covering_tickets(row).next().is_none() {
            return Err(CoverError::Solver(format!(
                "no candidate ticket covers target {:#x}",
                row
            )));
        }
        self.row_set.insert(row);
        self.rows.push(row);
        Ok(true)
    }

    /// True when some selected candidate contains every row.
    pub fn is_satisfied_by(&self, selected: &[usize]) -> bool {
        self.rows.iter().all(|&row| {
            selected
                .iter()
                .any(|&i| self.ticket_masks[i] & row == row)
        })
    }
}

/// An opaque optimizer: picks candidate indices so that every row is contained in some
/// picked candidate, using as few candidates as it can.
pub trait ExactSolver {
    fn solve(&self, problem: &CoverProblem) -> Result<Vec<usize>>;
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ExactOptions {
    /// Random target rows added before the first solve.
    pub seed_rows: usize,
    /// Solver calls allowed before giving up with `Termination::RowLimit`.
    pub max_row_rounds: usize,
    pub log_level: LogLevel,
}

impl Default for ExactOptions {
    fn default() -> Self {
        Self {
            seed_rows: 50_000,
            max_row_rounds: 10_000,
            log_level: LogLevel::None,
        }
    }
}

/// Row-generation driver around an [`ExactSolver`].
#[derive(Debug, Clone)]
pub struct ExactConstruction<'a, S> {
    context: &'a DesignContext,
    candidates: TicketCollection,
    solver: S,
    options: ExactOptions,
}

impl<'a, S: ExactSolver> ExactConstruction<'a, S> {
    /// # Errors
    ///
    /// Returns `InvalidTicket` if a candidate lies outside the universe, and `Configuration`
    /// for a zero row round limit.
    pub fn new(
        context: &'a DesignContext,
        candidates: TicketCollection,
        solver: S,
        options: ExactOptions,
    ) -> Result<Self> {
        context.check_tickets(candidates.iter())?;
        if options.max_row_rounds == 0 {
            return Err(CoverError::Configuration(
                "Row round limit cannot be zero".to_string(),
            ));
        }
        Ok(Self {
            context,
            candidates,
            solver,
            options,
        })
    }

    fn target_mask(&self, rank: Rank) -> Result<u64> {
        Ok(mask(&self.context.indexer().unrank(rank)?))
    }

    fn check_selection(&self, selected: &[usize]) -> Result<()> {
        match selected.iter().find(|&&i| i >= self.candidates.len()) {
            Some(i) => Err(CoverError::Solver(format!(
                "solver selected candidate {} of {}",
                i,
                self.candidates.len()
            ))),
            None => Ok(()),
        }
    }

    pub fn run(&self, rng: &mut RandomNumberGenerator) -> Result<Construction> {
        let started = Instant::now();
        let log_level = self.options.log_level;
        let indexer = self.context.indexer();
        let mut problem = CoverProblem::new(self.context, &self.candidates)?;

        let total = self.context.target_count() as usize;
        for rank in rng.distinct_indices(total, self.options.seed_rows.min(total)) {
            problem.add_row(self.target_mask(rank as Rank)?)?;
        }
        if log_level.minimal() {
            info!(
                candidates = self.candidates.len(),
                seed_rows = problem.rows().len(),
                "exact construction started"
            );
        }

        let mut coverage = CoverageSet::for_indexer(indexer)?;
        let mut statistics = RunStatistics::default();
        let mut progress = Vec::new();

        let (selected, termination) = loop {
            let selected = self.solver.solve(&problem)?;
            self.check_selection(&selected)?;
            statistics.steps += 1;
            statistics.evaluations += problem.rows().len() as u64;

            coverage.clear();
            for &i in &selected {
                coverage.mark_ticket(indexer, &self.candidates.tickets()[i]);
            }
            progress.push(coverage.count());

            let Some(missed) = coverage.first_uncovered() else {
                break (selected, Termination::Optimized);
            };
            if log_level.verbose() {
                debug!(
                    round = statistics.steps,
                    selected = selected.len(),
                    covered = coverage.count(),
                    rows = problem.rows().len(),
                    "selection misses a target"
                );
            }
            if statistics.steps as usize >= self.options.max_row_rounds {
                break (selected, Termination::RowLimit);
            }
            if !problem.add_row(self.target_mask(missed)?)? {
                return Err(CoverError::Solver(format!(
                    "selection violates existing row for target rank {}",
                    missed
                )));
            }
        };
        statistics.elapsed = started.elapsed();

        let tickets: TicketCollection = selected
            .iter()
            .map(|&i| self.candidates.tickets()[i].clone())
            .collect();
        let report = CoverageVerifier::new(self.context)?.verify(&tickets)?;

        if log_level.minimal() {
            info!(
                %termination,
                tickets = tickets.len(),
                covered = report.covered,
                rows = problem.rows().len(),
                "exact construction finished"
            );
        }

        Ok(Construction {
            tickets,
            report,
            termination,
            statistics,
            progress,
        })
    }
}

impl<S: ExactSolver> ConstructionStrategy for ExactConstruction<'_, S> {
    fn construct(&self, rng: &mut RandomNumberGenerator) -> Result<Construction> {
        self.run(rng)
    }
}
