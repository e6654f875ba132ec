//! # Set Reducer
//!
//! Shrinks a finished collection while its coverage stays at or above a goal. Every
//! tentative change is checked by recomputing the whole collection's coverage from scratch.
//!
//! ## Example
//!
//! ```rust
//! use covergen::config::{DesignContext, DesignParameters};
//! use covergen::reducer::{ReductionMode, ReductionOptions, Reducer};
//! use covergen::ticket::{Ticket, TicketCollection};
//!
//! let context = DesignContext::new(DesignParameters::new(6, 2, 3)).unwrap();
//! let mut tickets: TicketCollection = vec![
//!     Ticket::new(vec![1, 2, 3], 6).unwrap(),
//!     Ticket::new(vec![1, 2, 3], 6).unwrap(),
//! ]
//! .into();
//!
//! let options = ReductionOptions::builder()
//!     .coverage_goal(0.2)
//!     .mode(ReductionMode::Tickets)
//!     .build();
//! let outcome = Reducer::new(&context, options).unwrap().reduce(&mut tickets).unwrap();
//! assert_eq!(outcome.tickets_removed, 1);
//! assert_eq!(tickets.len(), 1);
//! ```

use tracing::{debug, info};

use crate::combinatorics::Rank;
use crate::config::{DesignContext, LogLevel};
use crate::coverage::{CoverageReport, CoverageVerifier};
use crate::error::{CoverError, Result};
use crate::ticket::TicketCollection;

/// What the reducer removes.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReductionMode {
    /// Whole tickets.
    #[default]
    Tickets,
    /// Single elements within tickets; tickets never drop to the draw size.
    Elements,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ReductionOptions {
    coverage_goal: f64,
    mode: ReductionMode,
    log_level: LogLevel,
}

impl ReductionOptions {
    pub fn coverage_goal(&self) -> f64 {
        self.coverage_goal
    }

    pub fn mode(&self) -> ReductionMode {
        self.mode
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }

    pub fn builder() -> ReductionOptionsBuilder {
        ReductionOptionsBuilder::default()
    }
}

impl Default for ReductionOptions {
    fn default() -> Self {
        Self {
            coverage_goal: 0.90,
            mode: ReductionMode::Tickets,
            log_level: LogLevel::None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReductionOptionsBuilder {
    coverage_goal: Option<f64>,
    mode: Option<ReductionMode>,
    log_level: Option<LogLevel>,
}

impl ReductionOptionsBuilder {
    pub fn coverage_goal(mut self, value: f64) -> Self {
        self.coverage_goal = Some(value);
        self
    }

    pub fn mode(mut self, value: ReductionMode) -> Self {
        self.mode = Some(value);
        self
    }

    pub fn log_level(mut self, value: LogLevel) -> Self {
        self.log_level = Some(value);
        self
    }

    pub fn build(self) -> ReductionOptions {
        let default = ReductionOptions::default();
        ReductionOptions {
            coverage_goal: self.coverage_goal.unwrap_or(default.coverage_goal),
            mode: self.mode.unwrap_or(default.mode),
            log_level: self.log_level.unwrap_or(default.log_level),
        }
    }
}

/// Result of a reduction run.
#[derive(Debug, Clone, PartialEq)]
pub struct ReductionOutcome {
    /// Verified coverage of the reduced collection.
    pub report: CoverageReport,
    pub required: Rank,
    pub tickets_removed: usize,
    pub elements_removed: usize,
    /// Full passes over the collection, including the final pass that removed nothing.
    pub passes: usize,
}

/// Greedy backward pruning of a collection.
#[derive(Debug)]
pub struct Reducer<'a> {
    context: &'a DesignContext,
    options: ReductionOptions,
    verifier: CoverageVerifier<'a>,
}

impl<'a> Reducer<'a> {
    pub fn new(context: &'a DesignContext, options: ReductionOptions) -> Result<Self> {
        // Validates the goal up front.
        context.required_count(options.coverage_goal())?;
        Ok(Self {
            context,
            options,
            verifier: CoverageVerifier::new(context)?,
        })
    }

    /// Reduces `tickets` in place using the configured mode.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTicket` before any change if a ticket lies outside the universe.
    pub fn reduce(&mut self, tickets: &mut TicketCollection) -> Result<ReductionOutcome> {
        match self.options.mode() {
            ReductionMode::Tickets => self.prune_tickets(tickets),
            ReductionMode::Elements => self.prune_elements(tickets),
        }
    }

    /// Removes whole tickets, scanning from the last ticket to the first, until a full
    /// pass removes nothing.
    pub fn prune_tickets(&mut self, tickets: &mut TicketCollection) -> Result<ReductionOutcome> {
        self.context.check_tickets(tickets.iter())?;
        let required = self.context.required_count(self.options.coverage_goal())?;
        let log_level = self.options.log_level();
        let mut removed = 0;
        let mut passes = 0;

        if log_level.minimal() {
            info!(tickets = tickets.len(), required, "ticket pruning started");
        }

        let mut changed = true;
        while changed {
            changed = false;
            passes += 1;
            for index in (0..tickets.len()).rev() {
                let covered = self.verifier.count(
                    tickets
                        .iter()
                        .enumerate()
                        .filter(|(i, _)| *i != index)
                        .map(|(_, ticket)| ticket),
                )?;
                if covered >= required {
                    let ticket = tickets.remove(index);
                    removed += 1;
                    changed = true;
                    if log_level.verbose() {
                        debug!(index, %ticket, remaining = tickets.len(), covered, "removed ticket");
                    }
                }
            }
            if log_level.minimal() {
                info!(pass = passes, tickets = tickets.len(), removed, "ticket pruning pass");
            }
        }

        self.finish(tickets, required, removed, 0, passes)
    }

    /// Removes single elements: for each ticket larger than the draw size, the first element
    /// whose removal keeps the goal is dropped, then the next ticket is tried. Passes repeat
    /// until one removes nothing.
    pub fn prune_elements(&mut self, tickets: &mut TicketCollection) -> Result<ReductionOutcome> {
        self.context.check_tickets(tickets.iter())?;
        let required = self.context.required_count(self.options.coverage_goal())?;
        let draw_size = self.context.params().draw_size();
        let log_level = self.options.log_level();
        let mut removed = 0;
        let mut passes = 0;

        if log_level.minimal() {
            info!(tickets = tickets.len(), required, "element pruning started");
        }

        let mut changed = true;
        while changed {
            changed = false;
            passes += 1;
            for index in 0..tickets.len() {
                let ticket_len = tickets.tickets()[index].len();
                if ticket_len <= draw_size {
                    continue;
                }
                for position in 0..ticket_len {
                    let trial = tickets.tickets()[index].without_position(position);
                    let covered = self.verifier.count(
                        tickets
                            .iter()
                            .enumerate()
                            .map(|(i, ticket)| if i == index { &trial } else { ticket }),
                    )?;
                    if covered >= required {
                        if log_level.verbose() {
                            debug!(
                                index,
                                element = tickets.tickets()[index].elements()[position],
                                size = trial.len(),
                                covered,
                                "removed element"
                            );
                        }
                        tickets.tickets_mut()[index] = trial;
                        removed += 1;
                        changed = true;
                        break;
                    }
                }
            }
            if log_level.minimal() {
                info!(pass = passes, removed, "element pruning pass");
            }
        }

        self.finish(tickets, required, 0, removed, passes)
    }

    fn finish(
        &mut self,
        tickets: &TicketCollection,
        required: Rank,
        tickets_removed: usize,
        elements_removed: usize,
        passes: usize,
    ) -> Result<ReductionOutcome> {
        let report = self.verifier.verify(tickets)?;
        if self.options.log_level().minimal() {
            info!(
                tickets = tickets.len(),
                covered = report.covered,
                fraction = report.fraction(),
                "reduction finished"
            );
        }
        Ok(ReductionOutcome {
            report,
            required,
            tickets_removed,
            elements_removed,
            passes,
        })
    }
}

/// Reduces `tickets` once with `options`.
pub fn reduce(
    context: &DesignContext,
    options: ReductionOptions,
    tickets: &mut TicketCollection,
) -> Result<ReductionOutcome> {
    if tickets.is_empty() {
        return Err(CoverError::InvalidTicket(
            "cannot reduce an empty collection".to_string(),
        ));
    }
    Reducer::new(context, options)?.reduce(tickets)
}
