//! # Coverage Verifier
//!
//! Recomputes coverage of a finished collection from scratch by ranking every `d`-subset of
//! every ticket. This figure, never a coordinator's running total, is what gets reported.

use std::fmt;

use tracing::debug;

use super::CoverageSet;
use crate::combinatorics::Rank;
use crate::config::DesignContext;
use crate::error::Result;
use crate::ticket::{Ticket, TicketCollection};

/// Exact coverage of a collection.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverageReport {
    pub covered: Rank,
    pub total: Rank,
}

impl CoverageReport {
    /// Covered share of the target space, in `[0, 1]`.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.covered as f64 / self.total as f64
    }

    pub fn meets(&self, required: Rank) -> bool {
        self.covered >= required
    }
}

impl fmt::Display for CoverageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} ({:.4}%)",
            self.covered,
            self.total,
            self.fraction() * 100.0
        )
    }
}

/// Reusable verifier; keeps one scratch bit vector across recomputations.
#[derive(Debug)]
pub struct CoverageVerifier<'a> {
    context: &'a DesignContext,
    scratch: CoverageSet,
}

impl<'a> CoverageVerifier<'a> {
    pub fn new(context: &'a DesignContext) -> Result<Self> {
        Ok(Self {
            context,
            scratch: CoverageSet::for_indexer(context.indexer())?,
        })
    }

    /// Counts distinct covered targets across `tickets`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTicket` if a ticket holds an element outside this context's universe.
    pub fn count<'t, I>(&mut self, tickets: I) -> Result<Rank>
    where
        I: IntoIterator<Item = &'t Ticket>,
    {
        self.scratch.clear();
        let indexer = self.context.indexer();
        for ticket in tickets {
            self.context.check_tickets([ticket])?;
            self.scratch.mark_ticket(indexer, ticket);
        }
        Ok(self.scratch.count())
    }

    pub fn verify(&mut self, collection: &TicketCollection) -> Result<CoverageReport> {
        let covered = self.count(collection.iter())?;
        let report = CoverageReport {
            covered,
            total: self.context.target_count(),
        };
        debug!(tickets = collection.len(), covered, "verified coverage");
        Ok(report)
    }
}

/// One-shot verification of `collection`.
pub fn verify(context: &DesignContext, collection: &TicketCollection) -> Result<CoverageReport> {
    CoverageVerifier::new(context)?.verify(collection)
}
