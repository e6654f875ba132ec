use std::cell::RefCell;

use thread_local::ThreadLocal;

use crate::combinatorics::Rank;
use crate::config::DesignContext;
use crate::coverage::CoverageSet;
use crate::error::Result;
use crate::phenotype::{Individual, Phenotype};

pub trait Challenge<Pheno: Phenotype> {
    fn score(&self, phenotype: &Pheno) -> Result<Rank>;
}

/// Fitness = number of distinct target subsets covered by an individual's tickets.
///
/// Each individual's coverage is independent, so nothing persists between scores. Every
/// worker thread keeps one scratch bit vector and clears it per individual instead of
/// allocating `C(n,d)` bits each time.
#[derive(Debug)]
pub struct CoverageChallenge<'a> {
    context: &'a DesignContext,
    scratch: ThreadLocal<RefCell<CoverageSet>>,
}

impl<'a> CoverageChallenge<'a> {
    pub fn new(context: &'a DesignContext) -> Self {
        Self {
            context,
            scratch: ThreadLocal::new(),
        }
    }
}

impl Challenge<Individual> for CoverageChallenge<'_> {
    fn score(&self, individual: &Individual) -> Result<Rank> {
        let cell = self
            .scratch
            .get_or_try(|| CoverageSet::for_indexer(self.context.indexer()).map(RefCell::new))?;
        let mut coverage = cell.borrow_mut();
        coverage.clear();
        let indexer = self.context.indexer();
        for ticket in individual.tickets() {
            coverage.mark_ticket(indexer, ticket);
        }
        Ok(coverage.count())
    }
}
