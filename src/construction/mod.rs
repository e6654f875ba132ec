//! # Construction Strategies
//!
//! Every producer of an accepted collection (the greedy coordinator, the evolutionary
//! coordinator and an external exact solver) sits behind [`ConstructionStrategy`]. Whatever
//! the producer, the returned [`Construction`] carries the collection's *verified* coverage
//! together with why the run stopped.

pub mod exact;

pub use exact::{CoverProblem, ExactConstruction, ExactOptions, ExactSolver};

use std::fmt;
use std::time::Duration;

use crate::combinatorics::Rank;
use crate::coverage::CoverageReport;
use crate::error::Result;
use crate::rng::RandomNumberGenerator;
use crate::ticket::TicketCollection;

/// Why a construction run stopped. None of these is an error.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Covered count reached the configured target.
    TargetReached,
    /// The collection reached its maximum ticket count first.
    TicketLimit,
    /// Too many consecutive rounds without any gain.
    Stalled,
    /// The wall-clock limit elapsed between rounds.
    TimeLimit,
    /// The evolutionary search ran all of its generations.
    GenerationsCompleted,
    /// The exact solver's selection satisfies every target row.
    Optimized,
    /// The exact solver still violated rows when the row-round limit was hit.
    RowLimit,
}

impl Termination {
    /// True when the run ended because it achieved what it was asked for.
    pub fn converged(&self) -> bool {
        matches!(self, Termination::TargetReached | Termination::Optimized)
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Termination::TargetReached => "target coverage reached",
            Termination::TicketLimit => "ticket limit reached",
            Termination::Stalled => "search stalled",
            Termination::TimeLimit => "time limit reached",
            Termination::GenerationsCompleted => "all generations completed",
            Termination::Optimized => "solver selection covers every row",
            Termination::RowLimit => "row generation limit reached",
        };
        f.write_str(text)
    }
}

/// Derived run figures; informative only, never authoritative.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunStatistics {
    pub elapsed: Duration,
    /// Greedy rounds, generations, or solver calls.
    pub steps: u64,
    /// Candidate tickets or individuals scored.
    pub evaluations: u64,
}

impl RunStatistics {
    /// Covered targets per second of wall-clock time.
    pub fn throughput(&self, covered: Rank) -> f64 {
        let seconds = self.elapsed.as_secs_f64();
        if seconds > 0.0 {
            covered as f64 / seconds
        } else {
            0.0
        }
    }
}

/// A finished collection and its verified coverage.
#[derive(Debug, Clone)]
pub struct Construction {
    pub tickets: TicketCollection,
    pub report: CoverageReport,
    pub termination: Termination,
    pub statistics: RunStatistics,
    /// Tracked coverage after each step: covered count after every greedy commit, or best
    /// fitness after every generation.
    pub progress: Vec<Rank>,
}

/// Anything that produces an accepted collection.
pub trait ConstructionStrategy {
    fn construct(&self, rng: &mut RandomNumberGenerator) -> Result<Construction>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converged() {
        assert!(Termination::TargetReached.converged());
        assert!(Termination::Optimized.converged());
        assert!(!Termination::Stalled.converged());
        assert!(!Termination::GenerationsCompleted.converged());
    }

    #[test]
    fn test_throughput() {
        let stats = RunStatistics {
            elapsed: Duration::from_secs(2),
            steps: 3,
            evaluations: 10,
        };
        assert_eq!(stats.throughput(100), 50.0);
        assert_eq!(RunStatistics::default().throughput(100), 0.0);
    }
}
