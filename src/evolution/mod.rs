//! # Evolutionary construction
//!
//! Searches whole collections at once: each [`Individual`] is a fixed-length ticket sequence,
//! fitness is its exact coverage, and generations evolve through tournament selection,
//! single-point crossover and one-element mutation. The best individual ever scored is the
//! answer.
//!
//! ```rust
//! use covergen::config::{DesignContext, DesignParameters};
//! use covergen::construction::ConstructionStrategy;
//! use covergen::evolution::{EvolutionOptions, EvolutionaryCoordinator};
//! use covergen::rng::RandomNumberGenerator;
//!
//! let context = DesignContext::new(DesignParameters::new(12, 3, 6)).unwrap();
//! let options = EvolutionOptions::builder()
//!     .num_generations(5)
//!     .population_size(8)
//!     .tickets_per_individual(6)
//!     .build();
//! let coordinator = EvolutionaryCoordinator::new(&context, options).unwrap();
//! let construction = coordinator
//!     .construct(&mut RandomNumberGenerator::from_seed(3))
//!     .unwrap();
//! assert_eq!(construction.tickets.len(), 6);
//! ```

pub mod challenge;
pub mod launcher;
pub mod options;

use std::time::Instant;

use tracing::info;

pub use challenge::{Challenge, CoverageChallenge};
pub use launcher::{EvolutionLauncher, EvolutionResult, GenerationStats};
pub use options::{EvolutionOptions, EvolutionOptionsBuilder};

use crate::config::DesignContext;
use crate::construction::{Construction, ConstructionStrategy, RunStatistics, Termination};
use crate::coverage::CoverageVerifier;
use crate::error::Result;
use crate::evaluator::WorkerPool;
use crate::phenotype::Individual;
use crate::rng::{RandomNumberGenerator, TicketSampler};
use crate::selection::TournamentSelection;
use crate::strategy::CrossoverStrategy;

/// Runs the evolutionary search for one design.
#[derive(Debug, Clone)]
pub struct EvolutionaryCoordinator<'a> {
    context: &'a DesignContext,
    options: EvolutionOptions,
}

impl<'a> EvolutionaryCoordinator<'a> {
    pub fn new(context: &'a DesignContext, options: EvolutionOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { context, options })
    }

    pub fn options(&self) -> &EvolutionOptions {
        &self.options
    }

    /// Evolves a random initial population and returns the best individual as a collection.
    pub fn run(&self, rng: &mut RandomNumberGenerator) -> Result<Construction> {
        let started = Instant::now();
        let options = &self.options;
        let params = self.context.params();
        let pool = WorkerPool::new(options.get_num_threads())?;
        let sampler = TicketSampler::new(params.universe_size(), params.ticket_size());

        if options.get_log_level().minimal() {
            info!(
                generations = options.get_num_generations(),
                population = options.get_population_size(),
                tickets = options.get_tickets_per_individual(),
                workers = pool.num_threads(),
                "evolutionary construction started"
            );
        }

        let population: Vec<Individual> = (0..options.get_population_size())
            .map(|_| {
                Individual::random(
                    &sampler,
                    options.get_tickets_per_individual(),
                    options.get_mutation_rate(),
                    rng,
                )
            })
            .collect();

        let selection =
            TournamentSelection::new(options.get_tournament_size(), options.get_tournament_winners())?;
        let launcher = EvolutionLauncher::new(
            CrossoverStrategy,
            CoverageChallenge::new(self.context),
            selection,
        );
        let result = launcher.evolve(options, population, &pool, rng)?;

        let tickets = result.pheno.into_collection();
        let report = CoverageVerifier::new(self.context)?.verify(&tickets)?;
        debug_assert_eq!(report.covered, result.score);

        let statistics = RunStatistics {
            elapsed: started.elapsed(),
            steps: result.history.len() as u64,
            evaluations: (result.history.len() * options.get_population_size()) as u64,
        };
        if options.get_log_level().minimal() {
            info!(
                covered = report.covered,
                fraction = report.fraction(),
                elapsed_ms = statistics.elapsed.as_millis() as u64,
                "evolutionary construction finished"
            );
        }

        Ok(Construction {
            tickets,
            report,
            termination: Termination::GenerationsCompleted,
            statistics,
            progress: result.history.iter().map(|g| g.best_so_far).collect(),
        })
    }
}

impl ConstructionStrategy for EvolutionaryCoordinator<'_> {
    fn construct(&self, rng: &mut RandomNumberGenerator) -> Result<Construction> {
        self.run(rng)
    }
}
