//! # EvolutionOptions
//!
//! The `EvolutionOptions` struct configures the evolutionary coordinator: how many generations
//! to run, how many individuals each holds, how many tickets make up an individual, and the
//! parameters of tournament selection and mutation.
//!
//! ## Example
//!
//! ```rust
//! use covergen::config::LogLevel;
//! use covergen::evolution::options::EvolutionOptions;
//!
//! let options = EvolutionOptions::builder()
//!     .num_generations(25)
//!     .population_size(64)
//!     .tickets_per_individual(40)
//!     .mutation_rate(0.05)
//!     .log_level(LogLevel::Minimal)
//!     .build();
//! assert!(options.validate().is_ok());
//!
//! let default_options = EvolutionOptions::default();
//! assert_eq!(default_options.get_population_size(), 128);
//! ```

use crate::config::LogLevel;
use crate::error::{CoverError, Result};
use crate::rng::RandomNumberGenerator;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionOptions {
    num_generations: usize,
    population_size: usize,
    tickets_per_individual: usize,
    mutation_rate: f64,
    tournament_size: usize,
    tournament_winners: usize,
    /// Minimum population size scored on the worker pool rather than inline.
    parallel_threshold: usize,
    num_threads: usize,
    seed: Option<u64>,
    log_level: LogLevel,
}

impl EvolutionOptions {
    pub fn get_num_generations(&self) -> usize {
        self.num_generations
    }

    pub fn get_population_size(&self) -> usize {
        self.population_size
    }

    pub fn get_tickets_per_individual(&self) -> usize {
        self.tickets_per_individual
    }

    pub fn get_mutation_rate(&self) -> f64 {
        self.mutation_rate
    }

    pub fn get_tournament_size(&self) -> usize {
        self.tournament_size
    }

    pub fn get_tournament_winners(&self) -> usize {
        self.tournament_winners
    }

    /// Returns the minimum number of individuals to score in parallel.
    pub fn get_parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    pub fn get_num_threads(&self) -> usize {
        self.num_threads
    }

    pub fn get_log_level(&self) -> LogLevel {
        self.log_level
    }

    /// The master generator for a run: seeded when `seed` is set, entropy otherwise.
    pub fn create_rng(&self) -> RandomNumberGenerator {
        RandomNumberGenerator::from_optional_seed(self.seed)
    }

    /// Sets the parallel threshold.
    pub fn set_parallel_threshold(&mut self, threshold: usize) {
        self.parallel_threshold = threshold;
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_generations == 0 {
            return Err(CoverError::Configuration(
                "Number of generations cannot be zero".to_string(),
            ));
        }
        if self.population_size == 0 {
            return Err(CoverError::Configuration(
                "Population size cannot be zero".to_string(),
            ));
        }
        if self.tickets_per_individual == 0 {
            return Err(CoverError::Configuration(
                "Tickets per individual cannot be zero".to_string(),
            ));
        }
        if self.tournament_winners == 0 || self.tournament_winners > self.tournament_size {
            return Err(CoverError::Configuration(format!(
                "Tournament winners ({}) must be between 1 and the tournament size ({})",
                self.tournament_winners, self.tournament_size
            )));
        }
        if self.population_size < self.tournament_size.max(2) {
            return Err(CoverError::Configuration(format!(
                "Population size ({}) must be at least the tournament size ({}) and 2",
                self.population_size, self.tournament_size
            )));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(CoverError::Configuration(format!(
                "Mutation rate {} must lie in [0, 1]",
                self.mutation_rate
            )));
        }
        Ok(())
    }

    /// Returns a builder for creating an `EvolutionOptions` instance.
    pub fn builder() -> EvolutionOptionsBuilder {
        EvolutionOptionsBuilder::default()
    }
}

impl Default for EvolutionOptions {
    fn default() -> Self {
        Self {
            num_generations: 10,
            population_size: 128,
            tickets_per_individual: 105,
            mutation_rate: 0.1,
            tournament_size: 4,
            tournament_winners: 2,
            parallel_threshold: 2,
            num_threads: 0,
            seed: None,
            log_level: LogLevel::None,
        }
    }
}

/// Builder for `EvolutionOptions`.
///
/// Provides a fluent interface for constructing `EvolutionOptions` instances.
#[derive(Debug, Clone, Default)]
pub struct EvolutionOptionsBuilder {
    num_generations: Option<usize>,
    population_size: Option<usize>,
    tickets_per_individual: Option<usize>,
    mutation_rate: Option<f64>,
    tournament_size: Option<usize>,
    tournament_winners: Option<usize>,
    parallel_threshold: Option<usize>,
    num_threads: Option<usize>,
    seed: Option<u64>,
    log_level: Option<LogLevel>,
}

impl EvolutionOptionsBuilder {
    /// Sets the number of generations.
    pub fn num_generations(mut self, value: usize) -> Self {
        self.num_generations = Some(value);
        self
    }

    /// Sets the population size.
    pub fn population_size(mut self, value: usize) -> Self {
        self.population_size = Some(value);
        self
    }

    pub fn tickets_per_individual(mut self, value: usize) -> Self {
        self.tickets_per_individual = Some(value);
        self
    }

    pub fn mutation_rate(mut self, value: f64) -> Self {
        self.mutation_rate = Some(value);
        self
    }

    pub fn tournament_size(mut self, value: usize) -> Self {
        self.tournament_size = Some(value);
        self
    }

    pub fn tournament_winners(mut self, value: usize) -> Self {
        self.tournament_winners = Some(value);
        self
    }

    /// Sets the parallel threshold.
    pub fn parallel_threshold(mut self, value: usize) -> Self {
        self.parallel_threshold = Some(value);
        self
    }

    pub fn num_threads(mut self, value: usize) -> Self {
        self.num_threads = Some(value);
        self
    }

    pub fn seed(mut self, value: u64) -> Self {
        self.seed = Some(value);
        self
    }

    /// Sets the log level.
    pub fn log_level(mut self, value: LogLevel) -> Self {
        self.log_level = Some(value);
        self
    }

    /// Builds the `EvolutionOptions` instance.
    pub fn build(self) -> EvolutionOptions {
        let default = EvolutionOptions::default();
        EvolutionOptions {
            num_generations: self.num_generations.unwrap_or(default.num_generations),
            population_size: self.population_size.unwrap_or(default.population_size),
            tickets_per_individual: self
                .tickets_per_individual
                .unwrap_or(default.tickets_per_individual),
            mutation_rate: self.mutation_rate.unwrap_or(default.mutation_rate),
            tournament_size: self.tournament_size.unwrap_or(default.tournament_size),
            tournament_winners: self.tournament_winners.unwrap_or(default.tournament_winners),
            parallel_threshold: self.parallel_threshold.unwrap_or(default.parallel_threshold),
            num_threads: self.num_threads.unwrap_or(default.num_threads),
            seed: self.seed.or(default.seed),
            log_level: self.log_level.unwrap_or(default.log_level),
        }
    }
}
