//! # GreedyOptions
//!
//! Tunables for the greedy coordinator. Batch size and stall limit are plain configuration:
//! no single value suits every `(n, d, m)`.
//!
//! ## Example
//!
//! ```rust
//! use covergen::config::LogLevel;
//! use covergen::greedy::GreedyOptions;
//! use std::time::Duration;
//!
//! let options = GreedyOptions::builder()
//!     .max_tickets(40)
//!     .target_coverage(0.9)
//!     .batch_size(64)
//!     .seed(7)
//!     .time_limit(Duration::from_secs(600))
//!     .log_level(LogLevel::Minimal)
//!     .build();
//! assert_eq!(options.batch_size(), 64);
//! ```

use std::time::Duration;

use crate::config::LogLevel;
use crate::error::{CoverError, Result};
use crate::rng::RandomNumberGenerator;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct GreedyOptions {
    max_tickets: usize,
    target_coverage: f64,
    batch_size: usize,
    /// Consecutive zero-gain rounds tolerated before giving up.
    stall_limit: usize,
    /// Worker threads for evaluation; `0` uses every available CPU.
    num_threads: usize,
    seed: Option<u64>,
    time_limit: Option<Duration>,
    restarts: usize,
    log_level: LogLevel,
}

impl GreedyOptions {
    pub fn max_tickets(&self) -> usize {
        self.max_tickets
    }

    pub fn target_coverage(&self) -> f64 {
        self.target_coverage
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn stall_limit(&self) -> usize {
        self.stall_limit
    }

    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    pub fn restarts(&self) -> usize {
        self.restarts
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }

    /// The master generator for a run: seeded when `seed` is set, entropy otherwise.
    pub fn create_rng(&self) -> RandomNumberGenerator {
        RandomNumberGenerator::from_optional_seed(self.seed)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_tickets == 0 {
            return Err(CoverError::Configuration(
                "Maximum ticket count cannot be zero".to_string(),
            ));
        }
        if self.batch_size == 0 {
            return Err(CoverError::Configuration(
                "Batch size cannot be zero".to_string(),
            ));
        }
        if self.restarts == 0 {
            return Err(CoverError::Configuration(
                "At least one greedy start is required".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.target_coverage) {
            return Err(CoverError::Configuration(format!(
                "Target coverage {} must lie in [0, 1]",
                self.target_coverage
            )));
        }
        Ok(())
    }

    pub fn builder() -> GreedyOptionsBuilder {
        GreedyOptionsBuilder::default()
    }
}

impl Default for GreedyOptions {
    fn default() -> Self {
        Self {
            max_tickets: 105,
            target_coverage: 0.95,
            batch_size: 128,
            stall_limit: 64,
            num_threads: 0,
            seed: None,
            time_limit: None,
            restarts: 1,
            log_level: LogLevel::None,
        }
    }
}

/// Builder for `GreedyOptions`.
#[derive(Debug, Clone, Default)]
pub struct GreedyOptionsBuilder {
    max_tickets: Option<usize>,
    target_coverage: Option<f64>,
    batch_size: Option<usize>,
    stall_limit: Option<usize>,
    num_threads: Option<usize>,
    seed: Option<u64>,
    time_limit: Option<Duration>,
    restarts: Option<usize>,
    log_level: Option<LogLevel>,
}

impl GreedyOptionsBuilder {
    pub fn max_tickets(mut self, value: usize) -> Self {
        self.max_tickets = Some(value);
        self
    }

    pub fn target_coverage(mut self, value: f64) -> Self {
        self.target_coverage = Some(value);
        self
    }

    pub fn batch_size(mut self, value: usize) -> Self {
        self.batch_size = Some(value);
        self
    }

    pub fn stall_limit(mut self, value: usize) -> Self {
        self.stall_limit = Some(value);
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

    pub fn time_limit(mut self, value: Duration) -> Self {
        self.time_limit = Some(value);
        self
    }

    pub fn restarts(mut self, value: usize) -> Self {
        self.restarts = Some(value);
        self
    }

    pub fn log_level(mut self, value: LogLevel) -> Self {
        self.log_level = Some(value);
        self
    }

    pub fn build(self) -> GreedyOptions {
        let default = GreedyOptions::default();
        GreedyOptions {
            max_tickets: self.max_tickets.unwrap_or(default.max_tickets),
            target_coverage: self.target_coverage.unwrap_or(default.target_coverage),
            batch_size: self.batch_size.unwrap_or(default.batch_size),
            stall_limit: self.stall_limit.unwrap_or(default.stall_limit),
            num_threads: self.num_threads.unwrap_or(default.num_threads),
            seed: self.seed.or(default.seed),
            time_limit: self.time_limit.or(default.time_limit),
            restarts: self.restarts.unwrap_or(default.restarts),
            log_level: self.log_level.unwrap_or(default.log_level),
        }
    }
}
