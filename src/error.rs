//! # Error Types
//!
//! This module defines the error type shared by every component of the covering-design
//! engine. Validation and range errors surface immediately with enough context to locate
//! the offending record or value. A search that stalls before reaching its target is *not*
//! an error: it terminates normally and reports a [`Termination`](crate::construction::Termination)
//! status instead.
//!
//! ## Examples
//!
//! Using the `Result` type:
//!
//! ```rust
//! use covergen::error::{CoverError, Result};
//!
//! fn check_fraction(fraction: f64) -> Result<f64> {
//!     if !(0.0..=1.0).contains(&fraction) {
//!         return Err(CoverError::Configuration(format!(
//!             "coverage fraction {} is outside [0, 1]",
//!             fraction
//!         )));
//!     }
//!     Ok(fraction)
//! }
//!
//! assert!(check_fraction(0.95).is_ok());
//! assert!(check_fraction(1.5).is_err());
//! ```
//!
//! Using the `ResultExt` trait to add context to errors:
//!
//! ```rust
//! use covergen::error::{Result, ResultExt};
//! use std::fs::File;
//!
//! fn open_tickets(path: &str) -> Result<File> {
//!     File::open(path).context("Failed to open ticket file")
//! }
//! ```
//!
//! Using the `OptionExt` trait to convert `Option` to `Result`:
//!
//! ```rust
//! use covergen::error::{CoverError, OptionExt};
//!
//! fn best_fitness(fitness: &[u64]) -> covergen::error::Result<u64> {
//!     fitness.iter().max().copied().ok_or_else_cover(|| CoverError::EmptyPopulation)
//! }
//! ```

use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Represents errors that can occur while building, reducing or reading covering designs.
#[derive(Error, Debug)]
pub enum CoverError {
    /// A ticket or draw violates the universe constraints (duplicates, out-of-universe
    /// values, wrong cardinality).
    #[error("Invalid ticket: {0}")]
    InvalidTicket(String),

    /// A line of a ticket or draw file could not be read as a set of integers.
    #[error("Parse error on line {line}: {message}")]
    Parse {
        /// One-based line number of the offending record.
        line: usize,
        /// What was wrong with it.
        message: String,
    },

    /// Error that occurs when an invalid configuration is provided.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A rank or subset fell outside the indexed space. This indicates a parameter
    /// mismatch and is never masked.
    #[error("Index out of range: {0}")]
    IndexOutOfRange(String),

    /// Error that occurs when an empty population is encountered.
    #[error("Empty population error: Cannot operate on an empty population")]
    EmptyPopulation,

    /// The worker pool or a coverage buffer could not be acquired.
    #[error("Resource acquisition failed: {0}")]
    ResourceAcquisition(String),

    /// An external exact solver failed or returned an unusable selection.
    #[error("Solver error: {0}")]
    Solver(String),

    /// Error that occurs when an I/O operation fails.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A generic error with a custom message.
    #[error("{0}")]
    Other(String),
}

/// A specialized Result type for covering-design operations.
pub type Result<T> = std::result::Result<T, CoverError>;

/// Extension trait for Result to add context to errors.
///
/// ## Examples
///
/// ```rust
/// use covergen::error::ResultExt;
/// use std::fs::File;
///
/// fn read_file(path: &str) -> covergen::error::Result<()> {
///     File::open(path).context("Failed to open file")?;
///     Ok(())
/// }
/// ```
pub trait ResultExt<T, E> {
    /// Adds context to an error, converting it to a `CoverError`.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| CoverError::Other(format!("{}: {}", context, e)))
    }
}

/// Extension trait for Option to convert to Result with a custom error.
pub trait OptionExt<T> {
    /// Converts an Option to a Result using a closure to generate the error.
    fn ok_or_else_cover<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> CoverError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_else_cover<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> CoverError,
    {
        self.ok_or_else(err_fn)
    }
}
