//! # Design Parameters
//!
//! `DesignParameters` fixes the shape of a covering-design run: the universe size `n`, the
//! draw (target subset) size `d` and the ticket size `m`. `DesignContext` bundles validated
//! parameters with the combinatorial indexer built for them; it is created once by the caller,
//! owned by whichever coordinator runs, and passed by reference to every component.
//!
//! ## Example
//!
//! ```rust
//! use covergen::config::{DesignContext, DesignParameters};
//!
//! let params = DesignParameters::builder()
//!     .universe_size(10)
//!     .draw_size(3)
//!     .ticket_size(5)
//!     .build();
//! let context = DesignContext::new(params).unwrap();
//! assert_eq!(context.target_count(), 120);
//!
//! // Defaults describe the classic 6-of-60 lottery with 30-number tickets.
//! let default = DesignParameters::default();
//! assert_eq!(default.universe_size(), 60);
//! ```

use crate::combinatorics::{CombinationIndexer, Rank};
use crate::error::{CoverError, Result};
use crate::ticket::Ticket;

/// How chatty a coordinator is on the `tracing` facade.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Per-round / per-generation `debug!` events on top of `Minimal`.
    Verbose,
    /// Start, improvement and termination `info!` events.
    Minimal,
    /// No events.
    #[default]
    None,
}

impl LogLevel {
    pub fn minimal(&self) -> bool {
        matches!(self, LogLevel::Minimal | LogLevel::Verbose)
    }

    pub fn verbose(&self) -> bool {
        matches!(self, LogLevel::Verbose)
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesignParameters {
    universe_size: u32,
    draw_size: usize,
    ticket_size: usize,
}

impl DesignParameters {
    pub fn new(universe_size: u32, draw_size: usize, ticket_size: usize) -> Self {
        Self {
            universe_size,
            draw_size,
            ticket_size,
        }
    }

    pub fn universe_size(&self) -> u32 {
        self.universe_size
    }

    pub fn draw_size(&self) -> usize {
        self.draw_size
    }

    pub fn ticket_size(&self) -> usize {
        self.ticket_size
    }

    /// Checks `1 <= d <= m <= n`.
    pub fn validate(&self) -> Result<()> {
        if self.draw_size == 0 {
            return Err(CoverError::Configuration(
                "Draw size cannot be zero".to_string(),
            ));
        }
        if self.draw_size > self.ticket_size {
            return Err(CoverError::Configuration(format!(
                "Draw size {} exceeds ticket size {}",
                self.draw_size, self.ticket_size
            )));
        }
        if self.ticket_size > self.universe_size as usize {
            return Err(CoverError::Configuration(format!(
                "Ticket size {} exceeds universe size {}",
                self.ticket_size, self.universe_size
            )));
        }
        Ok(())
    }

    pub fn builder() -> DesignParametersBuilder {
        DesignParametersBuilder::default()
    }
}

impl Default for DesignParameters {
    fn default() -> Self {
        Self {
            universe_size: 60,
            draw_size: 6,
            ticket_size: 30,
        }
    }
}

/// Builder for `DesignParameters`; unset fields take the defaults.
#[derive(Debug, Clone, Default)]
pub struct DesignParametersBuilder {
    universe_size: Option<u32>,
    draw_size: Option<usize>,
    ticket_size: Option<usize>,
}

impl DesignParametersBuilder {
    pub fn universe_size(mut self, value: u32) -> Self {
        self.universe_size = Some(value);
        self
    }

    pub fn draw_size(mut self, value: usize) -> Self {
        self.draw_size = Some(value);
        self
    }

    pub fn ticket_size(mut self, value: usize) -> Self {
        self.ticket_size = Some(value);
        self
    }

    pub fn build(self) -> DesignParameters {
        let default = DesignParameters::default();
        DesignParameters {
            universe_size: self.universe_size.unwrap_or(default.universe_size),
            draw_size: self.draw_size.unwrap_or(default.draw_size),
            ticket_size: self.ticket_size.unwrap_or(default.ticket_size),
        }
    }
}

/// Validated parameters plus the indexer built for them.
#[derive(Debug, Clone)]
pub struct DesignContext {
    params: DesignParameters,
    indexer: CombinationIndexer,
}

impl DesignContext {
    /// Validates `params` and builds the indexer.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the parameters are inconsistent or `C(n,d)` cannot be
    /// held as an in-memory bit vector on this platform.
    pub fn new(params: DesignParameters) -> Result<Self> {
        params.validate()?;
        let indexer = CombinationIndexer::new(params.universe_size, params.draw_size)?;
        if usize::try_from(indexer.total()).is_err() {
            return Err(CoverError::Configuration(format!(
                "{} target subsets cannot be addressed on this platform",
                indexer.total()
            )));
        }
        Ok(Self { params, indexer })
    }

    pub fn params(&self) -> &DesignParameters {
        &self.params
    }

    pub fn indexer(&self) -> &CombinationIndexer {
        &self.indexer
    }

    /// `C(n,d)`, the size of the target subset space.
    pub fn target_count(&self) -> Rank {
        self.indexer.total()
    }

    /// The number of covered targets needed to reach `fraction` of the target space.
    pub fn required_count(&self, fraction: f64) -> Result<Rank> {
        required_count(fraction, self.target_count())
    }

    /// Rejects the first ticket holding an element outside `[1, n]`.
    ///
    /// Tickets carry the universe they were parsed against, which need not be this one.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTicket` naming the ticket and the universe.
    pub fn check_tickets<'t, I>(&self, tickets: I) -> Result<()>
    where
        I: IntoIterator<Item = &'t Ticket>,
    {
        let universe_size = self.params.universe_size;
        match tickets
            .into_iter()
            .find(|t| t.elements().iter().any(|&e| e == 0 || e > universe_size))
        {
            Some(ticket) => Err(CoverError::InvalidTicket(format!(
                "ticket {} lies outside [1, {}]",
                ticket, universe_size
            ))),
            None => Ok(()),
        }
    }
}

/// Smallest `k` with `k >= fraction * total`.
///
/// Products within a relative `1e-9` of an integer are snapped to it first, so `0.9 * 10`
/// requires 9 rather than 10.
pub fn required_count(fraction: f64, total: Rank) -> Result<Rank> {
    if !fraction.is_finite() || !(0.0..=1.0).contains(&fraction) {
        return Err(CoverError::Configuration(format!(
            "Coverage fraction {} must lie in [0, 1]",
            fraction
        )));
    }
    let exact = fraction * total as f64;
    let nearest = exact.round();
    let required = if (exact - nearest).abs() <= 1e-9 * nearest.max(1.0) {
        nearest
    } else {
        exact.ceil()
    };
    Ok((required as Rank).min(total))
}
