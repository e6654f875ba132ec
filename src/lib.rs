pub mod combinatorics;
pub mod config;
pub mod construction;
pub mod coverage;
pub mod draws;
pub mod error;
pub mod evaluator;
pub mod evolution;
pub mod greedy;
pub mod io;
pub mod phenotype;
pub mod reducer;
pub mod rng;
pub mod selection;
pub mod strategy;
pub mod ticket;

// Re-export commonly used types for convenience
pub use config::{DesignContext, DesignParameters, LogLevel};
pub use construction::{Construction, ConstructionStrategy, Termination};
pub use coverage::{verify, CoverageReport};
pub use error::{CoverError, OptionExt, Result, ResultExt};
pub use ticket::{Ticket, TicketCollection};
