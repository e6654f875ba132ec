//! # Greedy Construction
//!
//! `INIT -> {SAMPLE_BATCH -> EVALUATE -> SELECT_BEST -> COMMIT}* -> TERMINATED`.
//!
//! The coordinator owns the coverage set and is its sole writer. Workers score candidate
//! tickets against an immutable snapshot taken at the start of each round, and the round ends
//! at a barrier once every candidate has been scored. The best candidate is committed only if
//! its gain is positive; otherwise the round counts as a stall. The run stops between rounds
//! when the target coverage, the ticket limit, the stall limit or the optional time limit is
//! reached.
//!
//! ## Example
//!
//! ```rust
//! use covergen::config::{DesignContext, DesignParameters};
//! use covergen::greedy::{GreedyCoordinator, GreedyOptions};
//! use covergen::rng::RandomNumberGenerator;
//!
//! let context = DesignContext::new(DesignParameters::new(10, 3, 5)).unwrap();
//! let options = GreedyOptions::builder()
//!     .target_coverage(1.0)
//!     .max_tickets(60)
//!     .batch_size(16)
//!     .build();
//! let coordinator = GreedyCoordinator::new(&context, options).unwrap();
//!
//! let mut rng = RandomNumberGenerator::from_seed(11);
//! let construction = coordinator.run(&mut rng).unwrap();
//! assert!(construction.report.covered <= context.target_count());
//! ```

pub mod coordinator;
pub mod options;

pub use coordinator::{GreedyCoordinator, GreedyState};
pub use options::{GreedyOptions, GreedyOptionsBuilder};
