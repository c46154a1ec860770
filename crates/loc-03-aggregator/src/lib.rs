//! # LOC-03 Multi-Source Aggregator
//!
//! Issues one query to every legal-officer node and folds the partial
//! results, tolerating per-node failure.
//!
//! **Subsystem ID:** 03  
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Contract
//!
//! | Situation | Outcome |
//! |-----------|---------|
//! | Some nodes fail | Their results are dropped, failures logged |
//! | Every queried node fails | `AllSourcesFailed` |
//! | No node queried | Empty result |
//! | One node pinned | Single call, error returned unchanged |
//!
//! ## Module Structure
//!
//! ```text
//! loc-03-aggregator/
//! ├── domain/          # Gathered, SourceFailure, AggregateError
//! ├── algorithms/      # scatter, flatten
//! ├── ports/           # Source trait
//! ├── application/     # MultiSourceClient
//! └── config.rs        # AggregatorConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use algorithms::{flatten, scatter};
pub use application::{MultiSourceClient, Scope};
pub use config::AggregatorConfig;
pub use domain::{AggregateError, Gathered, SourceFailure};
pub use ports::Source;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
