//! # Algorithms
//!
//! - `scatter`: concurrent fan-out settling every source

pub mod scatter;

pub use scatter::{flatten, scatter};
