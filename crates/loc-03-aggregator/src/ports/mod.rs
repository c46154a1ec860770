//! # Ports Layer
//!
//! - `outbound`: what a queried source must provide

pub mod outbound;

pub use outbound::Source;
