//! # Domain Layer

pub mod errors;
pub mod gathered;

pub use errors::AggregateError;
pub use gathered::{Gathered, SourceFailure};
