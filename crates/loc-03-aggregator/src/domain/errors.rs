//! # Aggregation Errors

use shared_types::LocError;
use thiserror::Error;

/// Errors surfaced by an aggregated query.
///
/// `E` is the error type of the per-source query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregateError<E> {
    /// Error of the single pinned source, unchanged.
    #[error("{0}")]
    Source(E),

    /// Every queried source failed.
    #[error("All sources failed: {}", .failures.join("; "))]
    AllSourcesFailed {
        /// One `source: message` entry per source.
        failures: Vec<String>,
    },
}

impl From<AggregateError<LocError>> for LocError {
    fn from(e: AggregateError<LocError>) -> Self {
        match e {
            AggregateError::Source(inner) => inner,
            AggregateError::AllSourcesFailed { failures } => LocError::AllSourcesFailed { failures },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pinned_error_passes_through() {
        let err: LocError = AggregateError::Source(LocError::NotFound("x".into())).into();
        assert_eq!(err, LocError::NotFound("x".into()));
    }

    #[test]
    fn test_all_failed_maps_to_loc_error() {
        let err: LocError = AggregateError::<LocError>::AllSourcesFailed {
            failures: vec!["a: down".into()],
        }
        .into();
        assert!(matches!(err, LocError::AllSourcesFailed { failures } if failures.len() == 1));
    }
}
