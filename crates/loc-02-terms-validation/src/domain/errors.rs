//! # Validation Errors

use shared_types::LocError;
use thiserror::Error;

/// Token validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// The type tag names no supported token type.
    #[error("Unknown token type: {0}")]
    UnknownType(String),

    /// The identifier does not fit the type.
    #[error("Invalid {token_type} token id: {reason}")]
    InvalidId {
        /// Type tag.
        token_type: String,
        /// What is wrong with the id.
        reason: String,
    },

    /// Issuance must be at least 1.
    #[error("Invalid token issuance: {0}")]
    InvalidIssuance(u64),
}

/// Terms-and-conditions errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TermsError {
    /// All rule violations found in one element.
    #[error("Invalid terms: {}", .0.join("; "))]
    Violations(Vec<String>),

    /// The details payload does not decode for the type.
    #[error("Invalid {tc_type} details: {reason}")]
    InvalidDetails {
        /// Type tag.
        tc_type: String,
        /// Decoding failure.
        reason: String,
    },
}

impl From<TokenError> for LocError {
    fn from(e: TokenError) -> Self {
        LocError::Validation(e.to_string())
    }
}

impl From<TermsError> for LocError {
    fn from(e: TermsError) -> Self {
        LocError::Validation(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violations_joined() {
        let err = TermsError::Violations(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "Invalid terms: a; b");
        assert!(matches!(LocError::from(err), LocError::Validation(_)));
    }
}
