//! # Content Errors

use shared_types::{Hash, LocError};
use thiserror::Error;

/// Errors raised while addressing file content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    /// A declared size conflicts with the known one.
    #[error("Size mismatch: declared {declared}, actual {actual}")]
    SizeMismatch {
        /// Size given by the caller.
        declared: u64,
        /// Size already known or computed.
        actual: u64,
    },

    /// Content does not digest to the declared hash.
    #[error("Hash mismatch: declared {declared}, actual {actual}")]
    HashMismatch {
        /// Hash given by the caller.
        declared: Hash,
        /// Digest of the content.
        actual: Hash,
    },

    /// Hash or size read before `finalize`.
    #[error("Content not finalized")]
    NotFinalized,

    /// A bare hash was finalized without a size.
    #[error("Size unknown for {0}")]
    MissingSize(Hash),

    /// The content could not be read.
    #[error("Cannot read content: {0}")]
    Io(String),

    /// Malformed MIME type.
    #[error("Invalid content type: {0}")]
    InvalidContentType(String),
}

impl From<std::io::Error> for ContentError {
    fn from(e: std::io::Error) -> Self {
        ContentError::Io(e.to_string())
    }
}

impl From<ContentError> for LocError {
    fn from(e: ContentError) -> Self {
        LocError::Validation(e.to_string())
    }
}
