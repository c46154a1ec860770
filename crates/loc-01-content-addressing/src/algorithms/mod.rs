//! # Algorithms
//!
//! - `digest`: SHA-256 and size of in-memory or on-disk content

pub mod digest;

pub use digest::{digest_bytes, digest_file, CHUNK_SIZE};
