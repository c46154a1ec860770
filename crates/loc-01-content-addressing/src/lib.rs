//! # LOC-01 Content Addressing
//!
//! Hash and size of file-like payloads: LOC files, collection item files and
//! tokens record files.
//!
//! **Subsystem ID:** 01  
//! **Architecture:** Hexagonal (domain + algorithms)
//!
//! ## Rules
//!
//! | Rule | Error |
//! |------|-------|
//! | Hash/size are computed once, on first `finalize` | - |
//! | A declared size must match the known size | `SizeMismatch` |
//! | Content must digest to a declared hash | `HashMismatch` |
//! | Reading hash/size before finalize | `NotFinalized` |
//!
//! ## Module Structure
//!
//! ```text
//! loc-01-content-addressing/
//! ├── domain/          # FileContent, HashOrContent, ItemFileWithContent, errors
//! └── algorithms/      # Chunked SHA-256 digest
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithms;
pub mod domain;

pub use algorithms::{digest_bytes, digest_file};
pub use domain::{
    ContentDigest, ContentError, FileContent, HashOrContent, ItemFileWithContent, MimeType,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
