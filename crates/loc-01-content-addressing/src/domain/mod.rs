//! # Domain Layer
//!
//! File payloads, their digests and the lazily finalized hash/size pair.

pub mod content;
pub mod errors;
pub mod hash_or_content;

pub use content::{ContentDigest, FileContent, ItemFileWithContent, MimeType};
pub use errors::ContentError;
pub use hash_or_content::HashOrContent;
