//! Pure logic of the lifecycle: preconditions and publication.

pub mod preconditions;
pub mod publication;

pub use preconditions::{
    check_closable, check_collection_item, check_collection_limits, check_replacer,
    duplicate_hash,
};
pub use publication::{chain_file, chain_link, chain_metadata, initial_publication, Publication};
