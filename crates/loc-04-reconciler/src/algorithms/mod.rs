//! Reconciliation algorithms.

pub mod issuers;
pub mod policies;
pub mod reconcile;

pub use issuers::{can_see_issuers, merge_issuers};
pub use policies::{
    build_loc_data, CollectionItemPolicy, FilePolicy, LinkPolicy, LocPolicy, MetadataPolicy,
    TokensRecordPolicy,
};
pub use reconcile::{reconcile, reconcile_all, Authority, Existence, MergePolicy};
