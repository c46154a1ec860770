//! Domain layer for the LOC lifecycle.

pub mod failed;
pub mod kind;
pub mod params;

pub use failed::Failed;
pub(crate) use failed::settle;
pub use kind::StateKind;
pub use params::{
    CloseParams, CollectionItemParams, LocFileParams, OpenParams, RequestParams,
    TokensRecordParams, VoidParams,
};
