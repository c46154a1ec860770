//! # Domain Layer
//!
//! Merged views of LOCs, collection items, tokens records and issuers, and
//! the parameters exchanged with the backend.

pub mod collection;
pub mod loc_data;
pub mod requests;

pub use collection::{CollectionItem, ItemFile, LocIssuer, TokensRecord};
pub use loc_data::{LocData, MergedFile, MergedLink, MergedMetadataItem};
pub use requests::{
    AddFileParams, AddLinkParams, AddMetadataParams, CollectionItemAnnouncement, CreateLocRequest,
    FileUpload, ItemFileDescription, ItemRef, LocRequestFilter, ReviewDecision,
    TokensRecordAnnouncement, VoidRequest,
};
