//! # LOC-04 Data Reconciler
//!
//! Builds one view of a LOC out of the ledger (tamper-evident, hashed) and
//! the legal officer's backend (clear text, review workflow).
//!
//! **Subsystem ID:** 04  
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Field Authority
//!
//! | Field | Winner |
//! |-------|--------|
//! | Hashes, sizes, seal, closed flag, void replacer | Ledger |
//! | Published / acknowledged flags | Ledger |
//! | Names, natures, descriptions | Backend |
//! | Review status, rejection reasons, timestamps | Backend |
//! | Collection item terms (decoded by type) | Ledger |
//!
//! ## Existence
//!
//! | Entity | Defined by |
//! |--------|------------|
//! | LOC | Backend |
//! | File, metadata, link | Either (ledger-only entries are kept) |
//! | Collection item, tokens record | Ledger (backend companion required) |
//!
//! ## Module Structure
//!
//! ```text
//! loc-04-reconciler/
//! ├── domain/          # LocData, CollectionItem, TokensRecord, request params
//! ├── algorithms/      # reconcile, merge policies, build_loc_data, issuers
//! ├── ports/           # ReconcilerApi, LedgerClient, LocBackend
//! ├── application/     # Reconciler
//! ├── adapters/        # HttpLocBackend, InMemoryNode, InMemoryLedger
//! └── config.rs        # HttpBackendConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use adapters::{HttpLocBackend, InMemoryLedger, InMemoryNode, NodeSession};
pub use algorithms::{
    build_loc_data, can_see_issuers, merge_issuers, reconcile, reconcile_all, Authority,
    CollectionItemPolicy, Existence, FilePolicy, LinkPolicy, LocPolicy, MergePolicy,
    MetadataPolicy, TokensRecordPolicy,
};
pub use application::service::Node;
pub use application::Reconciler;
pub use config::HttpBackendConfig;
pub use domain::*;
pub use ports::{
    InitialItems, LedgerCall, LedgerClient, LocBackend, ReconcilerApi, TransactionResult,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
