//! # LOC-05 Lifecycle
//!
//! Typed state machine over a Legal Officer Case. Every state exposes only
//! the operations it allows; each operation consumes the state and returns
//! the next one, or a [`Failed`] carrying the untouched state and the error.
//!
//! **Subsystem ID:** 05  
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Transitions
//!
//! | From | Operation | To |
//! |------|-----------|----|
//! | Draft | submit | Pending |
//! | Pending | accept / reject | Accepted / Rejected |
//! | Rejected | rework | Draft |
//! | Draft, Pending, Accepted, Rejected | cancel | (removed) |
//! | Accepted | open | Open |
//! | Open | close | Closed / ClosedCollection |
//! | Open, Closed, ClosedCollection | make_void | Voided / VoidedCollection |
//!
//! ## Snapshots
//!
//! States belong to a [`LocsState`]. A transition publishes a new snapshot
//! and discards the previous one: any state still held from it answers
//! every later call with `StaleState`.
//!
//! ## Module Structure
//!
//! ```text
//! loc-05-lifecycle/
//! ├── domain/          # StateKind, Failed, operation params
//! ├── algorithms/      # preconditions, initial publication
//! ├── application/     # LocClient, LocsState, LocState and its states
//! └── config.rs        # ClientConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;

pub use application::{
    AcceptedRequest, ClosedCollectionLoc, ClosedLoc, DraftRequest, LocClient, LocState,
    LocsState, OpenLoc, PendingRequest, RejectedRequest, VoidedCollectionLoc, VoidedLoc,
};
pub use config::ClientConfig;
pub use domain::{
    CloseParams, CollectionItemParams, Failed, LocFileParams, OpenParams, RequestParams,
    StateKind, TokensRecordParams, VoidParams,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
