//! # Adapters
//!
//! `HttpLocBackend` talks to real nodes. `InMemoryNode` and
//! `InMemoryLedger` simulate both collaborators in process.

pub mod http_backend;
pub mod memory_ledger;
pub mod memory_node;

pub use http_backend::HttpLocBackend;
pub use memory_ledger::InMemoryLedger;
pub use memory_node::{InMemoryNode, NodeSession};
