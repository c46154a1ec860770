//! # LOC Client Test Suite
//!
//! Scenarios spanning several subsystems, run against the in-memory node
//! and ledger adapters.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── fixtures.rs      # Dev accounts, nodes, ledger, clients
//!     ├── lifecycle.rs     # Request to close, void, staleness
//!     ├── collections.rs   # Collection items, tokens records, compensation
//!     └── aggregation.rs   # Multi-node listing and partial failures
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p loc-tests
//! cargo test -p loc-tests integration::collections::
//! ```

pub mod integration;
