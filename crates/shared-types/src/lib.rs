//! # Shared Types Crate
//!
//! Identifiers, entity records and the error taxonomy shared by every LOC
//! subsystem crate.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: the backend and ledger shapes of a LOC are
//!   defined once, here.
//! - **Validated at the edge**: `AccountId`, `Hash` and `LocId` cannot be
//!   built from malformed text, including through `serde`.
//! - **One error enum upward**: subsystem errors convert into [`LocError`].

pub mod account;
pub mod entities;
pub mod errors;
pub mod hash;
pub mod ids;

pub use account::{is_valid_address, AccountError, AccountId, AccountType};
pub use entities::*;
pub use errors::LocError;
pub use hash::{Hash, HashParseError, HASH_LEN};
pub use ids::{LocId, LocIdParseError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
