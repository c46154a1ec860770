//! # LOC Identifier
//!
//! A LOC is identified by a 128-bit UUID. The backend uses the hyphenated
//! form, the ledger keys its storage by the decimal `u128` form.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Identifier of a Legal Officer Case.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocId(Uuid);

/// Error raised when a LOC id cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid LOC id: {0}")]
pub struct LocIdParseError(pub String);

impl LocId {
    /// Generate a fresh random id.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Build from the ledger's decimal `u128` key.
    pub fn from_decimal(value: &str) -> Result<Self, LocIdParseError> {
        value
            .parse::<u128>()
            .map(|n| Self(Uuid::from_u128(n)))
            .map_err(|_| LocIdParseError(value.to_string()))
    }

    /// Underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Decimal form used as the ledger storage key.
    pub fn to_decimal_string(&self) -> String {
        self.0.as_u128().to_string()
    }
}

impl fmt::Display for LocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl fmt::Debug for LocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LocId({})", self.0.hyphenated())
    }
}

impl FromStr for LocId {
    type Err = LocIdParseError;

    /// Accepts both the UUID text form and the decimal ledger form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.chars().all(|c| c.is_ascii_digit()) {
            return Self::from_decimal(s);
        }
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| LocIdParseError(s.to_string()))
    }
}
