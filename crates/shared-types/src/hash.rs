//! # Content Hash
//!
//! SHA-256 digest used for file contents, hashed item names and collection
//! item identifiers. The text form is `0x` followed by 64 lowercase hex chars.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Length of a digest in bytes.
pub const HASH_LEN: usize = 32;

/// A 32-byte SHA-256 digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Hash([u8; HASH_LEN]);

/// Errors raised when parsing a hash from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HashParseError {
    /// The `0x` prefix is missing.
    #[error("hash must start with 0x: {0}")]
    MissingPrefix(String),

    /// The hex payload does not decode.
    #[error("invalid hex in hash: {0}")]
    InvalidHex(String),

    /// The payload is not 32 bytes long.
    #[error("hash must be {expected} bytes, got {got}")]
    InvalidLength {
        /// Expected byte length.
        expected: usize,
        /// Actual byte length.
        got: usize,
    },
}

impl Hash {
    /// Wrap raw digest bytes.
    pub const fn from_bytes(bytes: [u8; HASH_LEN]) -> Self {
        Self(bytes)
    }

    /// Hash arbitrary bytes.
    pub fn of(data: impl AsRef<[u8]>) -> Self {
        let digest = Sha256::digest(data.as_ref());
        let mut bytes = [0u8; HASH_LEN];
        bytes.copy_from_slice(&digest);
        Self(bytes)
    }

    /// Hash a UTF-8 string (item names, natures, descriptions).
    pub fn of_str(value: &str) -> Self {
        Self::of(value.as_bytes())
    }

    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; HASH_LEN] {
        &self.0
    }

    /// `0x`-prefixed lowercase hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Parse the `0x`-prefixed hex form.
    pub fn from_hex(value: &str) -> Result<Self, HashParseError> {
        let payload = value
            .strip_prefix("0x")
            .ok_or_else(|| HashParseError::MissingPrefix(value.to_string()))?;
        let decoded =
            hex::decode(payload).map_err(|_| HashParseError::InvalidHex(value.to_string()))?;
        if decoded.len() != HASH_LEN {
            return Err(HashParseError::InvalidLength {
                expected: HASH_LEN,
                got: decoded.len(),
            });
        }
        let mut bytes = [0u8; HASH_LEN];
        bytes.copy_from_slice(&decoded);
        Ok(Self(bytes))
    }
}

impl From<[u8; HASH_LEN]> for Hash {
    fn from(bytes: [u8; HASH_LEN]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", self.to_hex())
    }
}

impl FromStr for Hash {
    type Err = HashParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Hash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Hash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Hash::from_hex(&text).map_err(serde::de::Error::custom)
    }
}
