//! # Accounts
//!
//! Validated account identifiers for the three supported address families.
//!
//! | Family | Format | Check |
//! |--------|--------|-------|
//! | Polkadot | SS58 | base58 + blake2b-512 "SS58PRE" checksum |
//! | Ethereum | `0x` + 40 hex | regex, stored lower case |
//! | Bech32 | `hrp1...` | bech32 checksum |

use blake2::{Blake2b512, Digest};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

static ETHEREUM_ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^0x[0-9a-fA-F]{40}$").unwrap_or_else(|_| unreachable!("static regex"))
});

const SS58_PREFIX: &[u8] = b"SS58PRE";
const SS58_CHECKSUM_LEN: usize = 2;
const SS58_KEY_LEN: usize = 32;

/// Address family of an account.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AccountType {
    /// Substrate SS58 address.
    Polkadot,
    /// EVM address.
    Ethereum,
    /// Bech32 address (Cosmos, MultiversX, ...).
    Bech32,
}

impl AccountType {
    /// All supported families, in detection order.
    pub fn all() -> [AccountType; 3] {
        [AccountType::Ethereum, AccountType::Bech32, AccountType::Polkadot]
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AccountType::Polkadot => "Polkadot",
            AccountType::Ethereum => "Ethereum",
            AccountType::Bech32 => "Bech32",
        };
        f.write_str(name)
    }
}

/// Account validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    /// The address is not valid for the requested family.
    #[error("invalid {account_type} address: {address}")]
    InvalidAddress {
        /// Offending address.
        address: String,
        /// Requested family.
        account_type: AccountType,
    },

    /// The address matches none of the supported families.
    #[error("unsupported address: {0}")]
    Unsupported(String),
}

/// A validated account.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawAccountId")]
pub struct AccountId {
    address: String,
    #[serde(rename = "type")]
    account_type: AccountType,
}

#[derive(Deserialize)]
struct RawAccountId {
    address: String,
    #[serde(rename = "type")]
    account_type: AccountType,
}

impl TryFrom<RawAccountId> for AccountId {
    type Error = AccountError;

    fn try_from(raw: RawAccountId) -> Result<Self, Self::Error> {
        AccountId::new(raw.address, raw.account_type)
    }
}

impl AccountId {
    /// Validate `address` as a member of `account_type`.
    pub fn new(address: impl Into<String>, account_type: AccountType) -> Result<Self, AccountError> {
        let address = address.into();
        if !is_valid_address(&address, account_type) {
            return Err(AccountError::InvalidAddress {
                address,
                account_type,
            });
        }
        let address = match account_type {
            AccountType::Ethereum => address.to_lowercase(),
            _ => address,
        };
        Ok(Self {
            address,
            account_type,
        })
    }

    /// Validate an SS58 address.
    pub fn polkadot(address: impl Into<String>) -> Result<Self, AccountError> {
        Self::new(address, AccountType::Polkadot)
    }

    /// Validate an EVM address.
    pub fn ethereum(address: impl Into<String>) -> Result<Self, AccountError> {
        Self::new(address, AccountType::Ethereum)
    }

    /// Validate a Bech32 address.
    pub fn bech32(address: impl Into<String>) -> Result<Self, AccountError> {
        Self::new(address, AccountType::Bech32)
    }

    /// Detect the family of `address`.
    pub fn parse(address: &str) -> Result<Self, AccountError> {
        AccountType::all()
            .into_iter()
            .find(|t| is_valid_address(address, *t))
            .map(|t| Self::new(address, t))
            .unwrap_or_else(|| Err(AccountError::Unsupported(address.to_string())))
    }

    /// Address text.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Address family.
    pub fn account_type(&self) -> AccountType {
        self.account_type
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.account_type, self.address)
    }
}

/// Check `address` against the rules of `account_type`.
pub fn is_valid_address(address: &str, account_type: AccountType) -> bool {
    match account_type {
        AccountType::Polkadot => is_valid_ss58(address),
        AccountType::Ethereum => ETHEREUM_ADDRESS.is_match(address),
        AccountType::Bech32 => bech32::decode(address).is_ok(),
    }
}

fn is_valid_ss58(address: &str) -> bool {
    let Ok(decoded) = bs58::decode(address).into_vec() else {
        return false;
    };
    // One or two prefix bytes, the public key, the checksum.
    let prefix_len = match decoded.len() {
        n if n == 1 + SS58_KEY_LEN + SS58_CHECKSUM_LEN => 1,
        n if n == 2 + SS58_KEY_LEN + SS58_CHECKSUM_LEN => 2,
        _ => return false,
    };
    let body_len = prefix_len + SS58_KEY_LEN;
    let mut hasher = Blake2b512::new();
    hasher.update(SS58_PREFIX);
    hasher.update(&decoded[..body_len]);
    let checksum = hasher.finalize();
    checksum[..SS58_CHECKSUM_LEN] == decoded[body_len..]
}
