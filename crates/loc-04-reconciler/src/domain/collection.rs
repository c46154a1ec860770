//! # Merged Collection Views
//!
//! Collection items and tokens records exist only once the ledger has them.
//! The backend adds what the ledger only stores hashed, plus upload status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use loc_02_terms_validation::TermsAndConditionsElement;
use shared_types::{AccountId, Hash, ItemToken, LocId};

/// A file of a collection item or tokens record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemFile {
    /// Content hash (ledger).
    pub hash: Hash,
    /// Declared size (ledger).
    pub size: u64,
    /// File name (backend).
    pub name: String,
    /// MIME type (backend).
    pub content_type: String,
    /// True once the content reached the backend.
    pub uploaded: bool,
}

/// Merged collection item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionItem {
    /// Collection LOC.
    pub collection_loc_id: LocId,
    /// Item identifier.
    pub id: Hash,
    /// Clear-text description.
    pub description: String,
    /// Description hash stored on the ledger.
    pub description_hash: Hash,
    /// Files.
    pub files: Vec<ItemFile>,
    /// Bound token.
    pub token: Option<ItemToken>,
    /// Delivery restricted to token owners.
    pub restricted_delivery: bool,
    /// Terms-and-conditions elements, decoded by type.
    pub terms_and_conditions: Vec<TermsAndConditionsElement>,
    /// When the ledger confirmed the item.
    pub added_on: Option<DateTime<Utc>>,
}

impl CollectionItem {
    /// File by hash.
    pub fn file(&self, hash: &Hash) -> Option<&ItemFile> {
        self.files.iter().find(|f| &f.hash == hash)
    }
}

/// Merged tokens record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokensRecord {
    /// Collection LOC.
    pub collection_loc_id: LocId,
    /// Record identifier.
    pub id: Hash,
    /// Clear-text description.
    pub description: String,
    /// Description hash stored on the ledger.
    pub description_hash: Hash,
    /// Files.
    pub files: Vec<ItemFile>,
    /// Submitter.
    pub submitter: AccountId,
    /// When the ledger confirmed the record.
    pub added_on: Option<DateTime<Utc>>,
}

impl TokensRecord {
    /// File by hash.
    pub fn file(&self, hash: &Hash) -> Option<&ItemFile> {
        self.files.iter().find(|f| &f.hash == hash)
    }
}

/// An issuer as visible to the caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocIssuer {
    /// Issuer account.
    pub address: AccountId,
    /// First name, empty when withheld or unknown.
    pub first_name: String,
    /// Last name, empty when withheld or unknown.
    pub last_name: String,
    /// Identity LOC of the issuer.
    pub identity_loc_id: Option<LocId>,
    /// Selected for the LOC.
    pub selected: bool,
}
