//! # Core Domain Entities
//!
//! LOC records as seen by each of the two data sources.
//!
//! ## Clusters
//!
//! - **Lifecycle**: `LocType`, `LocRequestStatus`, `ItemStatus`
//! - **Backend (off-chain)**: `LocRequest`, `LocFile`, `LocMetadataItem`,
//!   `LocLink`, `CollectionItemRecord`, `TokensRecordRecord`, `IssuerRecord`
//! - **Ledger (on-chain)**: `LegalOfficerCase`, `ChainFile`,
//!   `ChainMetadataItem`, `ChainLink`, `ChainCollectionItem`,
//!   `ChainTokensRecord`
//! - **Wire shapes shared by both**: `CollectionParams`, `ItemToken`,
//!   `TermsRecord`

use crate::account::AccountId;
use crate::hash::Hash;
use crate::ids::LocId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// =============================================================================
// CLUSTER A: LIFECYCLE
// =============================================================================

/// Kind of LOC.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocType {
    /// Notarizes a transaction between parties.
    Transaction,
    /// Holds tokenized collection items once closed.
    Collection,
    /// Proves the identity of a requester.
    Identity,
}

impl fmt::Display for LocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LocType::Transaction => "Transaction",
            LocType::Collection => "Collection",
            LocType::Identity => "Identity",
        };
        f.write_str(name)
    }
}

/// Lifecycle status tracked by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocRequestStatus {
    /// Being prepared by the requester.
    Draft,
    /// Submitted, awaiting the legal officer decision.
    ReviewPending,
    /// Accepted by the legal officer, ready to be opened.
    ReviewAccepted,
    /// Rejected by the legal officer.
    ReviewRejected,
    /// Created on the ledger; items can be added.
    Open,
    /// Closed on the ledger.
    Closed,
}

impl LocRequestStatus {
    /// Statuses that imply a ledger-side case.
    pub fn is_on_chain(&self) -> bool {
        matches!(self, Self::Open | Self::Closed)
    }
}

impl fmt::Display for LocRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Draft => "DRAFT",
            Self::ReviewPending => "REVIEW_PENDING",
            Self::ReviewAccepted => "REVIEW_ACCEPTED",
            Self::ReviewRejected => "REVIEW_REJECTED",
            Self::Open => "OPEN",
            Self::Closed => "CLOSED",
        };
        f.write_str(name)
    }
}

/// Review status of a file, metadata item or link.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    /// Added, not yet submitted for review.
    #[default]
    Draft,
    /// Review requested by the submitter.
    ReviewPending,
    /// Accepted by the legal officer.
    ReviewAccepted,
    /// Rejected by the legal officer; can only be deleted.
    ReviewRejected,
    /// Written to the ledger by the submitter.
    Published,
    /// Acknowledged on the ledger by the legal officer.
    Acknowledged,
}

impl ItemStatus {
    /// Forward-only review transitions.
    pub fn can_transition_to(&self, next: ItemStatus) -> bool {
        matches!(
            (self, next),
            (Self::Draft, Self::ReviewPending)
                | (Self::ReviewPending, Self::ReviewAccepted)
                | (Self::ReviewPending, Self::ReviewRejected)
                | (Self::ReviewAccepted, Self::Published)
                | (Self::Published, Self::Acknowledged)
        )
    }

    /// Links skip the review cycle.
    pub fn can_link_transition_to(&self, next: ItemStatus) -> bool {
        matches!(
            (self, next),
            (Self::Draft, Self::Published) | (Self::Published, Self::Acknowledged)
        )
    }

    /// True once the item is on the ledger.
    pub fn is_published(&self) -> bool {
        matches!(self, Self::Published | Self::Acknowledged)
    }

    /// True while the item may still be removed.
    pub fn is_deletable(&self) -> bool {
        matches!(
            self,
            Self::Draft | Self::ReviewAccepted | Self::ReviewRejected
        )
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Draft => "DRAFT",
            Self::ReviewPending => "REVIEW_PENDING",
            Self::ReviewAccepted => "REVIEW_ACCEPTED",
            Self::ReviewRejected => "REVIEW_REJECTED",
            Self::Published => "PUBLISHED",
            Self::Acknowledged => "ACKNOWLEDGED",
        };
        f.write_str(name)
    }
}

// =============================================================================
// CLUSTER B: WIRE SHAPES SHARED BY BOTH SOURCES
// =============================================================================

/// Parameters of a collection LOC.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionParams {
    /// Last block at which items may be added.
    pub last_block_submission: Option<u64>,
    /// Maximum number of items.
    pub max_size: Option<u32>,
    /// Whether items may carry files.
    pub can_upload: bool,
}

/// Token bound to a collection item, in wire form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemToken {
    /// Token type tag (e.g. `ethereum_erc721`).
    #[serde(rename = "type")]
    pub token_type: String,
    /// Type-specific identifier.
    pub id: String,
    /// Number of tokens issued.
    pub issuance: u64,
}

/// Terms-and-conditions element, in wire form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermsRecord {
    /// Type tag.
    #[serde(rename = "type")]
    pub tc_type: String,
    /// LOC providing the legal basis.
    pub tc_loc: LocId,
    /// Type-dependent payload.
    pub details: String,
}

/// Void information tracked by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoidInfo {
    /// Reason given by the legal officer.
    pub reason: String,
    /// When the LOC was voided.
    pub voided_on: Option<DateTime<Utc>>,
    /// LOC replacing the voided one.
    pub replacer: Option<LocId>,
}

// =============================================================================
// CLUSTER C: BACKEND (OFF-CHAIN) RECORDS
// =============================================================================

/// A file attached to a LOC request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocFile {
    /// Content hash.
    pub hash: Hash,
    /// Human-readable file name.
    pub name: String,
    /// Nature of the file (hashed on-chain).
    pub nature: String,
    /// Content size in bytes.
    pub size: u64,
    /// MIME type.
    pub content_type: Option<String>,
    /// Account that added the file.
    pub submitter: AccountId,
    /// Review status.
    pub status: ItemStatus,
    /// Reason given on review rejection.
    pub reject_reason: Option<String>,
    /// When the file was added.
    pub added_on: Option<DateTime<Utc>>,
}

/// A metadata entry attached to a LOC request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocMetadataItem {
    /// Name (hashed on-chain).
    pub name: String,
    /// Value (hashed on-chain).
    pub value: String,
    /// Account that added the entry.
    pub submitter: AccountId,
    /// Review status.
    pub status: ItemStatus,
    /// Reason given on review rejection.
    pub reject_reason: Option<String>,
    /// When the entry was added.
    pub added_on: Option<DateTime<Utc>>,
}

impl LocMetadataItem {
    /// Hash of the name, the on-chain key of the entry.
    pub fn name_hash(&self) -> Hash {
        Hash::of_str(&self.name)
    }
}

/// A link from one LOC to another.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocLink {
    /// Linked LOC.
    pub target: LocId,
    /// Nature of the link (hashed on-chain).
    pub nature: String,
    /// Account that added the link.
    pub submitter: AccountId,
    /// DRAFT, PUBLISHED or ACKNOWLEDGED.
    pub status: ItemStatus,
    /// When the link was added.
    pub added_on: Option<DateTime<Utc>>,
}

/// A LOC as known to the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocRequest {
    /// LOC identifier.
    pub id: LocId,
    /// Legal officer owning the LOC.
    pub owner: AccountId,
    /// Requester account; absent for identity-less LOCs.
    pub requester: Option<AccountId>,
    /// Identity LOC standing for the requester when no account is given.
    pub requester_loc_id: Option<LocId>,
    /// Free-text description.
    pub description: String,
    /// Kind of LOC.
    pub loc_type: LocType,
    /// Lifecycle status.
    pub status: LocRequestStatus,
    /// Creation time.
    pub created_on: DateTime<Utc>,
    /// Accept/reject decision time.
    pub decision_on: Option<DateTime<Utc>>,
    /// Closing time.
    pub closed_on: Option<DateTime<Utc>>,
    /// Reason given on rejection.
    pub reject_reason: Option<String>,
    /// Present once voided.
    pub void_info: Option<VoidInfo>,
    /// Identity seal set at closing.
    pub seal: Option<Hash>,
    /// Template the request was built from.
    pub template: Option<String>,
    /// Sponsorship paying for the ledger creation.
    pub sponsorship_id: Option<Uuid>,
    /// Attached files.
    #[serde(default)]
    pub files: Vec<LocFile>,
    /// Attached metadata.
    #[serde(default)]
    pub metadata: Vec<LocMetadataItem>,
    /// Attached links.
    #[serde(default)]
    pub links: Vec<LocLink>,
    /// Collection parameters (collection LOCs only).
    pub collection: Option<CollectionParams>,
}

/// Off-chain description of a collection item file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemFileRecord {
    /// Content hash.
    pub hash: Hash,
    /// File name.
    pub name: String,
    /// MIME type.
    pub content_type: String,
    /// Declared size.
    pub size: u64,
    /// True once the content reached the backend.
    pub uploaded: bool,
}

/// Off-chain companion of a collection item ("public data").
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionItemRecord {
    /// Collection LOC.
    pub collection_loc_id: LocId,
    /// Item identifier.
    pub item_id: Hash,
    /// Clear-text description.
    pub description: String,
    /// Files with their upload status.
    #[serde(default)]
    pub files: Vec<ItemFileRecord>,
    /// Bound token.
    pub token: Option<ItemToken>,
    /// Terms-and-conditions elements.
    #[serde(default)]
    pub terms_and_conditions: Vec<TermsRecord>,
    /// When the ledger confirmed the item.
    pub added_on: Option<DateTime<Utc>>,
}

/// Off-chain companion of a tokens record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokensRecordRecord {
    /// Collection LOC.
    pub collection_loc_id: LocId,
    /// Record identifier.
    pub record_id: Hash,
    /// Clear-text description.
    pub description: String,
    /// Files with their upload status.
    #[serde(default)]
    pub files: Vec<ItemFileRecord>,
    /// When the ledger confirmed the record.
    pub added_on: Option<DateTime<Utc>>,
}

/// Issuer known to the backend for a LOC.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuerRecord {
    /// Issuer account.
    pub address: AccountId,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Identity LOC of the issuer.
    pub identity_loc_id: Option<LocId>,
}

// =============================================================================
// CLUSTER D: LEDGER (ON-CHAIN) RECORDS
// =============================================================================

/// A file as stored on the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainFile {
    /// Content hash.
    pub hash: Hash,
    /// Hash of the nature.
    pub nature: Hash,
    /// Size in bytes.
    pub size: u64,
    /// Submitter.
    pub submitter: AccountId,
    /// Acknowledged by the owner.
    pub acknowledged_by_owner: bool,
    /// Acknowledged by a selected issuer.
    pub acknowledged_by_verified_issuer: bool,
}

/// A metadata entry as stored on the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainMetadataItem {
    /// Hash of the name.
    pub name: Hash,
    /// Hash of the value.
    pub value: Hash,
    /// Submitter.
    pub submitter: AccountId,
    /// Acknowledged by the owner.
    pub acknowledged_by_owner: bool,
    /// Acknowledged by a selected issuer.
    pub acknowledged_by_verified_issuer: bool,
}

/// A link as stored on the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainLink {
    /// Linked LOC.
    pub target: LocId,
    /// Hash of the nature.
    pub nature: Hash,
    /// Submitter.
    pub submitter: AccountId,
    /// Acknowledged by the owner.
    pub acknowledged_by_owner: bool,
}

/// Void information as stored on the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainVoidInfo {
    /// LOC replacing the voided one.
    pub replacer: Option<LocId>,
}

/// A LOC as known to the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalOfficerCase {
    /// LOC identifier.
    pub id: LocId,
    /// Legal officer.
    pub owner: AccountId,
    /// Requester account.
    pub requester: Option<AccountId>,
    /// Requester identity LOC.
    pub requester_loc_id: Option<LocId>,
    /// Kind of LOC.
    pub loc_type: LocType,
    /// True once closed.
    pub closed: bool,
    /// Identity seal.
    pub seal: Option<Hash>,
    /// Present once voided.
    pub void_info: Option<ChainVoidInfo>,
    /// Published files.
    pub files: Vec<ChainFile>,
    /// Published metadata.
    pub metadata: Vec<ChainMetadataItem>,
    /// Published links.
    pub links: Vec<ChainLink>,
    /// Collection parameters.
    pub collection: Option<CollectionParams>,
    /// Sponsorship used at creation.
    pub sponsorship_id: Option<Uuid>,
}

/// A collection item file as stored on the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainItemFile {
    /// Content hash.
    pub hash: Hash,
    /// Declared size.
    pub size: u64,
}

/// A collection item as stored on the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainCollectionItem {
    /// Item identifier.
    pub id: Hash,
    /// Hash of the description.
    pub description: Hash,
    /// Files.
    pub files: Vec<ChainItemFile>,
    /// Bound token.
    pub token: Option<ItemToken>,
    /// Delivery restricted to token owners.
    pub restricted_delivery: bool,
    /// Terms-and-conditions elements.
    pub terms_and_conditions: Vec<TermsRecord>,
}

/// A tokens record as stored on the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainTokensRecord {
    /// Record identifier.
    pub id: Hash,
    /// Hash of the description.
    pub description: Hash,
    /// Files.
    pub files: Vec<ChainItemFile>,
    /// Submitter.
    pub submitter: AccountId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_status_forward_only() {
        assert!(ItemStatus::Draft.can_transition_to(ItemStatus::ReviewPending));
        assert!(ItemStatus::ReviewPending.can_transition_to(ItemStatus::ReviewRejected));
        assert!(ItemStatus::ReviewAccepted.can_transition_to(ItemStatus::Published));
        assert!(ItemStatus::Published.can_transition_to(ItemStatus::Acknowledged));

        assert!(!ItemStatus::ReviewRejected.can_transition_to(ItemStatus::ReviewAccepted));
        assert!(!ItemStatus::ReviewRejected.can_transition_to(ItemStatus::Draft));
        assert!(!ItemStatus::Acknowledged.can_transition_to(ItemStatus::Published));
    }

    #[test]
    fn test_link_status_skips_review() {
        assert!(ItemStatus::Draft.can_link_transition_to(ItemStatus::Published));
        assert!(!ItemStatus::Draft.can_link_transition_to(ItemStatus::ReviewPending));
    }

    #[test]
    fn test_deletable_statuses() {
        assert!(ItemStatus::ReviewRejected.is_deletable());
        assert!(!ItemStatus::ReviewPending.is_deletable());
        assert!(!ItemStatus::Published.is_deletable());
    }

    #[test]
    fn test_status_wire_names() {
        let json = serde_json::to_string(&LocRequestStatus::ReviewPending).unwrap();
        assert_eq!(json, "\"REVIEW_PENDING\"");
        assert_eq!(ItemStatus::ReviewRejected.to_string(), "REVIEW_REJECTED");
    }

    #[test]
    fn test_on_chain_statuses() {
        assert!(LocRequestStatus::Open.is_on_chain());
        assert!(LocRequestStatus::Closed.is_on_chain());
        assert!(!LocRequestStatus::ReviewAccepted.is_on_chain());
    }
}
