//! # Merged LOC View
//!
//! One denormalized view of a LOC built from the backend request and, when
//! the LOC exists on the ledger, the ledger case.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{
    AccountId, CollectionParams, Hash, ItemStatus, LocFile, LocId, LocLink, LocMetadataItem,
    LocRequest, LocRequestStatus, LocType, VoidInfo,
};
use uuid::Uuid;

/// A file of the merged view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedFile {
    /// Content hash.
    pub hash: Hash,
    /// File name.
    pub name: String,
    /// Nature.
    pub nature: String,
    /// Size.
    pub size: u64,
    /// MIME type.
    pub content_type: Option<String>,
    /// Submitter.
    pub submitter: AccountId,
    /// Review status.
    pub status: ItemStatus,
    /// Reason given on review rejection.
    pub reject_reason: Option<String>,
    /// When the file was added.
    pub added_on: Option<DateTime<Utc>>,
    /// Acknowledged on the ledger by the owner.
    pub acknowledged_by_owner: bool,
    /// Acknowledged on the ledger by a selected issuer.
    pub acknowledged_by_verified_issuer: bool,
}

/// A metadata entry of the merged view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedMetadataItem {
    /// Name.
    pub name: String,
    /// Value.
    pub value: String,
    /// Submitter.
    pub submitter: AccountId,
    /// Review status.
    pub status: ItemStatus,
    /// Reason given on review rejection.
    pub reject_reason: Option<String>,
    /// When the entry was added.
    pub added_on: Option<DateTime<Utc>>,
    /// Acknowledged on the ledger by the owner.
    pub acknowledged_by_owner: bool,
    /// Acknowledged on the ledger by a selected issuer.
    pub acknowledged_by_verified_issuer: bool,
}

impl MergedMetadataItem {
    /// On-chain key of the entry.
    pub fn name_hash(&self) -> Hash {
        Hash::of_str(&self.name)
    }
}

/// A link of the merged view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedLink {
    /// Linked LOC.
    pub target: LocId,
    /// Nature.
    pub nature: String,
    /// Submitter.
    pub submitter: AccountId,
    /// Status.
    pub status: ItemStatus,
    /// When the link was added.
    pub added_on: Option<DateTime<Utc>>,
    /// Acknowledged on the ledger by the owner.
    pub acknowledged_by_owner: bool,
}

/// Merged view of a LOC.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocData {
    /// LOC identifier.
    pub id: LocId,
    /// Legal officer.
    pub owner: AccountId,
    /// Requester account.
    pub requester: Option<AccountId>,
    /// Requester identity LOC.
    pub requester_loc_id: Option<LocId>,
    /// Description.
    pub description: String,
    /// Kind of LOC.
    pub loc_type: LocType,
    /// Lifecycle status.
    pub status: LocRequestStatus,
    /// Creation time.
    pub created_on: DateTime<Utc>,
    /// Decision time.
    pub decision_on: Option<DateTime<Utc>>,
    /// Closing time.
    pub closed_on: Option<DateTime<Utc>>,
    /// Rejection reason.
    pub reject_reason: Option<String>,
    /// Void information.
    pub void_info: Option<VoidInfo>,
    /// Identity seal.
    pub seal: Option<Hash>,
    /// Template.
    pub template: Option<String>,
    /// Sponsorship.
    pub sponsorship_id: Option<Uuid>,
    /// Files.
    pub files: Vec<MergedFile>,
    /// Metadata.
    pub metadata: Vec<MergedMetadataItem>,
    /// Links.
    pub links: Vec<MergedLink>,
    /// Collection parameters.
    pub collection: Option<CollectionParams>,
    /// True when the ledger knows the LOC.
    pub on_chain: bool,
}

impl LocData {
    /// True once voided.
    pub fn is_voided(&self) -> bool {
        self.void_info.is_some()
    }

    /// True for the requester of the LOC.
    pub fn is_requester(&self, account: &AccountId) -> bool {
        self.requester.as_ref() == Some(account)
    }

    /// True for the owner of the LOC.
    pub fn is_owner(&self, account: &AccountId) -> bool {
        &self.owner == account
    }

    /// Account acting for the requester side: the requester, or the owner
    /// when the LOC has no requester account.
    pub fn requester_side(&self) -> &AccountId {
        self.requester.as_ref().unwrap_or(&self.owner)
    }

    /// File by hash.
    pub fn file(&self, hash: &Hash) -> Option<&MergedFile> {
        self.files.iter().find(|f| &f.hash == hash)
    }

    /// Metadata entry by name.
    pub fn metadata_item(&self, name: &str) -> Option<&MergedMetadataItem> {
        self.metadata.iter().find(|m| m.name == name)
    }

    /// Link by target.
    pub fn link(&self, target: &LocId) -> Option<&MergedLink> {
        self.links.iter().find(|l| &l.target == target)
    }

    /// Backend form of the view.
    pub fn to_request(&self) -> LocRequest {
        LocRequest {
            id: self.id,
            owner: self.owner.clone(),
            requester: self.requester.clone(),
            requester_loc_id: self.requester_loc_id,
            description: self.description.clone(),
            loc_type: self.loc_type,
            status: self.status,
            created_on: self.created_on,
            decision_on: self.decision_on,
            closed_on: self.closed_on,
            reject_reason: self.reject_reason.clone(),
            void_info: self.void_info.clone(),
            seal: self.seal,
            template: self.template.clone(),
            sponsorship_id: self.sponsorship_id,
            files: self
                .files
                .iter()
                .map(|f| LocFile {
                    hash: f.hash,
                    name: f.name.clone(),
                    nature: f.nature.clone(),
                    size: f.size,
                    content_type: f.content_type.clone(),
                    submitter: f.submitter.clone(),
                    status: f.status,
                    reject_reason: f.reject_reason.clone(),
                    added_on: f.added_on,
                })
                .collect(),
            metadata: self
                .metadata
                .iter()
                .map(|m| LocMetadataItem {
                    name: m.name.clone(),
                    value: m.value.clone(),
                    submitter: m.submitter.clone(),
                    status: m.status,
                    reject_reason: m.reject_reason.clone(),
                    added_on: m.added_on,
                })
                .collect(),
            links: self
                .links
                .iter()
                .map(|l| LocLink {
                    target: l.target,
                    nature: l.nature.clone(),
                    submitter: l.submitter.clone(),
                    status: l.status,
                    added_on: l.added_on,
                })
                .collect(),
            collection: self.collection.clone(),
        }
    }
}
