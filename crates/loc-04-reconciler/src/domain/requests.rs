//! # Backend Request Parameters

use serde::{Deserialize, Serialize};
use shared_types::{AccountId, Hash, ItemToken, LocId, LocRequestStatus, LocType, TermsRecord};
use std::fmt;
use uuid::Uuid;

/// New LOC request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLocRequest {
    /// Legal officer the request is addressed to.
    pub owner: AccountId,
    /// Requester account; `None` for identity-less LOCs.
    pub requester: Option<AccountId>,
    /// Requester identity LOC.
    pub requester_loc_id: Option<LocId>,
    /// Description.
    pub description: String,
    /// Kind of LOC.
    pub loc_type: LocType,
    /// Create as draft instead of submitting.
    pub draft: bool,
    /// Template.
    pub template: Option<String>,
    /// Sponsorship.
    pub sponsorship_id: Option<Uuid>,
}

/// Criteria for listing LOC requests. Empty fields match everything.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocRequestFilter {
    /// Requester account.
    pub requester: Option<AccountId>,
    /// Owner account.
    pub owner: Option<AccountId>,
    /// Accepted statuses.
    pub statuses: Vec<LocRequestStatus>,
    /// Accepted kinds.
    pub loc_types: Vec<LocType>,
}

impl LocRequestFilter {
    /// Requests involving `account` as requester.
    pub fn by_requester(account: AccountId) -> Self {
        Self {
            requester: Some(account),
            ..Self::default()
        }
    }

    /// Requests owned by `account`.
    pub fn by_owner(account: AccountId) -> Self {
        Self {
            owner: Some(account),
            ..Self::default()
        }
    }

    /// True when `request` satisfies every set criterion.
    pub fn matches(&self, request: &shared_types::LocRequest) -> bool {
        self.requester
            .as_ref()
            .map_or(true, |r| request.requester.as_ref() == Some(r))
            && self.owner.as_ref().map_or(true, |o| &request.owner == o)
            && (self.statuses.is_empty() || self.statuses.contains(&request.status))
            && (self.loc_types.is_empty() || self.loc_types.contains(&request.loc_type))
    }
}

/// New metadata entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddMetadataParams {
    /// Name.
    pub name: String,
    /// Value.
    pub value: String,
}

/// File content sent to the backend, with its precomputed hash.
#[derive(Clone, PartialEq, Eq)]
pub struct FileUpload {
    /// Content hash, verified server-side.
    pub hash: Hash,
    /// File name.
    pub name: String,
    /// MIME type.
    pub content_type: String,
    /// Content size.
    pub size: u64,
    /// Raw content.
    pub content: Vec<u8>,
}

impl fmt::Debug for FileUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileUpload")
            .field("hash", &self.hash)
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("size", &self.size)
            .finish()
    }
}

/// New LOC file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddFileParams {
    /// Nature.
    pub nature: String,
    /// Content.
    pub upload: FileUpload,
}

/// New link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddLinkParams {
    /// Linked LOC.
    pub target: LocId,
    /// Nature.
    pub nature: String,
}

/// Backend void request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoidRequest {
    /// Reason.
    pub reason: String,
    /// Replacing LOC.
    pub replacer_loc_id: Option<LocId>,
}

/// Key of an item inside a LOC.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemRef {
    /// File by content hash.
    File(Hash),
    /// Metadata entry by name hash.
    Metadata(Hash),
    /// Link by target.
    Link(LocId),
}

impl ItemRef {
    /// Metadata entry by clear-text name.
    pub fn metadata(name: &str) -> Self {
        ItemRef::Metadata(Hash::of_str(name))
    }

    /// Path segment of the item collection.
    pub fn kind(&self) -> &'static str {
        match self {
            ItemRef::File(_) => "files",
            ItemRef::Metadata(_) => "metadata",
            ItemRef::Link(_) => "links",
        }
    }

    /// Path segment of the key.
    pub fn key(&self) -> String {
        match self {
            ItemRef::File(hash) | ItemRef::Metadata(hash) => hash.to_hex(),
            ItemRef::Link(target) => target.to_string(),
        }
    }
}

impl fmt::Display for ItemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind(), self.key())
    }
}

/// Legal officer decision on an item review.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "UPPERCASE")]
pub enum ReviewDecision {
    /// Accept the item.
    Accept,
    /// Reject the item with a reason.
    Reject {
        /// Reason shown to the submitter.
        #[serde(rename = "rejectReason")]
        reason: String,
    },
}

/// Public data of a collection item or tokens record file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemFileDescription {
    /// Content hash.
    pub hash: Hash,
    /// File name.
    pub name: String,
    /// MIME type.
    pub content_type: String,
    /// Declared size.
    pub size: u64,
}

/// Public data announced before a collection item reaches the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionItemAnnouncement {
    /// Item identifier.
    pub item_id: Hash,
    /// Clear-text description.
    pub description: String,
    /// Files.
    pub files: Vec<ItemFileDescription>,
    /// Bound token.
    pub token: Option<ItemToken>,
    /// Terms-and-conditions elements.
    pub terms_and_conditions: Vec<TermsRecord>,
}

/// Public data announced before a tokens record reaches the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokensRecordAnnouncement {
    /// Record identifier.
    pub record_id: Hash,
    /// Clear-text description.
    pub description: String,
    /// Files.
    pub files: Vec<ItemFileDescription>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_ref_paths() {
        let hash = Hash::of_str("x");
        assert_eq!(ItemRef::File(hash).to_string(), format!("files/{}", hash));
        assert_eq!(ItemRef::metadata("x"), ItemRef::Metadata(hash));
    }

    #[test]
    fn test_review_decision_wire_form() {
        let json = serde_json::to_string(&ReviewDecision::Reject {
            reason: "Because.".into(),
        })
        .unwrap();
        assert_eq!(json, r#"{"decision":"REJECT","rejectReason":"Because."}"#);
        let json = serde_json::to_string(&ReviewDecision::Accept).unwrap();
        assert_eq!(json, r#"{"decision":"ACCEPT"}"#);
    }

    #[test]
    fn test_upload_debug_omits_content() {
        let upload = FileUpload {
            hash: Hash::of_str("secret"),
            name: "a.txt".into(),
            content_type: "text/plain".into(),
            size: 6,
            content: b"secret".to_vec(),
        };
        assert!(!format!("{:?}", upload).contains("[115"));
    }
}
