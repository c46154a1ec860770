//! # Transition Parameters

use loc_01_content_addressing::ItemFileWithContent;
use loc_02_terms_validation::TermsAndConditionsElement;
use shared_types::{AccountId, Hash, ItemToken, LocId, LocType};
use uuid::Uuid;

/// A new LOC request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestParams {
    /// Legal officer the request is addressed to.
    pub legal_officer: AccountId,
    /// Kind of LOC.
    pub loc_type: LocType,
    /// Description.
    pub description: String,
    /// Keep the request as a draft instead of submitting it.
    pub draft: bool,
    /// Identity LOC of a requester without account.
    pub requester_loc_id: Option<LocId>,
    /// Template.
    pub template: Option<String>,
    /// Sponsorship.
    pub sponsorship_id: Option<Uuid>,
}

impl RequestParams {
    /// Submitted request with no optional data.
    pub fn new(legal_officer: AccountId, loc_type: LocType, description: impl Into<String>) -> Self {
        Self {
            legal_officer,
            loc_type,
            description: description.into(),
            draft: false,
            requester_loc_id: None,
            template: None,
            sponsorship_id: None,
        }
    }

    /// Keep as draft.
    pub fn as_draft(mut self) -> Self {
        self.draft = true;
        self
    }
}

/// Opening options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OpenParams {
    /// Publish accepted items; `None` uses the client default.
    pub auto_publish: Option<bool>,
}

/// Closing options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CloseParams {
    /// Identity seal.
    pub seal: Option<Hash>,
    /// Acknowledge published items; `None` uses the client default.
    pub auto_ack: Option<bool>,
}

/// Voiding options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoidParams {
    /// Reason, kept off-chain.
    pub reason: String,
    /// LOC replacing the voided one.
    pub replacer: Option<LocId>,
}

impl VoidParams {
    /// Void without replacement.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            replacer: None,
        }
    }

    /// Void in favor of `replacer`.
    pub fn replaced_by(mut self, replacer: LocId) -> Self {
        self.replacer = Some(replacer);
        self
    }
}

/// A file added to a LOC. Its content is required.
#[derive(Clone, Debug)]
pub struct LocFileParams {
    /// Nature of the file.
    pub nature: String,
    /// Name, type and content.
    pub file: ItemFileWithContent,
}

/// A new collection item.
#[derive(Clone, Debug)]
pub struct CollectionItemParams {
    /// Item identifier.
    pub item_id: Hash,
    /// Clear-text description.
    pub description: String,
    /// Files; content is uploaded when present.
    pub files: Vec<ItemFileWithContent>,
    /// Bound token.
    pub token: Option<ItemToken>,
    /// Delivery restricted to token owners.
    pub restricted_delivery: bool,
    /// Terms and conditions.
    pub terms_and_conditions: Vec<TermsAndConditionsElement>,
}

impl CollectionItemParams {
    /// Item with a description only.
    pub fn new(item_id: Hash, description: impl Into<String>) -> Self {
        Self {
            item_id,
            description: description.into(),
            files: Vec::new(),
            token: None,
            restricted_delivery: false,
            terms_and_conditions: Vec::new(),
        }
    }
}

/// A new tokens record.
#[derive(Clone, Debug)]
pub struct TokensRecordParams {
    /// Record identifier.
    pub record_id: Hash,
    /// Clear-text description.
    pub description: String,
    /// Files, at least one.
    pub files: Vec<ItemFileWithContent>,
}
