//! # Outbound Ports
//!
//! The two collaborators every LOC operation talks to: the ledger and the
//! backend of one legal-officer node.

use crate::domain::{
    AddFileParams, AddLinkParams, AddMetadataParams, CollectionItemAnnouncement, CreateLocRequest,
    FileUpload, ItemRef, LocRequestFilter, ReviewDecision, TokensRecordAnnouncement, VoidRequest,
};
use async_trait::async_trait;
use loc_03_aggregator::Source;
use serde::{Deserialize, Serialize};
use shared_types::{
    AccountId, ChainCollectionItem, ChainFile, ChainItemFile, ChainLink, ChainMetadataItem,
    ChainTokensRecord, CollectionItemRecord, CollectionParams, Hash, IssuerRecord, ItemToken,
    LegalOfficerCase, LocError, LocId, LocRequest, LocType, TermsRecord, TokensRecordRecord,
};
use uuid::Uuid;

// =============================================================================
// LEDGER
// =============================================================================

/// Items published together with the LOC creation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitialItems {
    /// Metadata entries.
    pub metadata: Vec<ChainMetadataItem>,
    /// Files.
    pub files: Vec<ChainFile>,
    /// Links.
    pub links: Vec<ChainLink>,
}

impl InitialItems {
    /// True when nothing is published at creation.
    pub fn is_empty(&self) -> bool {
        self.metadata.is_empty() && self.files.is_empty() && self.links.is_empty()
    }
}

/// A ledger extrinsic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerCall {
    /// Create the LOC on the ledger (at open).
    CreateLoc {
        /// LOC identifier.
        loc_id: LocId,
        /// Kind of LOC.
        loc_type: LocType,
        /// Legal officer.
        owner: AccountId,
        /// Requester account.
        requester: Option<AccountId>,
        /// Requester identity LOC.
        requester_loc_id: Option<LocId>,
        /// Collection parameters for collection LOCs.
        collection: Option<CollectionParams>,
        /// Sponsorship.
        sponsorship_id: Option<Uuid>,
        /// Items published at creation.
        items: InitialItems,
    },
    /// Publish a metadata entry.
    AddMetadata {
        /// LOC identifier.
        loc_id: LocId,
        /// Entry.
        item: ChainMetadataItem,
    },
    /// Publish a file.
    AddFile {
        /// LOC identifier.
        loc_id: LocId,
        /// File.
        file: ChainFile,
    },
    /// Publish a link.
    AddLink {
        /// LOC identifier.
        loc_id: LocId,
        /// Link.
        link: ChainLink,
    },
    /// Acknowledge a metadata entry.
    AcknowledgeMetadata {
        /// LOC identifier.
        loc_id: LocId,
        /// Name hash.
        name: Hash,
    },
    /// Acknowledge a file.
    AcknowledgeFile {
        /// LOC identifier.
        loc_id: LocId,
        /// Content hash.
        hash: Hash,
    },
    /// Acknowledge a link.
    AcknowledgeLink {
        /// LOC identifier.
        loc_id: LocId,
        /// Linked LOC.
        target: LocId,
    },
    /// Close the LOC.
    Close {
        /// LOC identifier.
        loc_id: LocId,
        /// Identity seal.
        seal: Option<Hash>,
        /// Acknowledge every published item on the way.
        auto_ack: bool,
    },
    /// Void the LOC.
    MakeVoid {
        /// LOC identifier.
        loc_id: LocId,
        /// Replacing LOC.
        replacer: Option<LocId>,
    },
    /// Add an item to a closed collection.
    AddCollectionItem {
        /// Collection LOC.
        collection_loc_id: LocId,
        /// Item identifier.
        item_id: Hash,
        /// Description hash.
        description: Hash,
        /// Files.
        files: Vec<ChainItemFile>,
        /// Bound token.
        token: Option<ItemToken>,
        /// Delivery restricted to token owners.
        restricted_delivery: bool,
        /// Terms-and-conditions elements.
        terms_and_conditions: Vec<TermsRecord>,
    },
    /// Add a tokens record to a closed collection.
    AddTokensRecord {
        /// Collection LOC.
        collection_loc_id: LocId,
        /// Record identifier.
        record_id: Hash,
        /// Description hash.
        description: Hash,
        /// Files.
        files: Vec<ChainItemFile>,
    },
    /// Select or unselect a verified issuer.
    SetIssuerSelection {
        /// LOC identifier.
        loc_id: LocId,
        /// Issuer.
        issuer: AccountId,
        /// New selection.
        selected: bool,
    },
}

impl LedgerCall {
    /// Extrinsic name, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            LedgerCall::CreateLoc { .. } => "create_loc",
            LedgerCall::AddMetadata { .. } => "add_metadata",
            LedgerCall::AddFile { .. } => "add_file",
            LedgerCall::AddLink { .. } => "add_link",
            LedgerCall::AcknowledgeMetadata { .. } => "acknowledge_metadata",
            LedgerCall::AcknowledgeFile { .. } => "acknowledge_file",
            LedgerCall::AcknowledgeLink { .. } => "acknowledge_link",
            LedgerCall::Close { .. } => "close",
            LedgerCall::MakeVoid { .. } => "make_void",
            LedgerCall::AddCollectionItem { .. } => "add_collection_item",
            LedgerCall::AddTokensRecord { .. } => "add_tokens_record",
            LedgerCall::SetIssuerSelection { .. } => "set_issuer_selection",
        }
    }

    /// LOC the call applies to.
    pub fn loc_id(&self) -> LocId {
        match self {
            LedgerCall::CreateLoc { loc_id, .. }
            | LedgerCall::AddMetadata { loc_id, .. }
            | LedgerCall::AddFile { loc_id, .. }
            | LedgerCall::AddLink { loc_id, .. }
            | LedgerCall::AcknowledgeMetadata { loc_id, .. }
            | LedgerCall::AcknowledgeFile { loc_id, .. }
            | LedgerCall::AcknowledgeLink { loc_id, .. }
            | LedgerCall::Close { loc_id, .. }
            | LedgerCall::MakeVoid { loc_id, .. }
            | LedgerCall::SetIssuerSelection { loc_id, .. } => *loc_id,
            LedgerCall::AddCollectionItem {
                collection_loc_id, ..
            }
            | LedgerCall::AddTokensRecord {
                collection_loc_id, ..
            } => *collection_loc_id,
        }
    }
}

/// Outcome of a finalized extrinsic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionResult {
    /// Block including the extrinsic.
    pub block_hash: Hash,
    /// Number of that block.
    pub block_number: u64,
    /// Emitted event names.
    pub events: Vec<String>,
}

/// Ledger transaction and query layer - outbound port.
///
/// Signing, fees and finality tracking stay behind this trait.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Submit `call` signed by `signer`; resolves once finalized.
    async fn submit(
        &self,
        call: LedgerCall,
        signer: &AccountId,
    ) -> Result<TransactionResult, LocError>;

    /// LOC as known to the ledger.
    async fn query_loc(&self, loc_id: &LocId) -> Result<Option<LegalOfficerCase>, LocError>;

    /// One collection item.
    async fn query_collection_item(
        &self,
        collection_loc_id: &LocId,
        item_id: &Hash,
    ) -> Result<Option<ChainCollectionItem>, LocError>;

    /// Every item of a collection, in insertion order.
    async fn query_collection_items(
        &self,
        collection_loc_id: &LocId,
    ) -> Result<Vec<ChainCollectionItem>, LocError>;

    /// Number of items in a collection.
    async fn query_collection_size(&self, collection_loc_id: &LocId) -> Result<u32, LocError>;

    /// One tokens record.
    async fn query_tokens_record(
        &self,
        collection_loc_id: &LocId,
        record_id: &Hash,
    ) -> Result<Option<ChainTokensRecord>, LocError>;

    /// Every tokens record of a collection, in insertion order.
    async fn query_tokens_records(
        &self,
        collection_loc_id: &LocId,
    ) -> Result<Vec<ChainTokensRecord>, LocError>;

    /// Issuers whose selection the ledger confirmed.
    async fn query_selected_issuers(&self, loc_id: &LocId) -> Result<Vec<AccountId>, LocError>;

    /// Current best block.
    async fn best_block_number(&self) -> Result<u64, LocError>;
}

// =============================================================================
// BACKEND
// =============================================================================

/// One authenticated session on one legal-officer node - outbound port.
///
/// The node's `source_id` identifies it in aggregated failures.
#[async_trait]
pub trait LocBackend: Source {
    /// Legal officer operating the node.
    fn legal_officer(&self) -> &AccountId;

    /// Create a LOC request.
    async fn create_request(&self, request: &CreateLocRequest) -> Result<LocRequest, LocError>;

    /// Request by id, `None` when this node does not know it.
    async fn find_request(&self, loc_id: &LocId) -> Result<Option<LocRequest>, LocError>;

    /// Request by id.
    async fn fetch_request(&self, loc_id: &LocId) -> Result<LocRequest, LocError> {
        self.find_request(loc_id)
            .await?
            .ok_or_else(|| LocError::NotFound(format!("LOC request {}", loc_id)))
    }

    /// Requests visible to the session and matching `filter`.
    async fn list_requests(&self, filter: &LocRequestFilter) -> Result<Vec<LocRequest>, LocError>;

    /// Draft → pending.
    async fn submit_request(&self, loc_id: &LocId) -> Result<(), LocError>;

    /// Withdraw the request.
    async fn cancel_request(&self, loc_id: &LocId) -> Result<(), LocError>;

    /// Rejected → draft.
    async fn rework_request(&self, loc_id: &LocId) -> Result<(), LocError>;

    /// Pending → accepted.
    async fn accept_request(&self, loc_id: &LocId) -> Result<(), LocError>;

    /// Pending → rejected.
    async fn reject_request(&self, loc_id: &LocId, reason: &str) -> Result<(), LocError>;

    /// Accepted → open, once the ledger has the LOC.
    async fn open_request(&self, loc_id: &LocId) -> Result<(), LocError>;

    /// Open → closed, once the ledger closed the LOC.
    async fn close_request(&self, loc_id: &LocId, seal: Option<Hash>) -> Result<(), LocError>;

    /// Record voiding, once the ledger voided the LOC.
    async fn void_request(&self, loc_id: &LocId, void: &VoidRequest) -> Result<(), LocError>;

    /// Add a draft metadata entry.
    async fn add_metadata(&self, loc_id: &LocId, params: &AddMetadataParams)
        -> Result<(), LocError>;

    /// Upload a draft file.
    async fn add_file(&self, loc_id: &LocId, params: &AddFileParams) -> Result<(), LocError>;

    /// Add a draft link.
    async fn add_link(&self, loc_id: &LocId, params: &AddLinkParams) -> Result<(), LocError>;

    /// Remove a deletable item.
    async fn delete_item(&self, loc_id: &LocId, item: &ItemRef) -> Result<(), LocError>;

    /// Draft → review pending.
    async fn request_review(&self, loc_id: &LocId, item: &ItemRef) -> Result<(), LocError>;

    /// Review pending → accepted or rejected.
    async fn review_item(
        &self,
        loc_id: &LocId,
        item: &ItemRef,
        decision: &ReviewDecision,
    ) -> Result<(), LocError>;

    /// Record publication, once the ledger has the item.
    async fn confirm_item(&self, loc_id: &LocId, item: &ItemRef) -> Result<(), LocError>;

    /// Record acknowledgement, once the ledger has it.
    async fn confirm_acknowledged(&self, loc_id: &LocId, item: &ItemRef) -> Result<(), LocError>;

    /// Announce a collection item before its ledger submission.
    async fn create_collection_item(
        &self,
        collection_loc_id: &LocId,
        item: &CollectionItemAnnouncement,
    ) -> Result<(), LocError>;

    /// Withdraw an announced collection item.
    async fn delete_collection_item(
        &self,
        collection_loc_id: &LocId,
        item_id: &Hash,
    ) -> Result<(), LocError>;

    /// Collection item companion record.
    async fn find_collection_item(
        &self,
        collection_loc_id: &LocId,
        item_id: &Hash,
    ) -> Result<Option<CollectionItemRecord>, LocError>;

    /// Every collection item companion record.
    async fn list_collection_items(
        &self,
        collection_loc_id: &LocId,
    ) -> Result<Vec<CollectionItemRecord>, LocError>;

    /// Upload the content of a collection item file.
    async fn upload_collection_item_file(
        &self,
        collection_loc_id: &LocId,
        item_id: &Hash,
        upload: &FileUpload,
    ) -> Result<(), LocError>;

    /// Announce a tokens record before its ledger submission.
    async fn create_tokens_record(
        &self,
        collection_loc_id: &LocId,
        record: &TokensRecordAnnouncement,
    ) -> Result<(), LocError>;

    /// Withdraw an announced tokens record.
    async fn delete_tokens_record(
        &self,
        collection_loc_id: &LocId,
        record_id: &Hash,
    ) -> Result<(), LocError>;

    /// Tokens record companion record.
    async fn find_tokens_record(
        &self,
        collection_loc_id: &LocId,
        record_id: &Hash,
    ) -> Result<Option<TokensRecordRecord>, LocError>;

    /// Every tokens record companion record.
    async fn list_tokens_records(
        &self,
        collection_loc_id: &LocId,
    ) -> Result<Vec<TokensRecordRecord>, LocError>;

    /// Upload the content of a tokens record file.
    async fn upload_tokens_record_file(
        &self,
        collection_loc_id: &LocId,
        record_id: &Hash,
        upload: &FileUpload,
    ) -> Result<(), LocError>;

    /// Issuers the backend knows as selected for the LOC.
    async fn list_issuers(&self, loc_id: &LocId) -> Result<Vec<IssuerRecord>, LocError>;

    /// Record an issuer selection, once the ledger has it.
    async fn set_issuer_selection(
        &self,
        loc_id: &LocId,
        issuer: &AccountId,
        selected: bool,
    ) -> Result<(), LocError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_names_and_targets() {
        let loc_id = LocId::new_random();
        let call = LedgerCall::Close {
            loc_id,
            seal: None,
            auto_ack: true,
        };
        assert_eq!(call.name(), "close");
        assert_eq!(call.loc_id(), loc_id);

        let call = LedgerCall::AddTokensRecord {
            collection_loc_id: loc_id,
            record_id: Hash::of_str("r"),
            description: Hash::of_str("d"),
            files: Vec::new(),
        };
        assert_eq!(call.loc_id(), loc_id);
    }
}
