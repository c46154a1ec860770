//! In-Memory Ledger Adapter
//!
//! Implements `LedgerClient` in process, enforcing the pallet rules a real
//! chain would: signer rights, closing, voiding and collection limits.

use crate::ports::outbound::{InitialItems, LedgerCall, LedgerClient, TransactionResult};
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{
    AccountId, ChainCollectionItem, ChainItemFile, ChainTokensRecord, ChainVoidInfo, Hash,
    LegalOfficerCase, LocError, LocId, LocType,
};
use std::collections::HashMap;
use tracing::{debug, info};

#[derive(Default)]
struct LedgerState {
    locs: HashMap<LocId, LegalOfficerCase>,
    collection_items: HashMap<LocId, Vec<ChainCollectionItem>>,
    tokens_records: HashMap<LocId, Vec<ChainTokensRecord>>,
    selected_issuers: HashMap<LocId, Vec<AccountId>>,
    best_block: u64,
    fail_next: Option<String>,
    submitted: Vec<LedgerCall>,
}

/// In-memory ledger for testing.
pub struct InMemoryLedger {
    state: RwLock<LedgerState>,
}

impl InMemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(LedgerState::default()),
        }
    }

    /// Reject the next submission with `message`.
    pub fn fail_next_submission(&self, message: impl Into<String>) {
        self.state.write().fail_next = Some(message.into());
    }

    /// Move the best block.
    pub fn set_best_block(&self, block: u64) {
        self.state.write().best_block = block;
    }

    /// Every successful call, in order.
    pub fn submitted(&self) -> Vec<LedgerCall> {
        self.state.read().submitted.clone()
    }

    /// Insert a LOC directly.
    pub fn insert_loc(&self, case: LegalOfficerCase) {
        self.state.write().locs.insert(case.id, case);
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

fn rejected(message: impl Into<String>) -> LocError {
    LocError::Ledger(message.into())
}

fn duplicate_file_hash(files: &[ChainItemFile]) -> bool {
    files
        .iter()
        .enumerate()
        .any(|(i, file)| files[..i].iter().any(|other| other.hash == file.hash))
}

impl LedgerState {
    fn loc(&self, loc_id: &LocId) -> Result<&LegalOfficerCase, LocError> {
        self.locs
            .get(loc_id)
            .ok_or_else(|| rejected(format!("LOC {} not found", loc_id)))
    }

    /// LOC accepting new items or acknowledgements.
    fn open_loc(&mut self, loc_id: &LocId) -> Result<&mut LegalOfficerCase, LocError> {
        let case = self
            .locs
            .get_mut(loc_id)
            .ok_or_else(|| rejected(format!("LOC {} not found", loc_id)))?;
        if case.void_info.is_some() {
            return Err(rejected("CannotMutateVoid"));
        }
        if case.closed {
            return Err(rejected("CannotMutate"));
        }
        Ok(case)
    }

    fn is_selected_issuer(&self, loc_id: &LocId, account: &AccountId) -> bool {
        self.selected_issuers
            .get(loc_id)
            .is_some_and(|issuers| issuers.contains(account))
    }

    /// Closed collection accepting new entries.
    fn closed_collection(&self, loc_id: &LocId) -> Result<&LegalOfficerCase, LocError> {
        let case = self.loc(loc_id)?;
        if case.loc_type != LocType::Collection {
            return Err(rejected("WrongCollectionLoc"));
        }
        if case.void_info.is_some() {
            return Err(rejected("CannotMutateVoid"));
        }
        if !case.closed {
            return Err(rejected("CollectionNotClosed"));
        }
        Ok(case)
    }

    fn apply(&mut self, call: &LedgerCall, signer: &AccountId) -> Result<(), LocError> {
        match call.clone() {
            LedgerCall::CreateLoc {
                loc_id,
                loc_type,
                owner,
                requester,
                requester_loc_id,
                collection,
                sponsorship_id,
                items: InitialItems {
                    metadata,
                    files,
                    links,
                },
            } => {
                if self.locs.contains_key(&loc_id) {
                    return Err(rejected("AlreadyExists"));
                }
                if signer != requester.as_ref().unwrap_or(&owner) && signer != &owner {
                    return Err(rejected("Unauthorized"));
                }
                if loc_type == LocType::Collection && collection.is_none() {
                    return Err(rejected("CollectionHasNoLimit"));
                }
                self.locs.insert(
                    loc_id,
                    LegalOfficerCase {
                        id: loc_id,
                        owner,
                        requester,
                        requester_loc_id,
                        loc_type,
                        closed: false,
                        seal: None,
                        void_info: None,
                        files,
                        metadata,
                        links,
                        collection,
                        sponsorship_id,
                    },
                );
            }
            LedgerCall::AddMetadata { loc_id, item } => {
                let case = self.open_loc(&loc_id)?;
                if case.metadata.iter().any(|m| m.name == item.name) {
                    return Err(rejected("DuplicateLocMetadata"));
                }
                if &item.submitter != signer && signer != &case.owner {
                    return Err(rejected("Unauthorized"));
                }
                case.metadata.push(item);
            }
            LedgerCall::AddFile { loc_id, file } => {
                let case = self.open_loc(&loc_id)?;
                if case.files.iter().any(|f| f.hash == file.hash) {
                    return Err(rejected("DuplicateLocFile"));
                }
                if &file.submitter != signer && signer != &case.owner {
                    return Err(rejected("Unauthorized"));
                }
                case.files.push(file);
            }
            LedgerCall::AddLink { loc_id, link } => {
                if !self.locs.contains_key(&link.target) {
                    return Err(rejected("LinkedLocNotFound"));
                }
                let case = self.open_loc(&loc_id)?;
                if case.links.iter().any(|l| l.target == link.target) {
                    return Err(rejected("DuplicateLocLink"));
                }
                case.links.push(link);
            }
            LedgerCall::AcknowledgeMetadata { loc_id, name } => {
                let issuer = self.is_selected_issuer(&loc_id, signer);
                let case = self.open_loc(&loc_id)?;
                let by_owner = signer == &case.owner;
                let item = case
                    .metadata
                    .iter_mut()
                    .find(|m| m.name == name)
                    .ok_or_else(|| rejected("ItemNotFound"))?;
                match (by_owner, issuer) {
                    (true, _) => item.acknowledged_by_owner = true,
                    (false, true) => item.acknowledged_by_verified_issuer = true,
                    _ => return Err(rejected("Unauthorized")),
                }
            }
            LedgerCall::AcknowledgeFile { loc_id, hash } => {
                let issuer = self.is_selected_issuer(&loc_id, signer);
                let case = self.open_loc(&loc_id)?;
                let by_owner = signer == &case.owner;
                let file = case
                    .files
                    .iter_mut()
                    .find(|f| f.hash == hash)
                    .ok_or_else(|| rejected("ItemNotFound"))?;
                match (by_owner, issuer) {
                    (true, _) => file.acknowledged_by_owner = true,
                    (false, true) => file.acknowledged_by_verified_issuer = true,
                    _ => return Err(rejected("Unauthorized")),
                }
            }
            LedgerCall::AcknowledgeLink { loc_id, target } => {
                let case = self.open_loc(&loc_id)?;
                if signer != &case.owner {
                    return Err(rejected("Unauthorized"));
                }
                let link = case
                    .links
                    .iter_mut()
                    .find(|l| l.target == target)
                    .ok_or_else(|| rejected("ItemNotFound"))?;
                link.acknowledged_by_owner = true;
            }
            LedgerCall::Close {
                loc_id,
                seal,
                auto_ack,
            } => {
                let case = self.open_loc(&loc_id)?;
                if signer != &case.owner {
                    return Err(rejected("Unauthorized"));
                }
                if auto_ack {
                    case.metadata
                        .iter_mut()
                        .for_each(|m| m.acknowledged_by_owner = true);
                    case.files
                        .iter_mut()
                        .for_each(|f| f.acknowledged_by_owner = true);
                    case.links
                        .iter_mut()
                        .for_each(|l| l.acknowledged_by_owner = true);
                }
                let unacknowledged = case.metadata.iter().any(|m| !m.acknowledged_by_owner)
                    || case.files.iter().any(|f| !f.acknowledged_by_owner)
                    || case.links.iter().any(|l| !l.acknowledged_by_owner);
                if unacknowledged {
                    return Err(rejected("CannotCloseUnacknowledged"));
                }
                case.closed = true;
                case.seal = seal;
            }
            LedgerCall::MakeVoid { loc_id, replacer } => {
                let case = self.loc(&loc_id)?;
                if signer != &case.owner {
                    return Err(rejected("Unauthorized"));
                }
                if case.void_info.is_some() {
                    return Err(rejected("AlreadyVoid"));
                }
                if let Some(replacer_id) = replacer {
                    if replacer_id == loc_id {
                        return Err(rejected("ReplacerLocIsSelf"));
                    }
                    let replacing = self
                        .locs
                        .get(&replacer_id)
                        .ok_or_else(|| rejected("ReplacerLocNotFound"))?;
                    if replacing.void_info.is_some() {
                        return Err(rejected("ReplacerLocAlreadyVoid"));
                    }
                    if replacing.loc_type != case.loc_type {
                        return Err(rejected("ReplacerLocWrongType"));
                    }
                }
                if let Some(case) = self.locs.get_mut(&loc_id) {
                    case.void_info = Some(ChainVoidInfo { replacer });
                }
            }
            LedgerCall::AddCollectionItem {
                collection_loc_id,
                item_id,
                description,
                files,
                token,
                restricted_delivery,
                terms_and_conditions,
            } => {
                let case = self.closed_collection(&collection_loc_id)?;
                if signer != case.requester.as_ref().unwrap_or(&case.owner) {
                    return Err(rejected("WrongCollectionLoc"));
                }
                let params = case.collection.clone().unwrap_or_default();
                let items = self
                    .collection_items
                    .get(&collection_loc_id)
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                if items.iter().any(|i| i.id == item_id) {
                    return Err(rejected("CollectionItemAlreadyExists"));
                }
                if params
                    .max_size
                    .is_some_and(|max| items.len() as u64 >= u64::from(max))
                {
                    return Err(rejected("CollectionLimitsReached"));
                }
                if params
                    .last_block_submission
                    .is_some_and(|last| self.best_block >= last)
                {
                    return Err(rejected("CollectionLimitsReached"));
                }
                if !files.is_empty() && !params.can_upload {
                    return Err(rejected("CannotUpload"));
                }
                if duplicate_file_hash(&files) {
                    return Err(rejected("DuplicateFile"));
                }
                if restricted_delivery && token.is_none() {
                    return Err(rejected("MissingToken"));
                }
                self.collection_items
                    .entry(collection_loc_id)
                    .or_default()
                    .push(ChainCollectionItem {
                        id: item_id,
                        description,
                        files,
                        token,
                        restricted_delivery,
                        terms_and_conditions,
                    });
            }
            LedgerCall::AddTokensRecord {
                collection_loc_id,
                record_id,
                description,
                files,
            } => {
                let case = self.closed_collection(&collection_loc_id)?;
                if signer != &case.owner && !self.is_selected_issuer(&collection_loc_id, signer) {
                    return Err(rejected("CannotSubmitRecord"));
                }
                let records = self
                    .tokens_records
                    .get(&collection_loc_id)
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                if records.iter().any(|r| r.id == record_id) {
                    return Err(rejected("TokensRecordAlreadyExists"));
                }
                if files.is_empty() {
                    return Err(rejected("MustHaveAtLeastOneFile"));
                }
                if duplicate_file_hash(&files) {
                    return Err(rejected("DuplicateFile"));
                }
                self.tokens_records
                    .entry(collection_loc_id)
                    .or_default()
                    .push(ChainTokensRecord {
                        id: record_id,
                        description,
                        files,
                        submitter: signer.clone(),
                    });
            }
            LedgerCall::SetIssuerSelection {
                loc_id,
                issuer,
                selected,
            } => {
                let case = self.loc(&loc_id)?;
                if signer != &case.owner {
                    return Err(rejected("Unauthorized"));
                }
                if case.void_info.is_some() {
                    return Err(rejected("CannotMutateVoid"));
                }
                let issuers = self.selected_issuers.entry(loc_id).or_default();
                issuers.retain(|i| i != &issuer);
                if selected {
                    issuers.push(issuer);
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerClient for InMemoryLedger {
    async fn submit(
        &self,
        call: LedgerCall,
        signer: &AccountId,
    ) -> Result<TransactionResult, LocError> {
        let mut state = self.state.write();
        if let Some(message) = state.fail_next.take() {
            debug!("[loc-04] Injected failure for {}", call.name());
            return Err(LocError::Ledger(message));
        }
        state.apply(&call, signer)?;
        state.best_block += 1;
        let block_number = state.best_block;
        info!(
            "[loc-04] {} on {} finalized in block {}",
            call.name(),
            call.loc_id(),
            block_number
        );
        let events = vec![call.name().to_string()];
        state.submitted.push(call);
        Ok(TransactionResult {
            block_hash: Hash::of_str(&format!("block-{}", block_number)),
            block_number,
            events,
        })
    }

    async fn query_loc(&self, loc_id: &LocId) -> Result<Option<LegalOfficerCase>, LocError> {
        Ok(self.state.read().locs.get(loc_id).cloned())
    }

    async fn query_collection_item(
        &self,
        collection_loc_id: &LocId,
        item_id: &Hash,
    ) -> Result<Option<ChainCollectionItem>, LocError> {
        Ok(self
            .state
            .read()
            .collection_items
            .get(collection_loc_id)
            .and_then(|items| items.iter().find(|i| &i.id == item_id).cloned()))
    }

    async fn query_collection_items(
        &self,
        collection_loc_id: &LocId,
    ) -> Result<Vec<ChainCollectionItem>, LocError> {
        Ok(self
            .state
            .read()
            .collection_items
            .get(collection_loc_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn query_collection_size(&self, collection_loc_id: &LocId) -> Result<u32, LocError> {
        let size = self
            .state
            .read()
            .collection_items
            .get(collection_loc_id)
            .map_or(0, Vec::len);
        u32::try_from(size).map_err(|_| LocError::Ledger("collection too large".into()))
    }

    async fn query_tokens_record(
        &self,
        collection_loc_id: &LocId,
        record_id: &Hash,
    ) -> Result<Option<ChainTokensRecord>, LocError> {
        Ok(self
            .state
            .read()
            .tokens_records
            .get(collection_loc_id)
            .and_then(|records| records.iter().find(|r| &r.id == record_id).cloned()))
    }

    async fn query_tokens_records(
        &self,
        collection_loc_id: &LocId,
    ) -> Result<Vec<ChainTokensRecord>, LocError> {
        Ok(self
            .state
            .read()
            .tokens_records
            .get(collection_loc_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn query_selected_issuers(&self, loc_id: &LocId) -> Result<Vec<AccountId>, LocError> {
        Ok(self
            .state
            .read()
            .selected_issuers
            .get(loc_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn best_block_number(&self) -> Result<u64, LocError> {
        Ok(self.state.read().best_block)
    }
}
