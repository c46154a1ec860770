//! Closed and Voided LOCs
//!
//! A closed collection keeps accepting collection items and tokens records;
//! every other closed or voided LOC is frozen.

use super::state::{upload_of, Handle};
use crate::algorithms::{check_collection_item, check_collection_limits, duplicate_hash};
use crate::domain::{
    settle, CollectionItemParams, Failed, StateKind, TokensRecordParams, VoidParams,
};
use loc_01_content_addressing::ItemFileWithContent;
use loc_04_reconciler::{
    CollectionItem, CollectionItemAnnouncement, ItemFile, ItemFileDescription, LedgerCall,
    LocIssuer, ReconcilerApi, TokensRecord, TokensRecordAnnouncement,
};
use shared_types::{AccountId, ChainItemFile, Hash, LocError, LocId};
use tracing::{debug, warn};

/// Finalize every file and describe it.
async fn describe_files(
    files: &mut [ItemFileWithContent],
) -> Result<Vec<ItemFileDescription>, LocError> {
    let mut descriptions = Vec::with_capacity(files.len());
    for file in files.iter_mut() {
        let digest = file.finalize().await?;
        descriptions.push(ItemFileDescription {
            hash: digest.hash,
            name: file.name.clone(),
            content_type: file.content_type.to_string(),
            size: digest.size,
        });
    }
    Ok(descriptions)
}

fn chain_files(files: &[ItemFileDescription]) -> Vec<ChainItemFile> {
    files
        .iter()
        .map(|f| ChainItemFile {
            hash: f.hash,
            size: f.size,
        })
        .collect()
}

/// Log the outcome of withdrawing an announcement the ledger refused.
fn log_withdrawal(outcome: Result<(), LocError>, entity: &str, id: &Hash) {
    match outcome {
        Ok(()) => debug!("[loc-05] Withdrew {} {} after ledger rejection", entity, id),
        Err(e) => warn!(
            "[loc-05] Failed to withdraw {} {} after ledger rejection: {}",
            entity, id, e
        ),
    }
}

/// File of `files` matching the finalized content, checked for a second upload
/// and against the declared size.
async fn expected_file<'a>(
    files: &'a [ItemFile],
    file: &mut ItemFileWithContent,
) -> Result<&'a ItemFile, LocError> {
    if !file.hash_or_content.has_content() {
        return Err(LocError::validation(format!(
            "Content of {} is required",
            file.name
        )));
    }
    let digest = file.finalize().await?;
    let expected = files
        .iter()
        .find(|f| f.hash == digest.hash)
        .ok_or_else(|| LocError::validation(format!("No file {} to upload", digest.hash)))?;
    if expected.uploaded {
        return Err(LocError::validation(format!(
            "File {} already uploaded",
            digest.hash
        )));
    }
    file.hash_or_content.finalize_declared(expected.size).await?;
    Ok(expected)
}

/// Closed transaction or identity LOC.
#[derive(Debug)]
pub struct ClosedLoc {
    pub(super) handle: Handle,
}

impl ClosedLoc {
    /// Issuers as visible to the caller.
    pub async fn issuers(&self) -> Result<Vec<LocIssuer>, LocError> {
        self.handle.issuers().await
    }

    /// Select or unselect a verified issuer.
    pub async fn select_issuer(
        self,
        issuer: &AccountId,
        selected: bool,
    ) -> Result<ClosedLoc, Failed<Self>> {
        let outcome = async {
            self.handle
                .select_issuer(issuer, selected)
                .await?
                .into_closed()
        }
        .await;
        settle(self, outcome)
    }

    /// Void the LOC.
    pub async fn make_void(self, params: VoidParams) -> Result<VoidedLoc, Failed<Self>> {
        let outcome = async {
            self.handle
                .make_void(&params.reason, params.replacer)
                .await?
                .into_voided()
        }
        .await;
        settle(self, outcome)
    }
}

/// Closed collection LOC.
#[derive(Debug)]
pub struct ClosedCollectionLoc {
    pub(super) handle: Handle,
}

impl ClosedCollectionLoc {
    /// Issuers as visible to the caller.
    pub async fn issuers(&self) -> Result<Vec<LocIssuer>, LocError> {
        self.handle.issuers().await
    }

    /// Select or unselect a verified issuer.
    pub async fn select_issuer(
        self,
        issuer: &AccountId,
        selected: bool,
    ) -> Result<ClosedCollectionLoc, Failed<Self>> {
        let outcome = async {
            self.handle
                .select_issuer(issuer, selected)
                .await?
                .into_closed_collection()
        }
        .await;
        settle(self, outcome)
    }

    /// Void the collection.
    pub async fn make_void(
        self,
        params: VoidParams,
    ) -> Result<VoidedCollectionLoc, Failed<Self>> {
        let outcome = async {
            self.handle
                .make_void(&params.reason, params.replacer)
                .await?
                .into_voided_collection()
        }
        .await;
        settle(self, outcome)
    }

    /// Collection item by id, when the ledger has it.
    pub async fn collection_item(
        &self,
        item_id: &Hash,
    ) -> Result<Option<CollectionItem>, LocError> {
        collection_item(&self.handle, item_id).await
    }

    /// Every collection item.
    pub async fn collection_items(&self) -> Result<Vec<CollectionItem>, LocError> {
        collection_items(&self.handle).await
    }

    /// Tokens record by id, when the ledger has it.
    pub async fn tokens_record(
        &self,
        record_id: &Hash,
    ) -> Result<Option<TokensRecord>, LocError> {
        tokens_record(&self.handle, record_id).await
    }

    /// Every tokens record.
    pub async fn tokens_records(&self) -> Result<Vec<TokensRecord>, LocError> {
        tokens_records(&self.handle).await
    }

    /// Add an item: announce it to the backend, submit it to the ledger,
    /// then upload the files given with content.
    pub async fn add_collection_item(
        self,
        mut params: CollectionItemParams,
    ) -> Result<ClosedCollectionLoc, Failed<Self>> {
        let outcome = async {
            let data = self.handle.as_requester("add collection items")?;
            let files = describe_files(&mut params.files).await?;
            let hashes: Vec<Hash> = files.iter().map(|f| f.hash).collect();
            let collection = data.collection.clone().unwrap_or_default();
            check_collection_item(&params, &hashes, &collection)?;
            let ledger = self.handle.client().ledger();
            check_collection_limits(
                &collection,
                ledger.query_collection_size(&data.id).await?,
                ledger.best_block_number().await?,
            )?;

            let terms: Vec<_> = params
                .terms_and_conditions
                .iter()
                .map(|element| element.to_record())
                .collect();
            let node = self.handle.node()?;
            node.create_collection_item(
                &data.id,
                &CollectionItemAnnouncement {
                    item_id: params.item_id,
                    description: params.description.clone(),
                    files: files.clone(),
                    token: params.token.clone(),
                    terms_and_conditions: terms.clone(),
                },
            )
            .await?;
            let submitted = self
                .handle
                .client()
                .submit(LedgerCall::AddCollectionItem {
                    collection_loc_id: data.id,
                    item_id: params.item_id,
                    description: Hash::of_str(&params.description),
                    files: chain_files(&files),
                    token: params.token.clone(),
                    restricted_delivery: params.restricted_delivery,
                    terms_and_conditions: terms,
                })
                .await;
            if let Err(error) = submitted {
                let withdrawal = node.delete_collection_item(&data.id, &params.item_id).await;
                log_withdrawal(withdrawal, "collection item", &params.item_id);
                return Err(error);
            }

            for file in params
                .files
                .iter_mut()
                .filter(|f| f.hash_or_content.has_content())
            {
                let upload = upload_of(file).await?;
                node.upload_collection_item_file(&data.id, &params.item_id, &upload)
                    .await?;
            }
            self.handle
                .refreshed("add collection item", &[StateKind::ClosedCollection])
                .await?
                .into_closed_collection()
        }
        .await;
        settle(self, outcome)
    }

    /// Upload the content of a file registered without it.
    pub async fn upload_collection_item_file(
        self,
        item_id: &Hash,
        mut file: ItemFileWithContent,
    ) -> Result<ClosedCollectionLoc, Failed<Self>> {
        let outcome = async {
            let data = self.handle.data()?;
            let item = collection_item(&self.handle, item_id)
                .await?
                .ok_or_else(|| LocError::NotFound(format!("collection item {}", item_id)))?;
            expected_file(&item.files, &mut file).await?;
            let upload = upload_of(&mut file).await?;
            self.handle
                .node()?
                .upload_collection_item_file(&data.id, item_id, &upload)
                .await?;
            self.handle
                .refreshed("upload collection item file", &[StateKind::ClosedCollection])
                .await?
                .into_closed_collection()
        }
        .await;
        settle(self, outcome)
    }

    /// Add a tokens record; the owner or a selected issuer only.
    pub async fn add_tokens_record(
        self,
        mut params: TokensRecordParams,
    ) -> Result<ClosedCollectionLoc, Failed<Self>> {
        let outcome = async {
            let data = self.handle.data()?;
            let caller = self.handle.caller();
            let ledger = self.handle.client().ledger();
            if !data.is_owner(caller)
                && !ledger
                    .query_selected_issuers(&data.id)
                    .await?
                    .contains(caller)
            {
                return Err(LocError::Forbidden(format!(
                    "only the owner or a selected issuer can add tokens records to {}",
                    data.id
                )));
            }
            if params.files.is_empty() {
                return Err(LocError::validation(
                    "A tokens record must have at least one file",
                ));
            }
            let files = describe_files(&mut params.files).await?;
            let hashes: Vec<Hash> = files.iter().map(|f| f.hash).collect();
            if let Some(hash) = duplicate_hash(&hashes) {
                return Err(LocError::validation(format!("Duplicate file {}", hash)));
            }

            let node = self.handle.node()?;
            node.create_tokens_record(
                &data.id,
                &TokensRecordAnnouncement {
                    record_id: params.record_id,
                    description: params.description.clone(),
                    files: files.clone(),
                },
            )
            .await?;
            let submitted = self
                .handle
                .client()
                .submit(LedgerCall::AddTokensRecord {
                    collection_loc_id: data.id,
                    record_id: params.record_id,
                    description: Hash::of_str(&params.description),
                    files: chain_files(&files),
                })
                .await;
            if let Err(error) = submitted {
                let withdrawal = node.delete_tokens_record(&data.id, &params.record_id).await;
                log_withdrawal(withdrawal, "tokens record", &params.record_id);
                return Err(error);
            }

            for file in params
                .files
                .iter_mut()
                .filter(|f| f.hash_or_content.has_content())
            {
                let upload = upload_of(file).await?;
                node.upload_tokens_record_file(&data.id, &params.record_id, &upload)
                    .await?;
            }
            self.handle
                .refreshed("add tokens record", &[StateKind::ClosedCollection])
                .await?
                .into_closed_collection()
        }
        .await;
        settle(self, outcome)
    }

    /// Upload the content of a tokens record file registered without it.
    pub async fn upload_tokens_record_file(
        self,
        record_id: &Hash,
        mut file: ItemFileWithContent,
    ) -> Result<ClosedCollectionLoc, Failed<Self>> {
        let outcome = async {
            let data = self.handle.data()?;
            let record = tokens_record(&self.handle, record_id)
                .await?
                .ok_or_else(|| LocError::NotFound(format!("tokens record {}", record_id)))?;
            expected_file(&record.files, &mut file).await?;
            let upload = upload_of(&mut file).await?;
            self.handle
                .node()?
                .upload_tokens_record_file(&data.id, record_id, &upload)
                .await?;
            self.handle
                .refreshed("upload tokens record file", &[StateKind::ClosedCollection])
                .await?
                .into_closed_collection()
        }
        .await;
        settle(self, outcome)
    }
}

async fn collection_item(
    handle: &Handle,
    item_id: &Hash,
) -> Result<Option<CollectionItem>, LocError> {
    let loc_id = handle.data()?.id;
    handle
        .client()
        .reconciler()
        .get_collection_item(&loc_id, item_id)
        .await
}

async fn collection_items(handle: &Handle) -> Result<Vec<CollectionItem>, LocError> {
    let loc_id = handle.data()?.id;
    handle
        .client()
        .reconciler()
        .get_collection_items(&loc_id)
        .await
}

async fn tokens_record(
    handle: &Handle,
    record_id: &Hash,
) -> Result<Option<TokensRecord>, LocError> {
    let loc_id = handle.data()?.id;
    handle
        .client()
        .reconciler()
        .get_tokens_record(&loc_id, record_id)
        .await
}

async fn tokens_records(handle: &Handle) -> Result<Vec<TokensRecord>, LocError> {
    let loc_id = handle.data()?.id;
    handle
        .client()
        .reconciler()
        .get_tokens_records(&loc_id)
        .await
}

/// Voided transaction or identity LOC.
#[derive(Debug)]
pub struct VoidedLoc {
    pub(super) handle: Handle,
}

impl VoidedLoc {
    /// LOC replacing this one.
    pub fn replacer(&self) -> Result<Option<LocId>, LocError> {
        Ok(self
            .handle
            .data()?
            .void_info
            .as_ref()
            .and_then(|info| info.replacer))
    }
}

/// Voided collection LOC. Its items stay readable.
#[derive(Debug)]
pub struct VoidedCollectionLoc {
    pub(super) handle: Handle,
}

impl VoidedCollectionLoc {
    /// LOC replacing this one.
    pub fn replacer(&self) -> Result<Option<LocId>, LocError> {
        Ok(self
            .handle
            .data()?
            .void_info
            .as_ref()
            .and_then(|info| info.replacer))
    }

    /// Collection item by id, when the ledger has it.
    pub async fn collection_item(
        &self,
        item_id: &Hash,
    ) -> Result<Option<CollectionItem>, LocError> {
        collection_item(&self.handle, item_id).await
    }

    /// Every collection item.
    pub async fn collection_items(&self) -> Result<Vec<CollectionItem>, LocError> {
        collection_items(&self.handle).await
    }

    /// Every tokens record.
    pub async fn tokens_records(&self) -> Result<Vec<TokensRecord>, LocError> {
        tokens_records(&self.handle).await
    }
}
