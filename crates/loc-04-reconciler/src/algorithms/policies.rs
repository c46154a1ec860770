//! # Merge Policies
//!
//! Field authority per entity: the ledger wins for hashes, sizes, seals,
//! closing, void replacer and acknowledgement flags; the backend wins for
//! names, natures, review state, rejection reasons and timestamps.

use super::reconcile::{reconcile, reconcile_all, Authority, Existence, MergePolicy};
use crate::domain::{
    CollectionItem, ItemFile, LocData, MergedFile, MergedLink, MergedMetadataItem, TokensRecord,
};
use loc_02_terms_validation::TermsAndConditionsElement;
use shared_types::{
    ChainCollectionItem, ChainFile, ChainItemFile, ChainLink, ChainMetadataItem,
    ChainTokensRecord, CollectionItemRecord, Hash, ItemFileRecord, ItemStatus, LegalOfficerCase,
    LocError, LocFile, LocId, LocLink, LocMetadataItem, LocRequest, LocRequestStatus,
    TokensRecordRecord, VoidInfo,
};

use Authority::{BackendWins, ChainWins};

/// Review status once the ledger has (or has not) confirmed the item.
fn confirmed_status(backend: ItemStatus, acknowledged_on_chain: Option<bool>) -> ItemStatus {
    match acknowledged_on_chain {
        None => backend,
        Some(true) => ItemStatus::Acknowledged,
        Some(false) => ItemStatus::Published,
    }
}

/// Merge policy of a whole LOC.
pub struct LocPolicy;

impl MergePolicy for LocPolicy {
    type Onchain = LegalOfficerCase;
    type Offchain = LocRequest;
    type Merged = LocData;
    type Key = LocId;

    const NAME: &'static str = "LOC";
    const EXISTENCE: Existence = Existence::BackendDefines;

    fn onchain_key(onchain: &LegalOfficerCase) -> LocId {
        onchain.id
    }

    fn offchain_key(offchain: &LocRequest) -> LocId {
        offchain.id
    }

    fn merge(chain: Option<LegalOfficerCase>, request: LocRequest) -> Result<LocData, LocError> {
        let status = match &chain {
            Some(case) if case.closed => LocRequestStatus::Closed,
            Some(_) if !request.status.is_on_chain() => LocRequestStatus::Open,
            _ => request.status,
        };
        let chain_void = chain.as_ref().and_then(|c| c.void_info.clone());
        let void_info = match (request.void_info, chain_void) {
            (Some(info), Some(on_chain)) => Some(VoidInfo {
                replacer: ChainWins.resolve(on_chain.replacer, info.replacer),
                ..info
            }),
            (Some(info), None) => Some(info),
            (None, Some(on_chain)) => Some(VoidInfo {
                reason: String::new(),
                voided_on: None,
                replacer: on_chain.replacer,
            }),
            (None, None) => None,
        };

        let (chain_files, chain_metadata, chain_links) = match &chain {
            Some(case) => (case.files.clone(), case.metadata.clone(), case.links.clone()),
            None => (Vec::new(), Vec::new(), Vec::new()),
        };

        Ok(LocData {
            id: request.id,
            owner: ChainWins.pick(chain.as_ref().map(|c| c.owner.clone()), request.owner),
            requester: ChainWins.pick(
                chain.as_ref().map(|c| c.requester.clone()),
                request.requester,
            ),
            requester_loc_id: ChainWins.pick(
                chain.as_ref().map(|c| c.requester_loc_id),
                request.requester_loc_id,
            ),
            description: request.description,
            loc_type: ChainWins.pick(chain.as_ref().map(|c| c.loc_type), request.loc_type),
            status,
            created_on: request.created_on,
            decision_on: request.decision_on,
            closed_on: request.closed_on,
            reject_reason: request.reject_reason,
            void_info,
            seal: ChainWins.resolve(chain.as_ref().and_then(|c| c.seal), request.seal),
            template: request.template,
            sponsorship_id: ChainWins.resolve(
                chain.as_ref().and_then(|c| c.sponsorship_id),
                request.sponsorship_id,
            ),
            files: reconcile_all::<FilePolicy>(chain_files, request.files)?,
            metadata: reconcile_all::<MetadataPolicy>(chain_metadata, request.metadata)?,
            links: reconcile_all::<LinkPolicy>(chain_links, request.links)?,
            collection: ChainWins.resolve(
                chain.as_ref().and_then(|c| c.collection.clone()),
                request.collection,
            ),
            on_chain: chain.is_some(),
        })
    }
}

/// Build the merged view of a LOC from its backend request and ledger case.
pub fn build_loc_data(
    request: LocRequest,
    chain: Option<LegalOfficerCase>,
) -> Result<LocData, LocError> {
    let id = request.id;
    reconcile::<LocPolicy>(chain, Some(request), id)?
        .ok_or_else(|| LocError::NotFound(format!("LOC {}", id)))
}

/// Merge policy of a LOC file.
pub struct FilePolicy;

impl MergePolicy for FilePolicy {
    type Onchain = ChainFile;
    type Offchain = LocFile;
    type Merged = MergedFile;
    type Key = Hash;

    const NAME: &'static str = "file";
    const EXISTENCE: Existence = Existence::EitherDefines;

    fn onchain_key(onchain: &ChainFile) -> Hash {
        onchain.hash
    }

    fn offchain_key(offchain: &LocFile) -> Hash {
        offchain.hash
    }

    fn merge(chain: Option<ChainFile>, file: LocFile) -> Result<MergedFile, LocError> {
        Ok(MergedFile {
            hash: file.hash,
            name: file.name,
            nature: file.nature,
            size: ChainWins.pick(chain.as_ref().map(|c| c.size), file.size),
            content_type: file.content_type,
            submitter: ChainWins.pick(chain.as_ref().map(|c| c.submitter.clone()), file.submitter),
            status: confirmed_status(file.status, chain.as_ref().map(|c| c.acknowledged_by_owner)),
            reject_reason: file.reject_reason,
            added_on: file.added_on,
            acknowledged_by_owner: chain.as_ref().is_some_and(|c| c.acknowledged_by_owner),
            acknowledged_by_verified_issuer: chain
                .as_ref()
                .is_some_and(|c| c.acknowledged_by_verified_issuer),
        })
    }

    fn from_onchain(chain: ChainFile) -> Option<MergedFile> {
        Some(MergedFile {
            hash: chain.hash,
            name: chain.hash.to_hex(),
            nature: chain.nature.to_hex(),
            size: chain.size,
            content_type: None,
            submitter: chain.submitter,
            status: confirmed_status(ItemStatus::Published, Some(chain.acknowledged_by_owner)),
            reject_reason: None,
            added_on: None,
            acknowledged_by_owner: chain.acknowledged_by_owner,
            acknowledged_by_verified_issuer: chain.acknowledged_by_verified_issuer,
        })
    }
}

/// Merge policy of a LOC metadata entry.
pub struct MetadataPolicy;

impl MergePolicy for MetadataPolicy {
    type Onchain = ChainMetadataItem;
    type Offchain = LocMetadataItem;
    type Merged = MergedMetadataItem;
    type Key = Hash;

    const NAME: &'static str = "metadata";
    const EXISTENCE: Existence = Existence::EitherDefines;

    fn onchain_key(onchain: &ChainMetadataItem) -> Hash {
        onchain.name
    }

    fn offchain_key(offchain: &LocMetadataItem) -> Hash {
        offchain.name_hash()
    }

    fn merge(
        chain: Option<ChainMetadataItem>,
        item: LocMetadataItem,
    ) -> Result<MergedMetadataItem, LocError> {
        Ok(MergedMetadataItem {
            name: item.name,
            value: item.value,
            submitter: ChainWins.pick(chain.as_ref().map(|c| c.submitter.clone()), item.submitter),
            status: confirmed_status(item.status, chain.as_ref().map(|c| c.acknowledged_by_owner)),
            reject_reason: item.reject_reason,
            added_on: item.added_on,
            acknowledged_by_owner: chain.as_ref().is_some_and(|c| c.acknowledged_by_owner),
            acknowledged_by_verified_issuer: chain
                .as_ref()
                .is_some_and(|c| c.acknowledged_by_verified_issuer),
        })
    }

    fn from_onchain(chain: ChainMetadataItem) -> Option<MergedMetadataItem> {
        Some(MergedMetadataItem {
            name: chain.name.to_hex(),
            value: chain.value.to_hex(),
            submitter: chain.submitter,
            status: confirmed_status(ItemStatus::Published, Some(chain.acknowledged_by_owner)),
            reject_reason: None,
            added_on: None,
            acknowledged_by_owner: chain.acknowledged_by_owner,
            acknowledged_by_verified_issuer: chain.acknowledged_by_verified_issuer,
        })
    }
}

/// Merge policy of a LOC link.
pub struct LinkPolicy;

impl MergePolicy for LinkPolicy {
    type Onchain = ChainLink;
    type Offchain = LocLink;
    type Merged = MergedLink;
    type Key = LocId;

    const NAME: &'static str = "link";
    const EXISTENCE: Existence = Existence::EitherDefines;

    fn onchain_key(onchain: &ChainLink) -> LocId {
        onchain.target
    }

    fn offchain_key(offchain: &LocLink) -> LocId {
        offchain.target
    }

    fn merge(chain: Option<ChainLink>, link: LocLink) -> Result<MergedLink, LocError> {
        Ok(MergedLink {
            target: link.target,
            nature: link.nature,
            submitter: ChainWins.pick(chain.as_ref().map(|c| c.submitter.clone()), link.submitter),
            status: confirmed_status(link.status, chain.as_ref().map(|c| c.acknowledged_by_owner)),
            added_on: link.added_on,
            acknowledged_by_owner: chain.as_ref().is_some_and(|c| c.acknowledged_by_owner),
        })
    }

    fn from_onchain(chain: ChainLink) -> Option<MergedLink> {
        Some(MergedLink {
            target: chain.target,
            nature: chain.nature.to_hex(),
            submitter: chain.submitter,
            status: confirmed_status(ItemStatus::Published, Some(chain.acknowledged_by_owner)),
            added_on: None,
            acknowledged_by_owner: chain.acknowledged_by_owner,
        })
    }
}

/// Ledger files completed by their backend descriptions.
fn merge_item_files(chain: Option<&[ChainItemFile]>, backend: &[ItemFileRecord]) -> Vec<ItemFile> {
    match chain {
        Some(files) => files
            .iter()
            .map(|file| {
                let described = backend.iter().find(|r| r.hash == file.hash);
                ItemFile {
                    hash: file.hash,
                    size: file.size,
                    name: described.map(|r| r.name.clone()).unwrap_or_default(),
                    content_type: described
                        .map(|r| r.content_type.clone())
                        .unwrap_or_default(),
                    uploaded: described.is_some_and(|r| r.uploaded),
                }
            })
            .collect(),
        None => backend
            .iter()
            .map(|r| ItemFile {
                hash: r.hash,
                size: r.size,
                name: r.name.clone(),
                content_type: r.content_type.clone(),
                uploaded: r.uploaded,
            })
            .collect(),
    }
}

/// Merge policy of a collection item.
pub struct CollectionItemPolicy;

impl MergePolicy for CollectionItemPolicy {
    type Onchain = ChainCollectionItem;
    type Offchain = CollectionItemRecord;
    type Merged = CollectionItem;
    type Key = Hash;

    const NAME: &'static str = "collection item";
    const EXISTENCE: Existence = Existence::ChainDefines;

    fn onchain_key(onchain: &ChainCollectionItem) -> Hash {
        onchain.id
    }

    fn offchain_key(offchain: &CollectionItemRecord) -> Hash {
        offchain.item_id
    }

    fn merge(
        chain: Option<ChainCollectionItem>,
        record: CollectionItemRecord,
    ) -> Result<CollectionItem, LocError> {
        let files = merge_item_files(chain.as_ref().map(|c| c.files.as_slice()), &record.files);
        Ok(CollectionItem {
            collection_loc_id: record.collection_loc_id,
            id: record.item_id,
            description_hash: ChainWins.pick(
                chain.as_ref().map(|c| c.description),
                Hash::of_str(&record.description),
            ),
            description: record.description,
            files,
            token: ChainWins.resolve(chain.as_ref().map(|c| c.token.clone()), Some(record.token))
                .flatten(),
            restricted_delivery: chain.as_ref().is_some_and(|c| c.restricted_delivery),
            terms_and_conditions: ChainWins
                .pick(
                    chain.map(|c| c.terms_and_conditions),
                    record.terms_and_conditions,
                )
                .iter()
                .map(TermsAndConditionsElement::from_stored)
                .collect(),
            added_on: record.added_on,
        })
    }
}

/// Merge policy of a tokens record.
pub struct TokensRecordPolicy;

impl MergePolicy for TokensRecordPolicy {
    type Onchain = ChainTokensRecord;
    type Offchain = TokensRecordRecord;
    type Merged = TokensRecord;
    type Key = Hash;

    const NAME: &'static str = "tokens record";
    const EXISTENCE: Existence = Existence::ChainDefines;

    fn onchain_key(onchain: &ChainTokensRecord) -> Hash {
        onchain.id
    }

    fn offchain_key(offchain: &TokensRecordRecord) -> Hash {
        offchain.record_id
    }

    fn merge(
        chain: Option<ChainTokensRecord>,
        record: TokensRecordRecord,
    ) -> Result<TokensRecord, LocError> {
        let Some(chain) = chain else {
            return Err(LocError::NotFound(format!("tokens record {}", record.record_id)));
        };
        Ok(TokensRecord {
            collection_loc_id: record.collection_loc_id,
            id: record.record_id,
            description_hash: chain.description,
            description: record.description,
            files: merge_item_files(Some(&chain.files), &record.files),
            submitter: chain.submitter,
            added_on: record.added_on,
        })
    }
}
