//! # Transition Preconditions
//!
//! Pure checks run before anything is sent to the backend or the ledger.

use crate::domain::CollectionItemParams;
use loc_02_terms_validation::{validate_terms, validate_token};
use loc_04_reconciler::LocData;
use shared_types::{CollectionParams, Hash, ItemStatus, LegalOfficerCase, LocError, LocId};

/// First hash appearing twice.
pub fn duplicate_hash(hashes: &[Hash]) -> Option<Hash> {
    hashes
        .iter()
        .enumerate()
        .find(|(i, hash)| hashes[..*i].contains(hash))
        .map(|(_, hash)| *hash)
}

/// Every item must be published; published items must be acknowledged
/// unless the close acknowledges them.
pub fn check_closable(data: &LocData, auto_ack: bool) -> Result<(), LocError> {
    let statuses = data
        .files
        .iter()
        .map(|f| (f.status, format!("file {}", f.hash)))
        .chain(
            data.metadata
                .iter()
                .map(|m| (m.status, format!("metadata {}", m.name))),
        )
        .chain(data.links.iter().map(|l| (l.status, format!("link {}", l.target))));
    for (status, item) in statuses {
        match status {
            ItemStatus::Acknowledged => {}
            ItemStatus::Published if auto_ack => {}
            ItemStatus::Published => {
                return Err(LocError::validation(format!(
                    "{} must be acknowledged before closing",
                    item
                )))
            }
            other => {
                return Err(LocError::validation(format!(
                    "{} is {}, all items must be published before closing",
                    item, other
                )))
            }
        }
    }
    Ok(())
}

/// The replacer must be another live LOC of the same kind on the ledger.
pub fn check_replacer(
    voided: &LocData,
    replacer_id: LocId,
    replacer: Option<&LegalOfficerCase>,
) -> Result<(), LocError> {
    if replacer_id == voided.id {
        return Err(LocError::validation("A LOC cannot replace itself"));
    }
    let replacer = replacer.ok_or_else(|| {
        LocError::validation(format!("Replacer LOC {} not found on chain", replacer_id))
    })?;
    if replacer.void_info.is_some() {
        return Err(LocError::validation(format!(
            "Replacer LOC {} is void",
            replacer_id
        )));
    }
    if replacer.loc_type != voided.loc_type {
        return Err(LocError::validation(format!(
            "Replacer LOC {} is a {} LOC, expected {}",
            replacer_id, replacer.loc_type, voided.loc_type
        )));
    }
    Ok(())
}

/// Structural checks of a collection item, files already finalized.
pub fn check_collection_item(
    item: &CollectionItemParams,
    file_hashes: &[Hash],
    collection: &CollectionParams,
) -> Result<(), LocError> {
    if let Some(token) = &item.token {
        validate_token(token)?;
    }
    if item.restricted_delivery && item.token.is_none() {
        return Err(LocError::validation("Restricted delivery requires a token"));
    }
    validate_terms(&item.terms_and_conditions)?;
    if !file_hashes.is_empty() && !collection.can_upload {
        return Err(LocError::validation("Collection does not accept files"));
    }
    if let Some(hash) = duplicate_hash(file_hashes) {
        return Err(LocError::validation(format!("Duplicate file {}", hash)));
    }
    Ok(())
}

/// Size and deadline of a collection.
pub fn check_collection_limits(
    collection: &CollectionParams,
    size: u32,
    best_block: u64,
) -> Result<(), LocError> {
    if collection.max_size.is_some_and(|max| size >= max) {
        return Err(LocError::validation(format!(
            "Collection is full ({} items)",
            size
        )));
    }
    if collection
        .last_block_submission
        .is_some_and(|last| best_block >= last)
    {
        return Err(LocError::validation(format!(
            "Collection no longer accepts items (block {})",
            best_block
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixtures::data_with_statuses;
    use loc_02_terms_validation::{
        LogionClassificationParams, TermsAndConditionsElement, TransferredRight,
    };
    use shared_types::{ItemToken, LocType};

    mod fixtures {
        use super::*;
        use loc_04_reconciler::{MergedFile, MergedLink, MergedMetadataItem};
        use shared_types::{AccountId, LocRequestStatus};

        const ALICE: &str = "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY";

        pub fn data_with_statuses(file: ItemStatus, link: ItemStatus) -> LocData {
            let alice = AccountId::polkadot(ALICE).unwrap();
            LocData {
                id: LocId::from_uuid(uuid::Uuid::from_u128(1)),
                owner: alice.clone(),
                requester: None,
                requester_loc_id: None,
                description: "Test".into(),
                loc_type: LocType::Transaction,
                status: LocRequestStatus::Open,
                created_on: Default::default(),
                decision_on: None,
                closed_on: None,
                reject_reason: None,
                void_info: None,
                seal: None,
                template: None,
                sponsorship_id: None,
                files: vec![MergedFile {
                    hash: Hash::of_str("content"),
                    name: "a.txt".into(),
                    nature: "Doc".into(),
                    size: 7,
                    content_type: Some("text/plain".into()),
                    submitter: alice.clone(),
                    status: file,
                    reject_reason: None,
                    added_on: None,
                    acknowledged_by_owner: file == ItemStatus::Acknowledged,
                    acknowledged_by_verified_issuer: false,
                }],
                metadata: vec![MergedMetadataItem {
                    name: "Name".into(),
                    value: "Value".into(),
                    submitter: alice.clone(),
                    status: ItemStatus::Acknowledged,
                    reject_reason: None,
                    added_on: None,
                    acknowledged_by_owner: true,
                    acknowledged_by_verified_issuer: false,
                }],
                links: vec![MergedLink {
                    target: LocId::from_uuid(uuid::Uuid::from_u128(2)),
                    nature: "Parent".into(),
                    submitter: alice,
                    status: link,
                    added_on: None,
                    acknowledged_by_owner: link == ItemStatus::Acknowledged,
                }],
                collection: None,
                on_chain: true,
            }
        }
    }

    fn case(loc_type: LocType, void: bool) -> LegalOfficerCase {
        let data = data_with_statuses(ItemStatus::Acknowledged, ItemStatus::Acknowledged);
        LegalOfficerCase {
            id: LocId::from_uuid(uuid::Uuid::from_u128(3)),
            owner: data.owner,
            requester: None,
            requester_loc_id: None,
            loc_type,
            closed: true,
            seal: None,
            void_info: void.then(|| shared_types::ChainVoidInfo { replacer: None }),
            files: Vec::new(),
            metadata: Vec::new(),
            links: Vec::new(),
            collection: None,
            sponsorship_id: None,
        }
    }

    fn collection(can_upload: bool) -> CollectionParams {
        CollectionParams {
            last_block_submission: None,
            max_size: None,
            can_upload,
        }
    }

    #[test]
    fn test_duplicate_hash() {
        let a = Hash::of_str("a");
        let b = Hash::of_str("b");
        assert_eq!(duplicate_hash(&[a, b]), None);
        assert_eq!(duplicate_hash(&[a, b, a]), Some(a));
    }

    #[test]
    fn test_close_requires_published_items() {
        let data = data_with_statuses(ItemStatus::ReviewAccepted, ItemStatus::Acknowledged);
        assert!(matches!(
            check_closable(&data, true),
            Err(LocError::Validation(_))
        ));
    }

    #[test]
    fn test_close_requires_ack_unless_auto() {
        let data = data_with_statuses(ItemStatus::Published, ItemStatus::Published);
        assert!(check_closable(&data, false).is_err());
        assert!(check_closable(&data, true).is_ok());
        let data = data_with_statuses(ItemStatus::Acknowledged, ItemStatus::Acknowledged);
        assert!(check_closable(&data, false).is_ok());
    }

    #[test]
    fn test_replacer_rules() {
        let data = data_with_statuses(ItemStatus::Acknowledged, ItemStatus::Acknowledged);
        let replacer = case(LocType::Transaction, false);
        assert!(check_replacer(&data, replacer.id, Some(&replacer)).is_ok());
        assert!(check_replacer(&data, data.id, Some(&replacer)).is_err());
        assert!(check_replacer(&data, replacer.id, None).is_err());
        let void = case(LocType::Transaction, true);
        assert!(check_replacer(&data, void.id, Some(&void)).is_err());
        let other = case(LocType::Collection, false);
        assert!(check_replacer(&data, other.id, Some(&other)).is_err());
    }

    #[test]
    fn test_restricted_delivery_needs_token() {
        let mut item = CollectionItemParams::new(Hash::of_str("item"), "Item");
        item.restricted_delivery = true;
        assert_eq!(
            check_collection_item(&item, &[], &collection(true)),
            Err(LocError::validation("Restricted delivery requires a token"))
        );
        item.token = Some(ItemToken {
            token_type: "owner".into(),
            id: "0xa6db31d1aee06a3ad7e4e56de3775e80d2f5ea84".into(),
            issuance: 1,
        });
        assert!(check_collection_item(&item, &[], &collection(true)).is_ok());
    }

    #[test]
    fn test_invalid_token_is_rejected() {
        let mut item = CollectionItemParams::new(Hash::of_str("item"), "Item");
        item.token = Some(ItemToken {
            token_type: "ethereum_erc721".into(),
            id: "not json".into(),
            issuance: 1,
        });
        assert!(matches!(
            check_collection_item(&item, &[], &collection(true)),
            Err(LocError::Validation(_))
        ));
    }

    #[test]
    fn test_conflicting_terms_are_rejected() {
        let mut item = CollectionItemParams::new(Hash::of_str("item"), "Item");
        item.terms_and_conditions = vec![TermsAndConditionsElement::LogionClassification {
            tc_loc: LocId::from_uuid(uuid::Uuid::from_u128(9)),
            parameters: LogionClassificationParams::with_rights(&[
                TransferredRight::PersonalPrivate,
                TransferredRight::PersonalPublic,
            ]),
        }];
        assert!(check_collection_item(&item, &[], &collection(true)).is_err());
    }

    #[test]
    fn test_files_need_upload_permission() {
        let item = CollectionItemParams::new(Hash::of_str("item"), "Item");
        let file = Hash::of_str("file");
        assert!(check_collection_item(&item, &[file], &collection(false)).is_err());
        assert!(check_collection_item(&item, &[file], &collection(true)).is_ok());
        assert!(check_collection_item(&item, &[file, file], &collection(true)).is_err());
    }

    #[test]
    fn test_collection_limits() {
        let limited = CollectionParams {
            last_block_submission: Some(100),
            max_size: Some(2),
            can_upload: false,
        };
        assert!(check_collection_limits(&limited, 1, 99).is_ok());
        assert!(check_collection_limits(&limited, 2, 99).is_err());
        assert!(check_collection_limits(&limited, 1, 100).is_err());
        assert!(check_collection_limits(&collection(false), 1000, u64::MAX).is_ok());
    }
}
