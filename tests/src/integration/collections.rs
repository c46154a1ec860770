//! # Collection Scenarios
//!
//! Items and tokens records of a closed collection: announcement to the
//! node, submission to the ledger, delayed uploads and the withdrawal of
//! announcements the ledger refused.

use super::fixtures::*;
use loc_02_terms_validation::{
    LogionClassificationParams, TermsAndConditionsElement, TransferredRight,
};
use loc_05_lifecycle::{CollectionItemParams, TokensRecordParams};
use shared_types::{CollectionParams, Hash, ItemToken, LocError};

fn owner_token() -> ItemToken {
    ItemToken {
        token_type: "owner".into(),
        id: "0xa6db31d1aee06a3ad7e4e56de3775e80d2f5ea84".into(),
        issuance: 1,
    }
}

#[tokio::test]
async fn test_item_file_uploaded_after_submission() {
    let federation = Federation::new();
    let collection = federation.closed_collection(uploadable()).await;
    let loc_id = collection.loc_id();
    let item_id = Hash::of_str("item-1");

    let mut item = CollectionItemParams::new(item_id, "First item");
    item.files.push(file_by_hash("data.txt", "12345"));
    item.token = Some(owner_token());
    item.restricted_delivery = true;
    item.terms_and_conditions
        .push(TermsAndConditionsElement::LogionClassification {
            tc_loc: loc_id,
            parameters: LogionClassificationParams::with_rights(&[
                TransferredRight::PersonalPrivate,
                TransferredRight::Worldwide,
                TransferredRight::NoTime,
            ]),
        });
    let collection = collection.add_collection_item(item).await.unwrap();

    let stored = collection.collection_item(&item_id).await.unwrap().unwrap();
    assert_eq!(stored.description, "First item");
    assert_eq!(stored.description_hash, Hash::of_str("First item"));
    assert!(stored.restricted_delivery);
    match stored.terms_and_conditions.as_slice() {
        [TermsAndConditionsElement::LogionClassification { tc_loc, parameters }] => {
            assert_eq!(*tc_loc, loc_id);
            assert_eq!(parameters.transferred_rights, vec!["PER-PRIV", "WW", "NOTIME"]);
        }
        other => panic!("unexpected terms {:?}", other),
    }
    let file = stored.file(&Hash::of("12345")).unwrap();
    assert_eq!(file.size, 5);
    assert!(!file.uploaded);

    let collection = collection
        .upload_collection_item_file(&item_id, file_with_content("data.txt", "12345"))
        .await
        .unwrap();
    let stored = collection.collection_item(&item_id).await.unwrap().unwrap();
    assert!(stored.file(&Hash::of("12345")).unwrap().uploaded);

    let failed = collection
        .upload_collection_item_file(&item_id, file_with_content("data.txt", "12345"))
        .await
        .unwrap_err();
    assert!(matches!(failed.error(), LocError::Validation(_)));
}

#[tokio::test]
async fn test_restricted_delivery_requires_token() {
    let federation = Federation::new();
    let collection = federation.closed_collection(uploadable()).await;

    let mut item = CollectionItemParams::new(Hash::of_str("item-1"), "Restricted");
    item.restricted_delivery = true;
    let failed = collection.add_collection_item(item).await.unwrap_err();
    assert!(matches!(failed.error(), LocError::Validation(_)));
    let submitted = federation.ledger.submitted();
    assert!(!submitted.iter().any(|call| call.name() == "add_collection_item"));
}

#[tokio::test]
async fn test_collection_size_limit() {
    let federation = Federation::new();
    let collection = federation
        .closed_collection(CollectionParams {
            last_block_submission: None,
            max_size: Some(1),
            can_upload: false,
        })
        .await;
    let collection = collection
        .add_collection_item(CollectionItemParams::new(Hash::of_str("item-1"), "One"))
        .await
        .unwrap();
    let failed = collection
        .add_collection_item(CollectionItemParams::new(Hash::of_str("item-2"), "Two"))
        .await
        .unwrap_err();
    assert!(matches!(failed.error(), LocError::Validation(_)));
    assert_eq!(failed.into_state().collection_items().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_ledger_rejection_withdraws_announcement() {
    let federation = Federation::new();
    let collection = federation.closed_collection(uploadable()).await;
    let loc_id = collection.loc_id();

    federation.ledger.fail_next_submission("Timeout");
    let failed = collection
        .add_collection_item(CollectionItemParams::new(Hash::of_str("item-1"), "Lost"))
        .await
        .unwrap_err();
    assert!(matches!(failed.error(), LocError::Ledger(_)));
    assert!(federation.alice_node().collection_item_records(&loc_id).is_empty());

    let collection = failed.into_state();
    assert!(!collection.is_discarded());
    federation.alice_node().set_fail_deletions(true);
    federation.ledger.fail_next_submission("Timeout");
    let failed = collection
        .add_collection_item(CollectionItemParams::new(Hash::of_str("item-2"), "Stuck"))
        .await
        .unwrap_err();
    assert!(matches!(failed.error(), LocError::Ledger(_)));
    assert_eq!(federation.alice_node().collection_item_records(&loc_id).len(), 1);
}

#[tokio::test]
async fn test_tokens_record_by_selected_issuer() {
    let federation = Federation::new();
    federation.register_charlie();
    let collection = federation.closed_collection(uploadable()).await;
    let loc_id = collection.loc_id();

    let record_id = Hash::of_str("record-1");
    let mut record = TokensRecordParams {
        record_id,
        description: "Tokens".into(),
        files: vec![file_with_content("record.txt", "record content")],
    };

    let failed = collection.add_tokens_record(record.clone()).await.unwrap_err();
    assert!(matches!(failed.error(), LocError::Forbidden(_)));

    federation
        .state_of(alice(), &loc_id)
        .await
        .into_closed_collection()
        .unwrap()
        .select_issuer(&charlie(), true)
        .await
        .unwrap();

    let by_issuer = federation
        .state_of(charlie(), &loc_id)
        .await
        .into_closed_collection()
        .unwrap();
    let by_issuer = by_issuer.add_tokens_record(record.clone()).await.unwrap();
    let stored = by_issuer.tokens_record(&record_id).await.unwrap().unwrap();
    assert_eq!(stored.submitter, charlie());
    assert!(stored.files.iter().all(|f| f.uploaded));

    record.record_id = Hash::of_str("record-2");
    record.files.clear();
    let failed = by_issuer.add_tokens_record(record).await.unwrap_err();
    assert!(matches!(failed.error(), LocError::Validation(_)));
}
