//! # Lifecycle Scenarios
//!
//! Whole LOC lives across the requester and the legal officer, each with
//! their own client and snapshots.

use super::fixtures::*;
use loc_01_content_addressing::{FileContent, HashOrContent, ItemFileWithContent};
use loc_04_reconciler::{LedgerClient, ReviewDecision};
use loc_05_lifecycle::{
    CloseParams, CollectionItemParams, LocFileParams, OpenParams, RequestParams, StateKind,
    VoidParams,
};
use shared_types::{Hash, ItemStatus, LocError, LocType};

#[tokio::test]
async fn test_rejected_request_is_reworked() {
    let federation = Federation::new();
    let draft = federation
        .client(bob())
        .locs_state()
        .await
        .unwrap()
        .request_loc(RequestParams::new(alice(), LocType::Transaction, "Deal").as_draft())
        .await
        .unwrap()
        .into_draft()
        .unwrap();
    let draft = draft.add_metadata("Amount", "100").await.unwrap();
    let loc_id = draft.submit().await.unwrap().loc_id();

    let rejected = federation
        .state_of(alice(), &loc_id)
        .await
        .into_pending()
        .unwrap()
        .reject("Because.")
        .await
        .unwrap();
    assert_eq!(rejected.reject_reason().unwrap(), Some("Because."));

    let draft = federation
        .state_of(bob(), &loc_id)
        .await
        .into_rejected()
        .unwrap()
        .rework()
        .await
        .unwrap();
    let data = draft.data().unwrap();
    assert_eq!(data.metadata_item("Amount").unwrap().status, ItemStatus::Draft);
    assert!(federation.ledger.query_loc(&loc_id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_identity_loc_publishes_on_open() {
    let federation = Federation::new();
    let draft = federation
        .client(bob())
        .locs_state()
        .await
        .unwrap()
        .request_loc(RequestParams::new(alice(), LocType::Identity, "Bob").as_draft())
        .await
        .unwrap()
        .into_draft()
        .unwrap();
    let draft = draft.add_metadata("Firstname", "Bob").await.unwrap();
    let loc_id = draft.submit().await.unwrap().loc_id();
    federation
        .state_of(alice(), &loc_id)
        .await
        .into_pending()
        .unwrap()
        .accept()
        .await
        .unwrap();

    let open = federation
        .state_of(bob(), &loc_id)
        .await
        .into_accepted()
        .unwrap()
        .open(OpenParams {
            auto_publish: Some(false),
        })
        .await
        .unwrap();
    let entry = open.data().unwrap().metadata_item("Firstname").unwrap();
    assert_eq!(entry.status, ItemStatus::Published);

    let failed = open.add_metadata("Lastname", "Builder").await.unwrap_err();
    assert!(matches!(failed.error(), LocError::InvalidTransition { .. }));

    let closed = federation
        .state_of(alice(), &loc_id)
        .await
        .into_open()
        .unwrap()
        .close(CloseParams {
            seal: Some(Hash::of_str("seal")),
            auto_ack: Some(true),
        })
        .await
        .unwrap()
        .into_closed()
        .unwrap();
    assert_eq!(closed.data().unwrap().seal, Some(Hash::of_str("seal")));
}

#[tokio::test]
async fn test_file_review_rejected_then_deleted() {
    let federation = Federation::new();
    let open = federation
        .accepted_request(LocType::Transaction, "Files")
        .await
        .open(OpenParams::default())
        .await
        .unwrap();
    let file = LocFileParams {
        nature: "Invoice".into(),
        file: ItemFileWithContent::new(
            "invoice.pdf",
            "application/pdf",
            HashOrContent::from_content(FileContent::bytes(b"%PDF-1.7".to_vec())),
        )
        .unwrap(),
    };
    let hash = Hash::of(b"%PDF-1.7");
    let open = open.add_file(file).await.unwrap();
    let loc_id = open.request_file_review(hash).await.unwrap().loc_id();

    federation
        .state_of(alice(), &loc_id)
        .await
        .into_open()
        .unwrap()
        .review_file(
            hash,
            ReviewDecision::Reject {
                reason: "Unreadable".into(),
            },
        )
        .await
        .unwrap();

    let open = federation.state_of(bob(), &loc_id).await.into_open().unwrap();
    let stored = open.data().unwrap().file(&hash).unwrap();
    assert_eq!(stored.status, ItemStatus::ReviewRejected);
    assert_eq!(stored.reject_reason.as_deref(), Some("Unreadable"));

    let failed = open.publish_file(hash).await.unwrap_err();
    assert!(matches!(failed.error(), LocError::InvalidTransition { .. }));
    let open = failed.into_state().delete_file(hash).await.unwrap();
    assert!(open.data().unwrap().file(&hash).is_none());
}

#[tokio::test]
async fn test_voided_collection_keeps_items_readable() {
    let federation = Federation::new();
    let collection = federation.closed_collection(uploadable()).await;
    let loc_id = collection.loc_id();
    collection
        .add_collection_item(CollectionItemParams::new(Hash::of_str("item"), "Kept"))
        .await
        .unwrap();

    let voided = federation
        .state_of(alice(), &loc_id)
        .await
        .into_closed_collection()
        .unwrap()
        .make_void(VoidParams::new("Fraud"))
        .await
        .unwrap();
    assert_eq!(voided.replacer().unwrap(), None);
    assert_eq!(voided.data().unwrap().void_info.as_ref().unwrap().reason, "Fraud");
    assert_eq!(voided.collection_items().await.unwrap().len(), 1);

    let state = federation.state_of(bob(), &loc_id).await;
    assert_eq!(state.kind(), StateKind::VoidedCollection);
}

#[tokio::test]
async fn test_states_of_filters_by_kind() {
    let federation = Federation::new();
    federation
        .accepted_request(LocType::Transaction, "Accepted")
        .await;
    let locs = federation
        .client(bob())
        .locs_state()
        .await
        .unwrap()
        .request_loc(RequestParams::new(alice(), LocType::Transaction, "Draft").as_draft())
        .await
        .unwrap()
        .locs_state()
        .clone();
    assert_eq!(locs.states_of(StateKind::Accepted).unwrap().len(), 1);
    assert_eq!(locs.states_of(StateKind::Draft).unwrap().len(), 1);
    assert!(locs.states_of(StateKind::Open).unwrap().is_empty());
}

#[tokio::test]
async fn test_ledger_ahead_of_backend_reads_as_open() {
    let federation = Federation::new();
    let accepted = federation
        .accepted_request(LocType::Transaction, "Half opened")
        .await;
    let loc_id = accepted.loc_id();

    // Ledger creation succeeds, the backend never hears about it.
    federation.alice_node().set_unreachable(true);
    let failed = accepted.open(OpenParams::default()).await.unwrap_err();
    assert!(!failed.into_state().is_discarded());
    federation.alice_node().set_unreachable(false);
    assert!(federation.ledger.query_loc(&loc_id).await.unwrap().is_some());

    let client = federation.client(bob());
    let from_snapshot = client.locs_state().await.unwrap().state(&loc_id).unwrap();
    let found = client.find_loc(&loc_id).await.unwrap();
    assert_eq!(from_snapshot.kind(), StateKind::Open);
    assert_eq!(from_snapshot.data().unwrap().status, found.status);
    assert!(from_snapshot.data().unwrap().on_chain);
}
