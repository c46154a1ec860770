//! # Lifecycle Tests
//!
//! Two actors share one in-memory node and ledger: Alice is the legal
//! officer, Bob the requester.

use super::*;
use crate::config::ClientConfig;
use crate::domain::{CloseParams, LocFileParams, OpenParams, RequestParams, StateKind, VoidParams};
use loc_01_content_addressing::{FileContent, HashOrContent, ItemFileWithContent};
use loc_04_reconciler::{InMemoryLedger, InMemoryNode, LedgerCall, LedgerClient, ReviewDecision};
use shared_types::{AccountId, Hash, ItemStatus, LocError, LocType};
use std::sync::Arc;

const ALICE: &str = "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY";
const BOB: &str = "5FHneW46xGXgs5mUiveU4sbTyGBzmstUspZC92UhjJM694ty";

fn alice() -> AccountId {
    AccountId::polkadot(ALICE).unwrap()
}

fn bob() -> AccountId {
    AccountId::polkadot(BOB).unwrap()
}

struct Fixture {
    ledger: Arc<InMemoryLedger>,
    node: InMemoryNode,
}

impl Fixture {
    fn new() -> Self {
        Self {
            ledger: Arc::new(InMemoryLedger::new()),
            node: InMemoryNode::new("node-alice", alice()),
        }
    }

    fn client(&self, caller: AccountId) -> LocClient {
        let session: loc_04_reconciler::Node = Arc::new(self.node.session(caller.clone()));
        LocClient::new(self.ledger.clone(), vec![session], caller)
            .with_config(ClientConfig::for_testing())
    }
}

fn text_file(content: &str) -> LocFileParams {
    LocFileParams {
        nature: "Document".into(),
        file: ItemFileWithContent::new(
            "doc.txt",
            "text/plain",
            HashOrContent::from_content(FileContent::bytes(content.as_bytes().to_vec())),
        )
        .unwrap(),
    }
}

/// Draft request by Bob, submitted and accepted by Alice.
async fn accepted_request(fixture: &Fixture, loc_type: LocType) -> AcceptedRequest {
    let requester = fixture.client(bob());
    let draft = requester
        .locs_state()
        .await
        .unwrap()
        .request_loc(RequestParams::new(alice(), loc_type, "Test LOC").as_draft())
        .await
        .unwrap()
        .into_draft()
        .unwrap();
    let draft = draft.add_metadata("Name", "Value").await.unwrap();
    let loc_id = draft.loc_id();
    draft.submit().await.unwrap();

    let officer = fixture.client(alice());
    let pending = officer
        .locs_state()
        .await
        .unwrap()
        .state(&loc_id)
        .unwrap()
        .into_pending()
        .unwrap();
    pending.accept().await.unwrap();

    requester
        .locs_state()
        .await
        .unwrap()
        .state(&loc_id)
        .unwrap()
        .into_accepted()
        .unwrap()
}

#[tokio::test]
async fn test_draft_submit_reject_rework() {
    let fixture = Fixture::new();
    let requester = fixture.client(bob());
    let draft = requester
        .locs_state()
        .await
        .unwrap()
        .request_loc(RequestParams::new(alice(), LocType::Transaction, "Deal").as_draft())
        .await
        .unwrap()
        .into_draft()
        .unwrap();
    assert_eq!(draft.data().unwrap().requester, Some(bob()));
    let pending = draft.submit().await.unwrap();
    let loc_id = pending.loc_id();

    let officer = fixture.client(alice());
    let pending = officer
        .locs_state()
        .await
        .unwrap()
        .state(&loc_id)
        .unwrap()
        .into_pending()
        .unwrap();
    let rejected = pending.reject("Because.").await.unwrap();
    assert_eq!(rejected.reject_reason().unwrap(), Some("Because."));

    let rejected = requester
        .locs_state()
        .await
        .unwrap()
        .state(&loc_id)
        .unwrap()
        .into_rejected()
        .unwrap();
    let draft = rejected.rework().await.unwrap();
    assert_eq!(draft.data().unwrap().reject_reason, None);
}

#[tokio::test]
async fn test_request_by_legal_officer_has_no_requester() {
    let fixture = Fixture::new();
    let state = fixture
        .client(alice())
        .locs_state()
        .await
        .unwrap()
        .request_loc(RequestParams::new(alice(), LocType::Transaction, "Own"))
        .await
        .unwrap();
    assert_eq!(state.kind(), StateKind::Pending);
    assert_eq!(state.data().unwrap().requester, None);
}

#[tokio::test]
async fn test_transition_discards_snapshot() {
    let fixture = Fixture::new();
    let requester = fixture.client(bob());
    let locs = requester.locs_state().await.unwrap();
    let first = locs
        .request_loc(RequestParams::new(alice(), LocType::Transaction, "First").as_draft())
        .await
        .unwrap();
    assert!(locs.is_discarded());
    assert!(matches!(locs.locs(), Err(LocError::StaleState)));

    let locs = first.locs_state().clone();
    let second = locs
        .request_loc(RequestParams::new(alice(), LocType::Transaction, "Second").as_draft())
        .await
        .unwrap();
    assert!(first.is_discarded());
    let failed = first.into_draft().unwrap().submit().await.unwrap_err();
    assert!(matches!(failed.error(), LocError::StaleState));

    let states = second.locs_state().states().unwrap();
    assert_eq!(states.len(), 2);
}

#[tokio::test]
async fn test_cancel_removes_loc() {
    let fixture = Fixture::new();
    let draft = fixture
        .client(bob())
        .locs_state()
        .await
        .unwrap()
        .request_loc(RequestParams::new(alice(), LocType::Transaction, "Gone").as_draft())
        .await
        .unwrap()
        .into_draft()
        .unwrap();
    let loc_id = draft.loc_id();
    let locs = draft.cancel().await.unwrap();
    assert!(matches!(locs.loc(&loc_id), Err(LocError::NotFound(_))));
    assert!(fixture.node.request(&loc_id).is_none());
}

#[tokio::test]
async fn test_open_publish_acknowledge_close() {
    let fixture = Fixture::new();
    let accepted = accepted_request(&fixture, LocType::Transaction).await;
    let open = accepted
        .open(OpenParams {
            auto_publish: Some(true),
        })
        .await
        .unwrap();
    let entry = open.data().unwrap().metadata_item("Name").unwrap().clone();
    assert_eq!(entry.status, ItemStatus::Published);

    let open = open.add_file(text_file("content")).await.unwrap();
    let hash = Hash::of("content");
    let open = open.request_file_review(hash).await.unwrap();
    let loc_id = open.loc_id();

    let officer = fixture.client(alice());
    let open = officer
        .locs_state()
        .await
        .unwrap()
        .state(&loc_id)
        .unwrap()
        .into_open()
        .unwrap();
    let open = open.review_file(hash, ReviewDecision::Accept).await.unwrap();
    let open = open.publish_file(hash).await.unwrap();
    let open = open.acknowledge_file(hash).await.unwrap();
    let open = open.acknowledge_metadata("Name").await.unwrap();

    let closed = open
        .close(CloseParams::default())
        .await
        .unwrap()
        .into_closed()
        .unwrap();
    let data = closed.data().unwrap();
    assert!(data.files.iter().all(|f| f.status == ItemStatus::Acknowledged));
    let case = fixture.ledger.query_loc(&loc_id).await.unwrap().unwrap();
    assert!(case.closed);
}

#[tokio::test]
async fn test_failed_close_keeps_live_state() {
    let fixture = Fixture::new();
    let open = accepted_request(&fixture, LocType::Transaction)
        .await
        .open(OpenParams {
            auto_publish: Some(true),
        })
        .await
        .unwrap();
    let loc_id = open.loc_id();
    let open = fixture
        .client(alice())
        .locs_state()
        .await
        .unwrap()
        .state(&loc_id)
        .unwrap()
        .into_open()
        .unwrap();

    let failed = open.close(CloseParams::default()).await.unwrap_err();
    assert!(matches!(failed.error(), LocError::Validation(_)));
    let open = failed.into_state();
    assert!(!open.is_discarded());

    let closed = open
        .close(CloseParams {
            seal: None,
            auto_ack: Some(true),
        })
        .await
        .unwrap();
    assert_eq!(closed.kind(), StateKind::Closed);
}

#[tokio::test]
async fn test_unexpected_stage_after_reload_keeps_live_state() {
    let fixture = Fixture::new();
    let open = accepted_request(&fixture, LocType::Transaction)
        .await
        .open(OpenParams::default())
        .await
        .unwrap();
    let loc_id = open.loc_id();
    // Closed on the ledger only; the backend still says open.
    fixture
        .ledger
        .submit(
            LedgerCall::Close {
                loc_id,
                seal: None,
                auto_ack: true,
            },
            &alice(),
        )
        .await
        .unwrap();

    let failed = open.add_metadata("Late", "entry").await.unwrap_err();
    assert!(matches!(
        failed.error(),
        LocError::UnexpectedState { actual, .. } if actual.as_str() == "Closed"
    ));
    let open = failed.into_state();
    assert!(!open.is_discarded());
    assert_eq!(open.data().unwrap().status, shared_types::LocRequestStatus::Open);
}

#[tokio::test]
async fn test_requester_cannot_close() {
    let fixture = Fixture::new();
    let open = accepted_request(&fixture, LocType::Transaction)
        .await
        .open(OpenParams::default())
        .await
        .unwrap();
    let failed = open.close(CloseParams::default()).await.unwrap_err();
    assert!(matches!(failed.error(), LocError::Forbidden(_)));
}

#[tokio::test]
async fn test_void_with_replacer() {
    let fixture = Fixture::new();
    let first = accepted_request(&fixture, LocType::Transaction)
        .await
        .open(OpenParams::default())
        .await
        .unwrap()
        .loc_id();
    let second = accepted_request(&fixture, LocType::Transaction)
        .await
        .open(OpenParams::default())
        .await
        .unwrap()
        .loc_id();

    let officer = fixture.client(alice());
    let open = officer
        .locs_state()
        .await
        .unwrap()
        .state(&first)
        .unwrap()
        .into_open()
        .unwrap();
    let failed = open
        .make_void(VoidParams::new("Typo").replaced_by(first))
        .await
        .unwrap_err();
    assert!(matches!(failed.error(), LocError::Validation(_)));

    let voided = failed
        .into_state()
        .make_void(VoidParams::new("Typo").replaced_by(second))
        .await
        .unwrap()
        .into_voided()
        .unwrap();
    assert_eq!(voided.replacer().unwrap(), Some(second));
}
