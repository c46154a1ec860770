//! # Test Fixtures
//!
//! Substrate dev accounts, one in-memory node per legal officer and a
//! shared in-memory ledger.

use loc_01_content_addressing::{FileContent, HashOrContent, ItemFileWithContent};
use loc_04_reconciler::{InMemoryLedger, InMemoryNode, Node};
use loc_05_lifecycle::{
    AcceptedRequest, ClientConfig, ClosedCollectionLoc, LocClient, LocState, OpenParams,
    RequestParams,
};
use shared_types::{AccountId, CollectionParams, Hash, IssuerRecord, LocId, LocType};
use std::sync::Arc;

pub const ALICE: &str = "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY";
pub const BOB: &str = "5FHneW46xGXgs5mUiveU4sbTyGBzmstUspZC92UhjJM694ty";
pub const CHARLIE: &str = "5FLSigC9HGRKVhB9FiEo4Y3koPsNmBmLJbpXg2mp1hXcS59Y";
pub const DAVE: &str = "5DAAnrj7VHTznn2AWBemMuyBwZWs6FNFjdyVXUeYum3PTXFy";

pub fn account(address: &str) -> AccountId {
    AccountId::polkadot(address).unwrap()
}

pub fn alice() -> AccountId {
    account(ALICE)
}

pub fn bob() -> AccountId {
    account(BOB)
}

pub fn charlie() -> AccountId {
    account(CHARLIE)
}

pub fn dave() -> AccountId {
    account(DAVE)
}

/// Ledger plus the nodes of Alice, Charlie and Dave.
pub struct Federation {
    pub ledger: Arc<InMemoryLedger>,
    pub nodes: Vec<InMemoryNode>,
}

impl Federation {
    pub fn new() -> Self {
        Self {
            ledger: Arc::new(InMemoryLedger::new()),
            nodes: vec![
                InMemoryNode::new("node-alice", alice()),
                InMemoryNode::new("node-charlie", charlie()),
                InMemoryNode::new("node-dave", dave()),
            ],
        }
    }

    /// Node of Alice.
    pub fn alice_node(&self) -> &InMemoryNode {
        &self.nodes[0]
    }

    /// Client of `caller` with a session on every node.
    pub fn client(&self, caller: AccountId) -> LocClient {
        let sessions: Vec<Node> = self
            .nodes
            .iter()
            .map(|node| Arc::new(node.session(caller.clone())) as Node)
            .collect();
        LocClient::new(self.ledger.clone(), sessions, caller)
            .with_config(ClientConfig::for_testing())
    }

    /// Current state of `loc_id` as seen by `caller`.
    pub async fn state_of(&self, caller: AccountId, loc_id: &LocId) -> LocState {
        self.client(caller)
            .locs_state()
            .await
            .unwrap()
            .find_loc(loc_id)
            .await
            .unwrap()
    }

    /// Request of Bob to Alice, submitted then accepted.
    pub async fn accepted_request(&self, loc_type: LocType, description: &str) -> AcceptedRequest {
        let pending = self
            .client(bob())
            .locs_state()
            .await
            .unwrap()
            .request_loc(RequestParams::new(alice(), loc_type, description))
            .await
            .unwrap();
        let loc_id = pending.loc_id();
        let pending = self
            .state_of(alice(), &loc_id)
            .await
            .into_pending()
            .unwrap();
        if loc_type == LocType::Collection {
            pending.accept_collection().await.unwrap();
        } else {
            pending.accept().await.unwrap();
        }
        self.state_of(bob(), &loc_id)
            .await
            .into_accepted()
            .unwrap()
    }

    /// Collection of Bob, opened with `params` and closed by Alice.
    pub async fn closed_collection(&self, params: CollectionParams) -> ClosedCollectionLoc {
        let open = self
            .accepted_request(LocType::Collection, "Collection")
            .await
            .open_collection(params, OpenParams::default())
            .await
            .unwrap();
        let loc_id = open.loc_id();
        self.state_of(alice(), &loc_id)
            .await
            .into_open()
            .unwrap()
            .close(Default::default())
            .await
            .unwrap();
        self.state_of(bob(), &loc_id)
            .await
            .into_closed_collection()
            .unwrap()
    }

    /// Register Charlie as a verified issuer of Alice.
    pub fn register_charlie(&self) {
        self.alice_node().register_verified_issuer(IssuerRecord {
            address: charlie(),
            first_name: "Charlie".into(),
            last_name: "Issuer".into(),
            identity_loc_id: None,
        });
    }
}

/// A text file known by its content.
pub fn file_with_content(name: &str, content: &str) -> ItemFileWithContent {
    ItemFileWithContent::new(
        name,
        "text/plain",
        HashOrContent::from_content(FileContent::bytes(content.as_bytes().to_vec())),
    )
    .unwrap()
}

/// A text file known only by its hash and size.
pub fn file_by_hash(name: &str, content: &str) -> ItemFileWithContent {
    ItemFileWithContent::new(
        name,
        "text/plain",
        HashOrContent::from_hash(Hash::of(content), Some(content.len() as u64)),
    )
    .unwrap()
}

pub fn uploadable() -> CollectionParams {
    CollectionParams {
        last_block_submission: None,
        max_size: None,
        can_upload: true,
    }
}
