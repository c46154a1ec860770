//! Reconciler Service
//!
//! Implements `ReconcilerApi`: reads the ledger first, then the backend
//! of the LOC's owner when the ledger names one, otherwise every node.

use crate::algorithms::{
    build_loc_data, merge_issuers, reconcile, reconcile_all, CollectionItemPolicy,
    TokensRecordPolicy,
};
use crate::domain::{CollectionItem, LocData, LocIssuer, LocRequestFilter, TokensRecord};
use crate::ports::inbound::ReconcilerApi;
use crate::ports::outbound::{LedgerClient, LocBackend};
use async_trait::async_trait;
use futures::future::try_join_all;
use loc_03_aggregator::{AggregatorConfig, MultiSourceClient, Source};
use shared_types::{AccountId, Hash, LocError, LocId, LocRequestStatus};
use std::sync::Arc;
use tracing::debug;

/// A node session as held by the reconciler.
pub type Node = Arc<dyn LocBackend>;

/// Merges ledger and backend data for one caller.
#[derive(Clone)]
pub struct Reconciler {
    ledger: Arc<dyn LedgerClient>,
    nodes: MultiSourceClient<Node>,
    config: AggregatorConfig,
}

impl Reconciler {
    /// Reconciler over every node session.
    pub fn new(ledger: Arc<dyn LedgerClient>, nodes: Vec<Node>) -> Self {
        Self {
            ledger,
            nodes: MultiSourceClient::new(nodes),
            config: AggregatorConfig::default(),
        }
    }

    /// Replace the aggregation settings.
    pub fn with_config(mut self, config: AggregatorConfig) -> Self {
        self.nodes = self.nodes.with_config(config.clone());
        self.config = config;
        self
    }

    /// Ledger client.
    pub fn ledger(&self) -> &Arc<dyn LedgerClient> {
        &self.ledger
    }

    /// Nodes in scope.
    pub fn nodes(&self) -> &MultiSourceClient<Node> {
        &self.nodes
    }

    /// Session on the node of `legal_officer`.
    pub fn node_of(&self, legal_officer: &AccountId) -> Result<Node, LocError> {
        self.nodes
            .sources()
            .iter()
            .find(|node| node.legal_officer() == legal_officer)
            .cloned()
            .ok_or_else(|| LocError::UnknownLegalOfficer(legal_officer.to_string()))
    }

    /// A reconciler restricted to the node of `legal_officer`.
    pub fn pinned_to(&self, legal_officer: &AccountId) -> Result<Reconciler, LocError> {
        let node = self.node_of(legal_officer)?;
        Ok(Self {
            ledger: self.ledger.clone(),
            nodes: MultiSourceClient::pinned(node).with_config(self.config.clone()),
            config: self.config.clone(),
        })
    }

    /// Nodes to ask about a LOC owned by `owner`.
    fn scope_for(&self, owner: &AccountId) -> MultiSourceClient<Node> {
        if self.nodes.is_pinned() {
            return self.nodes.clone();
        }
        match self.node_of(owner) {
            Ok(node) => MultiSourceClient::pinned(node).with_config(self.config.clone()),
            Err(_) => self.nodes.clone(),
        }
    }

    async fn scope_for_loc(&self, loc_id: &LocId) -> Result<MultiSourceClient<Node>, LocError> {
        Ok(match self.ledger.query_loc(loc_id).await? {
            Some(case) => self.scope_for(&case.owner),
            None => self.nodes.clone(),
        })
    }

    /// Merged view of a LOC as known to `node`.
    pub async fn fetch_loc_data_on(
        &self,
        node: &dyn LocBackend,
        loc_id: &LocId,
    ) -> Result<LocData, LocError> {
        let request = node.fetch_request(loc_id).await?;
        let chain = self.ledger.query_loc(loc_id).await?;
        build_loc_data(request, chain)
    }
}

#[async_trait]
impl ReconcilerApi for Reconciler {
    async fn fetch_loc_data(&self, loc_id: &LocId) -> Result<LocData, LocError> {
        let chain = self.ledger.query_loc(loc_id).await?;
        let nodes = match &chain {
            Some(case) => self.scope_for(&case.owner),
            None => self.nodes.clone(),
        };
        let request = nodes
            .fetch_any(|node| node.find_request(loc_id))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| LocError::NotFound(format!("LOC {}", loc_id)))?;
        debug!(
            "[loc-04] Building LOC {} (on chain: {})",
            loc_id,
            chain.is_some()
        );
        build_loc_data(request, chain)
    }

    async fn fetch_all_locs(&self, filter: &LocRequestFilter) -> Result<Vec<LocData>, LocError> {
        let requests = self
            .nodes
            .fetch_all(|node| node.list_requests(filter))
            .await?;
        let ledger = &self.ledger;
        try_join_all(requests.into_iter().map(|request| async move {
            // The ledger may be ahead of the backend; only drafts are never on it.
            let chain = match request.status {
                LocRequestStatus::Draft => None,
                _ => ledger.query_loc(&request.id).await?,
            };
            build_loc_data(request, chain)
        }))
        .await
    }

    async fn get_collection_item(
        &self,
        collection_loc_id: &LocId,
        item_id: &Hash,
    ) -> Result<Option<CollectionItem>, LocError> {
        let Some(chain) = self
            .ledger
            .query_collection_item(collection_loc_id, item_id)
            .await?
        else {
            return Ok(None);
        };
        let record = self
            .scope_for_loc(collection_loc_id)
            .await?
            .fetch_any(|node| node.find_collection_item(collection_loc_id, item_id))
            .await?
            .into_iter()
            .next();
        reconcile::<CollectionItemPolicy>(Some(chain), record, item_id)
    }

    async fn get_collection_items(
        &self,
        collection_loc_id: &LocId,
    ) -> Result<Vec<CollectionItem>, LocError> {
        let chain = self.ledger.query_collection_items(collection_loc_id).await?;
        if chain.is_empty() {
            return Ok(Vec::new());
        }
        let records = self
            .scope_for_loc(collection_loc_id)
            .await?
            .fetch_all(|node| node.list_collection_items(collection_loc_id))
            .await?;
        reconcile_all::<CollectionItemPolicy>(chain, records)
    }

    async fn get_tokens_record(
        &self,
        collection_loc_id: &LocId,
        record_id: &Hash,
    ) -> Result<Option<TokensRecord>, LocError> {
        let Some(chain) = self
            .ledger
            .query_tokens_record(collection_loc_id, record_id)
            .await?
        else {
            return Ok(None);
        };
        let record = self
            .scope_for_loc(collection_loc_id)
            .await?
            .fetch_any(|node| node.find_tokens_record(collection_loc_id, record_id))
            .await?
            .into_iter()
            .next();
        reconcile::<TokensRecordPolicy>(Some(chain), record, record_id)
    }

    async fn get_tokens_records(
        &self,
        collection_loc_id: &LocId,
    ) -> Result<Vec<TokensRecord>, LocError> {
        let chain = self.ledger.query_tokens_records(collection_loc_id).await?;
        if chain.is_empty() {
            return Ok(Vec::new());
        }
        let records = self
            .scope_for_loc(collection_loc_id)
            .await?
            .fetch_all(|node| node.list_tokens_records(collection_loc_id))
            .await?;
        reconcile_all::<TokensRecordPolicy>(chain, records)
    }

    async fn get_loc_issuers(
        &self,
        loc: &LocData,
        caller: &AccountId,
    ) -> Result<Vec<LocIssuer>, LocError> {
        let selected = self.ledger.query_selected_issuers(&loc.id).await?;
        let nodes = self.scope_for(&loc.owner);
        let backend = nodes.fetch_all(|node| node.list_issuers(&loc.id)).await?;
        debug!(
            "[loc-04] Issuers of {}: {} selected on chain, {} known to {} node(s)",
            loc.id,
            selected.len(),
            backend.len(),
            nodes.sources().len()
        );
        Ok(merge_issuers(loc, caller, &selected, backend))
    }
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let nodes: Vec<&str> = self.nodes.sources().iter().map(|n| n.source_id()).collect();
        f.debug_struct("Reconciler").field("nodes", &nodes).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryLedger, InMemoryNode};
    use crate::domain::CreateLocRequest;
    use crate::ports::outbound::{InitialItems, LedgerCall};
    use shared_types::{ChainItemFile, CollectionParams, IssuerRecord, LocType};

    const ALICE: &str = "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY";
    const BOB: &str = "5FHneW46xGXgs5mUiveU4sbTyGBzmstUspZC92UhjJM694ty";
    const CHARLIE: &str = "5FLSigC9HGRKVhB9FiEo4Y3koPsNmBmLJbpXg2mp1hXcS59Y";

    fn account(address: &str) -> AccountId {
        AccountId::polkadot(address).unwrap()
    }

    struct Fixture {
        ledger: Arc<InMemoryLedger>,
        alice_node: InMemoryNode,
        charlie_node: InMemoryNode,
        reconciler: Reconciler,
    }

    /// Two nodes (Alice, Charlie), the caller is Bob.
    fn fixture() -> Fixture {
        let ledger = Arc::new(InMemoryLedger::new());
        let alice_node = InMemoryNode::new("alice-node", account(ALICE));
        let charlie_node = InMemoryNode::new("charlie-node", account(CHARLIE));
        let nodes: Vec<Node> = vec![
            Arc::new(alice_node.session(account(BOB))) as Node,
            Arc::new(charlie_node.session(account(BOB))) as Node,
        ];
        let reconciler = Reconciler::new(ledger.clone(), nodes);
        Fixture {
            ledger,
            alice_node,
            charlie_node,
            reconciler,
        }
    }

    fn create_params(owner: &str, loc_type: LocType) -> CreateLocRequest {
        CreateLocRequest {
            owner: account(owner),
            requester: Some(account(BOB)),
            requester_loc_id: None,
            description: "Test".into(),
            loc_type,
            draft: true,
            template: None,
            sponsorship_id: None,
        }
    }

    async fn closed_collection_on_chain(ledger: &InMemoryLedger, loc_id: LocId) {
        let create = LedgerCall::CreateLoc {
            loc_id,
            loc_type: LocType::Collection,
            owner: account(ALICE),
            requester: Some(account(BOB)),
            requester_loc_id: None,
            collection: Some(CollectionParams {
                last_block_submission: None,
                max_size: None,
                can_upload: true,
            }),
            sponsorship_id: None,
            items: InitialItems::default(),
        };
        ledger.submit(create, &account(BOB)).await.unwrap();
        let close = LedgerCall::Close {
            loc_id,
            seal: None,
            auto_ack: false,
        };
        ledger.submit(close, &account(ALICE)).await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_draft_through_fan_out() {
        let f = fixture();
        let request = f
            .charlie_node
            .session(account(BOB))
            .create_request(&create_params(CHARLIE, LocType::Transaction))
            .await
            .unwrap();
        f.alice_node.set_unreachable(true);

        let data = f.reconciler.fetch_loc_data(&request.id).await.unwrap();
        assert_eq!(data.owner, account(CHARLIE));
        assert!(!data.on_chain);
    }

    #[tokio::test]
    async fn test_fetch_unknown_loc() {
        let f = fixture();
        let result = f.reconciler.fetch_loc_data(&LocId::new_random()).await;
        assert!(matches!(result, Err(LocError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_fetch_all_locs_tolerates_one_node() {
        let f = fixture();
        for owner in [ALICE, CHARLIE] {
            let node = if owner == ALICE { &f.alice_node } else { &f.charlie_node };
            node.session(account(BOB))
                .create_request(&create_params(owner, LocType::Transaction))
                .await
                .unwrap();
        }
        let filter = LocRequestFilter::by_requester(account(BOB));
        assert_eq!(f.reconciler.fetch_all_locs(&filter).await.unwrap().len(), 2);

        f.charlie_node.set_unreachable(true);
        assert_eq!(f.reconciler.fetch_all_locs(&filter).await.unwrap().len(), 1);

        f.alice_node.set_unreachable(true);
        assert!(matches!(
            f.reconciler.fetch_all_locs(&filter).await,
            Err(LocError::AllSourcesFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_chain_item_without_companion() {
        let f = fixture();
        let loc_id = LocId::new_random();
        closed_collection_on_chain(&f.ledger, loc_id).await;
        let item_id = Hash::of_str("item");
        let add = LedgerCall::AddCollectionItem {
            collection_loc_id: loc_id,
            item_id,
            description: Hash::of_str("Item"),
            files: vec![ChainItemFile {
                hash: Hash::of_str("12345"),
                size: 5,
            }],
            token: None,
            restricted_delivery: false,
            terms_and_conditions: Vec::new(),
        };
        f.ledger.submit(add, &account(BOB)).await.unwrap();

        let result = f.reconciler.get_collection_item(&loc_id, &item_id).await;
        assert!(matches!(
            result,
            Err(LocError::OffchainRecordNotFound {
                entity: "collection item",
                ..
            })
        ));
        let missing = f
            .reconciler
            .get_collection_item(&loc_id, &Hash::of_str("other"))
            .await
            .unwrap();
        assert!(missing.is_none());
        assert!(f
            .reconciler
            .get_tokens_records(&loc_id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_issuers_chain_only_synthesized() {
        let f = fixture();
        let request = f
            .alice_node
            .session(account(BOB))
            .create_request(&create_params(ALICE, LocType::Transaction))
            .await
            .unwrap();
        let data = f.reconciler.fetch_loc_data(&request.id).await.unwrap();
        f.alice_node.register_verified_issuer(IssuerRecord {
            address: account(CHARLIE),
            first_name: "Charlie".into(),
            last_name: "Issuer".into(),
            identity_loc_id: None,
        });

        let issuers = f
            .reconciler
            .get_loc_issuers(&data, &account(BOB))
            .await
            .unwrap();
        assert!(issuers.is_empty());

        f.alice_node
            .session(account(ALICE))
            .set_issuer_selection(&request.id, &account(CHARLIE), true)
            .await
            .unwrap();
        let issuers = f
            .reconciler
            .get_loc_issuers(&data, &account(BOB))
            .await
            .unwrap();
        assert_eq!(issuers.len(), 1);
        assert_eq!(issuers[0].first_name, "Charlie");
        assert!(issuers[0].selected);
    }

    #[test]
    fn test_pinned_to_unknown_officer() {
        let f = fixture();
        assert!(matches!(
            f.reconciler.pinned_to(&account(BOB)),
            Err(LocError::UnknownLegalOfficer(_))
        ));
        let pinned = f.reconciler.pinned_to(&account(ALICE)).unwrap();
        assert!(pinned.nodes().is_pinned());
    }
}
