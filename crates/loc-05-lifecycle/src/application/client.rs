//! LOC Client
//!
//! Entry point of the lifecycle API: one caller, one ledger, every
//! legal-officer node the caller has a session on.

use super::locs_state::LocsState;
use crate::config::ClientConfig;
use loc_03_aggregator::AggregatorConfig;
use loc_04_reconciler::{
    LedgerCall, LedgerClient, LocData, LocRequestFilter, Node, Reconciler, ReconcilerApi,
    TransactionResult,
};
use shared_types::{AccountId, LocError, LocId};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Lifecycle client of one caller.
#[derive(Clone)]
pub struct LocClient {
    reconciler: Reconciler,
    caller: AccountId,
    config: ClientConfig,
}

impl LocClient {
    /// Client signing with `caller`, over the caller's node sessions.
    pub fn new(ledger: Arc<dyn LedgerClient>, nodes: Vec<Node>, caller: AccountId) -> Self {
        Self {
            reconciler: Reconciler::new(ledger, nodes),
            caller,
            config: ClientConfig::default(),
        }
    }

    /// Replace the transition defaults.
    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the aggregation settings.
    pub fn with_aggregator_config(mut self, config: AggregatorConfig) -> Self {
        self.reconciler = self.reconciler.with_config(config);
        self
    }

    /// Signing account.
    pub fn caller(&self) -> &AccountId {
        &self.caller
    }

    /// Transition defaults.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Read side.
    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    /// Ledger client.
    pub fn ledger(&self) -> &Arc<dyn LedgerClient> {
        self.reconciler.ledger()
    }

    /// Session on the node of `legal_officer`.
    pub fn node_of(&self, legal_officer: &AccountId) -> Result<Node, LocError> {
        self.reconciler.node_of(legal_officer)
    }

    /// Any LOC by id: through its owner's node when the ledger knows it,
    /// otherwise through every node.
    pub async fn find_loc(&self, loc_id: &LocId) -> Result<LocData, LocError> {
        self.reconciler.fetch_loc_data(loc_id).await
    }

    /// Snapshot of every LOC the caller owns or requested.
    pub async fn locs_state(&self) -> Result<LocsState, LocError> {
        let locs = self
            .reconciler
            .fetch_all_locs(&LocRequestFilter::default())
            .await?;
        debug!("[loc-05] Loaded {} LOCs for {}", locs.len(), self.caller);
        Ok(LocsState::new(self.clone(), locs))
    }

    /// Sign and submit `call`.
    pub(crate) async fn submit(&self, call: LedgerCall) -> Result<TransactionResult, LocError> {
        let name = call.name();
        let loc_id = call.loc_id();
        let result = self.ledger().submit(call, &self.caller).await?;
        debug!(
            "[loc-05] {} on {} included in block {}",
            name, loc_id, result.block_number
        );
        Ok(result)
    }
}

impl fmt::Debug for LocClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocClient")
            .field("caller", &self.caller)
            .field("config", &self.config)
            .field("reconciler", &self.reconciler)
            .finish()
    }
}
