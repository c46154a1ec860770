//! # Inbound Ports
//!
//! Read-only queries over the merged ledger and backend views.

use crate::domain::{CollectionItem, LocData, LocIssuer, LocRequestFilter, TokensRecord};
use async_trait::async_trait;
use shared_types::{AccountId, Hash, LocError, LocId};

/// Reconciler API - inbound port.
#[async_trait]
pub trait ReconcilerApi: Send + Sync {
    /// Merged view of a LOC.
    async fn fetch_loc_data(&self, loc_id: &LocId) -> Result<LocData, LocError>;

    /// Merged views of every LOC matching `filter` on the nodes in scope.
    async fn fetch_all_locs(&self, filter: &LocRequestFilter) -> Result<Vec<LocData>, LocError>;

    /// One collection item, `None` when the ledger does not have it.
    async fn get_collection_item(
        &self,
        collection_loc_id: &LocId,
        item_id: &Hash,
    ) -> Result<Option<CollectionItem>, LocError>;

    /// Every item of a collection.
    async fn get_collection_items(
        &self,
        collection_loc_id: &LocId,
    ) -> Result<Vec<CollectionItem>, LocError>;

    /// One tokens record, `None` when the ledger does not have it.
    async fn get_tokens_record(
        &self,
        collection_loc_id: &LocId,
        record_id: &Hash,
    ) -> Result<Option<TokensRecord>, LocError>;

    /// Every tokens record of a collection.
    async fn get_tokens_records(
        &self,
        collection_loc_id: &LocId,
    ) -> Result<Vec<TokensRecord>, LocError>;

    /// Issuers of a LOC as visible to `caller`.
    async fn get_loc_issuers(
        &self,
        loc: &LocData,
        caller: &AccountId,
    ) -> Result<Vec<LocIssuer>, LocError>;
}
