//! Open LOC
//!
//! Items are added, reviewed, published and acknowledged one by one until
//! the legal officer closes or voids the LOC.

use super::state::{Handle, LocState};
use crate::algorithms::{chain_file, chain_link, chain_metadata, check_closable};
use crate::domain::{settle, CloseParams, Failed, LocFileParams, StateKind, VoidParams};
use loc_04_reconciler::{ItemRef, LedgerCall, LocData, LocIssuer, ReviewDecision};
use shared_types::{AccountId, Hash, ItemStatus, LocError, LocId, LocType};

/// Status, submitter and ledger call publishing `item`.
fn publication_of(
    data: &LocData,
    item: &ItemRef,
) -> Result<(ItemStatus, AccountId, LedgerCall), LocError> {
    let loc_id = data.id;
    let missing = || LocError::NotFound(format!("{} in LOC {}", item, loc_id));
    match item {
        ItemRef::File(hash) => {
            let file = data.file(hash).ok_or_else(missing)?;
            Ok((
                file.status,
                file.submitter.clone(),
                LedgerCall::AddFile {
                    loc_id,
                    file: chain_file(file),
                },
            ))
        }
        ItemRef::Metadata(name) => {
            let entry = data
                .metadata
                .iter()
                .find(|m| &m.name_hash() == name)
                .ok_or_else(missing)?;
            Ok((
                entry.status,
                entry.submitter.clone(),
                LedgerCall::AddMetadata {
                    loc_id,
                    item: chain_metadata(entry),
                },
            ))
        }
        ItemRef::Link(target) => {
            let link = data.link(target).ok_or_else(missing)?;
            Ok((
                link.status,
                link.submitter.clone(),
                LedgerCall::AddLink {
                    loc_id,
                    link: chain_link(link),
                },
            ))
        }
    }
}

/// Status of `item` and ledger call acknowledging it.
fn acknowledgement_of(data: &LocData, item: &ItemRef) -> Result<(ItemStatus, LedgerCall), LocError> {
    let loc_id = data.id;
    let missing = || LocError::NotFound(format!("{} in LOC {}", item, loc_id));
    match item {
        ItemRef::File(hash) => Ok((
            data.file(hash).ok_or_else(missing)?.status,
            LedgerCall::AcknowledgeFile {
                loc_id,
                hash: *hash,
            },
        )),
        ItemRef::Metadata(name) => Ok((
            data.metadata
                .iter()
                .find(|m| &m.name_hash() == name)
                .ok_or_else(missing)?
                .status,
            LedgerCall::AcknowledgeMetadata {
                loc_id,
                name: *name,
            },
        )),
        ItemRef::Link(target) => Ok((
            data.link(target).ok_or_else(missing)?.status,
            LedgerCall::AcknowledgeLink {
                loc_id,
                target: *target,
            },
        )),
    }
}

/// Open LOC.
#[derive(Debug)]
pub struct OpenLoc {
    pub(super) handle: Handle,
}

impl OpenLoc {
    fn check_not_identity(&self, operation: &str) -> Result<(), LocError> {
        let data = self.handle.data()?;
        if data.loc_type == LocType::Identity {
            return Err(LocError::invalid_transition("open Identity LOC", operation));
        }
        Ok(())
    }

    /// Add a metadata entry.
    pub async fn add_metadata(self, name: &str, value: &str) -> Result<OpenLoc, Failed<Self>> {
        let outcome = async {
            self.check_not_identity("add metadata")?;
            self.handle.add_metadata(name, value).await?;
            self.handle
                .refreshed("add metadata", &[StateKind::Open])
                .await?
                .into_open()
        }
        .await;
        settle(self, outcome)
    }

    /// Add a file with its content.
    pub async fn add_file(self, params: LocFileParams) -> Result<OpenLoc, Failed<Self>> {
        let outcome = async {
            self.check_not_identity("add file")?;
            self.handle.add_file(params).await?;
            self.handle
                .refreshed("add file", &[StateKind::Open])
                .await?
                .into_open()
        }
        .await;
        settle(self, outcome)
    }

    /// Link another LOC.
    pub async fn add_link(self, target: LocId, nature: &str) -> Result<OpenLoc, Failed<Self>> {
        let outcome = async {
            self.check_not_identity("add link")?;
            self.handle.add_link(target, nature).await?;
            self.handle
                .refreshed("add link", &[StateKind::Open])
                .await?
                .into_open()
        }
        .await;
        settle(self, outcome)
    }

    /// Delete a metadata entry not yet published.
    pub async fn delete_metadata(self, name: &str) -> Result<OpenLoc, Failed<Self>> {
        self.delete(ItemRef::metadata(name)).await
    }

    /// Delete a file not yet published.
    pub async fn delete_file(self, hash: Hash) -> Result<OpenLoc, Failed<Self>> {
        self.delete(ItemRef::File(hash)).await
    }

    /// Delete a link not yet published.
    pub async fn delete_link(self, target: LocId) -> Result<OpenLoc, Failed<Self>> {
        self.delete(ItemRef::Link(target)).await
    }

    async fn delete(self, item: ItemRef) -> Result<OpenLoc, Failed<Self>> {
        let outcome = async {
            self.handle.delete_item(item).await?;
            self.handle
                .refreshed("delete item", &[StateKind::Open])
                .await?
                .into_open()
        }
        .await;
        settle(self, outcome)
    }

    /// Ask the legal officer to review a file.
    pub async fn request_file_review(self, hash: Hash) -> Result<OpenLoc, Failed<Self>> {
        self.request_review(ItemRef::File(hash)).await
    }

    /// Ask the legal officer to review a metadata entry.
    pub async fn request_metadata_review(self, name: &str) -> Result<OpenLoc, Failed<Self>> {
        self.request_review(ItemRef::metadata(name)).await
    }

    async fn request_review(self, item: ItemRef) -> Result<OpenLoc, Failed<Self>> {
        let outcome = async {
            self.check_not_identity("request review")?;
            let data = self.handle.data()?;
            self.handle.node()?.request_review(&data.id, &item).await?;
            self.handle
                .refreshed("request review", &[StateKind::Open])
                .await?
                .into_open()
        }
        .await;
        settle(self, outcome)
    }

    /// Accept or reject a file under review.
    pub async fn review_file(
        self,
        hash: Hash,
        decision: ReviewDecision,
    ) -> Result<OpenLoc, Failed<Self>> {
        self.review(ItemRef::File(hash), decision).await
    }

    /// Accept or reject a metadata entry under review.
    pub async fn review_metadata(
        self,
        name: &str,
        decision: ReviewDecision,
    ) -> Result<OpenLoc, Failed<Self>> {
        self.review(ItemRef::metadata(name), decision).await
    }

    async fn review(self, item: ItemRef, decision: ReviewDecision) -> Result<OpenLoc, Failed<Self>> {
        let outcome = async {
            let data = self.handle.as_owner("review items")?;
            self.handle
                .node()?
                .review_item(&data.id, &item, &decision)
                .await?;
            self.handle
                .refreshed("review", &[StateKind::Open])
                .await?
                .into_open()
        }
        .await;
        settle(self, outcome)
    }

    /// Publish an accepted file on the ledger.
    pub async fn publish_file(self, hash: Hash) -> Result<OpenLoc, Failed<Self>> {
        self.publish(ItemRef::File(hash)).await
    }

    /// Publish an accepted metadata entry on the ledger.
    pub async fn publish_metadata(self, name: &str) -> Result<OpenLoc, Failed<Self>> {
        self.publish(ItemRef::metadata(name)).await
    }

    /// Publish a link on the ledger.
    pub async fn publish_link(self, target: LocId) -> Result<OpenLoc, Failed<Self>> {
        self.publish(ItemRef::Link(target)).await
    }

    async fn publish(self, item: ItemRef) -> Result<OpenLoc, Failed<Self>> {
        let outcome = async {
            let data = self.handle.data()?;
            let (status, submitter, call) = publication_of(data, &item)?;
            let caller = self.handle.caller();
            if &submitter != caller && !data.is_owner(caller) {
                return Err(LocError::Forbidden(format!(
                    "only the submitter of {} can publish it",
                    item
                )));
            }
            let publishable = match item {
                ItemRef::Link(_) => status.can_link_transition_to(ItemStatus::Published),
                _ => status.can_transition_to(ItemStatus::Published),
            };
            if !publishable {
                return Err(LocError::invalid_transition(status, "publish"));
            }
            self.handle.client().submit(call).await?;
            self.handle.node()?.confirm_item(&data.id, &item).await?;
            self.handle
                .refreshed("publish", &[StateKind::Open])
                .await?
                .into_open()
        }
        .await;
        settle(self, outcome)
    }

    /// Acknowledge a published file.
    pub async fn acknowledge_file(self, hash: Hash) -> Result<OpenLoc, Failed<Self>> {
        self.acknowledge(ItemRef::File(hash)).await
    }

    /// Acknowledge a published metadata entry.
    pub async fn acknowledge_metadata(self, name: &str) -> Result<OpenLoc, Failed<Self>> {
        self.acknowledge(ItemRef::metadata(name)).await
    }

    /// Acknowledge a published link.
    pub async fn acknowledge_link(self, target: LocId) -> Result<OpenLoc, Failed<Self>> {
        self.acknowledge(ItemRef::Link(target)).await
    }

    async fn acknowledge(self, item: ItemRef) -> Result<OpenLoc, Failed<Self>> {
        let outcome = async {
            let data = self.handle.as_owner("acknowledge items")?;
            let (status, call) = acknowledgement_of(data, &item)?;
            if status != ItemStatus::Published {
                return Err(LocError::invalid_transition(status, "acknowledge"));
            }
            self.handle.client().submit(call).await?;
            self.handle
                .node()?
                .confirm_acknowledged(&data.id, &item)
                .await?;
            self.handle
                .refreshed("acknowledge", &[StateKind::Open])
                .await?
                .into_open()
        }
        .await;
        settle(self, outcome)
    }

    /// Issuers as visible to the caller.
    pub async fn issuers(&self) -> Result<Vec<LocIssuer>, LocError> {
        self.handle.issuers().await
    }

    /// Select or unselect a verified issuer.
    pub async fn select_issuer(
        self,
        issuer: &AccountId,
        selected: bool,
    ) -> Result<OpenLoc, Failed<Self>> {
        let outcome = async {
            self.handle
                .select_issuer(issuer, selected)
                .await?
                .into_open()
        }
        .await;
        settle(self, outcome)
    }

    /// Close the LOC: `Closed`, or `ClosedCollection` for a collection.
    pub async fn close(self, params: CloseParams) -> Result<LocState, Failed<Self>> {
        let outcome = async {
            let data = self.handle.as_owner("close")?;
            let auto_ack = params
                .auto_ack
                .unwrap_or(self.handle.client().config().auto_ack_on_close);
            check_closable(data, auto_ack)?;
            self.handle
                .client()
                .submit(LedgerCall::Close {
                    loc_id: data.id,
                    seal: params.seal,
                    auto_ack,
                })
                .await?;
            self.handle
                .node()?
                .close_request(&data.id, params.seal)
                .await?;
            self.handle
                .refreshed("close", &[StateKind::Closed, StateKind::ClosedCollection])
                .await
        }
        .await;
        settle(self, outcome)
    }

    /// Void the LOC: `Voided`, or `VoidedCollection` for a collection.
    pub async fn make_void(self, params: VoidParams) -> Result<LocState, Failed<Self>> {
        let outcome = self.handle.make_void(&params.reason, params.replacer).await;
        settle(self, outcome)
    }
}
