//! Request States
//!
//! A LOC before the ledger knows it: draft, pending, accepted or rejected.

use super::locs_state::LocsState;
use super::open::OpenLoc;
use super::state::{upload_of, Handle};
use crate::algorithms::{initial_publication, Publication};
use crate::domain::{settle, Failed, LocFileParams, OpenParams, StateKind};
use loc_04_reconciler::{AddFileParams, AddLinkParams, AddMetadataParams, ItemRef, LedgerCall};
use shared_types::{CollectionParams, Hash, ItemStatus, LocError, LocId, LocType};

/// Item additions and deletions shared by draft requests and open LOCs.
impl Handle {
    pub(crate) async fn add_metadata(&self, name: &str, value: &str) -> Result<(), LocError> {
        let data = self.data()?;
        if data.metadata_item(name).is_some() {
            return Err(LocError::validation(format!(
                "Metadata {} already exists",
                name
            )));
        }
        self.node()?
            .add_metadata(
                &data.id,
                &AddMetadataParams {
                    name: name.to_string(),
                    value: value.to_string(),
                },
            )
            .await
    }

    pub(crate) async fn add_file(&self, mut params: LocFileParams) -> Result<(), LocError> {
        let data = self.data()?;
        let upload = upload_of(&mut params.file).await?;
        if data.file(&upload.hash).is_some() {
            return Err(LocError::validation(format!(
                "File {} already exists",
                upload.hash
            )));
        }
        self.node()?
            .add_file(
                &data.id,
                &AddFileParams {
                    nature: params.nature,
                    upload,
                },
            )
            .await
    }

    pub(crate) async fn add_link(&self, target: LocId, nature: &str) -> Result<(), LocError> {
        let data = self.data()?;
        if target == data.id {
            return Err(LocError::validation("A LOC cannot link to itself"));
        }
        self.node()?
            .add_link(
                &data.id,
                &AddLinkParams {
                    target,
                    nature: nature.to_string(),
                },
            )
            .await
    }

    pub(crate) async fn delete_item(&self, item: ItemRef) -> Result<(), LocError> {
        let data = self.data()?;
        let status = match &item {
            ItemRef::File(hash) => data.file(hash).map(|f| f.status),
            ItemRef::Metadata(name) => data
                .metadata
                .iter()
                .find(|m| &m.name_hash() == name)
                .map(|m| m.status),
            ItemRef::Link(target) => data.link(target).map(|l| l.status),
        }
        .ok_or_else(|| LocError::NotFound(format!("{} in LOC {}", item, data.id)))?;
        let deletable = match item {
            ItemRef::Link(_) => status == ItemStatus::Draft,
            _ => status.is_deletable(),
        };
        if !deletable {
            return Err(LocError::invalid_transition(status, "delete item"));
        }
        self.node()?.delete_item(&data.id, &item).await
    }
}

/// Draft request, editable by the requester.
#[derive(Debug)]
pub struct DraftRequest {
    pub(super) handle: Handle,
}

impl DraftRequest {
    /// Add a metadata entry.
    pub async fn add_metadata(
        self,
        name: &str,
        value: &str,
    ) -> Result<DraftRequest, Failed<Self>> {
        let outcome = async {
            self.handle.add_metadata(name, value).await?;
            self.handle
                .refreshed("add metadata", &[StateKind::Draft])
                .await?
                .into_draft()
        }
        .await;
        settle(self, outcome)
    }

    /// Add a file with its content.
    pub async fn add_file(self, params: LocFileParams) -> Result<DraftRequest, Failed<Self>> {
        let outcome = async {
            self.handle.add_file(params).await?;
            self.handle
                .refreshed("add file", &[StateKind::Draft])
                .await?
                .into_draft()
        }
        .await;
        settle(self, outcome)
    }

    /// Link another LOC.
    pub async fn add_link(
        self,
        target: LocId,
        nature: &str,
    ) -> Result<DraftRequest, Failed<Self>> {
        let outcome = async {
            self.handle.add_link(target, nature).await?;
            self.handle
                .refreshed("add link", &[StateKind::Draft])
                .await?
                .into_draft()
        }
        .await;
        settle(self, outcome)
    }

    /// Delete a metadata entry.
    pub async fn delete_metadata(self, name: &str) -> Result<DraftRequest, Failed<Self>> {
        self.delete(ItemRef::metadata(name)).await
    }

    /// Delete a file.
    pub async fn delete_file(self, hash: Hash) -> Result<DraftRequest, Failed<Self>> {
        self.delete(ItemRef::File(hash)).await
    }

    /// Delete a link.
    pub async fn delete_link(self, target: LocId) -> Result<DraftRequest, Failed<Self>> {
        self.delete(ItemRef::Link(target)).await
    }

    async fn delete(self, item: ItemRef) -> Result<DraftRequest, Failed<Self>> {
        let outcome = async {
            self.handle.delete_item(item).await?;
            self.handle
                .refreshed("delete item", &[StateKind::Draft])
                .await?
                .into_draft()
        }
        .await;
        settle(self, outcome)
    }

    /// Submit for review by the legal officer.
    pub async fn submit(self) -> Result<PendingRequest, Failed<Self>> {
        let outcome = async {
            let data = self.handle.as_requester("submit")?;
            self.handle.node()?.submit_request(&data.id).await?;
            self.handle
                .refreshed("submit", &[StateKind::Pending])
                .await?
                .into_pending()
        }
        .await;
        settle(self, outcome)
    }

    /// Withdraw the request.
    pub async fn cancel(self) -> Result<LocsState, Failed<Self>> {
        let outcome = self.handle.cancel().await;
        settle(self, outcome)
    }
}

impl Handle {
    async fn cancel(&self) -> Result<LocsState, LocError> {
        let data = self.as_requester("cancel")?;
        self.node()?.cancel_request(&data.id).await?;
        self.removed("cancel")
    }
}

/// Submitted request awaiting the legal officer.
#[derive(Debug)]
pub struct PendingRequest {
    pub(super) handle: Handle,
}

impl PendingRequest {
    /// Accept the request.
    pub async fn accept(self) -> Result<AcceptedRequest, Failed<Self>> {
        let outcome = self.accept_as("accept").await;
        settle(self, outcome)
    }

    /// Accept a collection request.
    pub async fn accept_collection(self) -> Result<AcceptedRequest, Failed<Self>> {
        let outcome = async {
            let data = self.handle.data()?;
            if data.loc_type != LocType::Collection {
                return Err(LocError::invalid_transition(
                    format!("{} request", data.loc_type),
                    "accept collection",
                ));
            }
            self.accept_as("accept collection").await
        }
        .await;
        settle(self, outcome)
    }

    async fn accept_as(&self, operation: &str) -> Result<AcceptedRequest, LocError> {
        let data = self.handle.as_owner(operation)?;
        self.handle.node()?.accept_request(&data.id).await?;
        self.handle
            .refreshed(operation, &[StateKind::Accepted])
            .await?
            .into_accepted()
    }

    /// Reject the request with a reason shown to the requester.
    pub async fn reject(self, reason: &str) -> Result<RejectedRequest, Failed<Self>> {
        let outcome = async {
            let data = self.handle.as_owner("reject")?;
            self.handle.node()?.reject_request(&data.id, reason).await?;
            self.handle
                .refreshed("reject", &[StateKind::Rejected])
                .await?
                .into_rejected()
        }
        .await;
        settle(self, outcome)
    }

    /// Withdraw the request.
    pub async fn cancel(self) -> Result<LocsState, Failed<Self>> {
        let outcome = self.handle.cancel().await;
        settle(self, outcome)
    }
}

/// Accepted request, ready to open.
#[derive(Debug)]
pub struct AcceptedRequest {
    pub(super) handle: Handle,
}

impl AcceptedRequest {
    /// Create the LOC on the ledger and open it.
    pub async fn open(self, params: OpenParams) -> Result<OpenLoc, Failed<Self>> {
        let outcome = self.open_with(None, params).await;
        settle(self, outcome)
    }

    /// Create the collection LOC on the ledger with its limits and open it.
    pub async fn open_collection(
        self,
        collection: CollectionParams,
        params: OpenParams,
    ) -> Result<OpenLoc, Failed<Self>> {
        let outcome = self.open_with(Some(collection), params).await;
        settle(self, outcome)
    }

    async fn open_with(
        &self,
        collection: Option<CollectionParams>,
        params: OpenParams,
    ) -> Result<OpenLoc, LocError> {
        let data = self.handle.as_requester("open")?;
        let is_collection = data.loc_type == LocType::Collection;
        match (is_collection, collection.is_some()) {
            (true, false) => {
                return Err(LocError::validation(
                    "Collection parameters are required to open a collection LOC",
                ))
            }
            (false, true) => {
                return Err(LocError::invalid_transition(
                    format!("{} request", data.loc_type),
                    "open collection",
                ))
            }
            _ => {}
        }
        let auto_publish = data.loc_type == LocType::Identity
            || params
                .auto_publish
                .unwrap_or(self.handle.client().config().auto_publish_on_open);
        let Publication {
            items,
            confirmations,
        } = if auto_publish {
            initial_publication(data)
        } else {
            Publication::default()
        };
        self.handle
            .client()
            .submit(LedgerCall::CreateLoc {
                loc_id: data.id,
                loc_type: data.loc_type,
                owner: data.owner.clone(),
                requester: data.requester.clone(),
                requester_loc_id: data.requester_loc_id,
                collection,
                sponsorship_id: data.sponsorship_id,
                items,
            })
            .await?;
        let node = self.handle.node()?;
        node.open_request(&data.id).await?;
        for item in &confirmations {
            node.confirm_item(&data.id, item).await?;
        }
        self.handle
            .refreshed("open", &[StateKind::Open])
            .await?
            .into_open()
    }

    /// Withdraw the request.
    pub async fn cancel(self) -> Result<LocsState, Failed<Self>> {
        let outcome = self.handle.cancel().await;
        settle(self, outcome)
    }
}

/// Rejected request.
#[derive(Debug)]
pub struct RejectedRequest {
    pub(super) handle: Handle,
}

impl RejectedRequest {
    /// Reason given by the legal officer.
    pub fn reject_reason(&self) -> Result<Option<&str>, LocError> {
        Ok(self.handle.data()?.reject_reason.as_deref())
    }

    /// Back to draft, keeping the items.
    pub async fn rework(self) -> Result<DraftRequest, Failed<Self>> {
        let outcome = async {
            let data = self.handle.as_requester("rework")?;
            self.handle.node()?.rework_request(&data.id).await?;
            self.handle
                .refreshed("rework", &[StateKind::Draft])
                .await?
                .into_draft()
        }
        .await;
        settle(self, outcome)
    }

    /// Withdraw the request.
    pub async fn cancel(self) -> Result<LocsState, Failed<Self>> {
        let outcome = self.handle.cancel().await;
        settle(self, outcome)
    }
}
