//! In-Memory Legal-Officer Node
//!
//! Implements `LocBackend` in process. One [`InMemoryNode`] holds the
//! node's data; each [`NodeSession`] is one authenticated caller on it.
//! The node enforces the backend's own rules (who may act, which status
//! an operation needs, content hash checks) and answers like the REST API
//! would, with `Backend { status, .. }` errors.

use crate::domain::{
    AddFileParams, AddLinkParams, AddMetadataParams, CollectionItemAnnouncement, CreateLocRequest,
    FileUpload, ItemFileDescription, ItemRef, LocRequestFilter, ReviewDecision,
    TokensRecordAnnouncement, VoidRequest,
};
use crate::ports::LocBackend;
use async_trait::async_trait;
use chrono::Utc;
use loc_03_aggregator::Source;
use parking_lot::RwLock;
use shared_types::{
    AccountId, CollectionItemRecord, Hash, IssuerRecord, ItemFileRecord, ItemStatus, LocError,
    LocFile, LocId, LocLink, LocMetadataItem, LocRequest, LocRequestStatus, LocType,
    TokensRecordRecord, VoidInfo,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

#[derive(Default)]
struct NodeState {
    requests: Vec<LocRequest>,
    collection_items: HashMap<LocId, Vec<CollectionItemRecord>>,
    tokens_records: HashMap<LocId, Vec<TokensRecordRecord>>,
    selected_issuers: HashMap<LocId, Vec<AccountId>>,
    verified_issuers: Vec<IssuerRecord>,
    unreachable: bool,
    fail_deletions: bool,
}

/// In-memory legal-officer node for testing.
#[derive(Clone)]
pub struct InMemoryNode {
    node_id: String,
    legal_officer: AccountId,
    state: Arc<RwLock<NodeState>>,
}

impl InMemoryNode {
    /// Create an empty node operated by `legal_officer`.
    pub fn new(node_id: impl Into<String>, legal_officer: AccountId) -> Self {
        Self {
            node_id: node_id.into(),
            legal_officer,
            state: Arc::new(RwLock::new(NodeState::default())),
        }
    }

    /// Open a session for `caller`.
    pub fn session(&self, caller: AccountId) -> NodeSession {
        NodeSession {
            node: self.clone(),
            caller,
        }
    }

    /// Node identity.
    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    /// Make every call fail at the transport level.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.state.write().unreachable = unreachable;
    }

    /// Make collection item and tokens record deletions fail.
    pub fn set_fail_deletions(&self, fail: bool) {
        self.state.write().fail_deletions = fail;
    }

    /// Register a verified issuer of this node.
    pub fn register_verified_issuer(&self, issuer: IssuerRecord) {
        self.state.write().verified_issuers.push(issuer);
    }

    /// Stored request, bypassing access rules.
    pub fn request(&self, loc_id: &LocId) -> Option<LocRequest> {
        self.state
            .read()
            .requests
            .iter()
            .find(|r| &r.id == loc_id)
            .cloned()
    }

    /// Stored collection item records, bypassing access rules.
    pub fn collection_item_records(&self, collection_loc_id: &LocId) -> Vec<CollectionItemRecord> {
        self.state
            .read()
            .collection_items
            .get(collection_loc_id)
            .cloned()
            .unwrap_or_default()
    }
}

fn bad_request(message: impl Into<String>) -> LocError {
    LocError::Backend {
        status: 400,
        message: message.into(),
    }
}

fn unauthorized() -> LocError {
    LocError::Backend {
        status: 403,
        message: "Unauthorized".into(),
    }
}

fn not_found(what: impl std::fmt::Display) -> LocError {
    LocError::Backend {
        status: 404,
        message: format!("{} not found", what),
    }
}

fn require_status(request: &LocRequest, allowed: &[LocRequestStatus]) -> Result<(), LocError> {
    if request.void_info.is_some() {
        return Err(bad_request("LOC is void"));
    }
    if allowed.contains(&request.status) {
        Ok(())
    } else {
        Err(bad_request(format!("LOC is {}", request.status)))
    }
}

fn is_requester_side(request: &LocRequest, caller: &AccountId) -> bool {
    match &request.requester {
        Some(requester) => requester == caller,
        None => &request.owner == caller,
    }
}

fn item_state(request: &LocRequest, item: &ItemRef) -> Option<(ItemStatus, AccountId)> {
    match item {
        ItemRef::File(hash) => request
            .files
            .iter()
            .find(|f| &f.hash == hash)
            .map(|f| (f.status, f.submitter.clone())),
        ItemRef::Metadata(name) => request
            .metadata
            .iter()
            .find(|m| &m.name_hash() == name)
            .map(|m| (m.status, m.submitter.clone())),
        ItemRef::Link(target) => request
            .links
            .iter()
            .find(|l| &l.target == target)
            .map(|l| (l.status, l.submitter.clone())),
    }
}

fn set_item_status(
    request: &mut LocRequest,
    item: &ItemRef,
    status: ItemStatus,
    reject_reason: Option<String>,
) {
    match item {
        ItemRef::File(hash) => {
            if let Some(file) = request.files.iter_mut().find(|f| &f.hash == hash) {
                file.status = status;
                file.reject_reason = reject_reason;
            }
        }
        ItemRef::Metadata(name) => {
            if let Some(entry) = request.metadata.iter_mut().find(|m| &m.name_hash() == name) {
                entry.status = status;
                entry.reject_reason = reject_reason;
            }
        }
        ItemRef::Link(target) => {
            if let Some(link) = request.links.iter_mut().find(|l| &l.target == target) {
                link.status = status;
            }
        }
    }
}

fn set_all_items(request: &mut LocRequest, from: ItemStatus, to: ItemStatus) {
    for file in request.files.iter_mut().filter(|f| f.status == from) {
        file.status = to;
    }
    for entry in request.metadata.iter_mut().filter(|m| m.status == from) {
        entry.status = to;
    }
}

fn file_records(files: &[ItemFileDescription]) -> Vec<ItemFileRecord> {
    files
        .iter()
        .map(|f| ItemFileRecord {
            hash: f.hash,
            name: f.name.clone(),
            content_type: f.content_type.clone(),
            size: f.size,
            uploaded: false,
        })
        .collect()
}

fn verify_upload(upload: &FileUpload) -> Result<(), LocError> {
    if Hash::of(&upload.content) != upload.hash {
        return Err(bad_request("Received file does not match the expected hash"));
    }
    if upload.content.len() as u64 != upload.size {
        return Err(bad_request("Received file does not match the expected size"));
    }
    Ok(())
}

fn accept_upload(files: &mut [ItemFileRecord], upload: &FileUpload) -> Result<(), LocError> {
    verify_upload(upload)?;
    let file = files
        .iter_mut()
        .find(|f| f.hash == upload.hash)
        .ok_or_else(|| not_found(format!("file {}", upload.hash)))?;
    if file.size != upload.size {
        return Err(bad_request("Received file does not match the declared size"));
    }
    if file.uploaded {
        return Err(bad_request("File already uploaded"));
    }
    file.uploaded = true;
    Ok(())
}

/// One caller's session on an [`InMemoryNode`].
pub struct NodeSession {
    node: InMemoryNode,
    caller: AccountId,
}

impl NodeSession {
    /// Authenticated caller.
    pub fn caller(&self) -> &AccountId {
        &self.caller
    }

    /// Underlying node.
    pub fn node(&self) -> &InMemoryNode {
        &self.node
    }

    fn state(&self) -> Result<parking_lot::RwLockWriteGuard<'_, NodeState>, LocError> {
        let state = self.node.state.write();
        if state.unreachable {
            return Err(LocError::Transport(format!(
                "{} unreachable",
                self.node.node_id
            )));
        }
        Ok(state)
    }

    /// Run `f` on the stored request.
    fn with_request<T>(
        &self,
        loc_id: &LocId,
        f: impl FnOnce(&mut NodeState, usize) -> Result<T, LocError>,
    ) -> Result<T, LocError> {
        let mut state = self.state()?;
        let index = state
            .requests
            .iter()
            .position(|r| &r.id == loc_id)
            .ok_or_else(|| not_found(format!("LOC {}", loc_id)))?;
        f(&mut state, index)
    }

    fn is_selected_issuer(state: &NodeState, loc_id: &LocId, account: &AccountId) -> bool {
        state
            .selected_issuers
            .get(loc_id)
            .is_some_and(|issuers| issuers.contains(account))
    }

    /// Checks shared by every item addition.
    fn check_item_addition(
        &self,
        state: &NodeState,
        request: &LocRequest,
    ) -> Result<(), LocError> {
        require_status(request, &[LocRequestStatus::Draft, LocRequestStatus::Open])?;
        if request.status == LocRequestStatus::Open && request.loc_type == LocType::Identity {
            return Err(bad_request("Cannot add items to an open identity LOC"));
        }
        let allowed = match request.status {
            LocRequestStatus::Draft => is_requester_side(request, &self.caller),
            _ => {
                request.owner == self.caller
                    || request.requester.as_ref() == Some(&self.caller)
                    || Self::is_selected_issuer(state, &request.id, &self.caller)
            }
        };
        if allowed {
            Ok(())
        } else {
            Err(unauthorized())
        }
    }

    fn transition(
        &self,
        loc_id: &LocId,
        by_owner: bool,
        from: &[LocRequestStatus],
        apply: impl FnOnce(&mut LocRequest),
    ) -> Result<(), LocError> {
        let caller = self.caller.clone();
        self.with_request(loc_id, |state, index| {
            let request = &mut state.requests[index];
            let allowed = if by_owner {
                request.owner == caller
            } else {
                is_requester_side(request, &caller)
            };
            if !allowed {
                return Err(unauthorized());
            }
            require_status(request, from)?;
            apply(request);
            Ok(())
        })
    }
}

impl Source for NodeSession {
    fn source_id(&self) -> &str {
        &self.node.node_id
    }
}

#[async_trait]
impl LocBackend for NodeSession {
    fn legal_officer(&self) -> &AccountId {
        &self.node.legal_officer
    }

    async fn create_request(&self, params: &CreateLocRequest) -> Result<LocRequest, LocError> {
        if params.owner != self.node.legal_officer {
            return Err(bad_request("Wrong legal officer"));
        }
        let allowed = match &params.requester {
            Some(requester) => requester == &self.caller || params.owner == self.caller,
            None => params.owner == self.caller,
        };
        if !allowed {
            return Err(unauthorized());
        }
        let request = LocRequest {
            id: LocId::new_random(),
            owner: params.owner.clone(),
            requester: params.requester.clone(),
            requester_loc_id: params.requester_loc_id,
            description: params.description.clone(),
            loc_type: params.loc_type,
            status: if params.draft {
                LocRequestStatus::Draft
            } else {
                LocRequestStatus::ReviewPending
            },
            created_on: Utc::now(),
            decision_on: None,
            closed_on: None,
            reject_reason: None,
            void_info: None,
            seal: None,
            template: params.template.clone(),
            sponsorship_id: params.sponsorship_id,
            files: Vec::new(),
            metadata: Vec::new(),
            links: Vec::new(),
            collection: None,
        };
        debug!("[loc-04] {} created request {}", self.node.node_id, request.id);
        self.state()?.requests.push(request.clone());
        Ok(request)
    }

    async fn find_request(&self, loc_id: &LocId) -> Result<Option<LocRequest>, LocError> {
        Ok(self
            .state()?
            .requests
            .iter()
            .find(|r| &r.id == loc_id)
            .cloned())
    }

    async fn list_requests(&self, filter: &LocRequestFilter) -> Result<Vec<LocRequest>, LocError> {
        Ok(self
            .state()?
            .requests
            .iter()
            .filter(|r| r.owner == self.caller || r.requester.as_ref() == Some(&self.caller))
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }

    async fn submit_request(&self, loc_id: &LocId) -> Result<(), LocError> {
        self.transition(loc_id, false, &[LocRequestStatus::Draft], |request| {
            request.status = LocRequestStatus::ReviewPending;
            set_all_items(request, ItemStatus::Draft, ItemStatus::ReviewPending);
        })
    }

    async fn cancel_request(&self, loc_id: &LocId) -> Result<(), LocError> {
        let caller = self.caller.clone();
        self.with_request(loc_id, |state, index| {
            let request = &state.requests[index];
            if !is_requester_side(request, &caller) {
                return Err(unauthorized());
            }
            require_status(
                request,
                &[
                    LocRequestStatus::Draft,
                    LocRequestStatus::ReviewPending,
                    LocRequestStatus::ReviewAccepted,
                    LocRequestStatus::ReviewRejected,
                ],
            )?;
            state.requests.remove(index);
            Ok(())
        })
    }

    async fn rework_request(&self, loc_id: &LocId) -> Result<(), LocError> {
        self.transition(loc_id, false, &[LocRequestStatus::ReviewRejected], |request| {
            request.status = LocRequestStatus::Draft;
            request.reject_reason = None;
            request.decision_on = None;
            set_all_items(request, ItemStatus::ReviewPending, ItemStatus::Draft);
        })
    }

    async fn accept_request(&self, loc_id: &LocId) -> Result<(), LocError> {
        self.transition(loc_id, true, &[LocRequestStatus::ReviewPending], |request| {
            request.status = LocRequestStatus::ReviewAccepted;
            request.decision_on = Some(Utc::now());
            set_all_items(request, ItemStatus::ReviewPending, ItemStatus::ReviewAccepted);
        })
    }

    async fn reject_request(&self, loc_id: &LocId, reason: &str) -> Result<(), LocError> {
        let reason = reason.to_string();
        self.transition(loc_id, true, &[LocRequestStatus::ReviewPending], |request| {
            request.status = LocRequestStatus::ReviewRejected;
            request.decision_on = Some(Utc::now());
            request.reject_reason = Some(reason);
        })
    }

    async fn open_request(&self, loc_id: &LocId) -> Result<(), LocError> {
        let caller = self.caller.clone();
        self.with_request(loc_id, |state, index| {
            let request = &mut state.requests[index];
            if !is_requester_side(request, &caller) && request.owner != caller {
                return Err(unauthorized());
            }
            require_status(request, &[LocRequestStatus::ReviewAccepted])?;
            request.status = LocRequestStatus::Open;
            Ok(())
        })
    }

    async fn close_request(&self, loc_id: &LocId, seal: Option<Hash>) -> Result<(), LocError> {
        self.transition(loc_id, true, &[LocRequestStatus::Open], |request| {
            request.status = LocRequestStatus::Closed;
            request.closed_on = Some(Utc::now());
            request.seal = seal;
            set_all_items(request, ItemStatus::Published, ItemStatus::Acknowledged);
            for link in request.links.iter_mut() {
                link.status = ItemStatus::Acknowledged;
            }
        })
    }

    async fn void_request(&self, loc_id: &LocId, void: &VoidRequest) -> Result<(), LocError> {
        let info = VoidInfo {
            reason: void.reason.clone(),
            voided_on: Some(Utc::now()),
            replacer: void.replacer_loc_id,
        };
        self.transition(
            loc_id,
            true,
            &[LocRequestStatus::Open, LocRequestStatus::Closed],
            |request| request.void_info = Some(info),
        )
    }

    async fn add_metadata(
        &self,
        loc_id: &LocId,
        params: &AddMetadataParams,
    ) -> Result<(), LocError> {
        self.with_request(loc_id, |state, index| {
            self.check_item_addition(state, &state.requests[index])?;
            let request = &mut state.requests[index];
            if request.metadata.iter().any(|m| m.name == params.name) {
                return Err(bad_request("A metadata item with given name already exists"));
            }
            request.metadata.push(LocMetadataItem {
                name: params.name.clone(),
                value: params.value.clone(),
                submitter: self.caller.clone(),
                status: ItemStatus::Draft,
                reject_reason: None,
                added_on: Some(Utc::now()),
            });
            Ok(())
        })
    }

    async fn add_file(&self, loc_id: &LocId, params: &AddFileParams) -> Result<(), LocError> {
        verify_upload(&params.upload)?;
        self.with_request(loc_id, |state, index| {
            self.check_item_addition(state, &state.requests[index])?;
            let request = &mut state.requests[index];
            if request.files.iter().any(|f| f.hash == params.upload.hash) {
                return Err(bad_request("A file with given hash was already uploaded"));
            }
            request.files.push(LocFile {
                hash: params.upload.hash,
                name: params.upload.name.clone(),
                nature: params.nature.clone(),
                size: params.upload.size,
                content_type: Some(params.upload.content_type.clone()),
                submitter: self.caller.clone(),
                status: ItemStatus::Draft,
                reject_reason: None,
                added_on: Some(Utc::now()),
            });
            Ok(())
        })
    }

    async fn add_link(&self, loc_id: &LocId, params: &AddLinkParams) -> Result<(), LocError> {
        self.with_request(loc_id, |state, index| {
            if !state.requests.iter().any(|r| r.id == params.target) {
                return Err(bad_request("Target LOC does not exist"));
            }
            self.check_item_addition(state, &state.requests[index])?;
            let request = &mut state.requests[index];
            if request.links.iter().any(|l| l.target == params.target) {
                return Err(bad_request("A link with given target already exists"));
            }
            request.links.push(LocLink {
                target: params.target,
                nature: params.nature.clone(),
                submitter: self.caller.clone(),
                status: ItemStatus::Draft,
                added_on: Some(Utc::now()),
            });
            Ok(())
        })
    }

    async fn delete_item(&self, loc_id: &LocId, item: &ItemRef) -> Result<(), LocError> {
        self.with_request(loc_id, |state, index| {
            let request = &mut state.requests[index];
            require_status(request, &[LocRequestStatus::Draft, LocRequestStatus::Open])?;
            let (status, submitter) = item_state(request, item).ok_or_else(|| not_found(item))?;
            if submitter != self.caller && request.owner != self.caller {
                return Err(unauthorized());
            }
            let deletable = match item {
                ItemRef::Link(_) => status == ItemStatus::Draft,
                _ => status.is_deletable(),
            };
            if !deletable {
                return Err(bad_request(format!("Cannot delete item in status {}", status)));
            }
            match item {
                ItemRef::File(hash) => request.files.retain(|f| &f.hash != hash),
                ItemRef::Metadata(name) => request.metadata.retain(|m| &m.name_hash() != name),
                ItemRef::Link(target) => request.links.retain(|l| &l.target != target),
            }
            Ok(())
        })
    }

    async fn request_review(&self, loc_id: &LocId, item: &ItemRef) -> Result<(), LocError> {
        self.with_request(loc_id, |state, index| {
            let request = &mut state.requests[index];
            require_status(request, &[LocRequestStatus::Open])?;
            if request.loc_type == LocType::Identity {
                return Err(bad_request("Cannot review items of an identity LOC"));
            }
            if matches!(item, ItemRef::Link(_)) {
                return Err(bad_request("Links are not reviewed"));
            }
            let (status, submitter) = item_state(request, item).ok_or_else(|| not_found(item))?;
            if submitter != self.caller {
                return Err(unauthorized());
            }
            if !status.can_transition_to(ItemStatus::ReviewPending) {
                return Err(bad_request(format!("Item is {}", status)));
            }
            set_item_status(request, item, ItemStatus::ReviewPending, None);
            Ok(())
        })
    }

    async fn review_item(
        &self,
        loc_id: &LocId,
        item: &ItemRef,
        decision: &ReviewDecision,
    ) -> Result<(), LocError> {
        self.with_request(loc_id, |state, index| {
            let request = &mut state.requests[index];
            require_status(request, &[LocRequestStatus::Open])?;
            if request.owner != self.caller {
                return Err(unauthorized());
            }
            let (status, _) = item_state(request, item).ok_or_else(|| not_found(item))?;
            let (next, reason) = match decision {
                ReviewDecision::Accept => (ItemStatus::ReviewAccepted, None),
                ReviewDecision::Reject { reason } => {
                    (ItemStatus::ReviewRejected, Some(reason.clone()))
                }
            };
            if !status.can_transition_to(next) {
                return Err(bad_request(format!("Item is {}", status)));
            }
            set_item_status(request, item, next, reason);
            Ok(())
        })
    }

    async fn confirm_item(&self, loc_id: &LocId, item: &ItemRef) -> Result<(), LocError> {
        self.with_request(loc_id, |state, index| {
            let request = &mut state.requests[index];
            require_status(request, &[LocRequestStatus::Open])?;
            let (status, submitter) = item_state(request, item).ok_or_else(|| not_found(item))?;
            if submitter != self.caller && request.owner != self.caller {
                return Err(unauthorized());
            }
            let allowed = match item {
                ItemRef::Link(_) => status.can_link_transition_to(ItemStatus::Published),
                _ => status.can_transition_to(ItemStatus::Published),
            };
            if !allowed {
                return Err(bad_request(format!("Item is {}", status)));
            }
            set_item_status(request, item, ItemStatus::Published, None);
            Ok(())
        })
    }

    async fn confirm_acknowledged(&self, loc_id: &LocId, item: &ItemRef) -> Result<(), LocError> {
        self.with_request(loc_id, |state, index| {
            let issuer = Self::is_selected_issuer(state, loc_id, &self.caller);
            let request = &mut state.requests[index];
            require_status(request, &[LocRequestStatus::Open])?;
            if request.owner != self.caller && !issuer {
                return Err(unauthorized());
            }
            let (status, _) = item_state(request, item).ok_or_else(|| not_found(item))?;
            if status != ItemStatus::Published {
                return Err(bad_request(format!("Item is {}", status)));
            }
            set_item_status(request, item, ItemStatus::Acknowledged, None);
            Ok(())
        })
    }

    async fn create_collection_item(
        &self,
        collection_loc_id: &LocId,
        item: &CollectionItemAnnouncement,
    ) -> Result<(), LocError> {
        self.with_request(collection_loc_id, |state, index| {
            let request = &state.requests[index];
            if request.loc_type != LocType::Collection {
                return Err(bad_request("Not a collection LOC"));
            }
            require_status(request, &[LocRequestStatus::Closed])?;
            if !is_requester_side(request, &self.caller) {
                return Err(unauthorized());
            }
            let items = state.collection_items.entry(*collection_loc_id).or_default();
            if items.iter().any(|i| i.item_id == item.item_id) {
                return Err(bad_request("Collection item already exists"));
            }
            items.push(CollectionItemRecord {
                collection_loc_id: *collection_loc_id,
                item_id: item.item_id,
                description: item.description.clone(),
                files: file_records(&item.files),
                token: item.token.clone(),
                terms_and_conditions: item.terms_and_conditions.clone(),
                added_on: Some(Utc::now()),
            });
            Ok(())
        })
    }

    async fn delete_collection_item(
        &self,
        collection_loc_id: &LocId,
        item_id: &Hash,
    ) -> Result<(), LocError> {
        let mut state = self.state()?;
        if state.fail_deletions {
            return Err(LocError::Backend {
                status: 500,
                message: "Deletion failed".into(),
            });
        }
        let items = state
            .collection_items
            .get_mut(collection_loc_id)
            .ok_or_else(|| not_found(format!("collection {}", collection_loc_id)))?;
        let before = items.len();
        items.retain(|i| &i.item_id != item_id);
        if items.len() == before {
            return Err(not_found(format!("collection item {}", item_id)));
        }
        Ok(())
    }

    async fn find_collection_item(
        &self,
        collection_loc_id: &LocId,
        item_id: &Hash,
    ) -> Result<Option<CollectionItemRecord>, LocError> {
        Ok(self
            .state()?
            .collection_items
            .get(collection_loc_id)
            .and_then(|items| items.iter().find(|i| &i.item_id == item_id).cloned()))
    }

    async fn list_collection_items(
        &self,
        collection_loc_id: &LocId,
    ) -> Result<Vec<CollectionItemRecord>, LocError> {
        Ok(self
            .state()?
            .collection_items
            .get(collection_loc_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn upload_collection_item_file(
        &self,
        collection_loc_id: &LocId,
        item_id: &Hash,
        upload: &FileUpload,
    ) -> Result<(), LocError> {
        let mut state = self.state()?;
        let item = state
            .collection_items
            .get_mut(collection_loc_id)
            .and_then(|items| items.iter_mut().find(|i| &i.item_id == item_id))
            .ok_or_else(|| not_found(format!("collection item {}", item_id)))?;
        accept_upload(&mut item.files, upload)
    }

    async fn create_tokens_record(
        &self,
        collection_loc_id: &LocId,
        record: &TokensRecordAnnouncement,
    ) -> Result<(), LocError> {
        self.with_request(collection_loc_id, |state, index| {
            let issuer = Self::is_selected_issuer(state, collection_loc_id, &self.caller);
            let request = &state.requests[index];
            if request.loc_type != LocType::Collection {
                return Err(bad_request("Not a collection LOC"));
            }
            require_status(request, &[LocRequestStatus::Closed])?;
            if request.owner != self.caller && !issuer {
                return Err(unauthorized());
            }
            let records = state.tokens_records.entry(*collection_loc_id).or_default();
            if records.iter().any(|r| r.record_id == record.record_id) {
                return Err(bad_request("Tokens record already exists"));
            }
            records.push(TokensRecordRecord {
                collection_loc_id: *collection_loc_id,
                record_id: record.record_id,
                description: record.description.clone(),
                files: file_records(&record.files),
                added_on: Some(Utc::now()),
            });
            Ok(())
        })
    }

    async fn delete_tokens_record(
        &self,
        collection_loc_id: &LocId,
        record_id: &Hash,
    ) -> Result<(), LocError> {
        let mut state = self.state()?;
        if state.fail_deletions {
            return Err(LocError::Backend {
                status: 500,
                message: "Deletion failed".into(),
            });
        }
        let records = state
            .tokens_records
            .get_mut(collection_loc_id)
            .ok_or_else(|| not_found(format!("collection {}", collection_loc_id)))?;
        let before = records.len();
        records.retain(|r| &r.record_id != record_id);
        if records.len() == before {
            return Err(not_found(format!("tokens record {}", record_id)));
        }
        Ok(())
    }

    async fn find_tokens_record(
        &self,
        collection_loc_id: &LocId,
        record_id: &Hash,
    ) -> Result<Option<TokensRecordRecord>, LocError> {
        Ok(self
            .state()?
            .tokens_records
            .get(collection_loc_id)
            .and_then(|records| records.iter().find(|r| &r.record_id == record_id).cloned()))
    }

    async fn list_tokens_records(
        &self,
        collection_loc_id: &LocId,
    ) -> Result<Vec<TokensRecordRecord>, LocError> {
        Ok(self
            .state()?
            .tokens_records
            .get(collection_loc_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn upload_tokens_record_file(
        &self,
        collection_loc_id: &LocId,
        record_id: &Hash,
        upload: &FileUpload,
    ) -> Result<(), LocError> {
        let mut state = self.state()?;
        let record = state
            .tokens_records
            .get_mut(collection_loc_id)
            .and_then(|records| records.iter_mut().find(|r| &r.record_id == record_id))
            .ok_or_else(|| not_found(format!("tokens record {}", record_id)))?;
        accept_upload(&mut record.files, upload)
    }

    async fn list_issuers(&self, loc_id: &LocId) -> Result<Vec<IssuerRecord>, LocError> {
        let state = self.state()?;
        let selected = state.selected_issuers.get(loc_id).cloned().unwrap_or_default();
        Ok(state
            .verified_issuers
            .iter()
            .filter(|issuer| selected.contains(&issuer.address))
            .cloned()
            .collect())
    }

    async fn set_issuer_selection(
        &self,
        loc_id: &LocId,
        issuer: &AccountId,
        selected: bool,
    ) -> Result<(), LocError> {
        self.with_request(loc_id, |state, index| {
            if state.requests[index].owner != self.caller {
                return Err(unauthorized());
            }
            if !state.verified_issuers.iter().any(|i| &i.address == issuer) {
                return Err(bad_request("Not a verified issuer"));
            }
            let issuers = state.selected_issuers.entry(*loc_id).or_default();
            issuers.retain(|i| i != issuer);
            if selected {
                issuers.push(issuer.clone());
            }
            Ok(())
        })
    }
}
