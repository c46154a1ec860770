//! LOC State
//!
//! The sum of every concrete state, and the handle all of them share.

use super::client::LocClient;
use super::closed::{ClosedCollectionLoc, ClosedLoc, VoidedCollectionLoc, VoidedLoc};
use super::locs_state::LocsState;
use super::open::OpenLoc;
use super::requests::{AcceptedRequest, DraftRequest, PendingRequest, RejectedRequest};
use crate::domain::StateKind;
use loc_01_content_addressing::ItemFileWithContent;
use loc_04_reconciler::{
    FileUpload, LedgerCall, LocData, LocIssuer, Node, ReconcilerApi, VoidRequest,
};
use shared_types::{AccountId, LocError, LocId};
use tracing::info;

/// A LOC bound to the snapshot it was read from.
#[derive(Debug)]
pub(crate) struct Handle {
    locs: LocsState,
    loc_id: LocId,
}

impl Handle {
    pub(crate) fn data(&self) -> Result<&LocData, LocError> {
        self.locs.loc(&self.loc_id)
    }

    pub(crate) fn loc_id(&self) -> LocId {
        self.loc_id
    }

    pub(crate) fn locs_state(&self) -> &LocsState {
        &self.locs
    }

    pub(crate) fn client(&self) -> &LocClient {
        self.locs.client()
    }

    pub(crate) fn caller(&self) -> &AccountId {
        self.client().caller()
    }

    pub(crate) fn kind(&self) -> Result<StateKind, LocError> {
        let data = self.data()?;
        Ok(StateKind::of(
            data.status,
            data.loc_type,
            data.void_info.as_ref(),
        ))
    }

    /// Session on the node of the LOC owner.
    pub(crate) fn node(&self) -> Result<Node, LocError> {
        self.client().node_of(&self.data()?.owner)
    }

    /// Data, provided the caller owns the LOC.
    pub(crate) fn as_owner(&self, operation: &str) -> Result<&LocData, LocError> {
        let data = self.data()?;
        if !data.is_owner(self.caller()) {
            return Err(LocError::Forbidden(format!(
                "only the owner of {} can {}",
                self.loc_id, operation
            )));
        }
        Ok(data)
    }

    /// Data, provided the caller acts for the requester.
    pub(crate) fn as_requester(&self, operation: &str) -> Result<&LocData, LocError> {
        let data = self.data()?;
        if data.requester_side() != self.caller() {
            return Err(LocError::Forbidden(format!(
                "only the requester of {} can {}",
                self.loc_id, operation
            )));
        }
        Ok(data)
    }

    /// Reload the LOC and move to a new snapshot, provided the reloaded LOC
    /// reached one of `expected`. Otherwise the snapshot stays live.
    pub(crate) async fn refreshed(
        &self,
        operation: &str,
        expected: &[StateKind],
    ) -> Result<LocState, LocError> {
        let from = self.kind()?;
        let node = self.node()?;
        let data = self
            .client()
            .reconciler()
            .fetch_loc_data_on(node.as_ref(), &self.loc_id)
            .await?;
        let to = StateKind::of(data.status, data.loc_type, data.void_info.as_ref());
        if !expected.contains(&to) {
            return Err(LocError::UnexpectedState {
                expected: expected
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(" or "),
                actual: to.to_string(),
            });
        }
        let state = self.locs.replace(data)?.state(&self.loc_id)?;
        info!(
            "[loc-05] {} {}: {} -> {}",
            self.loc_id,
            operation,
            from,
            state.kind()
        );
        Ok(state)
    }

    /// Drop the LOC and move to a new snapshot.
    pub(crate) fn removed(&self, operation: &str) -> Result<LocsState, LocError> {
        let from = self.kind()?;
        let locs = self.locs.without(&self.loc_id)?;
        info!("[loc-05] {} {}: {} -> Cancelled", self.loc_id, operation, from);
        Ok(locs)
    }

    /// Issuers as visible to the caller.
    pub(crate) async fn issuers(&self) -> Result<Vec<LocIssuer>, LocError> {
        let data = self.data()?;
        self.client()
            .reconciler()
            .get_loc_issuers(data, self.caller())
            .await
    }

    /// Select or unselect a verified issuer, on the ledger then the backend.
    pub(crate) async fn select_issuer(
        &self,
        issuer: &AccountId,
        selected: bool,
    ) -> Result<LocState, LocError> {
        self.as_owner("select issuers")?;
        let stage = self.kind()?;
        self.client()
            .submit(LedgerCall::SetIssuerSelection {
                loc_id: self.loc_id,
                issuer: issuer.clone(),
                selected,
            })
            .await?;
        self.node()?
            .set_issuer_selection(&self.loc_id, issuer, selected)
            .await?;
        let operation = if selected {
            "select issuer"
        } else {
            "unselect issuer"
        };
        self.refreshed(operation, &[stage]).await
    }

    /// Void on the ledger then the backend.
    pub(crate) async fn make_void(
        &self,
        reason: &str,
        replacer: Option<LocId>,
    ) -> Result<LocState, LocError> {
        let data = self.as_owner("void")?;
        if let Some(replacer_id) = replacer {
            let replacing = self.client().ledger().query_loc(&replacer_id).await?;
            crate::algorithms::check_replacer(data, replacer_id, replacing.as_ref())?;
        }
        self.client()
            .submit(LedgerCall::MakeVoid {
                loc_id: self.loc_id,
                replacer,
            })
            .await?;
        self.node()?
            .void_request(
                &self.loc_id,
                &VoidRequest {
                    reason: reason.to_string(),
                    replacer_loc_id: replacer,
                },
            )
            .await?;
        self.refreshed("void", &[StateKind::Voided, StateKind::VoidedCollection])
            .await
    }
}

/// Backend form of a file; its content is required.
pub(crate) async fn upload_of(file: &mut ItemFileWithContent) -> Result<FileUpload, LocError> {
    let digest = file.finalize().await?;
    let content = file.hash_or_content.content().ok_or_else(|| {
        LocError::validation(format!("Content of {} is required", file.name))
    })?;
    Ok(FileUpload {
        hash: digest.hash,
        name: file.name.clone(),
        content_type: file.content_type.to_string(),
        size: digest.size,
        content: content.to_bytes().await?,
    })
}

/// Accessors shared by every concrete state.
macro_rules! loc_state_accessors {
    ($($state:ident),+ $(,)?) => {
        $(
            impl $state {
                pub(crate) fn from_handle(handle: Handle) -> Self {
                    Self { handle }
                }

                /// Merged view of the LOC; fails once the snapshot is stale.
                pub fn data(&self) -> Result<&LocData, LocError> {
                    self.handle.data()
                }

                /// LOC identifier.
                pub fn loc_id(&self) -> LocId {
                    self.handle.loc_id()
                }

                /// Snapshot the state belongs to.
                pub fn locs_state(&self) -> &LocsState {
                    self.handle.locs_state()
                }

                /// True once a transition superseded the snapshot.
                pub fn is_discarded(&self) -> bool {
                    self.handle.locs_state().is_discarded()
                }
            }
        )+
    };
}

loc_state_accessors!(
    DraftRequest,
    PendingRequest,
    AcceptedRequest,
    RejectedRequest,
    OpenLoc,
    ClosedLoc,
    ClosedCollectionLoc,
    VoidedLoc,
    VoidedCollectionLoc,
);

/// Current state of a LOC.
#[derive(Debug)]
pub enum LocState {
    /// Draft request.
    Draft(DraftRequest),
    /// Submitted request.
    Pending(PendingRequest),
    /// Accepted request.
    Accepted(AcceptedRequest),
    /// Rejected request.
    Rejected(RejectedRequest),
    /// Open LOC.
    Open(OpenLoc),
    /// Closed transaction or identity LOC.
    Closed(ClosedLoc),
    /// Closed collection LOC.
    ClosedCollection(ClosedCollectionLoc),
    /// Voided transaction or identity LOC.
    Voided(VoidedLoc),
    /// Voided collection LOC.
    VoidedCollection(VoidedCollectionLoc),
}

macro_rules! into_state {
    ($($method:ident => $variant:ident($state:ident)),+ $(,)?) => {
        $(
            #[doc = concat!("The [`", stringify!($state), "`], or `UnexpectedState`.")]
            pub fn $method(self) -> Result<$state, LocError> {
                match self {
                    LocState::$variant(state) => Ok(state),
                    other => Err(LocError::UnexpectedState {
                        expected: StateKind::$variant.to_string(),
                        actual: other.kind().to_string(),
                    }),
                }
            }
        )+
    };
}

impl LocState {
    pub(crate) fn new(locs: LocsState, data: &LocData) -> Self {
        let kind = StateKind::of(data.status, data.loc_type, data.void_info.as_ref());
        let handle = Handle {
            locs,
            loc_id: data.id,
        };
        match kind {
            StateKind::Draft => LocState::Draft(DraftRequest::from_handle(handle)),
            StateKind::Pending => LocState::Pending(PendingRequest::from_handle(handle)),
            StateKind::Accepted => LocState::Accepted(AcceptedRequest::from_handle(handle)),
            StateKind::Rejected => LocState::Rejected(RejectedRequest::from_handle(handle)),
            StateKind::Open => LocState::Open(OpenLoc::from_handle(handle)),
            StateKind::Closed => LocState::Closed(ClosedLoc::from_handle(handle)),
            StateKind::ClosedCollection => {
                LocState::ClosedCollection(ClosedCollectionLoc::from_handle(handle))
            }
            StateKind::Voided => LocState::Voided(VoidedLoc::from_handle(handle)),
            StateKind::VoidedCollection => {
                LocState::VoidedCollection(VoidedCollectionLoc::from_handle(handle))
            }
        }
    }

    /// Stage of the state.
    pub fn kind(&self) -> StateKind {
        match self {
            LocState::Draft(_) => StateKind::Draft,
            LocState::Pending(_) => StateKind::Pending,
            LocState::Accepted(_) => StateKind::Accepted,
            LocState::Rejected(_) => StateKind::Rejected,
            LocState::Open(_) => StateKind::Open,
            LocState::Closed(_) => StateKind::Closed,
            LocState::ClosedCollection(_) => StateKind::ClosedCollection,
            LocState::Voided(_) => StateKind::Voided,
            LocState::VoidedCollection(_) => StateKind::VoidedCollection,
        }
    }

    fn handle(&self) -> &Handle {
        match self {
            LocState::Draft(s) => &s.handle,
            LocState::Pending(s) => &s.handle,
            LocState::Accepted(s) => &s.handle,
            LocState::Rejected(s) => &s.handle,
            LocState::Open(s) => &s.handle,
            LocState::Closed(s) => &s.handle,
            LocState::ClosedCollection(s) => &s.handle,
            LocState::Voided(s) => &s.handle,
            LocState::VoidedCollection(s) => &s.handle,
        }
    }

    /// Merged view of the LOC; fails once the snapshot is stale.
    pub fn data(&self) -> Result<&LocData, LocError> {
        self.handle().data()
    }

    /// LOC identifier.
    pub fn loc_id(&self) -> LocId {
        self.handle().loc_id()
    }

    /// Snapshot the state belongs to.
    pub fn locs_state(&self) -> &LocsState {
        self.handle().locs_state()
    }

    /// True once a transition superseded the snapshot.
    pub fn is_discarded(&self) -> bool {
        self.locs_state().is_discarded()
    }

    into_state! {
        into_draft => Draft(DraftRequest),
        into_pending => Pending(PendingRequest),
        into_accepted => Accepted(AcceptedRequest),
        into_rejected => Rejected(RejectedRequest),
        into_open => Open(OpenLoc),
        into_closed => Closed(ClosedLoc),
        into_closed_collection => ClosedCollection(ClosedCollectionLoc),
        into_voided => Voided(VoidedLoc),
        into_voided_collection => VoidedCollection(VoidedCollectionLoc),
    }
}
