//! LOCs Snapshot
//!
//! Every state object belongs to a snapshot of the caller's LOCs. A
//! successful transition discards the whole snapshot and returns states of
//! a new one; anything still pointing to the old snapshot is stale.

use super::client::LocClient;
use super::state::LocState;
use crate::domain::{RequestParams, StateKind};
use loc_04_reconciler::{build_loc_data, CreateLocRequest, LocData};
use shared_types::{LocError, LocId};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

struct Snapshot {
    client: LocClient,
    locs: Vec<LocData>,
    discarded: AtomicBool,
}

/// Immutable snapshot of the caller's LOCs.
#[derive(Clone)]
pub struct LocsState {
    snapshot: Arc<Snapshot>,
}

impl LocsState {
    pub(crate) fn new(client: LocClient, locs: Vec<LocData>) -> Self {
        Self {
            snapshot: Arc::new(Snapshot {
                client,
                locs,
                discarded: AtomicBool::new(false),
            }),
        }
    }

    /// Client the snapshot was loaded with.
    pub fn client(&self) -> &LocClient {
        &self.snapshot.client
    }

    /// True once a transition superseded the snapshot.
    pub fn is_discarded(&self) -> bool {
        self.snapshot.discarded.load(Ordering::SeqCst)
    }

    /// Every LOC of the snapshot.
    pub fn locs(&self) -> Result<&[LocData], LocError> {
        if self.is_discarded() {
            return Err(LocError::StaleState);
        }
        Ok(&self.snapshot.locs)
    }

    /// One LOC of the snapshot.
    pub fn loc(&self, loc_id: &LocId) -> Result<&LocData, LocError> {
        self.locs()?
            .iter()
            .find(|loc| &loc.id == loc_id)
            .ok_or_else(|| LocError::NotFound(format!("LOC {}", loc_id)))
    }

    /// State object of one LOC.
    pub fn state(&self, loc_id: &LocId) -> Result<LocState, LocError> {
        let data = self.loc(loc_id)?;
        Ok(LocState::new(self.clone(), data))
    }

    /// State objects of every LOC.
    pub fn states(&self) -> Result<Vec<LocState>, LocError> {
        Ok(self
            .locs()?
            .iter()
            .map(|data| LocState::new(self.clone(), data))
            .collect())
    }

    /// State objects of the LOCs at stage `kind`.
    pub fn states_of(&self, kind: StateKind) -> Result<Vec<LocState>, LocError> {
        Ok(self
            .states()?
            .into_iter()
            .filter(|state| state.kind() == kind)
            .collect())
    }

    /// Reload every LOC. Discards this snapshot.
    pub async fn refresh(&self) -> Result<LocsState, LocError> {
        self.locs()?;
        let fresh = self.client().locs_state().await?;
        self.discard()?;
        Ok(fresh)
    }

    /// State of any LOC, loading it when the snapshot does not hold it.
    /// Loading discards this snapshot.
    pub async fn find_loc(&self, loc_id: &LocId) -> Result<LocState, LocError> {
        if self.locs()?.iter().any(|loc| &loc.id == loc_id) {
            return self.state(loc_id);
        }
        let data = self.client().find_loc(loc_id).await?;
        self.replace(data)?.state(loc_id)
    }

    /// Send a new request, as a draft or submitted. Discards this snapshot.
    pub async fn request_loc(&self, params: RequestParams) -> Result<LocState, LocError> {
        self.locs()?;
        let client = self.client();
        let node = client.node_of(&params.legal_officer)?;
        let requester = if client.caller() == &params.legal_officer {
            None
        } else {
            Some(client.caller().clone())
        };
        let request = node
            .create_request(&CreateLocRequest {
                owner: params.legal_officer,
                requester,
                requester_loc_id: params.requester_loc_id,
                description: params.description,
                loc_type: params.loc_type,
                draft: params.draft,
                template: params.template,
                sponsorship_id: params.sponsorship_id,
            })
            .await?;
        let loc_id = request.id;
        let locs = self.replace(build_loc_data(request, None)?)?;
        let state = locs.state(&loc_id)?;
        info!(
            "[loc-05] Requested {} LOC {}: {}",
            state.data()?.loc_type,
            loc_id,
            state.kind()
        );
        Ok(state)
    }

    /// New snapshot with `data` replacing (or added next to) its previous
    /// version. Discards this snapshot.
    pub(crate) fn replace(&self, data: LocData) -> Result<LocsState, LocError> {
        let mut locs = self.locs()?.to_vec();
        match locs.iter_mut().find(|loc| loc.id == data.id) {
            Some(slot) => *slot = data,
            None => locs.push(data),
        }
        self.discard()?;
        Ok(LocsState::new(self.client().clone(), locs))
    }

    /// New snapshot without `loc_id`. Discards this snapshot.
    pub(crate) fn without(&self, loc_id: &LocId) -> Result<LocsState, LocError> {
        let locs = self
            .locs()?
            .iter()
            .filter(|loc| &loc.id != loc_id)
            .cloned()
            .collect();
        self.discard()?;
        Ok(LocsState::new(self.client().clone(), locs))
    }

    fn discard(&self) -> Result<(), LocError> {
        if self.snapshot.discarded.swap(true, Ordering::SeqCst) {
            return Err(LocError::StaleState);
        }
        debug!("[loc-05] Discarded snapshot of {} LOCs", self.snapshot.locs.len());
        Ok(())
    }
}

impl fmt::Debug for LocsState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocsState")
            .field("locs", &self.snapshot.locs.len())
            .field("discarded", &self.is_discarded())
            .finish()
    }
}
