//! Application layer: the client, the snapshot and the concrete states.

pub mod client;
pub mod closed;
pub mod locs_state;
pub mod open;
pub mod requests;
pub mod state;

pub use client::LocClient;
pub use closed::{ClosedCollectionLoc, ClosedLoc, VoidedCollectionLoc, VoidedLoc};
pub use locs_state::LocsState;
pub use open::OpenLoc;
pub use requests::{AcceptedRequest, DraftRequest, PendingRequest, RejectedRequest};
pub use state::LocState;

#[cfg(test)]
mod tests;
