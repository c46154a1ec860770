//! # State Kinds
//!
//! The lifecycle stage a merged LOC view belongs to.

use serde::{Deserialize, Serialize};
use shared_types::{LocRequestStatus, LocType, VoidInfo};
use std::fmt;

/// Concrete stage of a LOC, one per state type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateKind {
    /// Draft request, editable by the requester.
    Draft,
    /// Submitted request awaiting the legal officer.
    Pending,
    /// Accepted request, ready to open.
    Accepted,
    /// Rejected request.
    Rejected,
    /// Open LOC.
    Open,
    /// Closed transaction or identity LOC.
    Closed,
    /// Closed collection LOC, still accepting items.
    ClosedCollection,
    /// Voided transaction or identity LOC.
    Voided,
    /// Voided collection LOC.
    VoidedCollection,
}

impl StateKind {
    /// Stage implied by backend status, kind and void information.
    pub fn of(status: LocRequestStatus, loc_type: LocType, void_info: Option<&VoidInfo>) -> Self {
        match (status, loc_type, void_info.is_some()) {
            (_, LocType::Collection, true) => StateKind::VoidedCollection,
            (_, LocType::Transaction | LocType::Identity, true) => StateKind::Voided,
            (LocRequestStatus::Draft, _, false) => StateKind::Draft,
            (LocRequestStatus::ReviewPending, _, false) => StateKind::Pending,
            (LocRequestStatus::ReviewAccepted, _, false) => StateKind::Accepted,
            (LocRequestStatus::ReviewRejected, _, false) => StateKind::Rejected,
            (LocRequestStatus::Open, _, false) => StateKind::Open,
            (LocRequestStatus::Closed, LocType::Collection, false) => StateKind::ClosedCollection,
            (LocRequestStatus::Closed, LocType::Transaction | LocType::Identity, false) => {
                StateKind::Closed
            }
        }
    }

    /// True for stages with no further transition.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StateKind::Voided | StateKind::VoidedCollection)
    }

    /// True for stages the ledger knows.
    pub fn is_on_chain(&self) -> bool {
        !matches!(
            self,
            StateKind::Draft | StateKind::Pending | StateKind::Accepted | StateKind::Rejected
        )
    }
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StateKind::Draft => "Draft",
            StateKind::Pending => "Pending",
            StateKind::Accepted => "Accepted",
            StateKind::Rejected => "Rejected",
            StateKind::Open => "Open",
            StateKind::Closed => "Closed",
            StateKind::ClosedCollection => "ClosedCollection",
            StateKind::Voided => "Voided",
            StateKind::VoidedCollection => "VoidedCollection",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_status() -> impl Strategy<Value = LocRequestStatus> {
        prop_oneof![
            Just(LocRequestStatus::Draft),
            Just(LocRequestStatus::ReviewPending),
            Just(LocRequestStatus::ReviewAccepted),
            Just(LocRequestStatus::ReviewRejected),
            Just(LocRequestStatus::Open),
            Just(LocRequestStatus::Closed),
        ]
    }

    fn arb_type() -> impl Strategy<Value = LocType> {
        prop_oneof![
            Just(LocType::Transaction),
            Just(LocType::Identity),
            Just(LocType::Collection),
        ]
    }

    fn void() -> VoidInfo {
        VoidInfo {
            reason: "Wrong".into(),
            voided_on: None,
            replacer: None,
        }
    }

    #[test]
    fn test_request_stages() {
        use LocRequestStatus::*;
        let kinds: Vec<_> = [Draft, ReviewPending, ReviewAccepted, ReviewRejected]
            .into_iter()
            .map(|s| StateKind::of(s, LocType::Transaction, None))
            .collect();
        assert_eq!(
            kinds,
            vec![
                StateKind::Draft,
                StateKind::Pending,
                StateKind::Accepted,
                StateKind::Rejected
            ]
        );
    }

    #[test]
    fn test_closed_depends_on_type() {
        assert_eq!(
            StateKind::of(LocRequestStatus::Closed, LocType::Collection, None),
            StateKind::ClosedCollection
        );
        assert_eq!(
            StateKind::of(LocRequestStatus::Closed, LocType::Identity, None),
            StateKind::Closed
        );
    }

    #[test]
    fn test_void_wins_over_status() {
        let info = void();
        assert_eq!(
            StateKind::of(LocRequestStatus::Open, LocType::Transaction, Some(&info)),
            StateKind::Voided
        );
        assert_eq!(
            StateKind::of(LocRequestStatus::Closed, LocType::Collection, Some(&info)),
            StateKind::VoidedCollection
        );
        assert!(StateKind::VoidedCollection.is_terminal());
        assert!(!StateKind::ClosedCollection.is_terminal());
    }

    proptest! {
        #[test]
        fn prop_live_stage_follows_ledger_presence(status in arb_status(), loc_type in arb_type()) {
            let kind = StateKind::of(status, loc_type, None);
            prop_assert_eq!(kind.is_on_chain(), status.is_on_chain());
            prop_assert!(!kind.is_terminal());
        }

        #[test]
        fn prop_void_is_terminal(status in arb_status(), loc_type in arb_type()) {
            let info = void();
            let kind = StateKind::of(status, loc_type, Some(&info));
            prop_assert!(kind.is_terminal());
            prop_assert_eq!(kind == StateKind::VoidedCollection, loc_type == LocType::Collection);
        }
    }
}
