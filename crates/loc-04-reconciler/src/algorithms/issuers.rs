//! # Issuer Visibility
//!
//! The ledger confirms issuer selection, the backend knows identities. The
//! two update on different cadences, so both sides are unioned.

use crate::domain::{LocData, LocIssuer};
use shared_types::{AccountId, IssuerRecord};

/// True when `caller` may see issuer identities on `loc`.
pub fn can_see_issuers(loc: &LocData, caller: &AccountId, chain_selected: &[AccountId]) -> bool {
    loc.is_owner(caller) || loc.is_requester(caller) || chain_selected.contains(caller)
}

/// Merge the ledger selection with the backend issuer list.
///
/// Backend issuers come first and count as selected even when the ledger
/// has not caught up. Ledger-selected issuers unknown to the backend follow
/// with blank identity fields.
pub fn merge_issuers(
    loc: &LocData,
    caller: &AccountId,
    chain_selected: &[AccountId],
    backend: Vec<IssuerRecord>,
) -> Vec<LocIssuer> {
    let visible = can_see_issuers(loc, caller, chain_selected);
    let mut issuers: Vec<LocIssuer> = Vec::with_capacity(backend.len() + chain_selected.len());

    for record in backend {
        if issuers.iter().any(|i| i.address == record.address) {
            continue;
        }
        let (first_name, last_name) = if visible {
            (record.first_name, record.last_name)
        } else {
            (String::new(), String::new())
        };
        issuers.push(LocIssuer {
            address: record.address,
            first_name,
            last_name,
            identity_loc_id: record.identity_loc_id,
            selected: true,
        });
    }

    for address in chain_selected {
        if issuers.iter().any(|i| &i.address == address) {
            continue;
        }
        issuers.push(LocIssuer {
            address: address.clone(),
            first_name: String::new(),
            last_name: String::new(),
            identity_loc_id: None,
            selected: true,
        });
    }

    issuers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::build_loc_data;
    use chrono::Utc;
    use shared_types::{LocId, LocRequest, LocRequestStatus, LocType};

    const ALICE: &str = "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY";
    const BOB: &str = "5FHneW46xGXgs5mUiveU4sbTyGBzmstUspZC92UhjJM694ty";
    const CHARLIE: &str = "5FLSigC9HGRKVhB9FiEo4Y3koPsNmBmLJbpXg2mp1hXcS59Y";
    const DAVE: &str = "5DAAnrj7VHTznn2AWBemMuyBwZWs6FNFjdyVXUeYum3PTXFy";

    fn account(address: &str) -> AccountId {
        AccountId::polkadot(address).unwrap()
    }

    fn loc() -> LocData {
        let request = LocRequest {
            id: LocId::new_random(),
            owner: account(ALICE),
            requester: Some(account(BOB)),
            requester_loc_id: None,
            description: "Issued".into(),
            loc_type: LocType::Transaction,
            status: LocRequestStatus::Open,
            created_on: Utc::now(),
            decision_on: None,
            closed_on: None,
            reject_reason: None,
            void_info: None,
            seal: None,
            template: None,
            sponsorship_id: None,
            files: Vec::new(),
            metadata: Vec::new(),
            links: Vec::new(),
            collection: None,
        };
        build_loc_data(request, None).unwrap()
    }

    fn record(address: &str) -> IssuerRecord {
        IssuerRecord {
            address: account(address),
            first_name: "John".into(),
            last_name: "Doe".into(),
            identity_loc_id: Some(LocId::new_random()),
        }
    }

    #[test]
    fn test_requester_sees_identities() {
        let issuers = merge_issuers(&loc(), &account(BOB), &[], vec![record(CHARLIE)]);
        assert_eq!(issuers.len(), 1);
        assert_eq!(issuers[0].first_name, "John");
        assert!(issuers[0].selected);
    }

    #[test]
    fn test_stranger_gets_withheld_identities() {
        let issuers = merge_issuers(&loc(), &account(DAVE), &[], vec![record(CHARLIE)]);
        assert_eq!(issuers[0].first_name, "");
        assert_eq!(issuers[0].last_name, "");
    }

    #[test]
    fn test_selected_issuer_sees_identities() {
        let issuers = merge_issuers(
            &loc(),
            &account(CHARLIE),
            &[account(CHARLIE)],
            vec![record(CHARLIE)],
        );
        assert_eq!(issuers.len(), 1);
        assert_eq!(issuers[0].last_name, "Doe");
    }

    #[test]
    fn test_chain_only_issuer_synthesized() {
        let issuers = merge_issuers(&loc(), &account(ALICE), &[account(DAVE)], vec![record(CHARLIE)]);
        assert_eq!(issuers.len(), 2);
        assert_eq!(issuers[1].address, account(DAVE));
        assert_eq!(issuers[1].first_name, "");
        assert!(issuers[1].identity_loc_id.is_none());
    }
}
