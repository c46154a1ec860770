//! # Generic Reconcile
//!
//! Every entity known to both the ledger and the backend is merged through
//! one helper, parameterized by a [`MergePolicy`].
//!
//! | Existence | Chain only | Backend only | Both |
//! |-----------|------------|--------------|------|
//! | `ChainDefines` | `OffchainRecordNotFound` | absent | merged |
//! | `BackendDefines` | absent | merged | merged |
//! | `EitherDefines` | chain view | merged | merged |

use shared_types::LocError;
use std::fmt::Display;

/// Which source decides whether an entity exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Existence {
    /// The ledger defines existence; the backend companion is mandatory.
    ChainDefines,
    /// The backend defines existence; ledger data overlays when present.
    BackendDefines,
    /// Present in either source; ledger-only entries are backend pending.
    EitherDefines,
}

/// Which source wins for a field present in both.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Authority {
    /// Tamper-evident fields: hashes, seals, confirmed status.
    ChainWins,
    /// Workflow fields: names, review state, reasons, timestamps.
    BackendWins,
}

impl Authority {
    /// Resolve a field that may be missing on either side.
    pub fn resolve<T>(self, chain: Option<T>, backend: Option<T>) -> Option<T> {
        match self {
            Authority::ChainWins => chain.or(backend),
            Authority::BackendWins => backend.or(chain),
        }
    }

    /// Resolve a field the backend always carries.
    pub fn pick<T>(self, chain: Option<T>, backend: T) -> T {
        match (self, chain) {
            (Authority::ChainWins, Some(value)) => value,
            _ => backend,
        }
    }
}

/// How one kind of entity is merged.
pub trait MergePolicy {
    /// Ledger record.
    type Onchain;
    /// Backend record.
    type Offchain;
    /// Merged view.
    type Merged;
    /// Key shared by both records.
    type Key: PartialEq + Display;

    /// Entity name used in errors.
    const NAME: &'static str;
    /// Existence rule.
    const EXISTENCE: Existence;

    /// Key of a ledger record.
    fn onchain_key(onchain: &Self::Onchain) -> Self::Key;

    /// Key of a backend record.
    fn offchain_key(offchain: &Self::Offchain) -> Self::Key;

    /// Merge a backend record with its ledger counterpart, if any.
    fn merge(onchain: Option<Self::Onchain>, offchain: Self::Offchain)
        -> Result<Self::Merged, LocError>;

    /// View of a ledger record whose backend companion is pending.
    /// Only consulted for `EitherDefines`.
    fn from_onchain(_onchain: Self::Onchain) -> Option<Self::Merged> {
        None
    }
}

/// Merge one entity.
pub fn reconcile<P: MergePolicy>(
    onchain: Option<P::Onchain>,
    offchain: Option<P::Offchain>,
    id: impl Display,
) -> Result<Option<P::Merged>, LocError> {
    match (P::EXISTENCE, onchain, offchain) {
        (_, onchain, Some(offchain)) => {
            if onchain.is_none() && P::EXISTENCE == Existence::ChainDefines {
                return Ok(None);
            }
            P::merge(onchain, offchain).map(Some)
        }
        (Existence::ChainDefines, Some(_), None) => Err(LocError::OffchainRecordNotFound {
            entity: P::NAME,
            id: id.to_string(),
        }),
        (Existence::EitherDefines, Some(onchain), None) => Ok(P::from_onchain(onchain)),
        (_, _, None) => Ok(None),
    }
}

/// Merge two lists of the same entity kind, pairing records by key.
///
/// Order follows the defining source. Ledger-only entries of an
/// `EitherDefines` policy come last, in ledger order.
pub fn reconcile_all<P: MergePolicy>(
    onchain: Vec<P::Onchain>,
    offchain: Vec<P::Offchain>,
) -> Result<Vec<P::Merged>, LocError> {
    let mut merged = Vec::new();
    match P::EXISTENCE {
        Existence::ChainDefines => {
            let mut backend: Vec<Option<P::Offchain>> = offchain.into_iter().map(Some).collect();
            for record in onchain {
                let key = P::onchain_key(&record);
                let companion = take_matching(&mut backend, |o| P::offchain_key(o) == key);
                merged.extend(reconcile::<P>(Some(record), companion, &key)?);
            }
        }
        Existence::BackendDefines | Existence::EitherDefines => {
            let mut chain: Vec<Option<P::Onchain>> = onchain.into_iter().map(Some).collect();
            for record in offchain {
                let key = P::offchain_key(&record);
                let counterpart = take_matching(&mut chain, |c| P::onchain_key(c) == key);
                merged.extend(reconcile::<P>(counterpart, Some(record), &key)?);
            }
            for record in chain.into_iter().flatten() {
                let key = P::onchain_key(&record);
                merged.extend(reconcile::<P>(Some(record), None, &key)?);
            }
        }
    }
    Ok(merged)
}

fn take_matching<T>(slots: &mut [Option<T>], matches: impl Fn(&T) -> bool) -> Option<T> {
    slots
        .iter_mut()
        .find(|slot| slot.as_ref().is_some_and(&matches))
        .and_then(Option::take)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// (key, value) records; the merged value concatenates both sides.
    struct Pair<const E: u8>;

    impl<const E: u8> MergePolicy for Pair<E> {
        type Onchain = (u32, &'static str);
        type Offchain = (u32, &'static str);
        type Merged = String;
        type Key = u32;

        const NAME: &'static str = "pair";
        const EXISTENCE: Existence = match E {
            0 => Existence::ChainDefines,
            1 => Existence::BackendDefines,
            _ => Existence::EitherDefines,
        };

        fn onchain_key(onchain: &Self::Onchain) -> u32 {
            onchain.0
        }

        fn offchain_key(offchain: &Self::Offchain) -> u32 {
            offchain.0
        }

        fn merge(onchain: Option<Self::Onchain>, offchain: Self::Offchain) -> Result<String, LocError> {
            Ok(format!("{}+{}", onchain.map_or("-", |c| c.1), offchain.1))
        }

        fn from_onchain(onchain: Self::Onchain) -> Option<String> {
            Some(format!("{}+-", onchain.1))
        }
    }

    type ChainDefined = Pair<0>;
    type BackendDefined = Pair<1>;
    type EitherDefined = Pair<2>;

    #[test]
    fn test_chain_defines_existence() {
        assert_eq!(reconcile::<ChainDefined>(None, Some((1, "b")), 1), Ok(None));
        assert_eq!(
            reconcile::<ChainDefined>(Some((1, "c")), None, 1),
            Err(LocError::OffchainRecordNotFound {
                entity: "pair",
                id: "1".into()
            })
        );
        assert_eq!(
            reconcile::<ChainDefined>(Some((1, "c")), Some((1, "b")), 1),
            Ok(Some("c+b".to_string()))
        );
    }

    #[test]
    fn test_backend_defines_existence() {
        assert_eq!(reconcile::<BackendDefined>(Some((1, "c")), None, 1), Ok(None));
        assert_eq!(
            reconcile::<BackendDefined>(None, Some((1, "b")), 1),
            Ok(Some("-+b".to_string()))
        );
    }

    #[test]
    fn test_either_defines_appends_chain_only() {
        let merged =
            reconcile_all::<EitherDefined>(vec![(2, "c2"), (3, "c3")], vec![(1, "b1"), (2, "b2")])
                .unwrap();
        assert_eq!(merged, vec!["-+b1", "c2+b2", "c3+-"]);
    }

    #[test]
    fn test_chain_defined_list_requires_companions() {
        let ok = reconcile_all::<ChainDefined>(vec![(1, "c1")], vec![(1, "b1"), (9, "b9")]).unwrap();
        assert_eq!(ok, vec!["c1+b1"]);

        let missing = reconcile_all::<ChainDefined>(vec![(1, "c1"), (2, "c2")], vec![(1, "b1")]);
        assert!(matches!(
            missing,
            Err(LocError::OffchainRecordNotFound { id, .. }) if id == "2"
        ));
    }

    #[test]
    fn test_authority() {
        assert_eq!(Authority::ChainWins.resolve(Some(1), Some(2)), Some(1));
        assert_eq!(Authority::ChainWins.resolve(None, Some(2)), Some(2));
        assert_eq!(Authority::BackendWins.resolve(Some(1), Some(2)), Some(2));
        assert_eq!(Authority::BackendWins.resolve(Some(1), None), Some(1));
        assert_eq!(Authority::ChainWins.pick(Some(1), 2), 1);
        assert_eq!(Authority::BackendWins.pick(Some(1), 2), 2);
    }
}
