//! # Publication
//!
//! Ledger form of items, and the items published when a LOC opens.

use loc_04_reconciler::{
    InitialItems, ItemRef, LocData, MergedFile, MergedLink, MergedMetadataItem,
};
use shared_types::{ChainFile, ChainLink, ChainMetadataItem, Hash, ItemStatus};

/// Ledger form of a file.
pub fn chain_file(file: &MergedFile) -> ChainFile {
    ChainFile {
        hash: file.hash,
        nature: Hash::of_str(&file.nature),
        size: file.size,
        submitter: file.submitter.clone(),
        acknowledged_by_owner: false,
        acknowledged_by_verified_issuer: false,
    }
}

/// Ledger form of a metadata entry.
pub fn chain_metadata(item: &MergedMetadataItem) -> ChainMetadataItem {
    ChainMetadataItem {
        name: item.name_hash(),
        value: Hash::of_str(&item.value),
        submitter: item.submitter.clone(),
        acknowledged_by_owner: false,
        acknowledged_by_verified_issuer: false,
    }
}

/// Ledger form of a link.
pub fn chain_link(link: &MergedLink) -> ChainLink {
    ChainLink {
        target: link.target,
        nature: Hash::of_str(&link.nature),
        submitter: link.submitter.clone(),
        acknowledged_by_owner: false,
    }
}

/// Items published together with the LOC creation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Publication {
    /// Items sent with the creation call.
    pub items: InitialItems,
    /// Items to confirm on the backend once the LOC is open.
    pub confirmations: Vec<ItemRef>,
}

/// Accepted files and metadata, and links not yet published.
pub fn initial_publication(data: &LocData) -> Publication {
    let mut publication = Publication::default();
    for file in data.files.iter().filter(|f| f.status == ItemStatus::ReviewAccepted) {
        publication.items.files.push(chain_file(file));
        publication.confirmations.push(ItemRef::File(file.hash));
    }
    for item in data
        .metadata
        .iter()
        .filter(|m| m.status == ItemStatus::ReviewAccepted)
    {
        publication.items.metadata.push(chain_metadata(item));
        publication
            .confirmations
            .push(ItemRef::Metadata(item.name_hash()));
    }
    for link in data.links.iter().filter(|l| l.status == ItemStatus::Draft) {
        publication.items.links.push(chain_link(link));
        publication.confirmations.push(ItemRef::Link(link.target));
    }
    publication
}
