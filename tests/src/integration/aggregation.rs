//! # Aggregation Scenarios
//!
//! A requester with LOCs on three legal-officer nodes, some of which stop
//! answering.

use super::fixtures::*;
use loc_03_aggregator::AggregatorConfig;
use loc_05_lifecycle::RequestParams;
use shared_types::{LocError, LocType};

async fn request_everywhere(federation: &Federation) {
    let mut locs = federation.client(bob()).locs_state().await.unwrap();
    for legal_officer in [alice(), charlie(), dave()] {
        locs = locs
            .request_loc(RequestParams::new(legal_officer, LocType::Transaction, "Deal"))
            .await
            .unwrap()
            .locs_state()
            .clone();
    }
    assert_eq!(locs.locs().unwrap().len(), 3);
}

#[tokio::test]
async fn test_unreachable_node_is_skipped() {
    let federation = Federation::new();
    request_everywhere(&federation).await;

    federation.nodes[1].set_unreachable(true);
    let locs = federation.client(bob()).locs_state().await.unwrap();
    let owners: Vec<_> = locs.locs().unwrap().iter().map(|l| l.owner.clone()).collect();
    assert_eq!(owners.len(), 2);
    assert!(!owners.contains(&charlie()));
}

#[tokio::test]
async fn test_all_nodes_down() {
    let federation = Federation::new();
    request_everywhere(&federation).await;
    for node in &federation.nodes {
        node.set_unreachable(true);
    }

    let result = federation.client(bob()).locs_state().await;
    assert!(matches!(
        result,
        Err(LocError::AllSourcesFailed { failures }) if failures.len() == 3
    ));

    let lenient = federation
        .client(bob())
        .with_aggregator_config(AggregatorConfig::lenient());
    assert!(lenient.locs_state().await.unwrap().locs().unwrap().is_empty());
}

#[tokio::test]
async fn test_loc_found_on_its_owner_node() {
    let federation = Federation::new();
    request_everywhere(&federation).await;
    let locs = federation.client(bob()).locs_state().await.unwrap();
    let on_dave = locs
        .locs()
        .unwrap()
        .iter()
        .find(|l| l.owner == dave())
        .unwrap()
        .id;

    federation.nodes[0].set_unreachable(true);
    let data = federation.client(bob()).find_loc(&on_dave).await.unwrap();
    assert_eq!(data.owner, dave());
}
