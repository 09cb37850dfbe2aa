//! State transfer: a joining member pulls a peer's full snapshot before it
//! starts serving, and continues the id sequence from where the snapshot
//! left off.

use std::sync::Arc;
use std::time::Duration;

use auction_house::cluster::pull_initial_state;
use auction_house::mocks::MockTransport;
use auction_house::{NewAuction, ReplicatedStore, ResponseStatus};

use crate::common::harness::GatewayHarness;

#[tokio::test]
async fn test_joiner_receives_full_snapshot() {
    let transport = MockTransport::new();
    let seeded = Arc::new(ReplicatedStore::new());
    transport.add_member("seed", seeded.clone()).await;

    let seller = GatewayHarness::make_user("Seller");
    seeded.create_auction(NewAuction::new(10, 20, "lamp", seller.clone()));
    seeded.create_auction(NewAuction::new(50, 80, "rug", seller));

    let joiner = ReplicatedStore::new();
    let source = pull_initial_state(&joiner, &transport, Duration::from_millis(200))
        .await
        .unwrap();
    assert_eq!(source.0, "seed");
    assert_eq!(joiner.snapshot(), seeded.snapshot());
}

#[tokio::test]
async fn test_joiner_continues_id_sequence() {
    let transport = MockTransport::new();
    let seeded = Arc::new(ReplicatedStore::new());
    transport.add_member("seed", seeded.clone()).await;

    let seller = GatewayHarness::make_user("Seller");
    seeded.create_auction(NewAuction::new(10, 20, "lamp", seller.clone()));
    seeded.create_auction(NewAuction::new(50, 80, "rug", seller.clone()));

    let joiner = ReplicatedStore::new();
    pull_initial_state(&joiner, &transport, Duration::from_millis(200))
        .await
        .unwrap();

    // The next auction created on the joiner picks up after the snapshot.
    let response = joiner.create_auction(NewAuction::new(5, 5, "vase", seller));
    assert_eq!(response.status, ResponseStatus::AuctionCreated);
    assert_eq!(response.item.unwrap().id, 3);
}

#[tokio::test]
async fn test_transfer_falls_back_to_second_peer() {
    let transport = MockTransport::new();
    let dead = transport
        .add_member("dead", Arc::new(ReplicatedStore::new()))
        .await;
    transport.set_down(&dead, true).await;

    let seeded = Arc::new(ReplicatedStore::new());
    transport.add_member("seed", seeded.clone()).await;
    seeded.create_auction(NewAuction::new(
        10,
        20,
        "lamp",
        GatewayHarness::make_user("Seller"),
    ));

    let joiner = ReplicatedStore::new();
    let source = pull_initial_state(&joiner, &transport, Duration::from_millis(200))
        .await
        .unwrap();
    assert_eq!(source.0, "seed");
    assert_eq!(joiner.active_auctions().len(), 1);
}

#[tokio::test]
async fn test_transfer_fails_when_every_peer_times_out() {
    let transport = MockTransport::new();
    for name in ["a", "b"] {
        let member = transport
            .add_member(name, Arc::new(ReplicatedStore::new()))
            .await;
        transport.set_delay(&member, Duration::from_secs(5)).await;
    }

    let joiner = ReplicatedStore::new();
    let result = pull_initial_state(&joiner, &transport, Duration::from_millis(100)).await;
    assert!(result.is_err());
    // The joiner keeps its empty table rather than serving partial state.
    assert!(joiner.active_auctions().is_empty());
}

#[tokio::test]
async fn test_transfer_fails_with_no_peers() {
    let transport = MockTransport::new();
    let joiner = ReplicatedStore::new();
    let result = pull_initial_state(&joiner, &transport, Duration::from_millis(100)).await;
    assert!(result.is_err());
}
