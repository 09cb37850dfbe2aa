//! End-to-end smoke test over real TCP sockets: two member nodes, a
//! gateway in front of them, and a remote client driving the whole
//! authenticate/create/bid/close flow.

use std::sync::Arc;
use std::time::Duration;

use auction_house::cluster::pull_initial_state;
use auction_house::crypto::generate_keypair;
use auction_house::{
    AuctionError, GatewayClient, GatewayService, MemberNode, NewAuction, ReplicatedStore,
    ResponseStatus, TcpClusterTransport, ThreadRng,
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::common::harness::GatewayHarness;

struct TcpCluster {
    stores: Vec<Arc<ReplicatedStore>>,
    transport: TcpClusterTransport,
    cancel: CancellationToken,
}

impl TcpCluster {
    async fn start(num_members: usize) -> Self {
        let cancel = CancellationToken::new();
        let mut stores = Vec::with_capacity(num_members);
        let mut addrs = Vec::with_capacity(num_members);

        for _ in 0..num_members {
            let store = Arc::new(ReplicatedStore::new());
            let node = MemberNode::bind("127.0.0.1:0".parse().unwrap(), store.clone())
                .await
                .unwrap();
            addrs.push(node.local_addr().unwrap());
            tokio::spawn(node.serve(cancel.clone()));
            stores.push(store);
        }

        Self {
            stores,
            transport: TcpClusterTransport::new(addrs),
            cancel,
        }
    }
}

impl Drop for TcpCluster {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[tokio::test]
async fn test_client_drives_full_flow_over_tcp() {
    let cluster = TcpCluster::start(2).await;

    let gateway_key = generate_keypair();
    let gateway_public = gateway_key.verifying_key();
    let gateway = Arc::new(
        GatewayService::new(
            Arc::new(cluster.transport.clone()),
            gateway_key,
            Arc::new(ThreadRng::new()),
        )
        .with_broadcast_timeout(Duration::from_millis(500)),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let gateway_addr = listener.local_addr().unwrap();
    tokio::spawn(gateway.serve(listener, cluster.cancel.clone()));

    let client = GatewayClient::connect(gateway_addr).await.unwrap();
    let caller_key = generate_keypair();
    let ok = client
        .authenticate(&caller_key, &gateway_public, &ThreadRng::new())
        .await
        .unwrap();
    assert!(ok);

    let seller = GatewayHarness::make_user("Seller");
    let bidder = GatewayHarness::make_user("Bidder");

    let created = client
        .create_auction(NewAuction::new(100, 150, "antique clock", seller.clone()))
        .await
        .unwrap();
    assert_eq!(created.status, ResponseStatus::AuctionCreated);
    let id = created.item.unwrap().id;

    let bid = client.bid(id, bidder.clone(), 200).await.unwrap();
    assert_eq!(bid.status, ResponseStatus::BidSuccessful);

    let listing = client.list_active().await.unwrap();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[&id].highest_bid.as_ref().unwrap().amount, 200);

    let closed = client.close_auction(id, seller).await.unwrap();
    assert_eq!(closed.status, ResponseStatus::AuctionWon);

    assert!(client.list_active().await.unwrap().is_empty());
    for store in &cluster.stores {
        assert!(store.active_auctions().is_empty());
    }
}

#[tokio::test]
async fn test_unauthenticated_client_is_rejected_over_tcp() {
    let cluster = TcpCluster::start(1).await;

    let gateway = Arc::new(
        GatewayService::new(
            Arc::new(cluster.transport.clone()),
            generate_keypair(),
            Arc::new(ThreadRng::new()),
        )
        .with_broadcast_timeout(Duration::from_millis(500)),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let gateway_addr = listener.local_addr().unwrap();
    tokio::spawn(gateway.serve(listener, cluster.cancel.clone()));

    let client = GatewayClient::connect(gateway_addr).await.unwrap();
    let result = client.list_active().await;
    assert!(matches!(result, Err(AuctionError::Unauthenticated)));
}

#[tokio::test]
async fn test_joining_member_pulls_state_over_tcp() {
    let cluster = TcpCluster::start(1).await;
    let seller = GatewayHarness::make_user("Seller");
    cluster.stores[0].create_auction(NewAuction::new(10, 20, "lamp", seller));

    let joiner = ReplicatedStore::new();
    pull_initial_state(&joiner, &cluster.transport, Duration::from_millis(500))
        .await
        .unwrap();
    assert_eq!(joiner.snapshot(), cluster.stores[0].snapshot());
}
