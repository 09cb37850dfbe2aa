//! Gateway relay semantics: authenticated callers drive the full auction
//! lifecycle through the gateway, and the reply reduction picks the
//! first-arrived member response.

use std::time::Duration;

use auction_house::gateway::{ClientRequest, ClientResponse};
use auction_house::{Bid, NewAuction, ResponseStatus, ServerResponse, Session};

use crate::common::harness::GatewayHarness;

async fn setup(num_members: usize) -> (GatewayHarness, Session) {
    let harness = GatewayHarness::new(num_members).await;
    let caller_key = auction_house::crypto::generate_keypair();
    let session = harness.authenticated_session(&caller_key).await;
    (harness, session)
}

async fn op(
    harness: &GatewayHarness,
    session: &mut Session,
    request: ClientRequest,
) -> ServerResponse {
    match harness.gateway.handle_request(request, session).await {
        ClientResponse::Op(response) => response,
        other => panic!("unexpected response: {other:?}"),
    }
}

#[tokio::test]
async fn test_full_auction_lifecycle() {
    let (harness, mut session) = setup(2).await;
    let seller = GatewayHarness::make_user("Seller");
    let bidder = GatewayHarness::make_user("Bidder");

    let created = op(
        &harness,
        &mut session,
        ClientRequest::CreateAuction {
            request: NewAuction::new(100, 150, "antique clock", seller.clone()),
        },
    )
    .await;
    assert_eq!(created.status, ResponseStatus::AuctionCreated);
    let id = created.item.unwrap().id;

    let bid = op(
        &harness,
        &mut session,
        ClientRequest::Bid {
            bid: Bid::new(id, bidder.clone(), 160),
        },
    )
    .await;
    assert_eq!(bid.status, ResponseStatus::BidSuccessful);

    let closed = op(
        &harness,
        &mut session,
        ClientRequest::CloseAuction {
            auction_id: id,
            requester: seller,
        },
    )
    .await;
    assert_eq!(closed.status, ResponseStatus::AuctionWon);
    let winner = closed.item.unwrap().highest_bid.unwrap();
    assert_eq!(winner.bidder.id, bidder.id);
    assert_eq!(winner.amount, 160);

    for store in &harness.stores {
        assert!(store.active_auctions().is_empty());
    }
}

#[tokio::test]
async fn test_bid_rejections_surface_to_the_caller() {
    let (harness, mut session) = setup(1).await;
    let seller = GatewayHarness::make_user("Seller");
    let bidder = GatewayHarness::make_user("Bidder");

    let created = op(
        &harness,
        &mut session,
        ClientRequest::CreateAuction {
            request: NewAuction::new(100, 150, "antique clock", seller.clone()),
        },
    )
    .await;
    let id = created.item.unwrap().id;

    let below_start = op(
        &harness,
        &mut session,
        ClientRequest::Bid {
            bid: Bid::new(id, bidder.clone(), 50),
        },
    )
    .await;
    assert_eq!(below_start.status, ResponseStatus::BidSmallerThanStart);

    let own_item = op(
        &harness,
        &mut session,
        ClientRequest::Bid {
            bid: Bid::new(id, seller.clone(), 200),
        },
    )
    .await;
    assert_eq!(own_item.status, ResponseStatus::CantBidOwn);

    op(
        &harness,
        &mut session,
        ClientRequest::Bid {
            bid: Bid::new(id, bidder.clone(), 160),
        },
    )
    .await;
    // A tying bid does not displace the current highest.
    let tie = op(
        &harness,
        &mut session,
        ClientRequest::Bid {
            bid: Bid::new(id, GatewayHarness::make_user("Other"), 160),
        },
    )
    .await;
    assert_eq!(tie.status, ResponseStatus::BidSmallerThanHigh);

    let missing = op(
        &harness,
        &mut session,
        ClientRequest::Bid {
            bid: Bid::new(999, bidder, 160),
        },
    )
    .await;
    assert_eq!(missing.status, ResponseStatus::NoAuction);
}

#[tokio::test]
async fn test_close_rejections_surface_to_the_caller() {
    let (harness, mut session) = setup(1).await;
    let seller = GatewayHarness::make_user("Seller");
    let stranger = GatewayHarness::make_user("Stranger");

    let created = op(
        &harness,
        &mut session,
        ClientRequest::CreateAuction {
            request: NewAuction::new(100, 150, "antique clock", seller.clone()),
        },
    )
    .await;
    let id = created.item.unwrap().id;

    let not_seller = op(
        &harness,
        &mut session,
        ClientRequest::CloseAuction {
            auction_id: id,
            requester: stranger,
        },
    )
    .await;
    assert_eq!(not_seller.status, ResponseStatus::CantCloseOwn);

    let reserve_not_met = op(
        &harness,
        &mut session,
        ClientRequest::CloseAuction {
            auction_id: id,
            requester: seller.clone(),
        },
    )
    .await;
    assert_eq!(reserve_not_met.status, ResponseStatus::ReserveNotMet);

    let missing = op(
        &harness,
        &mut session,
        ClientRequest::CloseAuction {
            auction_id: id,
            requester: seller,
        },
    )
    .await;
    assert_eq!(missing.status, ResponseStatus::NoAuction);
}

#[tokio::test]
async fn test_listing_comes_from_the_designated_member() {
    let (harness, mut session) = setup(2).await;
    let seller = GatewayHarness::make_user("Seller");

    op(
        &harness,
        &mut session,
        ClientRequest::CreateAuction {
            request: NewAuction::new(10, 20, "lamp", seller),
        },
    )
    .await;

    let response = harness
        .gateway
        .handle_request(ClientRequest::ListActive, &mut session)
        .await;
    match response {
        ClientResponse::Listing(listing) => {
            assert_eq!(listing.len(), 1);
            assert_eq!(listing[&1].description, "lamp");
        }
        other => panic!("unexpected response: {other:?}"),
    }

    // The listing went to the first member only.
    let calls = harness.transport.calls().await;
    assert_eq!(calls.last(), Some(&harness.members[0]));
}

#[tokio::test]
async fn test_listing_fails_over_to_error_when_designated_member_is_down() {
    let (harness, mut session) = setup(2).await;
    harness.transport.set_down(&harness.members[0], true).await;

    let response = harness
        .gateway
        .handle_request(ClientRequest::ListActive, &mut session)
        .await;
    assert!(matches!(response, ClientResponse::Error(_)));
}

#[tokio::test]
async fn test_reduction_takes_the_first_arrived_reply() {
    let (harness, mut session) = setup(2).await;

    // Skew member 0 so member 1 answers first; both replies still arrive
    // within the timeout and the first-arrived one is returned.
    harness
        .transport
        .set_delay(&harness.members[0], Duration::from_millis(50))
        .await;

    let created = op(
        &harness,
        &mut session,
        ClientRequest::CreateAuction {
            request: NewAuction::new(10, 20, "lamp", GatewayHarness::make_user("Seller")),
        },
    )
    .await;
    assert_eq!(created.status, ResponseStatus::AuctionCreated);

    // Both members applied the write despite the skew.
    assert_eq!(harness.stores[0].active_auctions().len(), 1);
    assert_eq!(harness.stores[1].active_auctions().len(), 1);
}
