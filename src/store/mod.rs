//! Replicated store: a single cluster member's in-memory auction table and
//! the state machine that applies create/bid/close under one exclusive lock.
//!
//! Every member holds its own table and id counter and applies each
//! broadcast operation independently. There is no cross-member locking and
//! no ordering guarantee, so tables are not guaranteed identical across
//! members; see the design notes on divergent replication.

use std::collections::HashMap;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auction::{
    AuctionId, AuctionItem, Bid, NewAuction, ResponseStatus, ServerResponse, User,
};

/// A wholesale copy of a member's replicated state, exchanged during
/// state transfer when a new member joins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub auctions: HashMap<AuctionId, AuctionItem>,
    pub next_id: AuctionId,
}

#[derive(Debug)]
struct StoreState {
    auctions: HashMap<AuctionId, AuctionItem>,
    next_id: AuctionId,
}

/// One cluster member's auction table.
///
/// All operations serialize on a single lock, so no two run concurrently on
/// the same member; concurrent deliveries block rather than race. Each
/// instance is independently constructable, with no process-wide state.
#[derive(Debug)]
pub struct ReplicatedStore {
    state: Mutex<StoreState>,
}

impl ReplicatedStore {
    /// Create a member store with an empty table.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(StoreState {
                auctions: HashMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Assign the next local id to the requested auction and insert it.
    ///
    /// Reserve-below-start requests are rejected by caller-side validation
    /// before the operation is issued; the store does not re-check.
    pub fn create_auction(&self, request: NewAuction) -> ServerResponse {
        let mut state = self.state.lock();
        let id = state.next_id;
        state.next_id += 1;

        let item = AuctionItem::from_request(id, request);
        info!("Auction created (id: {}) <{}>", id, item.summary());
        state.auctions.insert(id, item.clone());
        ServerResponse::new(ResponseStatus::AuctionCreated, Some(item))
    }

    /// Apply a bid attempt; an accepted bid replaces the current highest.
    pub fn bid(&self, bid: Bid) -> ServerResponse {
        let mut state = self.state.lock();
        let Some(item) = state.auctions.get_mut(&bid.auction_id) else {
            return ServerResponse::new(ResponseStatus::NoAuction, None);
        };

        if item.seller.id == bid.bidder.id {
            return ServerResponse::new(ResponseStatus::CantBidOwn, None);
        }
        if bid.amount < item.start_price {
            return ServerResponse::new(ResponseStatus::BidSmallerThanStart, None);
        }
        if let Some(highest) = &item.highest_bid {
            // Ties lose: an equal bid does not replace the standing one.
            if bid.amount <= highest.amount {
                return ServerResponse::new(ResponseStatus::BidSmallerThanHigh, None);
            }
        }

        item.highest_bid = Some(bid);
        let item = item.clone();
        info!("Bid successful (id: {}) <{}>", item.id, item.summary());
        ServerResponse::new(ResponseStatus::BidSuccessful, Some(item))
    }

    /// Close an auction, removing it from the table.
    ///
    /// Only the seller may close; the result indicates whether the reserve
    /// price was met, with the winning bid attached to the returned item.
    pub fn close_auction(&self, auction_id: AuctionId, requester: &User) -> ServerResponse {
        let mut state = self.state.lock();
        let Some(item) = state.auctions.get(&auction_id) else {
            return ServerResponse::new(ResponseStatus::NoAuction, None);
        };
        if item.seller.id != requester.id {
            return ServerResponse::new(ResponseStatus::CantCloseOwn, Some(item.clone()));
        }

        // The entry is removed regardless of whether the reserve was met.
        let Some(item) = state.auctions.remove(&auction_id) else {
            return ServerResponse::new(ResponseStatus::NoAuction, None);
        };
        info!("Auction closed (id: {}) <{}>", auction_id, item.summary());

        let reserve_met = item
            .highest_bid
            .as_ref()
            .is_some_and(|bid| bid.amount >= item.reserve_price);
        if reserve_met {
            ServerResponse::new(ResponseStatus::AuctionWon, Some(item))
        } else {
            ServerResponse::new(ResponseStatus::ReserveNotMet, Some(item))
        }
    }

    /// Read-only snapshot of the active auction table.
    ///
    /// Returns a copy, never a live reference; callers cannot observe
    /// concurrent mutation through it.
    pub fn active_auctions(&self) -> HashMap<AuctionId, AuctionItem> {
        self.state.lock().auctions.clone()
    }

    /// Copy the full replicated state under the operation lock, so the
    /// snapshot is internally consistent with no write mid-copy.
    pub fn snapshot(&self) -> StoreSnapshot {
        let state = self.state.lock();
        StoreSnapshot {
            auctions: state.auctions.clone(),
            next_id: state.next_id,
        }
    }

    /// Replace this member's state wholesale with a transferred snapshot,
    /// resetting the id counter to the transferred value.
    pub fn install_snapshot(&self, snapshot: StoreSnapshot) {
        let mut state = self.state.lock();
        state.next_id = snapshot.next_id;
        state.auctions = snapshot.auctions;
        info!(
            "Installed state snapshot: {} auction(s), next id {}",
            state.auctions.len(),
            state.next_id
        );
    }
}

impl Default for ReplicatedStore {
    fn default() -> Self {
        Self::new()
    }
}
