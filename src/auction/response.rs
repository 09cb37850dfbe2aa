use serde::{Deserialize, Serialize};

use super::item::AuctionItem;

/// Result code of an auction operation.
///
/// The set is fixed and must round-trip identically over the wire; members
/// and gateway exchange these inside [`ServerResponse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseStatus {
    /// Close rejected: the requester does not own the auction.
    CantCloseOwn,
    /// Bid rejected: the bidder owns the auction.
    CantBidOwn,
    /// No auction exists under the given id.
    NoAuction,
    /// Bid rejected: amount below the start price.
    BidSmallerThanStart,
    /// Bid rejected: amount not strictly above the current highest bid.
    BidSmallerThanHigh,
    /// Auction closed unsold: no bid met the reserve price.
    ReserveNotMet,
    /// Auction closed with a winning bid attached.
    AuctionWon,
    /// Bid accepted as the new highest.
    BidSuccessful,
    /// Auction closed.
    AuctionClosed,
    /// Auction created and assigned an id.
    AuctionCreated,
}

/// Response a member returns for a single auction operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerResponse {
    pub status: ResponseStatus,

    /// The item involved in the operation, when one exists.
    pub item: Option<AuctionItem>,
}

impl ServerResponse {
    pub fn new(status: ResponseStatus, item: Option<AuctionItem>) -> Self {
        Self { status, item }
    }
}
