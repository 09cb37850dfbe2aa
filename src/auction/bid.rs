use serde::{Deserialize, Serialize};

use super::item::AuctionId;
use super::user::User;

/// A single bid attempt on an auction.
///
/// Bids are not stored independently; an accepted bid only survives as the
/// auction item's current highest bid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    /// The auction this bid is for.
    pub auction_id: AuctionId,

    /// The account placing the bid.
    pub bidder: User,

    /// Bid amount in atomic units; must be strictly positive.
    pub amount: u64,
}

impl Bid {
    pub fn new(auction_id: AuctionId, bidder: User, amount: u64) -> Self {
        Self {
            auction_id,
            bidder,
            amount,
        }
    }
}
