use serde::{Deserialize, Serialize};

use crate::error::{AuctionError, AuctionResult};

use super::bid::Bid;
use super::user::User;

/// Identifier a cluster member assigns to an auction on creation.
///
/// Ids are drawn from a per-member monotonic counter; there is no
/// uniqueness guarantee across members.
pub type AuctionId = u64;

/// A create-auction request before a member has assigned it an id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAuction {
    /// Minimum amount a first bid must meet.
    pub start_price: u64,

    /// Minimum acceptable winning bid; an auction closed below it is unsold.
    pub reserve_price: u64,

    /// Textual description of the item for sale.
    pub description: String,

    /// The account offering the item.
    pub seller: User,
}

impl NewAuction {
    pub fn new(
        start_price: u64,
        reserve_price: u64,
        description: impl Into<String>,
        seller: User,
    ) -> Self {
        Self {
            start_price,
            reserve_price,
            description: description.into(),
            seller,
        }
    }

    /// Caller-side validation, applied before the request is issued to the
    /// cluster. The store itself does not re-check this.
    pub fn validate(&self) -> AuctionResult<()> {
        if self.reserve_price < self.start_price {
            return Err(AuctionError::Validation(format!(
                "reserve price {} is below start price {}",
                self.reserve_price, self.start_price
            )));
        }
        Ok(())
    }
}

/// An item offered for sale, as stored by a cluster member.
///
/// Immutable after creation except for the current highest bid, which is
/// replaced only by accepted bids under the member's lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionItem {
    /// Member-assigned identifier, immutable once set.
    pub id: AuctionId,

    pub start_price: u64,

    pub reserve_price: u64,

    pub description: String,

    pub seller: User,

    /// The winning bid so far, if any. When present its amount is at least
    /// the start price.
    pub highest_bid: Option<Bid>,
}

impl AuctionItem {
    /// Materialize a stored item from a create request and an assigned id.
    pub fn from_request(id: AuctionId, request: NewAuction) -> Self {
        Self {
            id,
            start_price: request.start_price,
            reserve_price: request.reserve_price,
            description: request.description,
            seller: request.seller,
            highest_bid: None,
        }
    }

    /// One-line summary for listings.
    pub fn summary(&self) -> String {
        match &self.highest_bid {
            None => format!(
                "{}: start {} (no bids), seller {}",
                self.description, self.start_price, self.seller.email
            ),
            Some(bid) => format!(
                "{}: start {}, highest bid {}, seller {}",
                self.description, self.start_price, bid.amount, self.seller.email
            ),
        }
    }
}
