//! Auction domain model: immutable-after-creation value types plus the
//! pure validation rules for create/bid/close requests.

pub mod bid;
pub mod item;
pub mod response;
pub mod user;

pub use bid::Bid;
pub use item::{AuctionId, AuctionItem, NewAuction};
pub use response::{ResponseStatus, ServerResponse};
pub use user::User;
