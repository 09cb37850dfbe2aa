//! Wire protocol between external callers and the gateway.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::auction::{AuctionId, AuctionItem, Bid, NewAuction, ServerResponse, User};
use crate::auth::{AuthAck, AuthSig};
use crate::crypto::AuthChallenge;

/// One remote operation invoked on the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ClientRequest {
    // Authentication exchange
    RequestChallenge,
    SignChallenge { challenge: AuthChallenge },
    VerifySignature { sig: AuthSig },

    // Auction operations (require an authenticated session)
    CreateAuction { request: NewAuction },
    Bid { bid: Bid },
    CloseAuction { auction_id: AuctionId, requester: User },
    ListActive,
}

impl ClientRequest {
    /// Whether this operation is gated behind authentication.
    pub fn requires_auth(&self) -> bool {
        !matches!(
            self,
            Self::RequestChallenge | Self::SignChallenge { .. } | Self::VerifySignature { .. }
        )
    }
}

/// The gateway's reply to a [`ClientRequest`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ClientResponse {
    Challenge(AuthChallenge),
    Auth(AuthAck),
    Op(ServerResponse),
    Listing(HashMap<AuctionId, AuctionItem>),
    /// The session has not completed the challenge-response exchange.
    Unauthenticated,
    /// Protocol-level failure (unreachable cluster, malformed exchange).
    Error(String),
}
