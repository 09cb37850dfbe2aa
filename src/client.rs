//! Remote gateway client: connects to the gateway's external endpoint,
//! drives the authentication exchange and issues auction operations.
//!
//! Caller-side validation lives here: a reserve price below the start
//! price, or a non-positive bid amount, is rejected before any request is
//! issued to the cluster.

use std::collections::HashMap;
use std::net::SocketAddr;

use async_trait::async_trait;
use ed25519_dalek::{SigningKey, VerifyingKey};
use tokio::net::TcpStream;
use tokio::sync::Mutex;

use crate::auction::{AuctionId, AuctionItem, Bid, NewAuction, ServerResponse, User};
use crate::auth::{self, AuthAck, AuthGateway, AuthSig};
use crate::cluster::wire::{read_frame, write_frame};
use crate::crypto::AuthChallenge;
use crate::error::{AuctionError, AuctionResult};
use crate::gateway::{ClientRequest, ClientResponse};
use crate::traits::RandomSource;

/// A connection to the gateway's external endpoint.
pub struct GatewayClient {
    // One request/response in flight at a time per connection.
    stream: Mutex<TcpStream>,
}

impl GatewayClient {
    pub async fn connect(addr: SocketAddr) -> AuctionResult<Self> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|e| AuctionError::Transport(format!("connect to gateway failed: {e}")))?;
        Ok(Self {
            stream: Mutex::new(stream),
        })
    }

    async fn call(&self, request: ClientRequest) -> AuctionResult<ClientResponse> {
        let mut stream = self.stream.lock().await;
        write_frame(&mut *stream, &request).await?;
        read_frame(&mut *stream).await
    }

    /// Run the mutual challenge-response exchange for this connection.
    pub async fn authenticate(
        &self,
        signing_key: &SigningKey,
        gateway_public_key: &VerifyingKey,
        rng: &dyn RandomSource,
    ) -> AuctionResult<bool> {
        auth::authenticate(self, signing_key, gateway_public_key, rng).await
    }

    pub async fn create_auction(&self, request: NewAuction) -> AuctionResult<ServerResponse> {
        request.validate()?;
        self.expect_op(ClientRequest::CreateAuction { request }).await
    }

    pub async fn bid(
        &self,
        auction_id: AuctionId,
        bidder: User,
        amount: u64,
    ) -> AuctionResult<ServerResponse> {
        if amount == 0 {
            return Err(AuctionError::Validation(
                "bid amount must be positive".into(),
            ));
        }
        let bid = Bid::new(auction_id, bidder, amount);
        self.expect_op(ClientRequest::Bid { bid }).await
    }

    pub async fn close_auction(
        &self,
        auction_id: AuctionId,
        requester: User,
    ) -> AuctionResult<ServerResponse> {
        self.expect_op(ClientRequest::CloseAuction {
            auction_id,
            requester,
        })
        .await
    }

    pub async fn list_active(&self) -> AuctionResult<HashMap<AuctionId, AuctionItem>> {
        match self.call(ClientRequest::ListActive).await? {
            ClientResponse::Listing(listing) => Ok(listing),
            ClientResponse::Unauthenticated => Err(AuctionError::Unauthenticated),
            ClientResponse::Error(e) => Err(AuctionError::Transport(e)),
            other => Err(unexpected(&other)),
        }
    }

    async fn expect_op(&self, request: ClientRequest) -> AuctionResult<ServerResponse> {
        match self.call(request).await? {
            ClientResponse::Op(response) => Ok(response),
            ClientResponse::Unauthenticated => Err(AuctionError::Unauthenticated),
            ClientResponse::Error(e) => Err(AuctionError::Transport(e)),
            other => Err(unexpected(&other)),
        }
    }
}

fn unexpected(response: &ClientResponse) -> AuctionError {
    AuctionError::Transport(format!("unexpected gateway response: {response:?}"))
}

#[async_trait]
impl AuthGateway for GatewayClient {
    async fn request_challenge(&self) -> AuctionResult<AuthChallenge> {
        match self.call(ClientRequest::RequestChallenge).await? {
            ClientResponse::Challenge(challenge) => Ok(challenge),
            other => Err(unexpected(&other)),
        }
    }

    async fn sign_challenge(&self, challenge: AuthChallenge) -> AuctionResult<AuthAck> {
        match self.call(ClientRequest::SignChallenge { challenge }).await? {
            ClientResponse::Auth(ack) => Ok(ack),
            other => Err(unexpected(&other)),
        }
    }

    async fn verify_signature(&self, sig: AuthSig) -> AuctionResult<AuthAck> {
        match self.call(ClientRequest::VerifySignature { sig }).await? {
            ClientResponse::Auth(ack) => Ok(ack),
            other => Err(unexpected(&other)),
        }
    }
}
