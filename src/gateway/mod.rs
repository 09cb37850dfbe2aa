//! Front-end gateway: the single externally reachable endpoint.
//!
//! The gateway holds no auction state. Every authenticated write is
//! re-issued as a cluster broadcast (wait-for-all within a timeout) and
//! reduced to the first-arrived member response; listings are answered by a
//! single designated member. The gateway also serves its half of the
//! challenge-response authentication exchange.

pub mod wire;

use std::sync::Arc;
use std::time::Duration;

use ed25519_dalek::SigningKey;
use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::auth::AuthAck;
use crate::cluster::wire::{read_frame, write_frame, ClusterRequest, ClusterResponse};
use crate::config;
use crate::crypto::{sign_challenge, verify_challenge, AuthChallenge};
use crate::error::{AuctionError, AuctionResult};
use crate::traits::{ClusterTransport, MemberReply, RandomSource, ResponsePolicy};

pub use wire::{ClientRequest, ClientResponse};

/// Per-connection authentication state.
///
/// Each external caller gets its own session; concurrent callers share no
/// gateway-side state beyond the transport.
#[derive(Debug, Default)]
pub struct Session {
    authenticated: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }
}

/// The gateway service: relay plus aggregation policy.
pub struct GatewayService {
    transport: Arc<dyn ClusterTransport>,
    signing_key: SigningKey,
    rng: Arc<dyn RandomSource>,
    broadcast_timeout: Duration,
}

impl GatewayService {
    pub fn new(
        transport: Arc<dyn ClusterTransport>,
        signing_key: SigningKey,
        rng: Arc<dyn RandomSource>,
    ) -> Self {
        Self {
            transport,
            signing_key,
            rng,
            broadcast_timeout: config::broadcast_timeout(),
        }
    }

    /// Override the broadcast timeout (tests use short values).
    pub fn with_broadcast_timeout(mut self, timeout: Duration) -> Self {
        self.broadcast_timeout = timeout;
        self
    }

    /// Handle one request within a caller's session.
    pub async fn handle_request(
        &self,
        request: ClientRequest,
        session: &mut Session,
    ) -> ClientResponse {
        if request.requires_auth() && !session.authenticated {
            debug!("Rejecting operation from unauthenticated session");
            return ClientResponse::Unauthenticated;
        }

        match request {
            ClientRequest::RequestChallenge => {
                ClientResponse::Challenge(AuthChallenge::generate(&*self.rng))
            }
            ClientRequest::SignChallenge { challenge } => ClientResponse::Auth(AuthAck {
                sig_bytes: sign_challenge(challenge, &self.signing_key),
                challenge,
                verified: false,
            }),
            ClientRequest::VerifySignature { sig } => {
                let verified = verify_challenge(&sig.sig_bytes, sig.challenge, &sig.public_key);
                if verified {
                    session.authenticated = true;
                    info!("Caller authenticated");
                } else {
                    // One uniform outcome regardless of which check failed.
                    info!("Caller signature did not verify");
                }
                ClientResponse::Auth(AuthAck {
                    sig_bytes: sig.sig_bytes,
                    challenge: sig.challenge,
                    verified,
                })
            }
            ClientRequest::CreateAuction { request } => {
                self.relay_write(ClusterRequest::CreateAuction { request })
                    .await
            }
            ClientRequest::Bid { bid } => self.relay_write(ClusterRequest::Bid { bid }).await,
            ClientRequest::CloseAuction {
                auction_id,
                requester,
            } => {
                self.relay_write(ClusterRequest::CloseAuction {
                    auction_id,
                    requester,
                })
                .await
            }
            ClientRequest::ListActive => self.list_active().await,
        }
    }

    /// Broadcast a write to every member, then reduce the reply set to the
    /// first-arrived response.
    async fn relay_write(&self, request: ClusterRequest) -> ClientResponse {
        let replies = self
            .transport
            .broadcast(request, self.broadcast_timeout, ResponsePolicy::WaitAll)
            .await;
        debug!("Broadcast collected {} member reply(ies)", replies.len());

        match replies.into_iter().next() {
            Some(MemberReply {
                response: ClusterResponse::Op(response),
                ..
            }) => ClientResponse::Op(response),
            Some(MemberReply { member, .. }) => {
                warn!("Member {} returned a non-operation reply", member);
                ClientResponse::Error("unexpected member response".into())
            }
            None => ClientResponse::Error("no cluster member responded".into()),
        }
    }

    /// Answer a listing from a single designated member (the first in the
    /// address book) instead of broadcasting a read.
    async fn list_active(&self) -> ClientResponse {
        let members = self.transport.members().await;
        let Some(member) = members.first() else {
            return ClientResponse::Error("no cluster members configured".into());
        };

        match self.transport.call(member, ClusterRequest::ListActive).await {
            Ok(ClusterResponse::Listing(listing)) => ClientResponse::Listing(listing),
            Ok(_) => ClientResponse::Error("unexpected member response".into()),
            Err(e) => ClientResponse::Error(format!("listing failed: {e}")),
        }
    }

    /// Accept external callers until cancelled. One session per connection.
    pub async fn serve(
        self: Arc<Self>,
        listener: TcpListener,
        cancel: CancellationToken,
    ) -> AuctionResult<()> {
        let addr = listener.local_addr().map_err(AuctionError::Io)?;
        info!("Gateway serving on {}", addr);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Gateway shutting down");
                    return Ok(());
                }
                accepted = listener.accept() => {
                    match accepted {
                        Ok((stream, peer)) => {
                            debug!("Gateway accepted caller {}", peer);
                            let gateway = self.clone();
                            tokio::spawn(async move {
                                gateway.handle_caller(stream).await;
                            });
                        }
                        Err(e) => warn!("Gateway accept failed: {}", e),
                    }
                }
            }
        }
    }

    async fn handle_caller(&self, mut stream: TcpStream) {
        let mut session = Session::new();
        loop {
            let request: ClientRequest = match read_frame(&mut stream).await {
                Ok(request) => request,
                Err(e) => {
                    debug!("Caller connection closed: {}", e);
                    return;
                }
            };
            let response = self.handle_request(request, &mut session).await;
            if let Err(e) = write_frame(&mut stream, &response).await {
                warn!("Gateway failed to write response: {}", e);
                return;
            }
        }
    }
}
