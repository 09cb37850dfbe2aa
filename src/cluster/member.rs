//! Cluster member node: serves its [`ReplicatedStore`] over TCP and pulls
//! an initial state snapshot from a peer when joining an existing cluster.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cluster::wire::{read_frame, write_frame, ClusterRequest, ClusterResponse};
use crate::error::{AuctionError, AuctionResult};
use crate::store::ReplicatedStore;
use crate::traits::{ClusterTransport, MemberId};

/// Apply one cluster request to a member's store.
///
/// Every arm runs under the store's single exclusive lock, including the
/// state-transfer snapshot, so no write can interleave mid-snapshot.
pub fn dispatch(store: &ReplicatedStore, request: ClusterRequest) -> ClusterResponse {
    match request {
        ClusterRequest::CreateAuction { request } => {
            ClusterResponse::Op(store.create_auction(request))
        }
        ClusterRequest::Bid { bid } => ClusterResponse::Op(store.bid(bid)),
        ClusterRequest::CloseAuction {
            auction_id,
            requester,
        } => ClusterResponse::Op(store.close_auction(auction_id, &requester)),
        ClusterRequest::ListActive => ClusterResponse::Listing(store.active_auctions()),
        ClusterRequest::FetchState => ClusterResponse::State(store.snapshot()),
    }
}

/// Pull the current cluster state from one of the given peers and install
/// it into `store`.
///
/// Fatal to the join attempt if no peer serves a usable snapshot within the
/// timeout: the member must not start serving with partial state.
pub async fn pull_initial_state<T>(
    store: &ReplicatedStore,
    transport: &T,
    timeout: Duration,
) -> AuctionResult<MemberId>
where
    T: ClusterTransport + ?Sized,
{
    let peers = transport.members().await;
    if peers.is_empty() {
        return Err(AuctionError::StateTransfer(
            "no peers to transfer state from".into(),
        ));
    }

    for peer in &peers {
        match tokio::time::timeout(timeout, transport.call(peer, ClusterRequest::FetchState)).await
        {
            Ok(Ok(ClusterResponse::State(snapshot))) => {
                store.install_snapshot(snapshot);
                info!("State transfer from {} complete", peer);
                return Ok(peer.clone());
            }
            Ok(Ok(_)) => warn!("Peer {} returned a malformed snapshot reply", peer),
            Ok(Err(e)) => warn!("State transfer from {} failed: {}", peer, e),
            Err(_) => warn!("State transfer from {} timed out", peer),
        }
    }

    Err(AuctionError::StateTransfer(
        "no peer could serve a state snapshot".into(),
    ))
}

/// A running cluster member: a TCP listener in front of one store.
pub struct MemberNode {
    store: Arc<ReplicatedStore>,
    listener: TcpListener,
}

impl MemberNode {
    /// Bind the member's listener. The store may already carry transferred
    /// state; see [`pull_initial_state`].
    pub async fn bind(addr: SocketAddr, store: Arc<ReplicatedStore>) -> AuctionResult<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| AuctionError::Transport(format!("bind {addr} failed: {e}")))?;
        Ok(Self { store, listener })
    }

    /// The address the listener actually bound (useful with port 0).
    pub fn local_addr(&self) -> AuctionResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept and serve connections until cancelled.
    pub async fn serve(self, cancel: CancellationToken) -> AuctionResult<()> {
        info!("Member serving on {}", self.local_addr()?);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Member shutting down");
                    return Ok(());
                }
                accepted = self.listener.accept() => {
                    match accepted {
                        Ok((stream, peer)) => {
                            debug!("Member accepted connection from {}", peer);
                            let store = self.store.clone();
                            tokio::spawn(handle_connection(store, stream));
                        }
                        Err(e) => warn!("Member accept failed: {}", e),
                    }
                }
            }
        }
    }
}

async fn handle_connection(store: Arc<ReplicatedStore>, mut stream: TcpStream) {
    loop {
        let request: ClusterRequest = match read_frame(&mut stream).await {
            Ok(request) => request,
            // Clean disconnect or garbage; either way the connection is done.
            Err(e) => {
                debug!("Member connection closed: {}", e);
                return;
            }
        };
        let response = dispatch(&store, request);
        if let Err(e) = write_frame(&mut stream, &response).await {
            warn!("Member failed to write response: {}", e);
            return;
        }
    }
}
