//! TCP implementation of [`ClusterTransport`].
//!
//! Membership is a static address book: every member address is known up
//! front (config-level membership). Each call opens one connection, sends
//! one frame and reads one frame; unreachable members surface as transport
//! errors and are excluded by the broadcast timeout policy.

use std::net::SocketAddr;

use async_trait::async_trait;
use tokio::net::TcpStream;

use crate::cluster::wire::{read_frame, write_frame, ClusterRequest, ClusterResponse};
use crate::error::{AuctionError, AuctionResult};
use crate::traits::{ClusterTransport, MemberId};

/// Gateway-side (and joining-member-side) view of the cluster.
#[derive(Debug, Clone)]
pub struct TcpClusterTransport {
    members: Vec<(MemberId, SocketAddr)>,
}

impl TcpClusterTransport {
    /// Build an address book from the configured member addresses.
    pub fn new(addrs: impl IntoIterator<Item = SocketAddr>) -> Self {
        let members = addrs
            .into_iter()
            .map(|addr| (MemberId::new(addr.to_string()), addr))
            .collect();
        Self { members }
    }

    fn addr_of(&self, member: &MemberId) -> Option<SocketAddr> {
        self.members
            .iter()
            .find(|(id, _)| id == member)
            .map(|(_, addr)| *addr)
    }
}

#[async_trait]
impl ClusterTransport for TcpClusterTransport {
    async fn members(&self) -> Vec<MemberId> {
        self.members.iter().map(|(id, _)| id.clone()).collect()
    }

    async fn call(
        &self,
        member: &MemberId,
        request: ClusterRequest,
    ) -> AuctionResult<ClusterResponse> {
        let addr = self
            .addr_of(member)
            .ok_or_else(|| AuctionError::Transport(format!("unknown member {member}")))?;

        let mut stream = TcpStream::connect(addr)
            .await
            .map_err(|e| AuctionError::Transport(format!("connect to {member} failed: {e}")))?;
        write_frame(&mut stream, &request).await?;
        read_frame(&mut stream).await
    }
}
