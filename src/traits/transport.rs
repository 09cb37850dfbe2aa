//! Cluster transport abstraction: membership plus a best-effort
//! request/response broadcast with explicit timeout and aggregation policy.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{FuturesUnordered, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cluster::wire::{ClusterRequest, ClusterResponse};
use crate::error::AuctionResult;

/// Opaque identifier for a cluster member.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberId(pub String);

impl MemberId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How [`ClusterTransport::broadcast`] aggregates member replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponsePolicy {
    /// Collect replies from every member until the timeout elapses.
    WaitAll,
    /// Return as soon as the first reply arrives.
    FirstArrived,
}

/// One member's reply collected by a broadcast.
#[derive(Debug, Clone)]
pub struct MemberReply {
    pub member: MemberId,
    pub response: ClusterResponse,
}

/// Abstraction over cluster membership and member RPC.
///
/// This trait enables testing of the gateway's fan-out logic without
/// real network connections.
#[async_trait]
pub trait ClusterTransport: Send + Sync {
    /// Current cluster membership.
    async fn members(&self) -> Vec<MemberId>;

    /// Issue one request to one member and wait for its reply.
    async fn call(
        &self,
        member: &MemberId,
        request: ClusterRequest,
    ) -> AuctionResult<ClusterResponse>;

    /// Fan the request out to every member concurrently and fan the replies
    /// back in under a bounded timeout.
    ///
    /// Members that fail or do not reply within the timeout are excluded
    /// from the result set, not retried; no cancellation is sent to slow
    /// members. Replies are returned in arrival order, so the first element
    /// is the first-arrived response.
    async fn broadcast(
        &self,
        request: ClusterRequest,
        timeout: Duration,
        policy: ResponsePolicy,
    ) -> Vec<MemberReply> {
        let members = self.members().await;
        let mut calls: FuturesUnordered<_> = members
            .into_iter()
            .map(|member| {
                let request = request.clone();
                async move {
                    let result = self.call(&member, request).await;
                    (member, result)
                }
            })
            .collect();

        let deadline = tokio::time::sleep(timeout);
        tokio::pin!(deadline);

        let mut replies = Vec::new();
        loop {
            tokio::select! {
                next = calls.next() => match next {
                    Some((member, Ok(response))) => {
                        replies.push(MemberReply { member, response });
                        if policy == ResponsePolicy::FirstArrived {
                            break;
                        }
                    }
                    Some((member, Err(e))) => {
                        debug!("Member {} dropped from broadcast: {}", member, e);
                    }
                    None => break,
                },
                _ = &mut deadline => {
                    debug!(
                        "Broadcast timed out after {:?} with {} reply(ies)",
                        timeout,
                        replies.len()
                    );
                    break;
                }
            }
        }
        replies
    }
}
