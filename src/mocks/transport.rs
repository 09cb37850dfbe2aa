//! Mock cluster transport backed by in-process replicated stores.
//!
//! Each mock member is a real [`ReplicatedStore`] with an optional
//! artificial reply delay and a down flag, so broadcast timeout and
//! exclusion behavior can be exercised deterministically.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cluster::member::dispatch;
use crate::cluster::wire::{ClusterRequest, ClusterResponse};
use crate::error::{AuctionError, AuctionResult};
use crate::store::ReplicatedStore;
use crate::traits::{ClusterTransport, MemberId};

#[derive(Clone)]
struct MemberSlot {
    id: MemberId,
    store: Arc<ReplicatedStore>,
    delay: Option<Duration>,
    down: bool,
}

/// Mock transport over a set of in-process members.
#[derive(Clone, Default)]
pub struct MockTransport {
    members: Arc<RwLock<Vec<MemberSlot>>>,
    calls: Arc<RwLock<Vec<MemberId>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a member backed by the given store; returns its id.
    pub async fn add_member(&self, name: impl Into<String>, store: Arc<ReplicatedStore>) -> MemberId {
        let id = MemberId::new(name);
        self.members.write().await.push(MemberSlot {
            id: id.clone(),
            store,
            delay: None,
            down: false,
        });
        id
    }

    /// Delay every reply from the given member.
    pub async fn set_delay(&self, member: &MemberId, delay: Duration) {
        let mut members = self.members.write().await;
        if let Some(slot) = members.iter_mut().find(|slot| &slot.id == member) {
            slot.delay = Some(delay);
        }
    }

    /// Mark a member unreachable.
    pub async fn set_down(&self, member: &MemberId, down: bool) {
        let mut members = self.members.write().await;
        if let Some(slot) = members.iter_mut().find(|slot| &slot.id == member) {
            slot.down = down;
        }
    }

    /// All member ids that have been called, in call order.
    pub async fn calls(&self) -> Vec<MemberId> {
        self.calls.read().await.clone()
    }
}

#[async_trait]
impl ClusterTransport for MockTransport {
    async fn members(&self) -> Vec<MemberId> {
        self.members
            .read()
            .await
            .iter()
            .map(|slot| slot.id.clone())
            .collect()
    }

    async fn call(
        &self,
        member: &MemberId,
        request: ClusterRequest,
    ) -> AuctionResult<ClusterResponse> {
        let slot = {
            let members = self.members.read().await;
            members
                .iter()
                .find(|slot| &slot.id == member)
                .cloned()
                .ok_or_else(|| AuctionError::Transport(format!("unknown member {member}")))?
        };
        self.calls.write().await.push(member.clone());

        if slot.down {
            return Err(AuctionError::Transport(format!("member {member} is down")));
        }
        if let Some(delay) = slot.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(dispatch(&slot.store, request))
    }
}
