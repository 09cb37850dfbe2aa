//! Cluster plumbing: the wire codec, the TCP transport used by the gateway
//! and joining members, and the member node that serves a replicated store.

pub mod member;
pub mod tcp;
pub mod wire;

pub use member::{dispatch, pull_initial_state, MemberNode};
pub use tcp::TcpClusterTransport;
pub use wire::{ClusterRequest, ClusterResponse};
