//! Replicated auction-state service.
//!
//! A front-end gateway exposes create/bid/close/list operations to external
//! callers behind a mutual challenge-response authentication protocol. The
//! auction state itself lives in a cluster of peer members: every write is
//! broadcast to all members and applied by each one independently, and a
//! joining member initializes its replica through a state-transfer snapshot.
//!
//! There is no consensus layer: broadcasts carry no total order, so member
//! replicas can diverge (ids, highest bids). Deployments that need strict
//! convergence must put an ordering layer in front of the cluster.

pub mod auction;
pub mod auth;
pub mod client;
pub mod cluster;
pub mod config;
pub mod crypto;
pub mod error;
pub mod gateway;
#[cfg(any(test, feature = "test-support"))]
pub mod mocks;
pub mod store;
pub mod traits;

pub use auction::{AuctionId, AuctionItem, Bid, NewAuction, ResponseStatus, ServerResponse, User};
pub use auth::{authenticate, AuthAck, AuthGateway, AuthSig};
pub use client::GatewayClient;
pub use cluster::{MemberNode, TcpClusterTransport};
pub use crypto::AuthChallenge;
pub use error::{AuctionError, AuctionResult};
pub use gateway::{GatewayService, Session};
pub use store::{ReplicatedStore, StoreSnapshot};
pub use traits::{ClusterTransport, MemberId, MemberReply, RandomSource, ResponsePolicy, ThreadRng};
