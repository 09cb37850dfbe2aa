//! Trait abstractions for dependency injection and testability.
//!
//! These seams let the gateway, auth engine and cluster logic run against
//! in-memory fakes in tests instead of real sockets and system RNG.

pub mod random;
pub mod transport;

pub use random::RandomSource;
pub use transport::{ClusterTransport, MemberId, MemberReply, ResponsePolicy};

// Re-export default implementations
pub use random::ThreadRng;
