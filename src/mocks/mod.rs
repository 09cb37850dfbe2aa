//! Mock implementations for testing.
//!
//! This module provides mock implementations of the trait abstractions
//! that allow unit and integration testing without real network
//! connections or system randomness.

pub mod gateway;
pub mod random;
pub mod transport;

pub use gateway::MockAuthGateway;
pub use random::MockRandom;
pub use transport::MockTransport;
