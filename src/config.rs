//! Configuration constants for the auction service.
//!
//! Protocol timeouts, frame limits and default endpoints, shared by the
//! library, the binaries and the tests.

use std::time::Duration;

/// Time a gateway broadcast waits for member responses before
/// excluding stragglers from the result set.
pub const BROADCAST_TIMEOUT_MS: u64 = 5000;

/// Time a joining member waits for a state snapshot from a peer.
pub const STATE_TRANSFER_TIMEOUT_MS: u64 = 5000;

/// Maximum size of a single wire frame (snapshots included).
pub const MAX_FRAME_BYTES: u32 = 8 * 1024 * 1024;

/// Default address the gateway binds its external endpoint to.
pub const DEFAULT_GATEWAY_ADDR: &str = "127.0.0.1:7400";

/// File name for a stored Ed25519 public key.
pub const PUBLIC_KEY_FILE: &str = "public.key";

/// File name for a stored Ed25519 private key.
pub const PRIVATE_KEY_FILE: &str = "private.key";

/// Environment variable overriding the gateway's key directory.
pub const GATEWAY_KEY_DIR_ENV: &str = "AUCTION_GATEWAY_KEY_DIR";

/// Default directory for the gateway's key pair.
pub const DEFAULT_GATEWAY_KEY_DIR: &str = "keys/gateway";

/// Broadcast timeout as a [`Duration`].
pub const fn broadcast_timeout() -> Duration {
    Duration::from_millis(BROADCAST_TIMEOUT_MS)
}

/// State-transfer timeout as a [`Duration`].
pub const fn state_transfer_timeout() -> Duration {
    Duration::from_millis(STATE_TRANSFER_TIMEOUT_MS)
}
