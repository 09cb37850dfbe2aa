//! Mutual challenge-response authentication.
//!
//! A 5-message exchange, strictly ordered, layered on the gateway's remote
//! interface:
//!
//! 1. the caller generates challenge C1 and asks the gateway to sign it;
//! 2. the gateway returns signature S1 (not yet verified);
//! 3. the caller verifies S1 against the gateway's known public key and
//!    aborts if it does not hold; step 4 must not be reachable;
//! 4. the caller requests a fresh challenge C2 from the gateway;
//! 5. the caller signs C2 and submits (S2, C2, its public key); the gateway
//!    verifies and acknowledges.
//!
//! Authentication succeeds iff both directions verify. A failure in either
//! direction yields `false` with no partial trust established.

use async_trait::async_trait;
use ed25519_dalek::{SigningKey, VerifyingKey};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::crypto::{sign_challenge, verify_challenge, AuthChallenge};
use crate::error::AuctionResult;
use crate::traits::RandomSource;

/// A signature submitted for verification: the raw signature bytes, the
/// challenge that was signed and the public key to verify against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSig {
    pub sig_bytes: Vec<u8>,
    pub challenge: AuthChallenge,
    pub public_key: [u8; 32],
}

/// Acknowledgment for one authentication step.
///
/// The `verified` flag is set only after actual cryptographic verification;
/// a signing step always carries `verified: false`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthAck {
    pub sig_bytes: Vec<u8>,
    pub challenge: AuthChallenge,
    pub verified: bool,
}

/// The slice of the gateway's remote interface the authentication engine
/// drives. Implemented by the real TCP client and by test mocks.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Ask the gateway for a fresh challenge to solve (step 4).
    async fn request_challenge(&self) -> AuctionResult<AuthChallenge>;

    /// Ask the gateway to sign a caller-supplied challenge (steps 1-2).
    async fn sign_challenge(&self, challenge: AuthChallenge) -> AuctionResult<AuthAck>;

    /// Submit the caller's signature for verification (step 5).
    async fn verify_signature(&self, sig: AuthSig) -> AuctionResult<AuthAck>;
}

/// Run the full 5-message exchange from the caller's side.
///
/// Returns `Ok(false)` on any signature or verification failure; transport
/// failures surface as errors. The ordering constraint (no step 4 before
/// step 3 succeeds) is enforced here, in the caller's control flow.
pub async fn authenticate<G>(
    gateway: &G,
    signing_key: &SigningKey,
    gateway_public_key: &VerifyingKey,
    rng: &dyn RandomSource,
) -> AuctionResult<bool>
where
    G: AuthGateway + ?Sized,
{
    // Steps 1-2: challenge the gateway and collect its signature.
    let c1 = AuthChallenge::generate(rng);
    let ack = gateway.sign_challenge(c1).await?;

    // Step 3: the gateway must prove itself before we reveal anything.
    if ack.challenge != c1
        || !verify_challenge(&ack.sig_bytes, c1, gateway_public_key.as_bytes())
    {
        info!("Gateway signature did not verify; aborting the exchange");
        return Ok(false);
    }

    // Step 4: only reachable once the gateway is authenticated.
    let c2 = gateway.request_challenge().await?;

    // Step 5: solve the gateway's challenge with our own key.
    let sig = AuthSig {
        sig_bytes: sign_challenge(c2, signing_key),
        challenge: c2,
        public_key: signing_key.verifying_key().to_bytes(),
    };
    let ack = gateway.verify_signature(sig).await?;
    Ok(ack.verified)
}
