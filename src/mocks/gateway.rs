//! Mock gateway for exercising the authentication engine.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use ed25519_dalek::{SigningKey, VerifyingKey};

use crate::auth::{AuthAck, AuthGateway, AuthSig};
use crate::crypto::{generate_keypair, sign_challenge, verify_challenge, AuthChallenge};
use crate::error::AuctionResult;
use crate::traits::{RandomSource, ThreadRng};

/// In-process [`AuthGateway`] with its own key pair, controllable failure
/// modes and call counters for ordering assertions.
pub struct MockAuthGateway {
    signing_key: SigningKey,
    corrupt_signatures: bool,
    reject_callers: bool,
    challenge_requests: AtomicUsize,
    verify_requests: AtomicUsize,
}

impl MockAuthGateway {
    pub fn new() -> Self {
        Self {
            signing_key: generate_keypair(),
            corrupt_signatures: false,
            reject_callers: false,
            challenge_requests: AtomicUsize::new(0),
            verify_requests: AtomicUsize::new(0),
        }
    }

    /// Flip a byte in every signature the gateway produces.
    pub fn with_corrupt_signatures(mut self) -> Self {
        self.corrupt_signatures = true;
        self
    }

    /// Refuse to verify any caller signature.
    pub fn with_rejected_callers(mut self) -> Self {
        self.reject_callers = true;
        self
    }

    /// The public key callers should know this gateway by.
    pub fn public_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// How many fresh challenges have been requested (step 4 count).
    pub fn challenge_requests(&self) -> usize {
        self.challenge_requests.load(Ordering::SeqCst)
    }

    /// How many caller signatures have been submitted (step 5 count).
    pub fn verify_requests(&self) -> usize {
        self.verify_requests.load(Ordering::SeqCst)
    }
}

impl Default for MockAuthGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthGateway for MockAuthGateway {
    async fn request_challenge(&self) -> AuctionResult<AuthChallenge> {
        self.challenge_requests.fetch_add(1, Ordering::SeqCst);
        let rng = ThreadRng::new();
        Ok(AuthChallenge {
            value: rng.random_u64(),
        })
    }

    async fn sign_challenge(&self, challenge: AuthChallenge) -> AuctionResult<AuthAck> {
        let mut sig_bytes = sign_challenge(challenge, &self.signing_key);
        if self.corrupt_signatures {
            sig_bytes[0] ^= 0xFF;
        }
        Ok(AuthAck {
            sig_bytes,
            challenge,
            verified: false,
        })
    }

    async fn verify_signature(&self, sig: AuthSig) -> AuctionResult<AuthAck> {
        self.verify_requests.fetch_add(1, Ordering::SeqCst);
        let verified =
            !self.reject_callers && verify_challenge(&sig.sig_bytes, sig.challenge, &sig.public_key);
        Ok(AuthAck {
            sig_bytes: sig.sig_bytes,
            challenge: sig.challenge,
            verified,
        })
    }
}
