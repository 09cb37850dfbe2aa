use byteorder::{BigEndian, ByteOrder};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};

use crate::traits::RandomSource;

/// A single-use authentication challenge: one random 64-bit value.
///
/// Consumed by exactly one signature; fresh per authentication attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthChallenge {
    pub value: u64,
}

impl AuthChallenge {
    /// Generate a fresh challenge from the given random source.
    pub fn generate(rng: &dyn RandomSource) -> Self {
        Self {
            value: rng.random_u64(),
        }
    }

    /// Fixed-width big-endian encoding of the challenge value.
    ///
    /// Signer and verifier both operate on exactly these 8 bytes so they
    /// compute over identical input regardless of platform.
    pub fn to_be_bytes(self) -> [u8; 8] {
        let mut buf = [0u8; 8];
        BigEndian::write_u64(&mut buf, self.value);
        buf
    }
}

/// Sign a challenge with an Ed25519 private key, returning the raw
/// 64-byte signature.
pub fn sign_challenge(challenge: AuthChallenge, key: &SigningKey) -> Vec<u8> {
    key.sign(&challenge.to_be_bytes()).to_bytes().to_vec()
}

/// Verify signature bytes against a challenge and a raw 32-byte public key.
///
/// A malformed key or signature yields `false`, never an error; callers
/// treat anything unusable as an authentication failure.
pub fn verify_challenge(sig_bytes: &[u8], challenge: AuthChallenge, public_key: &[u8; 32]) -> bool {
    let Ok(key) = VerifyingKey::from_bytes(public_key) else {
        return false;
    };
    let Ok(signature) = Signature::from_slice(sig_bytes) else {
        return false;
    };
    key.verify(&challenge.to_be_bytes(), &signature).is_ok()
}
