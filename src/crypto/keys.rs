//! On-disk Ed25519 key-pair storage.
//!
//! Keys are stored as raw 32-byte files under a per-account directory.
//! Loading never fails loudly: an absent or unusable key is `None`, which
//! callers treat as an authentication failure rather than a crash.

use std::fs;
use std::path::Path;

use ed25519_dalek::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use tracing::warn;

use crate::config::{PRIVATE_KEY_FILE, PUBLIC_KEY_FILE};
use crate::error::AuctionResult;

/// Generate a fresh Ed25519 key pair.
pub fn generate_keypair() -> SigningKey {
    SigningKey::generate(&mut OsRng)
}

/// Write both halves of a key pair into `dir`, creating it if needed.
pub fn save_keypair(dir: &Path, key: &SigningKey) -> AuctionResult<()> {
    fs::create_dir_all(dir)?;
    fs::write(dir.join(PRIVATE_KEY_FILE), key.to_bytes())?;
    fs::write(dir.join(PUBLIC_KEY_FILE), key.verifying_key().to_bytes())?;
    Ok(())
}

/// Load a private key from `dir`, or `None` if absent or unusable.
pub fn load_signing_key(dir: &Path) -> Option<SigningKey> {
    let path = dir.join(PRIVATE_KEY_FILE);
    let bytes = match fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Couldn't read private key {}: {}", path.display(), e);
            return None;
        }
    };
    let bytes: [u8; 32] = match bytes.try_into() {
        Ok(bytes) => bytes,
        Err(_) => {
            warn!("Private key {} has the wrong length", path.display());
            return None;
        }
    };
    Some(SigningKey::from_bytes(&bytes))
}

/// Load a public key from `dir`, or `None` if absent or unusable.
pub fn load_verifying_key(dir: &Path) -> Option<VerifyingKey> {
    let path = dir.join(PUBLIC_KEY_FILE);
    let bytes = match fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Couldn't read public key {}: {}", path.display(), e);
            return None;
        }
    };
    let bytes: [u8; 32] = match bytes.try_into() {
        Ok(bytes) => bytes,
        Err(_) => {
            warn!("Public key {} has the wrong length", path.display());
            return None;
        }
    };
    match VerifyingKey::from_bytes(&bytes) {
        Ok(key) => Some(key),
        Err(e) => {
            warn!("Public key {} is not a valid point: {}", path.display(), e);
            None
        }
    }
}
