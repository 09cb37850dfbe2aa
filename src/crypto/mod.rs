//! Signing, verification and challenge-generation primitives used by both
//! sides of the mutual challenge-response authentication protocol, plus
//! on-disk key-pair storage.

pub mod challenge;
pub mod keys;

pub use challenge::{sign_challenge, verify_challenge, AuthChallenge};
pub use keys::{generate_keypair, load_signing_key, load_verifying_key, save_keypair};
