//! Generate an Ed25519 key pair for an account directory.
//!
//! Usage:
//!   auction-keygen --dir keys/alice

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use auction_house::crypto::{generate_keypair, save_keypair};

fn parse_dir() -> Result<PathBuf> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [flag, dir] if flag == "--dir" => Ok(PathBuf::from(dir)),
        _ => bail!("Usage: auction-keygen --dir <path>"),
    }
}

fn main() -> Result<()> {
    let dir = parse_dir()?;
    let key = generate_keypair();
    save_keypair(&dir, &key).context("couldn't write the key pair")?;
    println!(
        "Wrote key pair to {} (public key {})",
        dir.display(),
        hex::encode(key.verifying_key().to_bytes())
    );
    Ok(())
}
