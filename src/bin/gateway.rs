//! Front-end gateway process: the single externally reachable endpoint.
//!
//! Relays authenticated auction operations into the cluster and serves the
//! gateway half of the challenge-response exchange. The gateway key pair is
//! loaded from disk, or generated on first run.
//!
//! Usage:
//!   auction-gateway --listen 127.0.0.1:7400 --member 127.0.0.1:7500 [--member ...]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use auction_house::crypto::{generate_keypair, load_signing_key, save_keypair};
use auction_house::{config, GatewayService, TcpClusterTransport, ThreadRng};
use ed25519_dalek::SigningKey;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

struct Args {
    listen: SocketAddr,
    members: Vec<SocketAddr>,
    key_dir: PathBuf,
}

fn default_key_dir() -> PathBuf {
    std::env::var(config::GATEWAY_KEY_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(config::DEFAULT_GATEWAY_KEY_DIR))
}

fn parse_args() -> Result<Args> {
    let mut listen = None;
    let mut members = Vec::new();
    let mut key_dir = None;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--listen" => {
                let value = args.get(i + 1).context("--listen needs an address")?;
                listen = Some(value.parse().context("--listen must be host:port")?);
                i += 2;
            }
            "--member" => {
                let value = args.get(i + 1).context("--member needs an address")?;
                members.push(value.parse().context("--member must be host:port")?);
                i += 2;
            }
            "--key-dir" => {
                let value = args.get(i + 1).context("--key-dir needs a path")?;
                key_dir = Some(PathBuf::from(value));
                i += 2;
            }
            other => bail!(
                "unknown argument: {other}\n\
                 Usage: auction-gateway --listen <addr> --member <addr>... [--key-dir <dir>]"
            ),
        }
    }

    let listen = match listen {
        Some(addr) => addr,
        None => config::DEFAULT_GATEWAY_ADDR
            .parse()
            .context("default gateway address must parse")?,
    };

    Ok(Args {
        listen,
        members,
        key_dir: key_dir.unwrap_or_else(default_key_dir),
    })
}

fn load_or_create_key(dir: &Path) -> Result<SigningKey> {
    if let Some(key) = load_signing_key(dir) {
        info!("Loaded gateway key pair from {}", dir.display());
        return Ok(key);
    }
    let key = generate_keypair();
    save_keypair(dir, &key).context("couldn't write the gateway key pair")?;
    info!(
        "Generated gateway key pair in {} (public key {})",
        dir.display(),
        hex::encode(key.verifying_key().to_bytes())
    );
    Ok(key)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let args = parse_args()?;
    if args.members.is_empty() {
        bail!("at least one --member address is required");
    }

    let signing_key = load_or_create_key(&args.key_dir)?;
    let transport = Arc::new(TcpClusterTransport::new(args.members.clone()));
    let gateway = Arc::new(GatewayService::new(
        transport,
        signing_key,
        Arc::new(ThreadRng::new()),
    ));

    let listener = TcpListener::bind(args.listen)
        .await
        .with_context(|| format!("couldn't bind {}", args.listen))?;

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        info!("Received ctrl-c");
        shutdown.cancel();
    });

    gateway.serve(listener, cancel).await?;
    Ok(())
}
