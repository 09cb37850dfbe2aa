//! Cluster member process.
//!
//! Holds one replica of the auction table and applies every broadcast
//! operation to it. When started with peers, the member pulls a state
//! snapshot from one of them before serving; a failed transfer aborts
//! startup rather than serving partial state.
//!
//! Usage:
//!   auction-member --listen 127.0.0.1:7500 [--peer 127.0.0.1:7501]...

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use auction_house::cluster::{pull_initial_state, MemberNode, TcpClusterTransport};
use auction_house::{config, ReplicatedStore};
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
    peers: Vec<SocketAddr>,
}

fn parse_args() -> Result<Args> {
    let mut listen = None;
    let mut peers = Vec::new();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--listen" => {
                let value = args.get(i + 1).context("--listen needs an address")?;
                listen = Some(value.parse().context("--listen must be host:port")?);
                i += 2;
            }
            "--peer" => {
                let value = args.get(i + 1).context("--peer needs an address")?;
                peers.push(value.parse().context("--peer must be host:port")?);
                i += 2;
            }
            other => bail!("unknown argument: {other}\nUsage: auction-member --listen <addr> [--peer <addr>]..."),
        }
    }

    Ok(Args {
        listen: listen.context("--listen is required")?,
        peers,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let args = parse_args()?;

    let store = Arc::new(ReplicatedStore::new());
    if args.peers.is_empty() {
        info!("No peers given; starting with an empty table");
    } else {
        let transport = TcpClusterTransport::new(args.peers.clone());
        pull_initial_state(&store, &transport, config::state_transfer_timeout())
            .await
            .context("state transfer failed; refusing to serve")?;
    }

    let node = MemberNode::bind(args.listen, store).await?;

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        info!("Received ctrl-c");
        shutdown.cancel();
    });

    node.serve(cancel).await?;
    Ok(())
}
