//! Wire protocol between the gateway and cluster members.
//!
//! Messages are bincode payloads behind a 4-byte big-endian length prefix.
//! A frame larger than [`MAX_FRAME_BYTES`] is rejected before allocation.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::auction::{AuctionId, AuctionItem, Bid, NewAuction, ServerResponse, User};
use crate::config::MAX_FRAME_BYTES;
use crate::error::{AuctionError, AuctionResult};
use crate::store::StoreSnapshot;

/// One logical operation broadcast to (or called on) a cluster member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ClusterRequest {
    CreateAuction { request: NewAuction },
    Bid { bid: Bid },
    CloseAuction { auction_id: AuctionId, requester: User },
    ListActive,
    /// State-transfer pull issued by a joining member.
    FetchState,
}

/// A member's reply to a [`ClusterRequest`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ClusterResponse {
    Op(ServerResponse),
    Listing(HashMap<AuctionId, AuctionItem>),
    State(StoreSnapshot),
}

/// Write one length-prefixed bincode frame.
pub async fn write_frame<W, T>(writer: &mut W, message: &T) -> AuctionResult<()>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let payload =
        bincode::serialize(message).map_err(|e| AuctionError::Serialization(e.to_string()))?;
    if payload.len() > MAX_FRAME_BYTES as usize {
        return Err(AuctionError::Serialization(format!(
            "frame of {} bytes exceeds the {} byte limit",
            payload.len(),
            MAX_FRAME_BYTES
        )));
    }
    writer.write_all(&(payload.len() as u32).to_be_bytes()).await?;
    writer.write_all(&payload).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one length-prefixed bincode frame.
pub async fn read_frame<R, T>(reader: &mut R) -> AuctionResult<T>
where
    R: AsyncRead + Unpin,
    T: DeserializeOwned,
{
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf).await?;
    let len = u32::from_be_bytes(len_buf);
    if len > MAX_FRAME_BYTES {
        return Err(AuctionError::Transport(format!(
            "incoming frame of {len} bytes exceeds the {MAX_FRAME_BYTES} byte limit"
        )));
    }
    let mut payload = vec![0u8; len as usize];
    reader.read_exact(&mut payload).await?;
    bincode::deserialize(&payload).map_err(|e| AuctionError::Serialization(e.to_string()))
}
