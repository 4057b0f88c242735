//! Snapshot acquisition boundary.
//!
//! The monitor only needs "which of these channels are live right now".
//! The trait keeps it decoupled from the HTTP client, so tests can drive
//! the loop with a scripted source.

use async_trait::async_trait;
use kraken_api::endpoints::streams;
use kraken_api::{ApiError, ChannelId, KrakenClient, Stream};

/// Source of "who is live" snapshots.
#[async_trait]
pub trait SnapshotSource: Send + Sync + 'static {
    /// Fetch the streams currently live among `channels`.
    ///
    /// Offline channels are absent from the result.
    async fn live_streams(&self, channels: &[ChannelId]) -> Result<Vec<Stream>, ApiError>;
}

/// Snapshot source backed by the Kraken `/streams` endpoint.
///
/// Channel sets larger than the endpoint's 100-id cap are fetched in
/// chunks by the endpoint wrapper.
pub struct KrakenSnapshotSource {
    client: KrakenClient,
}

impl KrakenSnapshotSource {
    pub fn new(client: KrakenClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SnapshotSource for KrakenSnapshotSource {
    async fn live_streams(&self, channels: &[ChannelId]) -> Result<Vec<Stream>, ApiError> {
        streams::get_live_streams(&self.client, channels).await
    }
}
