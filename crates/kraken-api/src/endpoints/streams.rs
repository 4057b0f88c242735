//! Stream endpoints.

use tracing::debug;

use crate::client::KrakenClient;
use crate::error::Result;
use crate::models::{ChannelId, Stream, StreamResponse, StreamsResponse};
use crate::version::ApiVersion;

/// Kraken caps `/streams` at 100 channels per request.
pub const MAX_CHANNELS_PER_REQUEST: usize = 100;

/// Live streams among `channels`.
///
/// Channel sets larger than 100 are fetched in sequential chunks and merged.
/// Offline channels are simply absent from the result.
pub async fn get_live_streams(
    client: &KrakenClient,
    channels: &[ChannelId],
) -> Result<Vec<Stream>> {
    let mut live = Vec::new();
    for chunk in channels.chunks(MAX_CHANNELS_PER_REQUEST) {
        let url = format!(
            "streams?channel={}&limit={}",
            join_channel_ids(chunk),
            MAX_CHANNELS_PER_REQUEST
        );
        let response: StreamsResponse = client.get_json(&url, ApiVersion::V5).await?;
        debug!(
            requested = chunk.len(),
            live = response.streams.len(),
            "fetched stream chunk"
        );
        live.extend(response.streams);
    }
    Ok(live)
}

/// Current stream of a single channel, `None` when offline.
pub async fn get_stream(client: &KrakenClient, id: ChannelId) -> Result<Option<Stream>> {
    let response: StreamResponse = client
        .get_json(&format!("streams/{id}"), ApiVersion::V5)
        .await?;
    Ok(response.stream)
}

fn join_channel_ids(channels: &[ChannelId]) -> String {
    channels
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::{CredentialStore, Credentials};
    use tracing::Level;

    #[test]
    fn test_join_channel_ids() {
        assert_eq!(join_channel_ids(&[1, 2, 3]), "1,2,3");
        assert_eq!(join_channel_ids(&[42]), "42");
        assert_eq!(join_channel_ids(&[]), "");
    }

    #[tokio::test]
    #[ignore]
    async fn test_get_live_streams_live() {
        tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_test_writer()
            .init();

        let client_id =
            std::env::var("TWITCH_CLIENT_ID").expect("set TWITCH_CLIENT_ID to run this test");
        let client = KrakenClient::new(CredentialStore::new(Credentials::new(client_id)));

        let streams = get_live_streams(&client, &[12826, 23161357])
            .await
            .expect("streams request failed");
        for stream in &streams {
            tracing::debug!(
                channel = %stream.channel.name,
                viewers = stream.viewers,
                "live channel"
            );
        }
    }
}
