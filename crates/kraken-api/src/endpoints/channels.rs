//! Channel endpoints.

use serde::Serialize;

use crate::client::KrakenClient;
use crate::error::Result;
use crate::models::{Channel, ChannelId, ChannelUpdate};
use crate::version::ApiVersion;

/// `PUT /channels/<id>` wraps the mutable fields in a `channel` object.
#[derive(Debug, Serialize)]
struct UpdateChannelRequest<'a> {
    channel: &'a ChannelUpdate,
}

/// Fetch a channel by id.
pub async fn get_channel(client: &KrakenClient, id: ChannelId) -> Result<Channel> {
    client
        .get_json(&format!("channels/{id}"), ApiVersion::V5)
        .await
}

/// Update mutable channel fields (title, game, delay).
pub async fn update_channel(
    client: &KrakenClient,
    id: ChannelId,
    update: &ChannelUpdate,
) -> Result<Channel> {
    client
        .put_json(
            &format!("channels/{id}"),
            &UpdateChannelRequest { channel: update },
            ApiVersion::V5,
        )
        .await
}

/// Reset the channel's stream key.
pub async fn reset_stream_key(client: &KrakenClient, id: ChannelId) -> Result<Channel> {
    client
        .delete_json(&format!("channels/{id}/stream_key"), ApiVersion::V5)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serialize::to_lowercase_json;

    #[test]
    fn test_update_request_shape() {
        let update = ChannelUpdate::default()
            .with_status("Winter speedruns")
            .with_game("Tetris");
        let json = to_lowercase_json(&UpdateChannelRequest { channel: &update }).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["channel"]["status"], "Winter speedruns");
        assert_eq!(value["channel"]["game"], "Tetris");
        assert!(value["channel"].get("delay").is_none());
    }
}
