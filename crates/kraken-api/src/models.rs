//! Wire models for the Kraken endpoints used by this crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Numeric channel identifier.
pub type ChannelId = u64;

/// A live stream as returned by `/streams`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stream {
    #[serde(rename = "_id")]
    pub id: u64,
    #[serde(default)]
    pub game: Option<String>,
    #[serde(default)]
    pub viewers: u64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub preview: Option<Preview>,
    pub channel: Channel,
}

impl Stream {
    /// Channel this stream belongs to.
    pub fn channel_id(&self) -> ChannelId {
        self.channel.id
    }

    /// Channel title, if set.
    pub fn title(&self) -> Option<&str> {
        self.channel.status.as_deref()
    }
}

/// Thumbnail URLs attached to a stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preview {
    pub small: String,
    pub medium: String,
    pub large: String,
    pub template: String,
}

/// A channel, embedded in streams or returned by `/channels/<id>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    #[serde(rename = "_id")]
    pub id: ChannelId,
    pub name: String,
    pub display_name: String,
    /// Channel title. Kraken calls this `status`.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub game: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub partner: bool,
}

/// Response envelope of `/streams`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamsResponse {
    #[serde(rename = "_total")]
    pub total: u64,
    pub streams: Vec<Stream>,
}

/// Response envelope of `/streams/<id>`. `stream` is null for offline channels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamResponse {
    pub stream: Option<Stream>,
}

/// Mutable channel fields for `PUT /channels/<id>`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChannelUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_feed_enabled: Option<bool>,
}

impl ChannelUpdate {
    /// Set a new channel title.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Set a new game.
    pub fn with_game(mut self, game: impl Into<String>) -> Self {
        self.game = Some(game.into());
        self
    }

    /// Set the stream delay in seconds.
    pub fn with_delay(mut self, delay: u32) -> Self {
        self.delay = Some(delay);
        self
    }
}
