//! Monitor events for subscribers.
//!
//! This module defines the events emitted by the live stream monitor and
//! the broadcast channel they travel over.

use chrono::{DateTime, Utc};
use kraken_api::{ChannelId, ErrorKind, Stream};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Events emitted by the live stream monitor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MonitorEvent {
    /// Monitoring started.
    MonitorStarted {
        channels: Vec<ChannelId>,
        check_interval_secs: u64,
        timestamp: DateTime<Utc>,
    },
    /// Monitoring stopped.
    MonitorStopped {
        channels: Vec<ChannelId>,
        check_interval_secs: u64,
        timestamp: DateTime<Utc>,
    },
    /// The observed channel set or the poll interval changed.
    StreamsSet {
        channels: Vec<ChannelId>,
        check_interval_secs: u64,
        timestamp: DateTime<Utc>,
    },
    /// A channel went live.
    StreamWentLive {
        channel_id: ChannelId,
        stream: Stream,
        timestamp: DateTime<Utc>,
    },
    /// A channel went offline.
    StreamWentOffline {
        channel_id: ChannelId,
        timestamp: DateTime<Utc>,
    },
    /// A live channel changed its title or game.
    StreamUpdated {
        channel_id: ChannelId,
        stream: Stream,
        timestamp: DateTime<Utc>,
    },
    /// A poll failed. Monitoring continues on the next tick.
    MonitorError {
        kind: ErrorKind,
        detail: String,
        timestamp: DateTime<Utc>,
    },
}

impl MonitorEvent {
    /// Get a human-readable description of the event.
    pub fn description(&self) -> String {
        match self {
            MonitorEvent::MonitorStarted {
                channels,
                check_interval_secs,
                ..
            } => {
                format!(
                    "monitoring {} channels every {}s",
                    channels.len(),
                    check_interval_secs
                )
            }
            MonitorEvent::MonitorStopped { channels, .. } => {
                format!("stopped monitoring {} channels", channels.len())
            }
            MonitorEvent::StreamsSet {
                channels,
                check_interval_secs,
                ..
            } => {
                format!(
                    "watch list set to {} channels, interval {}s",
                    channels.len(),
                    check_interval_secs
                )
            }
            MonitorEvent::StreamWentLive {
                channel_id, stream, ..
            } => {
                format!(
                    "channel {} went live: {}",
                    channel_id,
                    stream.title().unwrap_or("(no title)")
                )
            }
            MonitorEvent::StreamWentOffline { channel_id, .. } => {
                format!("channel {} went offline", channel_id)
            }
            MonitorEvent::StreamUpdated { channel_id, .. } => {
                format!("channel {} changed title or game", channel_id)
            }
            MonitorEvent::MonitorError { kind, detail, .. } => {
                format!("poll failed ({:?}): {}", kind, detail)
            }
        }
    }
}

/// Broadcaster for monitor events.
pub struct MonitorEventBroadcaster {
    sender: broadcast::Sender<MonitorEvent>,
}

impl MonitorEventBroadcaster {
    /// Create a new broadcaster with default capacity (256).
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Create a new broadcaster with specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to monitor events.
    pub fn subscribe(&self) -> broadcast::Receiver<MonitorEvent> {
        self.sender.subscribe()
    }

    /// Publish a monitor event.
    pub fn publish(
        &self,
        event: MonitorEvent,
    ) -> Result<usize, broadcast::error::SendError<MonitorEvent>> {
        self.sender.send(event)
    }

    /// Get the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for MonitorEventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MonitorEventBroadcaster {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use kraken_api::Channel;

    fn create_test_stream(channel_id: ChannelId) -> Stream {
        Stream {
            id: channel_id + 9000,
            game: Some("Tetris".to_string()),
            viewers: 123,
            created_at: Utc::now(),
            preview: None,
            channel: Channel {
                id: channel_id,
                name: format!("channel{channel_id}"),
                display_name: format!("Channel{channel_id}"),
                status: Some("Marathon".to_string()),
                game: Some("Tetris".to_string()),
                url: None,
                partner: false,
            },
        }
    }

    #[test]
    fn test_event_description() {
        let event = MonitorEvent::StreamWentLive {
            channel_id: 42,
            stream: create_test_stream(42),
            timestamp: Utc::now(),
        };
        assert!(event.description().contains("42"));
        assert!(event.description().contains("Marathon"));

        let event = MonitorEvent::MonitorStarted {
            channels: vec![1, 2, 3],
            check_interval_secs: 60,
            timestamp: Utc::now(),
        };
        assert!(event.description().contains("3 channels"));
        assert!(event.description().contains("60s"));
    }

    #[test]
    fn test_broadcaster_publish_subscribe() {
        let broadcaster = MonitorEventBroadcaster::new();
        let mut receiver = broadcaster.subscribe();

        let event = MonitorEvent::StreamWentOffline {
            channel_id: 7,
            timestamp: Utc::now(),
        };

        broadcaster.publish(event).unwrap();

        let received = receiver.try_recv().unwrap();
        assert!(matches!(
            received,
            MonitorEvent::StreamWentOffline { channel_id: 7, .. }
        ));
    }

    #[test]
    fn test_subscriber_count() {
        let broadcaster = MonitorEventBroadcaster::new();
        assert_eq!(broadcaster.subscriber_count(), 0);

        let _rx = broadcaster.subscribe();
        let _rx2 = broadcaster.subscribe();
        assert_eq!(broadcaster.subscriber_count(), 2);
    }
}
