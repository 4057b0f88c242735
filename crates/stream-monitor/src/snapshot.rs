//! Live-set snapshots and their diffs.

use std::collections::BTreeMap;

use kraken_api::{ChannelId, Stream};

/// Point-in-time view of which observed channels are live.
///
/// Channels absent from the map are offline. Keyed by channel id in an
/// ordered map, so iteration is always ascending.
#[derive(Debug, Clone, Default)]
pub struct LiveSnapshot {
    streams: BTreeMap<ChannelId, Stream>,
}

impl LiveSnapshot {
    /// Empty snapshot, the baseline before the first poll.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a snapshot from the streams returned by one poll.
    pub fn from_streams(streams: Vec<Stream>) -> Self {
        Self {
            streams: streams.into_iter().map(|s| (s.channel_id(), s)).collect(),
        }
    }

    /// Whether the channel is live in this snapshot.
    pub fn is_live(&self, id: ChannelId) -> bool {
        self.streams.contains_key(&id)
    }

    /// The channel's stream, if live.
    pub fn stream(&self, id: ChannelId) -> Option<&Stream> {
        self.streams.get(&id)
    }

    /// Number of live channels.
    pub fn live_count(&self) -> usize {
        self.streams.len()
    }

    /// Live channel ids, ascending.
    pub fn live_channels(&self) -> impl Iterator<Item = ChannelId> + '_ {
        self.streams.keys().copied()
    }

    /// Changes from `previous` to `self`.
    pub fn diff(&self, previous: &LiveSnapshot) -> SnapshotDiff {
        let went_offline = previous
            .streams
            .keys()
            .copied()
            .filter(|id| !self.streams.contains_key(id))
            .collect();

        let mut went_live = Vec::new();
        let mut updated = Vec::new();
        for (id, stream) in &self.streams {
            match previous.streams.get(id) {
                None => went_live.push(stream.clone()),
                Some(old) if metadata_changed(old, stream) => updated.push(stream.clone()),
                Some(_) => {}
            }
        }

        SnapshotDiff {
            went_offline,
            went_live,
            updated,
        }
    }
}

/// Title or game changed between two sightings of the same live channel.
///
/// Viewer counts and thumbnails churn on every poll and do not count.
fn metadata_changed(old: &Stream, new: &Stream) -> bool {
    old.channel.status != new.channel.status || old.game != new.game
}

/// Changes between two consecutive snapshots.
///
/// Every list is in ascending channel id order.
#[derive(Debug, Clone, Default)]
pub struct SnapshotDiff {
    /// Channels live before, offline or unobserved now.
    pub went_offline: Vec<ChannelId>,
    /// Streams live now, offline or unobserved before.
    pub went_live: Vec<Stream>,
    /// Streams live in both snapshots with a changed title or game.
    pub updated: Vec<Stream>,
}

impl SnapshotDiff {
    pub fn is_empty(&self) -> bool {
        self.went_offline.is_empty() && self.went_live.is_empty() && self.updated.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use kraken_api::Channel;

    fn create_test_stream(channel_id: ChannelId, title: &str, game: &str) -> Stream {
        Stream {
            id: channel_id + 9000,
            game: Some(game.to_string()),
            viewers: 100,
            created_at: Utc::now(),
            preview: None,
            channel: Channel {
                id: channel_id,
                name: format!("channel{channel_id}"),
                display_name: format!("Channel{channel_id}"),
                status: Some(title.to_string()),
                game: Some(game.to_string()),
                url: None,
                partner: false,
            },
        }
    }

    fn snapshot_of(entries: &[(ChannelId, &str, &str)]) -> LiveSnapshot {
        LiveSnapshot::from_streams(
            entries
                .iter()
                .map(|(id, title, game)| create_test_stream(*id, title, game))
                .collect(),
        )
    }

    #[test]
    fn test_diff_against_empty_baseline() {
        let baseline = LiveSnapshot::empty();
        let current = snapshot_of(&[(3, "t", "g"), (1, "t", "g")]);

        let diff = current.diff(&baseline);
        assert!(diff.went_offline.is_empty());
        assert!(diff.updated.is_empty());
        let live: Vec<ChannelId> = diff.went_live.iter().map(Stream::channel_id).collect();
        assert_eq!(live, vec![1, 3]);
    }

    #[test]
    fn test_diff_detects_offline_and_live() {
        let previous = snapshot_of(&[(1, "t", "g"), (3, "t", "g")]);
        let current = snapshot_of(&[(1, "t", "g"), (2, "t", "g")]);

        let diff = current.diff(&previous);
        assert_eq!(diff.went_offline, vec![3]);
        let live: Vec<ChannelId> = diff.went_live.iter().map(Stream::channel_id).collect();
        assert_eq!(live, vec![2]);
        assert!(diff.updated.is_empty());
    }

    #[test]
    fn test_diff_orders_by_channel_id() {
        let previous = snapshot_of(&[(9, "t", "g"), (4, "t", "g"), (7, "t", "g")]);
        let current = snapshot_of(&[(8, "t", "g"), (2, "t", "g"), (5, "t", "g")]);

        let diff = current.diff(&previous);
        assert_eq!(diff.went_offline, vec![4, 7, 9]);
        let live: Vec<ChannelId> = diff.went_live.iter().map(Stream::channel_id).collect();
        assert_eq!(live, vec![2, 5, 8]);
    }

    #[test]
    fn test_diff_detects_title_and_game_changes() {
        let previous = snapshot_of(&[(1, "old title", "Tetris"), (2, "same", "Tetris")]);
        let current = snapshot_of(&[(1, "new title", "Tetris"), (2, "same", "Chess")]);

        let diff = current.diff(&previous);
        assert!(diff.went_offline.is_empty());
        assert!(diff.went_live.is_empty());
        let updated: Vec<ChannelId> = diff.updated.iter().map(Stream::channel_id).collect();
        assert_eq!(updated, vec![1, 2]);
    }

    #[test]
    fn test_viewer_churn_is_not_an_update() {
        let mut previous_stream = create_test_stream(1, "t", "g");
        previous_stream.viewers = 10;
        let mut current_stream = create_test_stream(1, "t", "g");
        current_stream.viewers = 9999;

        let previous = LiveSnapshot::from_streams(vec![previous_stream]);
        let current = LiveSnapshot::from_streams(vec![current_stream]);

        assert!(current.diff(&previous).is_empty());
    }

    #[test]
    fn test_snapshot_accessors() {
        let snapshot = snapshot_of(&[(2, "t", "g"), (1, "t", "g")]);
        assert_eq!(snapshot.live_count(), 2);
        assert!(snapshot.is_live(1));
        assert!(!snapshot.is_live(3));
        assert_eq!(snapshot.stream(2).map(Stream::channel_id), Some(2));
        let channels: Vec<ChannelId> = snapshot.live_channels().collect();
        assert_eq!(channels, vec![1, 2]);
    }
}
