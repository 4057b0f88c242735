//! The polling live stream monitor.
//!
//! One background task per running monitor: each tick fetches a fresh
//! snapshot for the observed channels, diffs it against the previous one
//! and broadcasts the resulting events. Ticks never overlap; the next wait
//! starts only after the previous fetch-and-diff finished. Stop is
//! cooperative: an in-flight fetch may finish, but its result is discarded.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use kraken_api::{ChannelId, KrakenClient};
use parking_lot::{Mutex, RwLock};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::events::{MonitorEvent, MonitorEventBroadcaster};
use crate::snapshot::{LiveSnapshot, SnapshotDiff};
use crate::source::{KrakenSnapshotSource, SnapshotSource};

/// Observed channel set and poll interval, shared with the polling task.
struct MonitorConfig {
    channels: Vec<ChannelId>,
    check_interval: Duration,
}

/// Handle to one polling run.
struct RunHandle {
    cancellation: CancellationToken,
    task: JoinHandle<()>,
}

/// Polls a set of channels and broadcasts live/offline/update events as the
/// live-set changes.
///
/// Reconfiguration while running takes effect on the next tick; an
/// in-flight tick completes with the old configuration.
pub struct LiveStreamMonitor<S: SnapshotSource> {
    source: Arc<S>,
    broadcaster: MonitorEventBroadcaster,
    config: Arc<RwLock<MonitorConfig>>,
    run: Mutex<Option<RunHandle>>,
}

impl LiveStreamMonitor<KrakenSnapshotSource> {
    /// Monitor backed by the Kraken `/streams` endpoint.
    pub fn new(client: KrakenClient) -> Self {
        Self::with_source(KrakenSnapshotSource::new(client))
    }
}

impl<S: SnapshotSource> LiveStreamMonitor<S> {
    /// Poll interval used until one is configured.
    pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(60);

    /// Monitor over an arbitrary snapshot source.
    pub fn with_source(source: S) -> Self {
        Self {
            source: Arc::new(source),
            broadcaster: MonitorEventBroadcaster::new(),
            config: Arc::new(RwLock::new(MonitorConfig {
                channels: Vec::new(),
                check_interval: Self::DEFAULT_CHECK_INTERVAL,
            })),
            run: Mutex::new(None),
        }
    }

    /// Subscribe to monitor events.
    pub fn subscribe(&self) -> broadcast::Receiver<MonitorEvent> {
        self.broadcaster.subscribe()
    }

    /// The underlying event broadcaster.
    pub fn event_broadcaster(&self) -> &MonitorEventBroadcaster {
        &self.broadcaster
    }

    /// Currently observed channels, ascending.
    pub fn channels(&self) -> Vec<ChannelId> {
        self.config.read().channels.clone()
    }

    /// Current poll interval.
    pub fn check_interval(&self) -> Duration {
        self.config.read().check_interval
    }

    /// Whether the polling task is running.
    pub fn is_running(&self) -> bool {
        self.run.lock().is_some()
    }

    /// Replace the observed channel set.
    ///
    /// The set is stored sorted and deduplicated. While running, a
    /// [`MonitorEvent::StreamsSet`] is emitted and the change applies from
    /// the next tick; an in-flight tick completes with the old set.
    pub fn set_channels(&self, channels: Vec<ChannelId>) -> Result<()> {
        if channels.is_empty() {
            return Err(Error::config("channel set must not be empty"));
        }

        let mut channels = channels;
        channels.sort_unstable();
        channels.dedup();

        let interval = {
            let mut config = self.config.write();
            config.channels = channels.clone();
            config.check_interval
        };

        debug!(channels = channels.len(), "channel set replaced");
        if self.is_running() {
            emit(
                &self.broadcaster,
                MonitorEvent::StreamsSet {
                    channels,
                    check_interval_secs: interval.as_secs(),
                    timestamp: Utc::now(),
                },
            );
        }
        Ok(())
    }

    /// Replace the poll interval.
    ///
    /// While running, a [`MonitorEvent::StreamsSet`] is emitted and the
    /// change applies from the next wait.
    pub fn set_check_interval(&self, interval: Duration) -> Result<()> {
        if interval.is_zero() {
            return Err(Error::config("check interval must be positive"));
        }

        let channels = {
            let mut config = self.config.write();
            config.check_interval = interval;
            config.channels.clone()
        };

        debug!(interval_secs = interval.as_secs(), "check interval replaced");
        if self.is_running() {
            emit(
                &self.broadcaster,
                MonitorEvent::StreamsSet {
                    channels,
                    check_interval_secs: interval.as_secs(),
                    timestamp: Utc::now(),
                },
            );
        }
        Ok(())
    }

    /// Start polling.
    ///
    /// Validates the configuration, emits [`MonitorEvent::MonitorStarted`]
    /// and spawns the polling task. The first poll runs immediately and
    /// diffs against an empty baseline, so every currently-live channel
    /// produces a [`MonitorEvent::StreamWentLive`].
    ///
    /// Must be called within a tokio runtime.
    pub fn start(&self) -> Result<()> {
        let mut run = self.run.lock();
        if run.is_some() {
            return Err(Error::AlreadyRunning);
        }

        let (channels, interval) = {
            let config = self.config.read();
            (config.channels.clone(), config.check_interval)
        };
        if channels.is_empty() {
            return Err(Error::config("channel set must not be empty"));
        }
        if interval.is_zero() {
            return Err(Error::config("check interval must be positive"));
        }

        info!(
            channels = channels.len(),
            interval_secs = interval.as_secs(),
            "starting live stream monitor"
        );
        emit(
            &self.broadcaster,
            MonitorEvent::MonitorStarted {
                channels,
                check_interval_secs: interval.as_secs(),
                timestamp: Utc::now(),
            },
        );

        let cancellation = CancellationToken::new();
        let task = tokio::spawn(poll_loop(
            self.source.clone(),
            self.config.clone(),
            self.broadcaster.clone(),
            cancellation.clone(),
        ));
        *run = Some(RunHandle { cancellation, task });
        Ok(())
    }

    /// Stop polling.
    ///
    /// Cooperative: an in-flight fetch is allowed to finish, but its result
    /// is discarded and it emits nothing. Returns once the polling task has
    /// exited, after which no further ticks run. No-op when not running.
    pub async fn stop(&self) {
        let run = self.run.lock().take();
        let Some(run) = run else {
            return;
        };

        run.cancellation.cancel();
        if let Err(e) = run.task.await {
            warn!(error = %e, "polling task did not exit cleanly");
        }

        let (channels, interval) = {
            let config = self.config.read();
            (config.channels.clone(), config.check_interval)
        };
        info!("live stream monitor stopped");
        emit(
            &self.broadcaster,
            MonitorEvent::MonitorStopped {
                channels,
                check_interval_secs: interval.as_secs(),
                timestamp: Utc::now(),
            },
        );
    }
}

/// One tick: fetch, diff against the previous snapshot, emit; then wait.
async fn poll_loop<S: SnapshotSource>(
    source: Arc<S>,
    config: Arc<RwLock<MonitorConfig>>,
    broadcaster: MonitorEventBroadcaster,
    cancellation: CancellationToken,
) {
    let mut last_snapshot = LiveSnapshot::empty();

    loop {
        let channels = { config.read().channels.clone() };

        match source.live_streams(&channels).await {
            Ok(streams) => {
                // A stop that raced this fetch discards the result.
                if cancellation.is_cancelled() {
                    debug!("tick result discarded after cancellation");
                    return;
                }
                let snapshot = LiveSnapshot::from_streams(streams);
                let diff = snapshot.diff(&last_snapshot);
                debug!(
                    live = snapshot.live_count(),
                    went_offline = diff.went_offline.len(),
                    went_live = diff.went_live.len(),
                    updated = diff.updated.len(),
                    "tick completed"
                );
                emit_diff(&broadcaster, diff);
                last_snapshot = snapshot;
            }
            Err(e) => {
                if cancellation.is_cancelled() {
                    return;
                }
                // Non-fatal: keep the previous snapshot as the baseline.
                warn!(error = %e, "stream poll failed");
                emit(
                    &broadcaster,
                    MonitorEvent::MonitorError {
                        kind: e.kind(),
                        detail: e.to_string(),
                        timestamp: Utc::now(),
                    },
                );
            }
        }

        let interval = { config.read().check_interval };
        tokio::select! {
            biased;

            _ = cancellation.cancelled() => {
                debug!("polling cancelled");
                return;
            }

            _ = tokio::time::sleep(interval) => {}
        }
    }
}

/// Emit one tick's events: offline first, then live, then updates, each in
/// ascending channel id order.
fn emit_diff(broadcaster: &MonitorEventBroadcaster, diff: SnapshotDiff) {
    let timestamp = Utc::now();
    for channel_id in diff.went_offline {
        emit(
            broadcaster,
            MonitorEvent::StreamWentOffline {
                channel_id,
                timestamp,
            },
        );
    }
    for stream in diff.went_live {
        emit(
            broadcaster,
            MonitorEvent::StreamWentLive {
                channel_id: stream.channel_id(),
                stream,
                timestamp,
            },
        );
    }
    for stream in diff.updated {
        emit(
            broadcaster,
            MonitorEvent::StreamUpdated {
                channel_id: stream.channel_id(),
                stream,
                timestamp,
            },
        );
    }
}

fn emit(broadcaster: &MonitorEventBroadcaster, event: MonitorEvent) {
    debug!(event = %event.description(), "monitor event");
    // Publishing only fails when nobody is subscribed yet.
    let _ = broadcaster.publish(event);
}
