//! Live stream monitoring on top of `kraken-api`.
//!
//! A [`LiveStreamMonitor`] polls a configured channel set on an interval,
//! keeps a snapshot of who is live, and broadcasts [`MonitorEvent`]s when
//! the picture changes:
//!
//! - a channel appears in the snapshot: [`MonitorEvent::StreamWentLive`]
//! - a channel disappears: [`MonitorEvent::StreamWentOffline`]
//! - a live channel changes title or game: [`MonitorEvent::StreamUpdated`]
//!
//! Poll failures are broadcast as [`MonitorEvent::MonitorError`] and do not
//! stop the monitor.
//!
//! ```no_run
//! use kraken_api::{CredentialStore, Credentials, KrakenClient};
//! use stream_monitor::LiveStreamMonitor;
//!
//! # async fn run() -> stream_monitor::Result<()> {
//! let client = KrakenClient::new(CredentialStore::new(Credentials::new("my-client-id")));
//! let monitor = LiveStreamMonitor::new(client);
//! monitor.set_channels(vec![44322889, 12826])?;
//!
//! let mut events = monitor.subscribe();
//! monitor.start()?;
//! while let Ok(event) = events.recv().await {
//!     println!("{}", event.description());
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod events;
pub mod monitor;
pub mod snapshot;
pub mod source;

pub use error::{Error, Result};
pub use events::{MonitorEvent, MonitorEventBroadcaster};
pub use monitor::LiveStreamMonitor;
pub use snapshot::{LiveSnapshot, SnapshotDiff};
pub use source::{KrakenSnapshotSource, SnapshotSource};
