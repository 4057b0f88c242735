//! Monitor error types.

use thiserror::Error;

/// Result type for monitor operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by monitor operations.
///
/// Poll failures are not listed here: they are surfaced to subscribers as
/// [`MonitorEvent::MonitorError`](crate::events::MonitorEvent) and never
/// terminate the loop.
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("monitor is already running")]
    AlreadyRunning,
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}
