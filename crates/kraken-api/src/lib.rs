//! Client library for the Twitch Kraken (v3/v4/v5) REST API.
//!
//! Every call funnels through one authenticated pipeline:
//! - credentials are validated before any network I/O
//! - the client id is appended to every URL
//! - the protocol generation is selected via the `Accept` header
//! - non-success statuses are classified into a closed error set
//!
//! Request bodies are JSON with every key lowercased, which the Kraken
//! write endpoints require.

pub mod client;
pub mod credentials;
pub mod endpoints;
pub mod error;
pub mod models;
pub mod serialize;
pub mod version;

pub use client::{KrakenClient, default_client};
pub use credentials::{CredentialStore, Credentials};
pub use error::{ApiError, ErrorKind, Result};
pub use models::{Channel, ChannelId, ChannelUpdate, Preview, Stream, StreamsResponse};
pub use version::ApiVersion;

/// Re-export so dependents can match on [`ApiError::Status`] without a
/// direct reqwest dependency.
pub use reqwest::StatusCode;
