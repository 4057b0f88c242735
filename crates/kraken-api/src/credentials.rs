//! Credential storage for Kraken API calls.
//!
//! Every call requires a client id or an OAuth access token. Credentials are
//! held in a [`CredentialStore`] shared across clients; updates take effect
//! on the next call. Token values never appear in `Debug` output.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{ApiError, Result};

/// A client id / OAuth token pair.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    client_id: String,
    access_token: Option<String>,
}

impl Credentials {
    /// Create credentials with a client id only.
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            access_token: None,
        }
    }

    /// Attach an OAuth access token.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// The client id, possibly empty.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// The access token, if one is set.
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// Check that at least one component is usable.
    ///
    /// A blank (whitespace-only) token does not count.
    pub(crate) fn validate(&self) -> Result<()> {
        let token_usable = self
            .access_token
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty());
        if self.client_id.is_empty() && !token_usable {
            return Err(ApiError::InvalidCredentials);
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Shared, mutable credential source.
///
/// Cloning is cheap; all clones observe the same underlying credentials, so
/// a token swapped in at runtime is picked up by every client on its next
/// call.
#[derive(Clone, Default)]
pub struct CredentialStore {
    inner: Arc<RwLock<Credentials>>,
}

impl CredentialStore {
    /// Create a store holding the given credentials.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            inner: Arc::new(RwLock::new(credentials)),
        }
    }

    /// Replace the client id.
    pub fn set_client_id(&self, client_id: impl Into<String>) {
        self.inner.write().client_id = client_id.into();
    }

    /// Replace the access token.
    pub fn set_access_token(&self, token: impl Into<String>) {
        self.inner.write().access_token = Some(token.into());
    }

    /// Drop the access token, leaving only the client id.
    pub fn clear_access_token(&self) {
        self.inner.write().access_token = None;
    }

    /// Copy of the current credentials.
    pub fn snapshot(&self) -> Credentials {
        self.inner.read().clone()
    }
}
