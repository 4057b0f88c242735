//! Error types for Kraken API calls.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for Kraken API calls.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Failure of a single API call.
///
/// Every failed call produces exactly one of these. HTTP failures are
/// classified by status code alone, the response body is never inspected.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("all API calls require a client id or an OAuth token")]
    InvalidCredentials,
    #[error("request blocked due to bad credentials (does the access token carry the right scope?)")]
    BadScope,
    #[error("the requested resource does not exist")]
    ResourceNotFound,
    #[error("the requested resource is only available to partnered channels")]
    NotPartnered,
    #[error("unexpected status: {0}")]
    Status(StatusCode),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ApiError {
    /// Classified category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::InvalidCredentials => ErrorKind::InvalidCredentials,
            ApiError::BadScope => ErrorKind::BadScope,
            ApiError::ResourceNotFound => ErrorKind::ResourceNotFound,
            ApiError::NotPartnered => ErrorKind::NotPartnered,
            ApiError::Status(_) | ApiError::Http(_) | ApiError::Json(_) => ErrorKind::Other,
        }
    }

    /// HTTP status associated with this error, if any.
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            ApiError::BadScope => Some(StatusCode::UNAUTHORIZED),
            ApiError::ResourceNotFound => Some(StatusCode::NOT_FOUND),
            ApiError::NotPartnered => Some(StatusCode::UNPROCESSABLE_ENTITY),
            ApiError::Status(status) => Some(*status),
            ApiError::Http(e) => e.status(),
            ApiError::InvalidCredentials | ApiError::Json(_) => None,
        }
    }
}

/// Closed set of failure categories.
///
/// A flattened view of [`ApiError`] that is cheap to copy into events and
/// logs without dragging the underlying transport error along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Neither a client id nor an access token was available.
    InvalidCredentials,
    /// HTTP 401.
    BadScope,
    /// HTTP 404.
    ResourceNotFound,
    /// HTTP 422.
    NotPartnered,
    /// Any other HTTP error status, transport failure, or decode failure.
    Other,
}

/// Map a non-success HTTP status to its error.
///
/// Pure in the status code; callers must not feed 2xx statuses in here.
pub(crate) fn classify_status(status: StatusCode) -> ApiError {
    match status {
        StatusCode::UNAUTHORIZED => ApiError::BadScope,
        StatusCode::NOT_FOUND => ApiError::ResourceNotFound,
        StatusCode::UNPROCESSABLE_ENTITY => ApiError::NotPartnered,
        other => ApiError::Status(other),
    }
}
