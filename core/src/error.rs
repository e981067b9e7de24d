//! Error types for the todo API client.
//!
//! # Design
//! `Transport` and `Status` split the "network error" surface in two: the
//! backend was unreachable versus the backend answered with a non-success
//! status. `Unauthorized` gets a dedicated variant because a rejected session
//! cookie or CSRF token is the failure callers most often branch on. The
//! store has no error conditions; its operations are total.

use thiserror::Error;

/// Errors returned by session bootstrap and `ApiClient` parse methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend could not be reached at all.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The server rejected the request's session cookie or CSRF token.
    #[error("unauthorized: missing or rejected session/CSRF credentials")]
    Unauthorized,

    /// The server returned 404: the requested task does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-success status other than 401/403/404.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("response decoding failed: {0}")]
    Decode(String),

    /// The request payload could not be serialized to JSON.
    #[error("request encoding failed: {0}")]
    Encode(String),
}
