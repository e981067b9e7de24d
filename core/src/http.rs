//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The core
//! crate builds `HttpRequest` values and parses `HttpResponse` values without
//! ever touching the network. The host executes the actual I/O through the
//! [`Transport`] trait, which keeps the core deterministic and lets tests
//! substitute a real agent, an in-memory double, or a broken connection.
//!
//! All fields use owned types (`String`, `Vec`) so values can be moved freely
//! across threads and stored without lifetime concerns.

use crate::error::ApiError;

/// Header carrying the CSRF token on state-mutating requests.
pub const CSRF_HEADER: &str = "X-CSRF-Token";

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

/// An HTTP request described as plain data.
///
/// Built by `ApiClient::build_*` methods after being decorated by the shared
/// session. The `credentials` flag tells the executing host whether to attach
/// the session cookie jar; it replaces the source system's ambient
/// "always send credentials" client default with per-request data.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub credentials: bool,
}

impl HttpRequest {
    /// Look up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response described as plain data.
///
/// Constructed by the host after executing an `HttpRequest`, then passed to
/// the `parse_*` / `install_*` methods for interpretation.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// The single I/O seam of the crate.
///
/// Implementors perform one HTTP round-trip. 4xx/5xx responses must be
/// returned as `HttpResponse` data, not as `Err`; `Err(ApiError::Transport)`
/// is reserved for failures to reach the backend at all.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Map non-success status codes to the appropriate `ApiError` variant.
pub(crate) fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    match response.status {
        401 | 403 => Err(ApiError::Unauthorized),
        404 => Err(ApiError::NotFound),
        status => Err(ApiError::Status {
            status,
            body: response.body.clone(),
        }),
    }
}
