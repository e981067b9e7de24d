//! Session bootstrap and the shared request-shaping layer.
//!
//! # Design
//! The source system mutated a process-wide HTTP client default (credentials
//! flag plus a default-header map). Here that state is an explicit `Session`
//! value behind a [`SessionHandle`]: every outgoing request is built through
//! [`SessionHandle::request`], which stamps the credentials flag and the CSRF
//! header onto plain request data. The handle is cloneable; clones share one
//! session, guarded by an `RwLock` since callers may live on any thread.
//!
//! Bootstrap is deliberately not re-entrant-guarded: running it twice
//! re-fetches and re-installs the token, harmlessly. There is also no
//! synchronization between bootstrap and other request issuers; a request
//! built before the token installs simply carries no CSRF header and will be
//! rejected by the backend. The `watch`-based [`SessionStatus`] channel makes
//! that race explicit: callers that care await `Ready` before mutating.

use std::sync::Arc;
use std::thread;

use parking_lot::RwLock;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::http::{check_status, HttpMethod, HttpRequest, HttpResponse, Transport, CSRF_HEADER};
use crate::types::CsrfToken;

/// Bootstrap progress, observable through [`SessionHandle::subscribe_status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Bootstrap has not completed; requests carry no CSRF header yet.
    Pending,
    /// The CSRF token is installed; built requests carry it.
    Ready,
    /// The last bootstrap attempt failed; requests carry no CSRF header.
    Failed,
}

/// Request-shaping state shared by every view of the application.
#[derive(Debug)]
struct Session {
    base_url: String,
    send_credentials: bool,
    csrf_token: Option<String>,
}

/// Cheaply cloneable handle to the shared [`Session`].
///
/// Owned by the application's composition root and passed by reference to
/// anything that issues requests. All clones observe the same credentials
/// flag and CSRF token.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    inner: Arc<RwLock<Session>>,
    status: Arc<watch::Sender<SessionStatus>>,
}

impl SessionHandle {
    pub fn new(base_url: &str) -> Self {
        let (status, _) = watch::channel(SessionStatus::Pending);
        Self {
            inner: Arc::new(RwLock::new(Session {
                base_url: base_url.trim_end_matches('/').to_string(),
                send_credentials: false,
                csrf_token: None,
            })),
            status: Arc::new(status),
        }
    }

    /// Mark all subsequently built requests as credential-carrying (session
    /// cookies attached by the executing host). Idempotent.
    pub fn configure_credentials(&self) {
        self.inner.write().send_credentials = true;
    }

    /// Build the token-acquisition request, `GET {base_url}/csrf`.
    pub fn build_csrf_request(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/csrf", None)
    }

    /// Interpret the `/csrf` response and install the token.
    ///
    /// On success every request built afterwards carries `X-CSRF-Token`.
    /// A non-200 status or a body that is not `{"csrfToken": ...}` fails
    /// without touching the installed token.
    pub fn install_csrf_token(&self, response: &HttpResponse) -> Result<(), ApiError> {
        check_status(response, 200)?;
        let token: CsrfToken =
            serde_json::from_str(&response.body).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.inner.write().csrf_token = Some(token.csrf_token);
        Ok(())
    }

    /// Build a request for `route` (e.g. `/tasks`) through the session.
    ///
    /// JSON bodies get a `content-type` header; the credentials flag and the
    /// CSRF header (once installed) are stamped via [`Self::decorate`].
    pub fn request(&self, method: HttpMethod, route: &str, body: Option<String>) -> HttpRequest {
        let mut headers = Vec::new();
        if body.is_some() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }
        self.decorate(HttpRequest {
            method,
            path: format!("{}{route}", self.base_url()),
            headers,
            body,
            credentials: false,
        })
    }

    /// Stamp the session's credentials flag and CSRF header onto a request.
    pub fn decorate(&self, mut request: HttpRequest) -> HttpRequest {
        let session = self.inner.read();
        request.credentials = session.send_credentials;
        if let Some(token) = &session.csrf_token {
            request.headers.push((CSRF_HEADER.to_string(), token.clone()));
        }
        request
    }

    pub fn base_url(&self) -> String {
        self.inner.read().base_url.clone()
    }

    /// The currently installed token, if bootstrap has completed.
    pub fn csrf_token(&self) -> Option<String> {
        self.inner.read().csrf_token.clone()
    }

    pub fn status(&self) -> SessionStatus {
        *self.status.borrow()
    }

    /// Completion signal for the bootstrap race: receivers can `borrow` the
    /// current status synchronously or `changed().await` transitions.
    pub fn subscribe_status(&self) -> watch::Receiver<SessionStatus> {
        self.status.subscribe()
    }

    fn set_status(&self, status: SessionStatus) {
        self.status.send_replace(status);
    }
}

/// Run the session bootstrap to completion on the calling thread.
///
/// Configures credentials, fetches the CSRF token, and installs it. The
/// outcome is published on the status channel either way; a failure is
/// additionally logged and returned, leaving the session without a token.
pub fn bootstrap_session<T: Transport>(
    session: &SessionHandle,
    transport: &T,
) -> Result<(), ApiError> {
    session.configure_credentials();
    let request = session.build_csrf_request();
    let result = transport
        .execute(&request)
        .and_then(|response| session.install_csrf_token(&response));
    match &result {
        Ok(()) => {
            debug!("csrf token installed");
            session.set_status(SessionStatus::Ready);
        }
        Err(err) => {
            warn!(error = %err, "session bootstrap failed; mutating requests will be rejected");
            session.set_status(SessionStatus::Failed);
        }
    }
    result
}

/// Fire-and-forget bootstrap, preserving the source system's non-blocking
/// startup: the application keeps running whether or not the fetch succeeds.
///
/// The error (if any) is logged inside [`bootstrap_session`]; callers that
/// need the outcome watch [`SessionHandle::subscribe_status`] instead of the
/// returned join handle.
pub fn spawn_bootstrap<T>(session: &SessionHandle, transport: T) -> thread::JoinHandle<()>
where
    T: Transport + Send + 'static,
{
    let session = session.clone();
    thread::spawn(move || {
        let _ = bootstrap_session(&session, &transport);
    })
}
