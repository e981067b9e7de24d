//! Client core for a CSRF-protected todo service.
//!
//! # Overview
//! Two independent pieces composed at startup:
//! - session bootstrap: configure credential-carrying requests, fetch a CSRF
//!   token from `GET /csrf`, and stamp it on every request built afterwards;
//! - the edited-task store: one shared `EditedTask` cell with whole-value
//!   replacement and change subscription, read and written by every view.
//!
//! # Design
//! - Host-does-IO: operations are `build_*` / `parse_*` pairs over plain
//!   request/response data; the only I/O seam is the [`Transport`] trait.
//! - No ambient globals: the source system's shared HTTP-client defaults
//!   become an explicit [`SessionHandle`] that decorates each request, and
//!   its singleton store becomes a cloneable [`EditedTaskStore`] owned by the
//!   composition root.
//! - The bootstrap race is explicit: nothing stops a request from being
//!   built before the token installs (it will be rejected by the backend);
//!   [`SessionHandle::subscribe_status`] is the completion signal for
//!   callers that want to wait.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod session;
pub mod store;
pub mod types;

pub use client::ApiClient;
pub use config::{Config, ConfigError, API_BASE_URL_VAR};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, CSRF_HEADER};
pub use session::{bootstrap_session, spawn_bootstrap, SessionHandle, SessionStatus};
pub use store::EditedTaskStore;
pub use types::{CreateTask, Credentials, CsrfToken, EditedTask, Task, UpdateTask, User};
