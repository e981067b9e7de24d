//! Domain DTOs for the todo API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently,
//! so the client surface never couples to Axum internals. Integration tests
//! catch any schema drift between the two crates. Task ids are backend-owned
//! integers; id `0` is never issued by the backend and is reserved by the
//! client as the "nothing is being edited" sentinel.

use serde::{Deserialize, Serialize};

/// CSRF token issued by `GET /csrf`, bound to the session cookie identity.
///
/// Held only in memory as a header value; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CsrfToken {
    #[serde(rename = "csrfToken")]
    pub csrf_token: String,
}

/// A single task returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: u32,
    pub title: String,
}

/// Request payload for creating a new task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    pub title: String,
}

/// Request payload for renaming an existing task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTask {
    pub title: String,
}

/// Email/password pair for the signup and login operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Account record returned by `POST /signup`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: u32,
    pub email: String,
}

/// The task currently being edited, shared across views.
///
/// `{id: 0, title: ""}` is the sentinel meaning "nothing is being edited";
/// `Default` produces it. The store never validates payloads, so other
/// combinations involving id `0` are representable; [`EditedTask::is_empty`]
/// recognizes only the exact sentinel.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EditedTask {
    pub id: u32,
    pub title: String,
}

impl EditedTask {
    /// The "nothing is being edited" sentinel.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether this value is exactly the sentinel.
    pub fn is_empty(&self) -> bool {
        self.id == 0 && self.title.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csrf_token_decodes_camel_case_body() {
        let token: CsrfToken = serde_json::from_str(r#"{"csrfToken":"abc123"}"#).unwrap();
        assert_eq!(token.csrf_token, "abc123");
    }

    #[test]
    fn csrf_token_rejects_wrong_shape() {
        let result: Result<CsrfToken, _> = serde_json::from_str(r#"{"token":"abc123"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn task_roundtrips_through_json() {
        let task = Task {
            id: 7,
            title: "Buy milk".to_string(),
        };
        let json = serde_json::to_string(&task).unwrap();
        let back: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(back, task);
    }

    #[test]
    fn edited_task_default_is_the_sentinel() {
        let task = EditedTask::default();
        assert_eq!(task, EditedTask::empty());
        assert_eq!(task.id, 0);
        assert_eq!(task.title, "");
        assert!(task.is_empty());
    }

    #[test]
    fn edited_task_with_title_but_zero_id_is_not_the_sentinel() {
        let task = EditedTask {
            id: 0,
            title: "odd".to_string(),
        };
        assert!(!task.is_empty());
    }
}
