//! Request builder and response parser for the todo API.
//!
//! # Design
//! Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`; the
//! host executes the round-trip in between. Every build goes through the
//! shared [`SessionHandle`], so after bootstrap completes all requests carry
//! the credentials flag and the `X-CSRF-Token` header without any operation
//! having to ask for them.

use crate::error::ApiError;
use crate::http::{check_status, HttpMethod, HttpRequest, HttpResponse};
use crate::session::SessionHandle;
use crate::types::{CreateTask, Credentials, Task, UpdateTask, User};

/// Client for the todo API, issuing all requests through a shared session.
#[derive(Debug, Clone)]
pub struct ApiClient {
    session: SessionHandle,
}

impl ApiClient {
    pub fn new(session: SessionHandle) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    pub fn build_sign_up(&self, input: &Credentials) -> Result<HttpRequest, ApiError> {
        Ok(self
            .session
            .request(HttpMethod::Post, "/signup", Some(encode(input)?)))
    }

    pub fn build_log_in(&self, input: &Credentials) -> Result<HttpRequest, ApiError> {
        Ok(self
            .session
            .request(HttpMethod::Post, "/login", Some(encode(input)?)))
    }

    pub fn build_log_out(&self) -> HttpRequest {
        self.session.request(HttpMethod::Post, "/logout", None)
    }

    pub fn build_list_tasks(&self) -> HttpRequest {
        self.session.request(HttpMethod::Get, "/tasks", None)
    }

    pub fn build_create_task(&self, input: &CreateTask) -> Result<HttpRequest, ApiError> {
        Ok(self
            .session
            .request(HttpMethod::Post, "/tasks", Some(encode(input)?)))
    }

    pub fn build_update_task(&self, id: u32, input: &UpdateTask) -> Result<HttpRequest, ApiError> {
        Ok(self
            .session
            .request(HttpMethod::Put, &format!("/tasks/{id}"), Some(encode(input)?)))
    }

    pub fn build_delete_task(&self, id: u32) -> HttpRequest {
        self.session
            .request(HttpMethod::Delete, &format!("/tasks/{id}"), None)
    }

    pub fn parse_sign_up(&self, response: HttpResponse) -> Result<User, ApiError> {
        check_status(&response, 201)?;
        decode(&response.body)
    }

    /// Login succeeds with an empty body; the session cookie travels in the
    /// transport's cookie jar, not through this parser.
    pub fn parse_log_in(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 200)
    }

    pub fn parse_log_out(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 200)
    }

    pub fn parse_list_tasks(&self, response: HttpResponse) -> Result<Vec<Task>, ApiError> {
        check_status(&response, 200)?;
        decode(&response.body)
    }

    pub fn parse_create_task(&self, response: HttpResponse) -> Result<Task, ApiError> {
        check_status(&response, 201)?;
        decode(&response.body)
    }

    pub fn parse_update_task(&self, response: HttpResponse) -> Result<Task, ApiError> {
        check_status(&response, 200)?;
        decode(&response.body)
    }

    pub fn parse_delete_task(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 204)
    }
}

fn encode<T: serde::Serialize>(input: &T) -> Result<String, ApiError> {
    serde_json::to_string(input).map_err(|e| ApiError::Encode(e.to_string()))
}

fn decode<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::CSRF_HEADER;

    fn client() -> ApiClient {
        ApiClient::new(SessionHandle::new("http://localhost:3000"))
    }

    fn bootstrapped_client(token: &str) -> ApiClient {
        let session = SessionHandle::new("http://localhost:3000");
        session.configure_credentials();
        session
            .install_csrf_token(&HttpResponse {
                status: 200,
                headers: Vec::new(),
                body: format!(r#"{{"csrfToken":"{token}"}}"#),
            })
            .unwrap();
        ApiClient::new(session)
    }

    #[test]
    fn build_list_tasks_produces_correct_request() {
        let req = client().build_list_tasks();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/tasks");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
        assert!(!req.credentials);
    }

    #[test]
    fn build_create_task_produces_correct_request() {
        let input = CreateTask {
            title: "Buy milk".to_string(),
        };
        let req = client().build_create_task(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/tasks");
        assert_eq!(req.header("content-type"), Some("application/json"));
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["title"], "Buy milk");
    }

    #[test]
    fn build_update_task_targets_the_task_id() {
        let input = UpdateTask {
            title: "Renamed".to_string(),
        };
        let req = client().build_update_task(7, &input).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, "http://localhost:3000/tasks/7");
    }

    #[test]
    fn build_delete_task_produces_correct_request() {
        let req = client().build_delete_task(7);
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.path, "http://localhost:3000/tasks/7");
        assert!(req.body.is_none());
    }

    #[test]
    fn build_sign_up_and_log_in_carry_the_credentials_body() {
        let creds = Credentials {
            email: "a@example.com".to_string(),
            password: "hunter2".to_string(),
        };
        for req in [
            client().build_sign_up(&creds).unwrap(),
            client().build_log_in(&creds).unwrap(),
        ] {
            assert_eq!(req.method, HttpMethod::Post);
            let body: serde_json::Value =
                serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(body["email"], "a@example.com");
            assert_eq!(body["password"], "hunter2");
        }
    }

    #[test]
    fn every_request_built_after_bootstrap_carries_the_token() {
        let c = bootstrapped_client("abc123");
        let requests = vec![
            c.build_list_tasks(),
            c.build_log_out(),
            c.build_delete_task(1),
            c.build_create_task(&CreateTask {
                title: "t".to_string(),
            })
            .unwrap(),
            c.build_update_task(
                1,
                &UpdateTask {
                    title: "t".to_string(),
                },
            )
            .unwrap(),
        ];
        for req in requests {
            assert_eq!(req.header(CSRF_HEADER), Some("abc123"));
            assert!(req.credentials);
        }
    }

    #[test]
    fn parse_list_tasks_success() {
        let response = HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: r#"[{"id":1,"title":"Test"}]"#.to_string(),
        };
        let tasks = client().parse_list_tasks(response).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Test");
    }

    #[test]
    fn parse_list_tasks_bad_json() {
        let response = HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: "not json".to_string(),
        };
        let err = client().parse_list_tasks(response).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn parse_create_task_success() {
        let response = HttpResponse {
            status: 201,
            headers: Vec::new(),
            body: r#"{"id":1,"title":"New"}"#.to_string(),
        };
        let task = client().parse_create_task(response).unwrap();
        assert_eq!(task.id, 1);
        assert_eq!(task.title, "New");
    }

    #[test]
    fn parse_create_task_rejected_by_csrf_check() {
        let response = HttpResponse {
            status: 403,
            headers: Vec::new(),
            body: "missing or invalid csrf token".to_string(),
        };
        let err = client().parse_create_task(response).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[test]
    fn parse_update_task_not_found() {
        let response = HttpResponse {
            status: 404,
            headers: Vec::new(),
            body: String::new(),
        };
        let err = client().parse_update_task(response).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn parse_delete_task_success() {
        let response = HttpResponse {
            status: 204,
            headers: Vec::new(),
            body: String::new(),
        };
        assert!(client().parse_delete_task(response).is_ok());
    }

    #[test]
    fn parse_sign_up_returns_the_created_user() {
        let response = HttpResponse {
            status: 201,
            headers: Vec::new(),
            body: r#"{"id":1,"email":"a@example.com"}"#.to_string(),
        };
        let user = client().parse_sign_up(response).unwrap();
        assert_eq!(user.email, "a@example.com");
    }

    #[test]
    fn parse_log_in_requires_200() {
        let ok = HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: String::new(),
        };
        assert!(client().parse_log_in(ok).is_ok());
        let rejected = HttpResponse {
            status: 401,
            headers: Vec::new(),
            body: String::new(),
        };
        let err = client().parse_log_in(rejected).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
    }
}
