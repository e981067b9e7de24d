//! In-memory test double of the CSRF-protected todo backend.
//!
//! # Design
//! Reproduces the backend contract the client core is written against:
//! `GET /csrf` issues a token, every non-GET request must present it in
//! `X-CSRF-Token` (403 otherwise), and the `/tasks` routes additionally
//! require a live session cookie obtained from `POST /login` (401 otherwise).
//! Task ids are issued starting at 1; id 0 is never handed out, since the
//! client reserves it as its "nothing is being edited" sentinel.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    http::{header, HeaderMap, Method, StatusCode},
    middleware::{self, Next},
    response::{AppendHeaders, IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: u32,
    pub title: String,
}

#[derive(Deserialize)]
pub struct CreateTask {
    pub title: String,
}

#[derive(Deserialize)]
pub struct UpdateTask {
    pub title: String,
}

#[derive(Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: u32,
    pub email: String,
}

#[derive(Serialize, Deserialize)]
pub struct CsrfToken {
    #[serde(rename = "csrfToken")]
    pub csrf_token: String,
}

/// Everything the fake backend remembers for the lifetime of the process.
#[derive(Default)]
pub struct Backend {
    users: HashMap<String, (u32, String)>,
    next_user_id: u32,
    sessions: HashSet<String>,
    csrf_tokens: HashSet<String>,
    tasks: HashMap<u32, Task>,
    next_task_id: u32,
}

pub type Db = Arc<RwLock<Backend>>;

pub fn app() -> Router {
    let db = Db::default();
    let tasks = Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/{id}", put(update_task).delete(delete_task))
        .layer(middleware::from_fn_with_state(db.clone(), require_session));
    Router::new()
        .route("/csrf", get(issue_csrf))
        .route("/signup", post(sign_up))
        .route("/login", post(log_in))
        .route("/logout", post(log_out))
        .merge(tasks)
        .layer(middleware::from_fn_with_state(db.clone(), enforce_csrf))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Every state-mutating request must present a previously issued CSRF token.
async fn enforce_csrf(State(db): State<Db>, req: Request, next: Next) -> Response {
    if req.method() == Method::GET {
        return next.run(req).await;
    }
    let presented = req
        .headers()
        .get("x-csrf-token")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let valid = match presented {
        Some(token) => db.read().await.csrf_tokens.contains(&token),
        None => false,
    };
    if valid {
        next.run(req).await
    } else {
        tracing::debug!(method = %req.method(), uri = %req.uri(), "rejecting request without valid csrf token");
        (StatusCode::FORBIDDEN, "missing or invalid csrf token").into_response()
    }
}

/// The `/tasks` routes require a session cookie from a successful login.
async fn require_session(State(db): State<Db>, req: Request, next: Next) -> Response {
    let authenticated = match session_cookie(req.headers()) {
        Some(token) => db.read().await.sessions.contains(&token),
        None => false,
    };
    if authenticated {
        next.run(req).await
    } else {
        (StatusCode::UNAUTHORIZED, "login required").into_response()
    }
}

fn session_cookie(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("session=").map(str::to_owned))
}

async fn issue_csrf(State(db): State<Db>) -> Json<CsrfToken> {
    let token = Uuid::new_v4().to_string();
    db.write().await.csrf_tokens.insert(token.clone());
    Json(CsrfToken { csrf_token: token })
}

async fn sign_up(
    State(db): State<Db>,
    Json(input): Json<Credentials>,
) -> Result<(StatusCode, Json<User>), StatusCode> {
    let mut backend = db.write().await;
    if backend.users.contains_key(&input.email) {
        return Err(StatusCode::CONFLICT);
    }
    backend.next_user_id += 1;
    let user = User {
        id: backend.next_user_id,
        email: input.email.clone(),
    };
    backend.users.insert(input.email, (user.id, input.password));
    Ok((StatusCode::CREATED, Json(user)))
}

async fn log_in(State(db): State<Db>, Json(input): Json<Credentials>) -> Response {
    let mut backend = db.write().await;
    match backend.users.get(&input.email) {
        Some((_, password)) if *password == input.password => {
            let token = Uuid::new_v4().to_string();
            backend.sessions.insert(token.clone());
            (
                StatusCode::OK,
                AppendHeaders([(
                    header::SET_COOKIE,
                    format!("session={token}; HttpOnly; Path=/"),
                )]),
            )
                .into_response()
        }
        _ => StatusCode::UNAUTHORIZED.into_response(),
    }
}

async fn log_out(State(db): State<Db>, headers: HeaderMap) -> Response {
    if let Some(token) = session_cookie(&headers) {
        db.write().await.sessions.remove(&token);
    }
    (
        StatusCode::OK,
        AppendHeaders([(
            header::SET_COOKIE,
            "session=deleted; Max-Age=0; Path=/".to_string(),
        )]),
    )
        .into_response()
}

async fn list_tasks(State(db): State<Db>) -> Json<Vec<Task>> {
    let backend = db.read().await;
    let mut tasks: Vec<Task> = backend.tasks.values().cloned().collect();
    tasks.sort_by_key(|t| t.id);
    Json(tasks)
}

async fn create_task(
    State(db): State<Db>,
    Json(input): Json<CreateTask>,
) -> (StatusCode, Json<Task>) {
    let mut backend = db.write().await;
    backend.next_task_id += 1;
    let task = Task {
        id: backend.next_task_id,
        title: input.title,
    };
    backend.tasks.insert(task.id, task.clone());
    (StatusCode::CREATED, Json(task))
}

async fn update_task(
    State(db): State<Db>,
    Path(id): Path<u32>,
    Json(input): Json<UpdateTask>,
) -> Result<Json<Task>, StatusCode> {
    let mut backend = db.write().await;
    let task = backend.tasks.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    task.title = input.title;
    Ok(Json(task.clone()))
}

async fn delete_task(
    State(db): State<Db>,
    Path(id): Path<u32>,
) -> Result<StatusCode, StatusCode> {
    let mut backend = db.write().await;
    backend
        .tasks
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(StatusCode::NOT_FOUND)
}
