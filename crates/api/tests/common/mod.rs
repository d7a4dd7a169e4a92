//! Shared helpers for API integration tests.
//!
//! Builds the full application router with the production middleware
//! stack, but with scripted fakes in place of the provider client and
//! the user store, so no test touches the network or a database.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use mirage_api::auth::jwt::{generate_access_token, JwtConfig};
use mirage_api::config::ServerConfig;
use mirage_api::router::build_app_router;
use mirage_api::state::AppState;
use mirage_core::job::JobStatus;
use mirage_core::types::DbId;
use mirage_core::usage::UsageCategory;
use mirage_db::models::user::User;
use mirage_db::store::{UserStore, UserStoreError};
use mirage_replicate::{CreatePrediction, ModelVersions, Prediction, PredictionsApi, ReplicateApiError};

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults.
///
/// The request timeout is deliberately generous: under a paused-clock
/// runtime the generation endpoints burn through the full virtual
/// polling budget, which must stay inside the timeout window.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 300,
        jwt: test_jwt_config(),
    }
}

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
        access_token_expiry_mins: 15,
    }
}

/// Build the full application router with all middleware layers, backed
/// by the given provider and store fakes.
///
/// This goes through the same [`build_app_router`] as `main.rs`, so the
/// tests exercise the production middleware stack (CORS, request ID,
/// timeout, tracing, panic recovery).
pub fn build_test_app(
    predictions: Arc<dyn PredictionsApi>,
    users: Arc<dyn UserStore>,
) -> Router {
    build_test_app_with_shutdown(predictions, users, CancellationToken::new())
}

/// Like [`build_test_app`], but with a caller-held server shutdown token,
/// so tests can exercise the shutdown path of in-flight requests.
pub fn build_test_app_with_shutdown(
    predictions: Arc<dyn PredictionsApi>,
    users: Arc<dyn UserStore>,
    shutdown: CancellationToken,
) -> Router {
    let config = test_config();

    let state = AppState {
        config: Arc::new(config.clone()),
        predictions,
        models: Arc::new(ModelVersions::default()),
        users,
        shutdown,
    };

    build_app_router(state, &config)
}

/// Mint a valid access token for `user_id` signed with the test secret.
pub fn auth_token(user_id: DbId) -> String {
    generate_access_token(user_id, &test_jwt_config()).expect("token generation should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a GET request without authentication.
pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a GET request with a Bearer token for `user_id`.
pub async fn get_auth(app: Router, uri: &str, user_id: DbId) -> Response {
    let request = Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {}", auth_token(user_id)))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a JSON body and a Bearer token for `user_id`.
pub async fn post_json_auth(
    app: Router,
    uri: &str,
    user_id: DbId,
    body: serde_json::Value,
) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", auth_token(user_id)))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a PUT request with a JSON body and a Bearer token for `user_id`.
pub async fn put_json_auth(
    app: Router,
    uri: &str,
    user_id: DbId,
    body: serde_json::Value,
) -> Response {
    let request = Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", auth_token(user_id)))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a JSON body and no authentication.
pub async fn post_json_anon(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert the response status and return the parsed JSON body.
pub async fn assert_status_json(response: Response, status: StatusCode) -> serde_json::Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Provider fake
// ---------------------------------------------------------------------------

type ApiResult = Result<Prediction, ReplicateApiError>;

/// Scripted [`PredictionsApi`] implementation.
///
/// Responses are queued per endpoint and popped in order; call counters
/// let tests assert exactly how many submissions and status checks a
/// request performed.
#[derive(Default)]
pub struct MockProvider {
    creates: Mutex<VecDeque<ApiResult>>,
    gets: Mutex<VecDeque<ApiResult>>,
    /// Returned (cloned) whenever the `gets` queue is empty.
    default_get: Mutex<Option<Prediction>>,
    create_count: AtomicU32,
    get_count: AtomicU32,
    /// Every submission body, in order.
    created: Mutex<Vec<CreatePrediction>>,
}

fn parse_status(status: &str) -> JobStatus {
    serde_json::from_value(serde_json::json!(status)).expect("valid provider status string")
}

fn prediction(
    id: &str,
    status: &str,
    output: Option<Vec<String>>,
    error: Option<serde_json::Value>,
) -> Prediction {
    Prediction {
        id: id.to_string(),
        status: parse_status(status),
        output,
        error,
    }
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful submission response with the given job id.
    pub fn push_create(&self, id: &str) {
        self.creates
            .lock()
            .unwrap()
            .push_back(Ok(prediction(id, "starting", None, None)));
    }

    /// Queue a failed submission response.
    pub fn push_create_error(&self, status: u16, message: &str) {
        self.creates
            .lock()
            .unwrap()
            .push_back(Err(ReplicateApiError::Api {
                status,
                message: message.to_string(),
                payload: Some(serde_json::json!({ "detail": message })),
            }));
    }

    /// Queue one status-check response.
    pub fn push_status(&self, status: &str, output: Option<Vec<String>>) {
        self.gets
            .lock()
            .unwrap()
            .push_back(Ok(prediction("pred-1", status, output, None)));
    }

    /// Queue one failed terminal status with a provider error payload.
    pub fn push_failure(&self, status: &str, error: serde_json::Value) {
        self.gets
            .lock()
            .unwrap()
            .push_back(Ok(prediction("pred-1", status, None, Some(error))));
    }

    /// Repeat `status` forever once the queued responses run out.
    pub fn repeat_status(&self, status: &str) {
        *self.default_get.lock().unwrap() = Some(prediction("pred-1", status, None, None));
    }

    pub fn create_count(&self) -> u32 {
        self.create_count.load(Ordering::SeqCst)
    }

    pub fn get_count(&self) -> u32 {
        self.get_count.load(Ordering::SeqCst)
    }

    /// Submission bodies recorded so far.
    pub fn created_requests(&self) -> Vec<CreatePrediction> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl PredictionsApi for MockProvider {
    async fn create_prediction(&self, request: &CreatePrediction) -> ApiResult {
        let n = self.create_count.fetch_add(1, Ordering::SeqCst) + 1;
        self.created.lock().unwrap().push(request.clone());
        match self.creates.lock().unwrap().pop_front() {
            Some(result) => result,
            None => Ok(prediction(&format!("pred-{n}"), "starting", None, None)),
        }
    }

    async fn get_prediction(&self, _id: &str) -> ApiResult {
        self.get_count.fetch_add(1, Ordering::SeqCst);
        if let Some(result) = self.gets.lock().unwrap().pop_front() {
            return result;
        }
        match self.default_get.lock().unwrap().clone() {
            Some(prediction) => Ok(prediction),
            None => panic!("MockProvider: no status-check response scripted"),
        }
    }
}

// ---------------------------------------------------------------------------
// User store fake
// ---------------------------------------------------------------------------

/// In-memory [`UserStore`] that records every usage bump.
pub struct RecordingUserStore {
    counts: Mutex<HashMap<UsageCategory, u32>>,
    user: Mutex<Option<User>>,
    /// When `true`, `record_usage` fails with a database-style error.
    fail_usage: bool,
}

impl RecordingUserStore {
    /// A store holding one known user.
    pub fn with_user(user: User) -> Self {
        Self {
            counts: Mutex::new(HashMap::new()),
            user: Mutex::new(Some(user)),
            fail_usage: false,
        }
    }

    /// A store with no users at all.
    pub fn empty() -> Self {
        Self {
            counts: Mutex::new(HashMap::new()),
            user: Mutex::new(None),
            fail_usage: false,
        }
    }

    /// A store whose `record_usage` always fails.
    pub fn failing_usage(user: User) -> Self {
        Self {
            counts: Mutex::new(HashMap::new()),
            user: Mutex::new(Some(user)),
            fail_usage: true,
        }
    }

    /// How many times usage was recorded for `category`.
    pub fn count(&self, category: UsageCategory) -> u32 {
        *self.counts.lock().unwrap().get(&category).unwrap_or(&0)
    }

    /// Total usage bumps across all categories.
    pub fn total_count(&self) -> u32 {
        self.counts.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl UserStore for RecordingUserStore {
    async fn record_usage(
        &self,
        user_id: DbId,
        category: UsageCategory,
    ) -> Result<(), UserStoreError> {
        if self.fail_usage {
            return Err(UserStoreError::NotFound(user_id));
        }
        *self.counts.lock().unwrap().entry(category).or_insert(0) += 1;
        Ok(())
    }

    async fn find_user(&self, _user_id: DbId) -> Result<Option<User>, UserStoreError> {
        Ok(self.user.lock().unwrap().clone())
    }

    async fn update_name(
        &self,
        _user_id: DbId,
        name: &str,
    ) -> Result<Option<User>, UserStoreError> {
        let mut user = self.user.lock().unwrap();
        if let Some(user) = user.as_mut() {
            user.name = name.to_string();
        }
        Ok(user.clone())
    }
}

/// A user row with known usage counters for profile tests.
pub fn sample_user(id: DbId) -> User {
    let now = chrono::Utc::now();
    User {
        id,
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
        password_hash: "argon2id$...".to_string(),
        usage_images: 3,
        usage_audio: 0,
        usage_videos: 1,
        last_login_at: now,
        created_at: now,
        updated_at: now,
    }
}
