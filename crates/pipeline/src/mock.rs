//! Scripted [`PredictionsApi`] implementation for tests.
//!
//! Responses are queued per endpoint and popped in order; call counters
//! let tests assert exactly how many submissions and status checks a
//! flow performed.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use mirage_core::job::JobStatus;
use mirage_replicate::{CreatePrediction, Prediction, PredictionsApi, ReplicateApiError};

type ApiResult = Result<Prediction, ReplicateApiError>;

pub(crate) struct MockApi {
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

impl MockApi {
    pub(crate) fn new() -> Self {
        Self {
            creates: Mutex::new(VecDeque::new()),
            gets: Mutex::new(VecDeque::new()),
            default_get: Mutex::new(None),
            create_count: AtomicU32::new(0),
            get_count: AtomicU32::new(0),
            created: Mutex::new(Vec::new()),
        }
    }

    // ---- scripting ----

    /// Queue a successful submission response with the given job id.
    pub(crate) fn push_create(&self, id: &str) {
        self.creates
            .lock()
            .unwrap()
            .push_back(Ok(prediction(id, "starting", None, None)));
    }

    /// Queue a failed submission response.
    pub(crate) fn push_create_error(&self, status: u16, message: &str) {
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
    pub(crate) fn push_status(&self, status: &str, output: Option<Vec<String>>) {
        self.gets
            .lock()
            .unwrap()
            .push_back(Ok(prediction("pred-1", status, output, None)));
    }

    /// Queue one failed terminal status with a provider error payload.
    pub(crate) fn push_failure(&self, status: &str, error: serde_json::Value) {
        self.gets
            .lock()
            .unwrap()
            .push_back(Ok(prediction("pred-1", status, None, Some(error))));
    }

    /// Queue one failed status-check call.
    pub(crate) fn push_api_error(&self, status: u16, message: &str) {
        self.gets
            .lock()
            .unwrap()
            .push_back(Err(ReplicateApiError::Api {
                status,
                message: message.to_string(),
                payload: None,
            }));
    }

    /// Repeat `status` forever once the queued responses run out.
    pub(crate) fn repeat_status(&self, status: &str) {
        *self.default_get.lock().unwrap() = Some(prediction("pred-1", status, None, None));
    }

    // ---- assertions ----

    pub(crate) fn create_count(&self) -> u32 {
        self.create_count.load(Ordering::SeqCst)
    }

    pub(crate) fn get_count(&self) -> u32 {
        self.get_count.load(Ordering::SeqCst)
    }

    /// Submission bodies recorded so far.
    pub(crate) fn created_requests(&self) -> Vec<CreatePrediction> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl PredictionsApi for MockApi {
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
            None => panic!("MockApi: no status-check response scripted"),
        }
    }
}
