//! # Mock Transport
//!
//! A scripted [`Transport`] for testing the gateway and the screens without
//! a server.
//!
//! ## Testing Strategy
//! Responses are queued up front and handed out in order. Every request is
//! recorded, so a test can assert both what the code did with the response
//! and exactly which requests it made (including that it made none).
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use serde_json::json;
//! use warteg_api::mock::MockTransport;
//! use warteg_api::Gateway;
//!
//! let mock = Arc::new(MockTransport::new());
//! mock.push_json(200, json!([]));
//! let gateway = Gateway::new(mock.clone(), "http://test");
//! assert_eq!(mock.request_count(), 0);
//! ```

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::transport::{ApiRequest, ApiResponse, Transport, TransportError};

type Scripted = Result<ApiResponse, TransportError>;

#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<ApiRequest>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a JSON response.
    pub fn push_json(&self, status: u16, body: Value) {
        self.push_response(ApiResponse::new(status, body.to_string()));
    }

    pub fn push_response(&self, response: ApiResponse) {
        lock(&self.responses).push_back(Ok(response));
    }

    /// Queues a failure with no response.
    pub fn push_error(&self, error: TransportError) {
        lock(&self.responses).push_back(Err(error));
    }

    /// Every request sent so far, in order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        lock(&self.requests).clone()
    }

    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }

    pub fn last_request(&self) -> Option<ApiRequest> {
        lock(&self.requests).last().cloned()
    }

    /// Responses not consumed yet.
    pub fn pending(&self) -> usize {
        lock(&self.responses).len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let path = request.path.clone();
        lock(&self.requests).push(request);
        lock(&self.responses)
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Other(format!("no scripted response for {path}"))))
    }
}
