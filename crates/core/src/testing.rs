use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::client::{ApiRequest, ApiResponse, ConektaApi, TransportError};

/// Canned [`ConektaApi`] recording every request it receives
pub struct StubConekta {
    outcome: Result<ApiResponse, TransportError>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl StubConekta {
    pub fn respond(response: ApiResponse) -> Arc<Self> {
        Self::with_outcome(Ok(response))
    }

    pub fn ok(body: Value) -> Arc<Self> {
        Self::respond(ApiResponse::new(200, body.to_string()))
    }

    pub fn fail(error: TransportError) -> Arc<Self> {
        Self::with_outcome(Err(error))
    }

    fn with_outcome(outcome: Result<ApiResponse, TransportError>) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConektaApi for StubConekta {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        self.outcome.clone()
    }
}
