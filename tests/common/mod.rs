//! Shared fixtures for integration tests

use async_trait::async_trait;
use response_cache::transport::{Transport, TransportError};
use response_cache::types::{HttpRequest, HttpResponse, ResponseBody};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub type Outcome = Result<HttpResponse, TransportError>;

/// Transport that replays a fixed script of outcomes and records the requests it saw.
/// Once the script runs out every call fails as if the network were down.
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Outcome>>,
    seen: Mutex<Vec<HttpRequest>>,
    calls: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new(script: Vec<Outcome>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            seen: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn push(&self, outcome: Outcome) {
        self.script.lock().unwrap().push_back(outcome);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<HttpRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Outcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(request);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(offline_error()))
    }
}

pub fn offline_error() -> TransportError {
    TransportError::Other("network unreachable".into())
}

pub fn text_response(status: u16, content_type: &str, body: &str) -> Outcome {
    Ok(HttpResponse::new(
        status,
        ResponseBody::from_bytes(Some(content_type.to_string()), body.to_string()),
    )
    .with_message(if status == 200 { "OK" } else { "Error" })
    .with_header("Content-Type", content_type))
}
