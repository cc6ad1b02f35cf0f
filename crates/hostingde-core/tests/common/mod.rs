//! Test doubles and common utilities for contract tests
//!
//! The scripted transport replays canned HTTP responses in order and records
//! every request it sees, so tests can assert exactly how many calls were made.

#![allow(dead_code)]

use hostingde_core::error::{Error, Result};
use hostingde_core::model::{Record, Zone, ZoneConfig};
use hostingde_core::traits::{HttpResponse, HttpTransport};
use hostingde_core::{RequestHandler, RetryPolicy};
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A request captured by [`ScriptedTransport`]
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub url: String,
    pub body: Value,
}

/// An HttpTransport that replays a fixed script of responses
pub struct ScriptedTransport {
    /// Responses still to be served
    script: Arc<Mutex<VecDeque<Result<HttpResponse>>>>,
    /// Call counter for post()
    call_count: Arc<AtomicUsize>,
    /// Requests seen so far
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl ScriptedTransport {
    pub fn new(script: Vec<Result<HttpResponse>>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into())),
            call_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a new ScriptedTransport that shares state with an existing one
    pub fn sharing_state_with(other: &Self) -> Self {
        Self {
            script: Arc::clone(&other.script),
            call_count: Arc::clone(&other.call_count),
            requests: Arc::clone(&other.requests),
        }
    }

    /// Get the number of times post() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Get the requests seen so far
    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl HttpTransport for ScriptedTransport {
    async fn post(&self, url: &str, body: Vec<u8>, _headers: &[(&str, &str)]) -> Result<HttpResponse> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(CapturedRequest {
            url: url.to_string(),
            body: serde_json::from_slice(&body).unwrap_or(Value::Null),
        });

        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::transport("script exhausted")))
    }

    fn transport_name(&self) -> &'static str {
        "scripted"
    }
}

/// A 200 response carrying a success envelope
pub fn success(response: Value) -> Result<HttpResponse> {
    envelope(json!({
        "status": "success",
        "response": response,
        "warnings": [],
        "errors": []
    }))
}

/// A 200 response carrying an error envelope with a single error
pub fn api_error(code: i64, text: &str) -> Result<HttpResponse> {
    envelope(json!({
        "status": "error",
        "response": null,
        "warnings": [],
        "errors": [{"code": code, "text": text}]
    }))
}

/// A 200 response carrying an object-locked error
pub fn locked() -> Result<HttpResponse> {
    api_error(10205, "Object is locked")
}

pub fn envelope(body: Value) -> Result<HttpResponse> {
    Ok(HttpResponse::new(200, serde_json::to_vec(&body).unwrap()))
}

/// A handler over `transport` with the given retry budget and no delay
pub fn handler(transport: ScriptedTransport, max_retries: usize) -> RequestHandler {
    RequestHandler::new(
        Box::new(transport),
        "test-token",
        "https://api.test",
        RetryPolicy::new(max_retries, Duration::ZERO),
    )
}

/// A zone snapshot with the given records
pub fn zone(id: &str, name: &str, records: Vec<Record>) -> Zone {
    Zone {
        zone_config: ZoneConfig {
            id: Some(id.to_string()),
            name: Some(name.to_string()),
            name_unicode: Some(name.to_string()),
            ..ZoneConfig::default()
        },
        records,
    }
}
