//! Request envelope for the hosting.de JSON API
//!
//! Every endpoint is a JSON POST answered with the same envelope:
//!
//! ```text
//! {"status": "success"|"error", "response": {..}|null,
//!  "warnings": [{"code": .., "text": ..}], "errors": [{"code": .., "text": ..}]}
//! ```
//!
//! [`RequestHandler`] owns the standing connection settings (auth token, base
//! URL, retry policy), performs one call through an [`HttpTransport`], checks the
//! HTTP status and the envelope status, logs warnings and errors, and retries the
//! call while the provider reports the target object as locked.
//!
//! ## Retry
//!
//! Only an envelope whose first error has code [`OBJECT_LOCKED`] is retried,
//! with a fixed delay, at most `max_retries` times. A policy of `max_retries = 2`
//! therefore issues at most three requests. HTTP status failures and transport
//! failures are never retried.

use crate::config::{ClientConfig, RetryPolicy};
use crate::error::{Error, Result};
use crate::traits::HttpTransport;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, warn};

/// Provider error code for "object is temporarily locked"
pub const OBJECT_LOCKED: i64 = 10205;

/// A warning or error entry of the envelope
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMessage {
    pub code: i64,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_object: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_path: Option<String>,
}

/// Envelope status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiStatus {
    Success,
    Error,
    Pending,
    #[serde(other)]
    Unknown,
}

/// Decoded response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope {
    pub status: ApiStatus,
    #[serde(default)]
    pub response: Option<Value>,
    #[serde(default)]
    pub warnings: Vec<ApiMessage>,
    #[serde(default)]
    pub errors: Vec<ApiMessage>,
}

/// Sends requests to the API and unwraps the envelope
///
/// # Security
///
/// The Debug implementation does NOT expose the auth token.
pub struct RequestHandler {
    /// Transport used for the raw POST
    transport: Box<dyn HttpTransport>,

    /// hosting.de auth token, added to every request body
    /// ⚠️ NEVER log this value
    auth_token: String,

    /// Base URL the API paths are appended to
    base_url: String,

    /// Object-locked retry policy
    retry: RetryPolicy,
}

// Custom Debug implementation that hides the auth token
impl std::fmt::Debug for RequestHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestHandler")
            .field("transport", &self.transport.transport_name())
            .field("auth_token", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .field("retry", &self.retry)
            .finish()
    }
}

impl RequestHandler {
    /// Create a request handler
    pub fn new(
        transport: Box<dyn HttpTransport>,
        auth_token: impl Into<String>,
        base_url: impl Into<String>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            transport,
            auth_token: auth_token.into(),
            base_url: base_url.into(),
            retry,
        }
    }

    /// Create a request handler from a validated configuration
    pub fn from_config(transport: Box<dyn HttpTransport>, config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(
            transport,
            config.auth_token.clone(),
            config.base_url.clone(),
            config.retry_policy(),
        ))
    }

    /// Replace the auth token
    pub fn set_auth_token(&mut self, auth_token: impl Into<String>) {
        self.auth_token = auth_token.into();
    }

    /// Replace the base URL
    pub fn set_base_url(&mut self, base_url: impl Into<String>) {
        self.base_url = base_url.into();
    }

    /// Replace the retry policy
    pub fn set_retry_policy(&mut self, retry: RetryPolicy) {
        self.retry = retry;
    }

    /// Current base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Current retry policy
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Call `path` with `body` and decode the `response` payload
    ///
    /// `body` must serialize to a JSON object; the auth token is added to it.
    pub async fn call<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self.call_value(path, body).await?;
        Ok(serde_json::from_value(response)?)
    }

    /// Call `path` with `body` and return the raw `response` payload
    pub async fn call_value<B>(&self, path: &str, body: &B) -> Result<Value>
    where
        B: Serialize + ?Sized,
    {
        let payload = self.request_body(body)?;
        let url = format!("{}{}", self.base_url, path);

        let mut retries_left = self.retry.max_retries;
        let mut attempt = 1usize;

        loop {
            let envelope = self.send_once(&url, payload.clone()).await?;

            match envelope.status {
                ApiStatus::Success => return Ok(envelope.response.unwrap_or(Value::Null)),
                ApiStatus::Pending => {
                    warn!(path, "Request accepted but still pending on the provider side");
                    return Ok(envelope.response.unwrap_or(Value::Null));
                }
                ApiStatus::Unknown => {
                    warn!(path, "Response has an unrecognised status");
                    return Err(Error::api_response(path, envelope.errors));
                }
                ApiStatus::Error => {}
            }

            let locked = envelope
                .errors
                .first()
                .is_some_and(|error| error.code == OBJECT_LOCKED);

            if locked && retries_left > 0 {
                warn!(
                    path,
                    attempt,
                    retries_left,
                    delay = ?self.retry.retry_delay,
                    "Object locked, retrying after delay"
                );
                tokio::time::sleep(self.retry.retry_delay).await;
                retries_left -= 1;
                attempt += 1;
                continue;
            }

            return Err(Error::api_response(path, envelope.errors));
        }
    }

    fn request_body<B>(&self, body: &B) -> Result<Vec<u8>>
    where
        B: Serialize + ?Sized,
    {
        let mut data = match serde_json::to_value(body)? {
            Value::Object(map) => map,
            Value::Null => serde_json::Map::new(),
            other => {
                return Err(Error::invalid_input(format!(
                    "request body must be a JSON object, got: {}",
                    other
                )));
            }
        };
        data.insert("authToken".to_string(), Value::String(self.auth_token.clone()));
        Ok(serde_json::to_vec(&data)?)
    }

    async fn send_once(&self, url: &str, payload: Vec<u8>) -> Result<ApiEnvelope> {
        debug!("Requesting from api: {}", url);

        let response = self
            .transport
            .post(url, payload, &[("Content-Type", "application/json")])
            .await?;

        if response.status != 200 {
            return Err(Error::http_status(url, response.status));
        }

        let envelope: ApiEnvelope = serde_json::from_slice(&response.body)?;

        debug!(
            "Response from {} returned with status: {:?} [warnings: {} / errors: {}]",
            url,
            envelope.status,
            envelope.warnings.len(),
            envelope.errors.len()
        );
        for warning in &envelope.warnings {
            warn!(
                "Request to {} responded with warning: [{}]: {}",
                url, warning.code, warning.text
            );
        }
        for err in &envelope.errors {
            error!(
                "Request to {} responded with error: [{}]: {}",
                url, err.code, err.text
            );
        }

        Ok(envelope)
    }
}
