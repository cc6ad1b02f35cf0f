//! reqwest-backed transport
//!
//! Sends exactly one HTTP request per call and hands back the status and the
//! raw body. Interpreting either is the request envelope's job.

use async_trait::async_trait;
use hostingde_core::traits::{HttpResponse, HttpTransport};
use hostingde_core::{Error, Result};
use std::time::Duration;

/// Default HTTP timeout for API requests (30 seconds)
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// HttpTransport backed by a shared `reqwest::Client`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    /// HTTP client for API requests
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with the given request timeout
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Wrap an existing client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post(
        &self,
        url: &str,
        body: Vec<u8>,
        headers: &[(&str, &str)],
    ) -> Result<HttpResponse> {
        let mut request = self.client.post(url).body(body);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::transport(format!("Request to {} timed out: {}", url, e))
            } else {
                Error::transport(format!("HTTP request failed: {}", e))
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::transport(format!("Failed to read response body: {}", e)))?;

        Ok(HttpResponse::new(status, body.to_vec()))
    }

    fn transport_name(&self) -> &'static str {
        "reqwest"
    }
}
