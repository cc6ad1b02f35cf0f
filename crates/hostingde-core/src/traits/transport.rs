// # HTTP Transport Trait
//
// Defines the raw POST call the request envelope is built on.
//
// ## Implementations
//
// - reqwest: `hostingde-api` crate (`ReqwestTransport`)
// - Scripted test doubles in the contract tests
//
// ## Usage
//
// ```rust,ignore
// use hostingde_core::{HttpTransport, RequestHandler, RetryPolicy};
//
// let transport: Box<dyn HttpTransport> = /* HttpTransport implementation */;
// let handler = RequestHandler::new(transport, "token", "https://secure.hosting.de", RetryPolicy::default());
// ```

use async_trait::async_trait;

/// Status and body of one HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw response body
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Create a response
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Trait for the transport underneath the request envelope
///
/// Implementations send exactly one request per call. They do not interpret
/// the status code or the body, and they never retry: a response with any
/// status is returned as `Ok`, only a failure to obtain a response at all is
/// an error.
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// POST `body` to `url` with the given headers
    ///
    /// # Returns
    ///
    /// - `Ok(HttpResponse)`: Any HTTP response, whatever its status
    /// - `Err(Error::Transport)`: The server could not be reached
    async fn post(
        &self,
        url: &str,
        body: Vec<u8>,
        headers: &[(&str, &str)],
    ) -> Result<HttpResponse, crate::Error>;

    /// Get the transport name (for logging/debugging)
    fn transport_name(&self) -> &'static str;
}
