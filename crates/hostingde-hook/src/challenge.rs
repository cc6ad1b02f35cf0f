//! DNS-01 challenge helpers

use hostingde_core::Error;

/// Record type used for DNS-01 challenges
pub const CHALLENGE_RECORD_TYPE: &str = "TXT";

/// TXT record name for `domain`; a wildcard prefix is dropped
pub fn challenge_record_name(domain: &str) -> String {
    let domain = domain.trim().trim_end_matches('.');
    let domain = domain.strip_prefix("*.").unwrap_or(domain);
    format!("_acme-challenge.{}", domain)
}

/// TXT content for a validation token; the provider expects it quoted
pub fn challenge_content(validation: &str) -> String {
    format!("\"{}\"", validation)
}

/// Operator-facing message for a failed API interaction
pub fn describe_failure(err: &Error) -> String {
    match err {
        Error::ObjectNotFound(msg) => {
            format!("Object could not be retrieved from Hosting.de DNS API: {}", msg)
        }
        Error::HttpStatus { url, status } => format!(
            "Got an unexpected response code from the Hosting.de DNS API - [HTTP/{}] {}",
            status, url
        ),
        Error::ApiResponse { .. } => match err.first_api_error() {
            Some(first) => format!(
                "Hosting.de DNS API responded with error. [{}]: {}",
                first.code, first.text
            ),
            None => "Hosting.de DNS API responded with error without details".to_string(),
        },
        other => other.to_string(),
    }
}
