//! Core traits for the hosting.de DNS client
//!
//! This module defines the abstract interfaces that implementations plug into.
//!
//! - [`HttpTransport`]: Perform one raw JSON POST against the provider

pub mod transport;

pub use transport::{HttpResponse, HttpTransport};
