// # hosting.de DNS API
//
// This crate connects `hostingde-core` to the hosting.de DNS API over HTTPS.
//
// ## Layers
//
// - [`ReqwestTransport`]: The raw JSON POST (one request per call, no retry)
// - [`DnsClient`]: One method per API endpoint plus the "must not be empty"
//   lookups and zone resolution for a bare record name
// - [`DnsManager`]: Add/delete/set/update a single record without the caller
//   knowing which zone holds it
//
// ## Security Requirements
//
// - The auth token NEVER appears in logs or Debug output
// - Construction fails fast if the token is empty
//
// ## API Reference
//
// - hosting.de API: https://www.hosting.de/api/
// - Listing zones: POST `/api/dns/v1/json/zonesFind`
// - Listing records: POST `/api/dns/v1/json/recordsFind`
// - Updating zones: POST `/api/dns/v1/json/zoneUpdate`
//
// ## Known Limitation
//
// A zone is read, then updated with a separate call. The provider's object
// lock (retried on code 10205) is the only concurrency guard; a concurrent
// change to the same zone between the two calls is not detected.

pub mod client;
pub mod manager;
pub mod resolver;
pub mod transport;

pub use client::DnsClient;
pub use manager::{DnsManager, UpdateOutcome};
pub use transport::ReqwestTransport;

pub use hostingde_core::{ClientConfig, Error, Filter, Record, Result, Zone, ZoneConfig};
