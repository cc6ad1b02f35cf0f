// # hostingde-core
//
// Core library for managing records on the hosting.de DNS API.
//
// ## Architecture Overview
//
// This library holds everything that does not need a network connection:
// - **Filter**: The provider's boolean filter expression tree used by every find call
// - **RequestHandler**: The JSON request envelope with the object-locked retry loop
// - **HttpTransport**: Trait for the raw POST call the envelope sits on
// - **domain**: Suffix enumeration and best-zone selection for a bare record name
// - **reconcile**: Add/delete list computation for a single record change
//
// The network-backed client, zone directory and management facade live in
// `hostingde-api`, which plugs a reqwest transport into [`RequestHandler`].
//
// ## Design Principles
//
// 1. **Snapshots, not handles**: Zones and records are plain values read per call
// 2. **Pure decisions**: Zone selection and diffing never touch the network
// 3. **Bounded retry**: Only provider code 10205 (object locked) is retried
// 4. **Idempotency**: A change that is already in place produces no write

pub mod config;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod filter;
pub mod model;
pub mod reconcile;
pub mod traits;

// Re-export core types for convenience
pub use config::{ClientConfig, RetryPolicy};
pub use envelope::{ApiEnvelope, ApiMessage, ApiStatus, OBJECT_LOCKED, RequestHandler};
pub use error::{Error, Result};
pub use filter::{Connective, Filter, Relation};
pub use model::{
    FindResult, Record, RecordToAdd, RecordToDelete, Sort, SortOrder, Zone, ZoneConfig, ZoneRef,
    ZoneUpdate,
};
pub use reconcile::{RecordChange, Reconciliation};
pub use traits::{HttpResponse, HttpTransport};
