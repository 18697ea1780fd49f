//! Client-side HTTP request batching.
//!
//! Register independent requests under caller-chosen keys, then execute
//! them all concurrently in one call and read each request's status,
//! headers, and body back out of the returned mapping:
//!
//! ```no_run
//! use http_batch::{RequestBatch, RequestSpec};
//!
//! # async fn run() -> Result<(), http_batch::BatchError> {
//! let mut batch = RequestBatch::new();
//! batch.register(RequestSpec::get("http://example.test/ok").key("a"))?;
//! batch.register(RequestSpec::post("http://example.test/create").key("b").body("x=1"))?;
//!
//! for (key, entry) in batch.execute().await {
//!     println!("{}: {} ({} bytes)", key, entry.status, entry.content.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Transport-level failures (timeouts, refused connections) never abort a
//! batch; they are reported in the affected entry's
//! [`error`](ResultEntry::error) field while sibling requests run to
//! completion. Registration errors (bad method, missing key) fail
//! immediately and leave the batch untouched.

pub mod delivery;
pub mod error;
pub mod request;
mod utils;

pub use delivery::{Delivery, Inline};
pub use error::BatchError;
pub use request::{
    execute_one, Method, OptionOverrides, RequestBatch, RequestSpec, ResultEntry,
    TransportError, TransportErrorKind, TransportOptions,
};
