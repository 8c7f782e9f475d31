//! Request lifecycle glue between axum and the reqstat collector.
//!
//! - `stamp_origin` records when the request entered the stack
//! - `track_request` owns one collector per request and flushes it on the way out
//! - handlers reach the collector through the `LifecycleHandle` extension

pub mod handle;
pub mod middleware;

pub use handle::{EventGuard, LifecycleHandle};
pub use middleware::{stamp_origin, track_request, RequestOrigin};
