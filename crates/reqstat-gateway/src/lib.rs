//! reqstat gateway library entry.
//!
//! Hosts the reqstat core inside an axum stack: YAML config, the StatsD UDP
//! sink, and the middleware that drives one collector per request. Consumed by
//! the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod lifecycle;
pub mod obs;
pub mod ops;
pub mod router;
pub mod services;
