//! reqstat core: metric-name templating and the request lifecycle timeline.
//!
//! This crate owns everything with real logic in it: the token vocabulary,
//! the sanitizer, `%token%` templates, the per-request event timeline, the
//! metrics buffer and the sink contract. It carries no transport or runtime
//! dependencies; hosts drive it through [`Observer`] and hand it a [`Sink`].
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. Metrics must never
//! be the reason a request fails.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod buffer;
pub mod collector;
pub mod context;
pub mod error;
pub mod memory;
pub mod sanitize;
pub mod sink;
pub mod template;
pub mod timeline;
pub mod token;

pub use collector::{Collector, CollectorBuilder, CollectorSettings, Observer, Phase};
pub use error::{ErrorClass, ReqstatError, Result};
pub use sink::Sink;
