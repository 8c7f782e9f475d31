//! Metrics emission backends.
//!
//! Only StatsD over UDP for now. Delivery is best-effort: a lost datagram is a
//! lost sample, never a failed request.

pub mod statsd;

pub use statsd::UdpSink;
