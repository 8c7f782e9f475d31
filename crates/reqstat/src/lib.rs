//! Top-level facade crate for reqstat.
//!
//! Re-exports the core and the gateway library so users can depend on a single crate.

pub mod core {
    pub use reqstat_core::*;
}

pub mod gateway {
    pub use reqstat_gateway::*;
}
