//! Shared application state for the reqstat gateway.
//!
//! Holds the compiled collector settings and the pieces every per-request
//! collector borrows: sink, memory probe and clock. All of it is immutable
//! after startup.

use std::sync::Arc;
use std::time::Instant;

use reqstat_core::error::Result;
use reqstat_core::memory::{AllocatorProbe, MemoryProbe};
use reqstat_core::sink::NullSink;
use reqstat_core::timeline::{Clock, SystemClock};
use reqstat_core::{Collector, CollectorSettings, Sink};

use crate::config::GatewayConfig;
use crate::obs::UdpSink;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: GatewayConfig,
    settings: Arc<CollectorSettings>,
    sink: Arc<dyn Sink>,
    probe: Arc<dyn MemoryProbe>,
    clock: Arc<dyn Clock>,
}

impl AppState {
    /// Build application state with the StatsD UDP sink from config.
    ///
    /// An unresolvable StatsD host does not stop the gateway; metrics go to a
    /// null sink and the problem is logged.
    pub fn new(cfg: GatewayConfig) -> Result<Self> {
        let sink: Arc<dyn Sink> = if cfg.statsd.enable {
            match UdpSink::connect(&cfg.statsd.statsd) {
                Ok(s) => {
                    tracing::info!(target_addr = %s.target(), "statsd sink ready");
                    Arc::new(s)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "statsd sink unavailable; metrics will be dropped");
                    Arc::new(NullSink)
                }
            }
        } else {
            Arc::new(NullSink)
        };

        Self::with_sink(cfg, sink)
    }

    /// Build application state around an explicit sink.
    pub fn with_sink(cfg: GatewayConfig, sink: Arc<dyn Sink>) -> Result<Self> {
        cfg.validate()?;
        let settings = Arc::new(cfg.statsd.to_settings());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                settings,
                sink,
                probe: Arc::new(AllocatorProbe),
                clock: Arc::new(SystemClock),
            }),
        })
    }

    pub fn cfg(&self) -> &GatewayConfig {
        &self.inner.cfg
    }

    pub fn statsd_enabled(&self) -> bool {
        self.inner.settings.enable
    }

    /// A fresh collector for one request.
    pub fn collector(&self, origin: Option<Instant>) -> Result<Collector> {
        Collector::builder(Arc::clone(&self.inner.settings))
            .origin(origin)
            .clock(Arc::clone(&self.inner.clock))
            .probe(Arc::clone(&self.inner.probe))
            .sink(Arc::clone(&self.inner.sink))
            .build()
    }
}
