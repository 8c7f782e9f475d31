//! Deterministic clock/probe doubles and context builders.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use reqstat_core::context::{HttpExchange, HttpRequestParts, HttpResponseParts};
use reqstat_core::memory::MemoryProbe;
use reqstat_core::sanitize::Sanitizer;
use reqstat_core::template::{MetricNamer, MetricTemplate};
use reqstat_core::timeline::Clock;
use reqstat_core::CollectorSettings;

/// Clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    pub fn new(start: Instant) -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(start),
        })
    }

    pub fn advance(&self, d: Duration) {
        let mut g = self.now.lock().unwrap();
        *g += d;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap()
    }
}

/// Probe whose reading is set by the test.
#[derive(Default)]
pub struct FixedProbe(AtomicU64);

impl FixedProbe {
    pub fn new(bytes: u64) -> Arc<Self> {
        Arc::new(Self(AtomicU64::new(bytes)))
    }

    pub fn set(&self, bytes: u64) {
        self.0.store(bytes, Ordering::Relaxed);
    }
}

impl MemoryProbe for FixedProbe {
    fn peak_bytes(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

pub fn settings(enable: bool, memory: &str, timer: &str) -> Arc<CollectorSettings> {
    Arc::new(CollectorSettings {
        enable,
        namer: MetricNamer::new(
            MetricTemplate::parse(memory),
            MetricTemplate::parse(timer),
            Sanitizer::default(),
        ),
        event_metrics: false,
    })
}

pub fn exchange(controller: &str, method: &str, status: u16, content_type: &str) -> HttpExchange {
    HttpExchange {
        controller: Some(controller.to_string()),
        request: Some(HttpRequestParts {
            method: method.to_string(),
            headers: vec![("Content-Type".to_string(), content_type.to_string())],
        }),
        response: Some(HttpResponseParts {
            status,
            headers: vec![("content-type".to_string(), "text/html; charset=UTF-8".to_string())],
        }),
    }
}
