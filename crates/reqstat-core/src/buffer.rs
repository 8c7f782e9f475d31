//! Metric accumulator flushed once per finish cycle.
//!
//! Wire quirk: memory readings are sent with the `ms` timer type, scaled by
//! 1000, exactly like durations. Backends already keyed on that shape rely on
//! it, so `bytes * 1000|ms` is intentional and must not be "corrected".

use std::sync::Arc;

use crate::memory::MemoryProbe;
use crate::sink::Sink;

/// Format a value in the timer wire type: `<value * 1000>|ms`.
pub fn format_ms(value: f64) -> String {
    format!("{}|ms", value * 1000.0)
}

/// Memory variant of [`format_ms`]; integer math so large byte counts stay exact.
///
/// Values above `u64::MAX / 1000` bytes are clamped to `u64::MAX`.
pub fn format_memory_ms(bytes: u64) -> String {
    format!("{}|ms", bytes.saturating_mul(1000))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSample {
    pub name: String,
    /// Always `<number>|ms`.
    pub value: String,
}

impl MetricSample {
    /// `name:value`, one StatsD line.
    pub fn line(&self) -> String {
        format!("{}:{}", self.name, self.value)
    }
}

/// Metric name -> sample, unique by name.
pub struct MetricsBuffer {
    samples: Vec<MetricSample>,
    probe: Arc<dyn MemoryProbe>,
}

impl MetricsBuffer {
    pub fn new(probe: Arc<dyn MemoryProbe>) -> Self {
        Self {
            samples: Vec::new(),
            probe,
        }
    }

    /// Record a memory reading. `None` reads the current peak from the probe.
    pub fn add_memory(&mut self, name: &str, bytes: Option<u64>) -> &mut Self {
        let bytes = bytes.unwrap_or_else(|| self.probe.peak_bytes());
        self.put(name, format_memory_ms(bytes));
        self
    }

    /// Record a duration given in seconds.
    pub fn add_timer(&mut self, name: &str, seconds: f64) -> &mut Self {
        self.put(name, format_ms(seconds));
        self
    }

    // Last write wins; the first insertion keeps its position.
    fn put(&mut self, name: &str, value: String) {
        match self.samples.iter_mut().find(|s| s.name == name) {
            Some(s) => s.value = value,
            None => self.samples.push(MetricSample {
                name: name.to_string(),
                value,
            }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&MetricSample> {
        self.samples.iter().find(|s| s.name == name)
    }

    pub fn samples(&self) -> &[MetricSample] {
        &self.samples
    }

    pub fn lines(&self) -> Vec<String> {
        self.samples.iter().map(MetricSample::line).collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Hand every line to `sink` in one call, then clear.
    ///
    /// Returns the number of lines handed over. The buffer is cleared whether
    /// or not the sink succeeded.
    pub fn flush(&mut self, sink: &dyn Sink) -> usize {
        if self.samples.is_empty() {
            return 0;
        }

        let lines = self.lines();
        // The one place a sink error is dropped: emission must never reach the request.
        if let Err(e) = sink.emit(&lines) {
            tracing::debug!(error = %e, lines = lines.len(), "metrics emission failed; discarded");
        }

        self.samples.clear();
        lines.len()
    }
}

impl std::fmt::Debug for MetricsBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsBuffer")
            .field("samples", &self.samples)
            .finish()
    }
}
