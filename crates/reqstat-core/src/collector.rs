//! Per-request collector and the observer entry points hosts call.
//!
//! Phases: `Idle -> Collecting -> Finishing -> Flushed`. A collector serves
//! exactly one request; hosts build a fresh one per request.

use std::sync::Arc;
use std::time::Instant;

use crate::buffer::MetricsBuffer;
use crate::context::FinishContext;
use crate::error::Result;
use crate::memory::{AllocatorProbe, MemoryProbe};
use crate::sink::{NullSink, Sink};
use crate::template::MetricNamer;
use crate::timeline::{Clock, SystemClock, Timeline};

/// The three signals a host's lifecycle dispatcher delivers, in order.
pub trait Observer {
    fn on_event_start(&mut self, name: &str);
    fn on_event_end(&mut self, name: &str);
    fn on_finish(&mut self, ctx: &dyn FinishContext);
}

/// Immutable settings shared by every collector of a process.
#[derive(Debug, Clone)]
pub struct CollectorSettings {
    /// Master switch. When off, every signal is a no-op.
    pub enable: bool,
    pub namer: MetricNamer,
    /// Also emit `<timer>.<event>` / `<memory>.<event>` for each closed event.
    pub event_metrics: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Collecting,
    Finishing,
    Flushed,
}

pub struct Collector {
    settings: Arc<CollectorSettings>,
    timeline: Timeline,
    buffer: MetricsBuffer,
    clock: Arc<dyn Clock>,
    probe: Arc<dyn MemoryProbe>,
    sink: Arc<dyn Sink>,
    phase: Phase,
}

impl Collector {
    pub fn builder(settings: Arc<CollectorSettings>) -> CollectorBuilder {
        CollectorBuilder::new(settings)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn buffer(&self) -> &MetricsBuffer {
        &self.buffer
    }

    pub fn settings(&self) -> &CollectorSettings {
        &self.settings
    }

    /// Run the finish step. Returns the number of lines handed to the sink,
    /// or `None` when the step was gated off.
    pub fn finish(&mut self, ctx: &dyn FinishContext) -> Option<usize> {
        if !self.settings.enable {
            return None;
        }
        if ctx.request().is_none() || ctx.response().is_none() {
            tracing::trace!("finish skipped: no request/response pair");
            return None;
        }

        self.phase = Phase::Finishing;

        let names = self.settings.namer.render(ctx);
        let now = self.clock.now();
        let total = self.timeline.elapsed(now).as_secs_f64();
        let events = self.timeline.take();

        self.buffer.clear();
        self.buffer
            .add_memory(&names.memory, None)
            .add_timer(&names.timer, total);

        if self.settings.event_metrics {
            for ev in events.iter().filter(|e| !e.is_open()) {
                let suffix = self.settings.namer.clean(ev.name());
                if let Some(secs) = ev.duration_secs() {
                    self.buffer.add_timer(&format!("{}.{}", names.timer, suffix), secs);
                }
                if let Some(bytes) = ev.peak_memory() {
                    self.buffer
                        .add_memory(&format!("{}.{}", names.memory, suffix), Some(bytes));
                }
            }
        }

        let sent = self.buffer.flush(self.sink.as_ref());
        self.phase = Phase::Flushed;
        Some(sent)
    }
}

impl Observer for Collector {
    fn on_event_start(&mut self, name: &str) {
        if !self.settings.enable {
            return;
        }
        let now = self.clock.now();
        let peak = self.probe.peak_bytes();
        self.timeline.start(name, now, peak);
        self.phase = Phase::Collecting;
    }

    fn on_event_end(&mut self, name: &str) {
        if !self.settings.enable {
            return;
        }
        let now = self.clock.now();
        let peak = self.probe.peak_bytes();
        if let Err(e) = self.timeline.end(name, now, peak) {
            tracing::warn!(event = %name, class = e.class().as_str(), "{e}");
        }
    }

    fn on_finish(&mut self, ctx: &dyn FinishContext) {
        let _ = self.finish(ctx);
    }
}

impl std::fmt::Debug for Collector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collector")
            .field("phase", &self.phase)
            .field("timeline", &self.timeline)
            .field("buffer", &self.buffer)
            .finish()
    }
}

/// Builder for a per-request [`Collector`].
pub struct CollectorBuilder {
    settings: Arc<CollectorSettings>,
    origin: Option<Instant>,
    clock: Arc<dyn Clock>,
    probe: Arc<dyn MemoryProbe>,
    sink: Arc<dyn Sink>,
}

impl CollectorBuilder {
    pub fn new(settings: Arc<CollectorSettings>) -> Self {
        Self {
            settings,
            origin: None,
            clock: Arc::new(SystemClock),
            probe: Arc::new(AllocatorProbe),
            sink: Arc::new(NullSink),
        }
    }

    /// Moment the request (or the process serving it) began.
    pub fn origin(mut self, origin: Option<Instant>) -> Self {
        self.origin = origin;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn probe(mut self, probe: Arc<dyn MemoryProbe>) -> Self {
        self.probe = probe;
        self
    }

    pub fn sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.sink = sink;
        self
    }

    /// Fails with `MissingRequestOrigin` if no origin was supplied.
    pub fn build(self) -> Result<Collector> {
        let timeline = Timeline::from_origin(self.origin)?;
        Ok(Collector {
            buffer: MetricsBuffer::new(Arc::clone(&self.probe)),
            settings: self.settings,
            timeline,
            clock: self.clock,
            probe: self.probe,
            sink: self.sink,
            phase: Phase::Idle,
        })
    }
}
