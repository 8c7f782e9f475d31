//! Per-request event timeline.
//!
//! State per event name: `unstarted -> open -> closed`. The first `start` on an
//! empty timeline also records a closed `bootstrap` event spanning request
//! origin to that moment.
//!
//! The timeline never reads the clock or the memory probe itself; callers pass
//! `now` and the current peak so transitions stay deterministic.

use std::time::{Duration, Instant};

use crate::error::{ReqstatError, Result};

/// Name of the synthetic first interval.
pub const BOOTSTRAP: &str = "bootstrap";

/// Monotonic time source.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventState {
    Open,
    Closed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LifecycleEvent {
    name: String,
    started_at: Instant,
    ended_at: Option<Instant>,
    duration: Option<Duration>,
    peak_memory: Option<u64>,
}

impl LifecycleEvent {
    fn open(name: &str, now: Instant) -> Self {
        Self {
            name: name.to_string(),
            started_at: now,
            ended_at: None,
            duration: None,
            peak_memory: None,
        }
    }

    fn close(&mut self, now: Instant, peak_memory: u64) {
        self.ended_at = Some(now);
        self.duration = Some(now.saturating_duration_since(self.started_at));
        self.peak_memory = Some(peak_memory);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<Instant> {
        self.ended_at
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    /// Duration in seconds, once closed.
    pub fn duration_secs(&self) -> Option<f64> {
        self.duration.map(|d| d.as_secs_f64())
    }

    /// Peak memory (bytes) observed when the event closed.
    pub fn peak_memory(&self) -> Option<u64> {
        self.peak_memory
    }

    pub fn state(&self) -> EventState {
        if self.ended_at.is_some() {
            EventState::Closed
        } else {
            EventState::Open
        }
    }

    pub fn is_open(&self) -> bool {
        self.state() == EventState::Open
    }
}

/// Ordered event name -> event mapping for one request.
#[derive(Debug, Clone)]
pub struct Timeline {
    origin: Instant,
    events: Vec<LifecycleEvent>,
}

impl Timeline {
    pub fn new(origin: Instant) -> Self {
        Self {
            origin,
            events: Vec::new(),
        }
    }

    /// Build from an origin the host may not have. A missing origin is a
    /// configuration defect: nothing can be timed without it.
    pub fn from_origin(origin: Option<Instant>) -> Result<Self> {
        origin
            .map(Self::new)
            .ok_or(ReqstatError::MissingRequestOrigin)
    }

    pub fn origin(&self) -> Instant {
        self.origin
    }

    /// Time since request origin.
    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.origin)
    }

    /// Open `name` at `now`. Restarting a known name overwrites its start.
    pub fn start(&mut self, name: &str, now: Instant, peak_memory: u64) {
        if self.events.is_empty() {
            let mut bootstrap = LifecycleEvent::open(BOOTSTRAP, self.origin);
            bootstrap.close(now, peak_memory);
            self.events.push(bootstrap);
        }

        match self.position(name) {
            Some(i) => {
                let ev = &mut self.events[i];
                if ev.is_open() {
                    tracing::debug!(
                        event = %name,
                        "event restarted while open; previous start discarded"
                    );
                }
                *ev = LifecycleEvent::open(name, now);
            }
            None => self.events.push(LifecycleEvent::open(name, now)),
        }
    }

    /// Close `name` at `now`. Fails when `name` is not currently open.
    pub fn end(&mut self, name: &str, now: Instant, peak_memory: u64) -> Result<&LifecycleEvent> {
        let i = self
            .position(name)
            .filter(|i| self.events[*i].is_open())
            .ok_or_else(|| ReqstatError::UnmatchedEnd {
                name: name.to_string(),
            })?;

        let ev = &mut self.events[i];
        ev.close(now, peak_memory);
        Ok(ev)
    }

    pub fn get(&self, name: &str) -> Option<&LifecycleEvent> {
        self.position(name).map(|i| &self.events[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &LifecycleEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drop every event; origin is kept.
    pub fn reset(&mut self) {
        self.events.clear();
    }

    /// Move the events out, leaving the timeline empty.
    pub fn take(&mut self) -> Vec<LifecycleEvent> {
        std::mem::take(&mut self.events)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.events.iter().position(|e| e.name == name)
    }
}
