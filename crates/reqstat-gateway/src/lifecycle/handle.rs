use std::sync::{Arc, Mutex};

use reqstat_core::context::FinishContext;
use reqstat_core::{Collector, Observer};

/// Shared access to the current request's collector.
///
/// Cloned into request extensions so handlers can signal their own events.
/// A poisoned lock turns every signal into a no-op.
#[derive(Clone)]
pub struct LifecycleHandle {
    inner: Arc<Mutex<Collector>>,
}

impl LifecycleHandle {
    pub fn new(collector: Collector) -> Self {
        Self {
            inner: Arc::new(Mutex::new(collector)),
        }
    }

    pub fn start(&self, name: &str) {
        if let Ok(mut c) = self.inner.lock() {
            c.on_event_start(name);
        }
    }

    pub fn end(&self, name: &str) {
        if let Ok(mut c) = self.inner.lock() {
            c.on_event_end(name);
        }
    }

    /// Start `name` now and end it when the guard drops.
    pub fn span(&self, name: &str) -> EventGuard {
        self.start(name);
        EventGuard {
            handle: self.clone(),
            name: name.to_string(),
        }
    }

    /// Run the finish step; `None` when gated off or the lock is poisoned.
    pub fn finish(&self, ctx: &dyn FinishContext) -> Option<usize> {
        match self.inner.lock() {
            Ok(mut c) => c.finish(ctx),
            Err(_) => None,
        }
    }
}

impl std::fmt::Debug for LifecycleHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleHandle").finish_non_exhaustive()
    }
}

/// Ends its event when dropped.
pub struct EventGuard {
    handle: LifecycleHandle,
    name: String,
}

impl Drop for EventGuard {
    fn drop(&mut self) {
        self.handle.end(&self.name);
    }
}
