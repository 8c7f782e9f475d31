//! Sink contract: where formatted metric lines go.

use std::sync::Mutex;

use crate::error::{ReqstatError, Result};

/// Best-effort, connectionless delivery of `name:value` lines.
///
/// Implementations must return quickly; a slow backend is the sink's problem
/// to bound, never the request's.
pub trait Sink: Send + Sync {
    fn emit(&self, lines: &[String]) -> Result<()>;
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl Sink for NullSink {
    fn emit(&self, _lines: &[String]) -> Result<()> {
        Ok(())
    }
}

/// Records every batch in memory. Can be told to fail after recording.
#[derive(Debug, Default)]
pub struct MemorySink {
    batches: Mutex<Vec<Vec<String>>>,
    fail: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that records the batch, then reports a transport failure.
    pub fn failing() -> Self {
        Self {
            batches: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn batches(&self) -> Vec<Vec<String>> {
        match self.batches.lock() {
            Ok(g) => g.clone(),
            Err(_) => Vec::new(),
        }
    }

    pub fn calls(&self) -> usize {
        match self.batches.lock() {
            Ok(g) => g.len(),
            Err(_) => 0,
        }
    }
}

impl Sink for MemorySink {
    fn emit(&self, lines: &[String]) -> Result<()> {
        if let Ok(mut g) = self.batches.lock() {
            g.push(lines.to_vec());
        }
        if self.fail {
            return Err(ReqstatError::Transport(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "memory sink configured to fail",
            )));
        }
        Ok(())
    }
}
