//! Peak-memory readings.
//!
//! Counters are process-wide atomics maintained by [`TrackingAllocator`]. A
//! binary opts in by registering it as the global allocator:
//!
//! ```rust,ignore
//! use reqstat_core::memory::TrackingAllocator;
//!
//! #[global_allocator]
//! static GLOBAL: TrackingAllocator = TrackingAllocator;
//! ```
//!
//! Without it the counters stay at zero and [`AllocatorProbe`] reports `0`.

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicU64, Ordering};

/// Bytes currently allocated through [`TrackingAllocator`].
pub static CURRENTLY_ALLOCATED_BYTES: AtomicU64 = AtomicU64::new(0);

/// Highest value `CURRENTLY_ALLOCATED_BYTES` has reached.
pub static PEAK_ALLOCATED_BYTES: AtomicU64 = AtomicU64::new(0);

/// Source of "peak memory so far" readings.
pub trait MemoryProbe: Send + Sync {
    fn peak_bytes(&self) -> u64;
}

impl<F> MemoryProbe for F
where
    F: Fn() -> u64 + Send + Sync,
{
    fn peak_bytes(&self) -> u64 {
        self()
    }
}

/// Reads the counters kept by [`TrackingAllocator`].
///
/// The peak is process-wide and never reset, so in a long-lived server it is
/// the highest allocation level since startup, not the peak of one request.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllocatorProbe;

impl MemoryProbe for AllocatorProbe {
    fn peak_bytes(&self) -> u64 {
        PEAK_ALLOCATED_BYTES.load(Ordering::Relaxed)
    }
}

pub fn currently_allocated_bytes() -> u64 {
    CURRENTLY_ALLOCATED_BYTES.load(Ordering::Relaxed)
}

/// `System` allocator wrapper that keeps current and peak byte counts.
#[derive(Debug, Default)]
pub struct TrackingAllocator;

impl TrackingAllocator {
    #[inline]
    fn on_alloc(size: usize) {
        let now = CURRENTLY_ALLOCATED_BYTES.fetch_add(size as u64, Ordering::Relaxed) + size as u64;
        PEAK_ALLOCATED_BYTES.fetch_max(now, Ordering::Relaxed);
    }

    #[inline]
    fn on_dealloc(size: usize) {
        CURRENTLY_ALLOCATED_BYTES.fetch_sub(size as u64, Ordering::Relaxed);
    }
}

// SAFETY: every call is forwarded to `System` unchanged; only counters are touched.
unsafe impl GlobalAlloc for TrackingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            Self::on_alloc(layout.size());
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc_zeroed(layout);
        if !ptr.is_null() {
            Self::on_alloc(layout.size());
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        Self::on_dealloc(layout.size());
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = System.realloc(ptr, layout, new_size);
        if !new_ptr.is_null() {
            Self::on_dealloc(layout.size());
            Self::on_alloc(new_size);
        }
        new_ptr
    }
}
