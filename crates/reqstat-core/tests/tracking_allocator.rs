#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use reqstat_core::memory::{
    currently_allocated_bytes, AllocatorProbe, MemoryProbe, TrackingAllocator,
};

#[global_allocator]
static GLOBAL: TrackingAllocator = TrackingAllocator;

const BIG: usize = 4 * 1024 * 1024 + 1;

#[test]
fn counters_follow_alloc_grow_and_drop() {
    let mut buf: Vec<u8> = Vec::with_capacity(1024);
    buf.push(1);
    buf.reserve(BIG);
    let capacity = buf.capacity() as u64;
    assert!(capacity >= BIG as u64);

    let live = currently_allocated_bytes();
    assert!(live >= capacity, "live {live} < capacity {capacity}");
    assert!(AllocatorProbe.peak_bytes() >= capacity);

    drop(buf);
    let after = currently_allocated_bytes();
    assert!(after < live, "after {after} not below {live}");
    assert!(live - after >= capacity / 2);

    // The peak never goes back down.
    assert!(AllocatorProbe.peak_bytes() >= capacity);
}
