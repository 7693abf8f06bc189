//! Dynamic loop scheduling on a single relaxed atomic.
//!
//! The parallel regions of this crate distribute loop iterations that are
//! completely independent of each other: the threads only read the shared
//! tables and accumulate into thread-local sums. The only coordination
//! needed is "hand out each index exactly once", which one relaxed
//! `fetch_add` provides. Runtime schedulers that rebalance work queues
//! degrade past ~64 threads on exactly this workload; a bare counter does
//! not.
//!
//! Contract:
//! 1. The counter starts at a sentinel; the first caller installs the
//!    start index via compare-exchange. All losers still `fetch_add` the
//!    same baseline, so the race is benign.
//! 2. Every call returns a unique, non-decreasing index.
//! 3. No memory ordering beyond the counter itself; iterations must not
//!    rely on cross-iteration happens-before.

use crossbeam_utils::CachePadded;
use std::sync::atomic::{AtomicI64, Ordering};

const UNINITIALIZED: i64 = i64::MIN;

/// A dynamic-schedule loop counter shared by the threads of one region.
pub struct DynamicSchedule {
    next: CachePadded<AtomicI64>,
}

impl DynamicSchedule {
    /// Creates a scheduler in the uninitialized state.
    pub fn new() -> Self {
        Self {
            next: CachePadded::new(AtomicI64::new(UNINITIALIZED)),
        }
    }

    /// Claims the next iteration index for a loop starting at `start`.
    ///
    /// The first caller initializes the counter; every caller then obtains
    /// a unique index. Indices past the caller's end condition simply mean
    /// "no more work".
    #[inline]
    pub fn next(&self, start: i64) -> i64 {
        let _ = self.next.compare_exchange(
            UNINITIALIZED,
            start,
            Ordering::Relaxed,
            Ordering::Relaxed,
        );
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// Returns the scheduler to the uninitialized state for reuse in a
    /// later region. Must not race with `next`.
    pub fn reset(&self) {
        self.next.store(UNINITIALIZED, Ordering::Relaxed);
    }
}

impl Default for DynamicSchedule {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs `body` over every index in `[start, end]` and returns the sum of
/// its results.
///
/// With more than one thread, indices are claimed dynamically through a
/// [`DynamicSchedule`] and each thread owns one `init()` state (a φ cache,
/// scratch buffers) plus a local accumulator; the partial sums are reduced
/// at region exit. Integer addition makes the reduction independent of
/// thread count and interleaving.
pub fn parallel_sum<S, I, F>(threads: usize, start: i64, end: i64, init: I, body: F) -> i128
where
    I: Fn() -> S + Sync,
    F: Fn(&mut S, i64) -> i128 + Sync,
{
    if start > end {
        return 0;
    }
    let iterations = (end - start + 1) as usize;
    let threads = threads.clamp(1, iterations);

    if threads == 1 {
        let mut state = init();
        let mut sum = 0i128;
        for b in start..=end {
            sum += body(&mut state, b);
        }
        return sum;
    }

    let schedule = DynamicSchedule::new();
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..threads)
            .map(|_| {
                scope.spawn(|| {
                    let mut state = init();
                    let mut local = 0i128;
                    loop {
                        let b = schedule.next(start);
                        if b > end {
                            break;
                        }
                        local += body(&mut state, b);
                    }
                    local
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).sum()
    })
}
