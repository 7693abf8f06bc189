//! Optional progress side channel.
//!
//! When enabled, one thread at a time prints a percentage line to stderr,
//! rate-limited so the hot loops never stall on I/O. Printing failures
//! are ignored; this channel must never affect the computation.

use std::io::Write;
use std::sync::Mutex;
use std::time::{Duration, Instant};

const PRINT_INTERVAL: Duration = Duration::from_millis(500);

/// Percentage printer shared by the threads of one parallel region.
pub struct Progress {
    enabled: bool,
    last: Mutex<Instant>,
}

impl Progress {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            last: Mutex::new(Instant::now()),
        }
    }

    /// Disabled progress, for the plain entry points.
    pub fn off() -> Self {
        Self::new(false)
    }

    #[inline]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Reports `numerator / denominator` progress. Only one thread prints;
    /// the others skip past the try_lock.
    pub fn report(&self, numerator: i64, denominator: i64) {
        if !self.enabled || denominator <= 0 {
            return;
        }
        if let Ok(mut last) = self.last.try_lock() {
            if last.elapsed() >= PRINT_INTERVAL {
                *last = Instant::now();
                let percent = 100.0 * numerator.clamp(0, denominator) as f64 / denominator as f64;
                let mut err = std::io::stderr();
                let _ = write!(err, "\rStatus: {percent:.0}%");
                let _ = err.flush();
            }
        }
    }
}

/// Prints a section header for the *_print entry points.
pub(crate) fn header(name: &str) {
    eprintln!();
    eprintln!("=== {name} ===");
}

/// Prints a labeled result with elapsed time.
pub(crate) fn result(label: &str, value: i128, start: Instant) {
    eprintln!("{label} = {value}, time: {:.3}s", start.elapsed().as_secs_f64());
}
