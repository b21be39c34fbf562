//! Nanosecond timestamps for heartbeat intervals
//!
//! The context never reads a clock itself; callers stamp their own
//! intervals. These helpers cover the two common choices.

use chrono::Utc;
use std::time::Instant;

/// Monotonic nanoseconds since the clock was created
///
/// Immune to wall-clock adjustments, so intervals taken from one clock are
/// never negative. Share one clock (it is `Copy`) between all workers that
/// feed the same context.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    epoch: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }

    pub fn now_ns(&self) -> u64 {
        self.epoch.elapsed().as_nanos() as u64
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Realtime nanoseconds since the Unix epoch, 0 if the clock is out of range
pub fn wall_clock_ns() -> u64 {
    Utc::now()
        .timestamp_nanos_opt()
        .map_or(0, |ns| ns.max(0) as u64)
}
