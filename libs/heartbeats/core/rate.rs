//! Rate calculations
//!
//! Pure functions over counts and window snapshots. Nothing here locks or
//! mutates; give them an immutable [`Window`] (borrowed under the context
//! lock, or a clone) and call them from any thread.
//!
//! Every function returns `0.0` when its time denominator is zero, including
//! an empty window.

use crate::core::record::HeartbeatRecord;
use crate::core::window::Window;

pub const NANOS_PER_SEC: f64 = 1_000_000_000.0;

/// Microjoules per nanosecond to watts
const UJ_PER_NS_TO_WATTS: f64 = 1_000.0;

/// `amount` per second over `elapsed_ns`
pub fn per_second(amount: u64, elapsed_ns: u64) -> f64 {
    if elapsed_ns == 0 {
        return 0.0;
    }
    amount as f64 * NANOS_PER_SEC / elapsed_ns as f64
}

/// Watts from microjoules consumed over `elapsed_ns`
pub fn power(energy_uj: u64, elapsed_ns: u64) -> f64 {
    if elapsed_ns == 0 {
        return 0.0;
    }
    energy_uj as f64 * UJ_PER_NS_TO_WATTS / elapsed_ns as f64
}

/// Cumulative work per second since the origin, independent of window eviction
pub fn global_rate(total_work_since_start: u64, total_elapsed_since_start: u64) -> f64 {
    per_second(total_work_since_start, total_elapsed_since_start)
}

/// Wall-clock span covered by the window: `max(end_time) - min(start_time)`
pub fn window_span(window: &Window) -> u64 {
    let mut records = window.records();
    let Some(first) = records.next() else {
        return 0;
    };

    let (min_start, max_end) = records.fold((first.start_time, first.end_time), |(lo, hi), r| {
        (lo.min(r.start_time), hi.max(r.end_time))
    });
    max_end.saturating_sub(min_start)
}

/// Total work in the window divided by the span it covers
///
/// Unlike the context's running window rate, which divides by the sum of
/// record durations, overlapping records from concurrent workers are not
/// double counted here.
pub fn windowed_rate(window: &Window) -> f64 {
    let work = window.records().fold(0u64, |acc, r| acc.saturating_add(r.work));
    per_second(work, window_span(window))
}

/// Rate of the latest heartbeat alone
///
/// Uses the latest record's own interval. A zero-length latest record falls
/// back to the span from the previous record's start to the latest end.
pub fn instant_rate(latest: &HeartbeatRecord, previous: Option<&HeartbeatRecord>) -> f64 {
    let elapsed = match latest.duration() {
        0 => previous.map_or(0, |prev| latest.end_time.saturating_sub(prev.start_time)),
        duration => duration,
    };
    per_second(latest.work, elapsed)
}
