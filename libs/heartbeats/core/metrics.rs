//! Lock-free counters describing a context's activity
//!
//! Updated by whichever thread is issuing a heartbeat and readable from any
//! thread without taking the window lock.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counters owned by a context
#[derive(Debug, Default)]
pub struct AtomicMetrics {
    accepted: AtomicU64,
    rejected: AtomicU64,
    windows_completed: AtomicU64,
    sink_failures: AtomicU64,
}

impl AtomicMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_accepted(&self) {
        self.accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_windows_completed(&self) {
        self.windows_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_sink_failures(&self) {
        self.sink_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn accepted(&self) -> u64 {
        self.accepted.load(Ordering::Relaxed)
    }

    pub fn rejected(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }

    pub fn windows_completed(&self) -> u64 {
        self.windows_completed.load(Ordering::Relaxed)
    }

    pub fn sink_failures(&self) -> u64 {
        self.sink_failures.load(Ordering::Relaxed)
    }

    /// Copy all counters into a plain value
    ///
    /// Each counter is read individually, so a snapshot taken while
    /// heartbeats are in flight may mix counts from adjacent calls.
    pub fn snapshot(&self) -> Metrics {
        Metrics {
            accepted: self.accepted(),
            rejected: self.rejected(),
            windows_completed: self.windows_completed(),
            sink_failures: self.sink_failures(),
        }
    }
}

/// Point-in-time copy of [`AtomicMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    pub accepted: u64,
    pub rejected: u64,
    pub windows_completed: u64,
    pub sink_failures: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_counters_start_at_zero() {
        assert_eq!(AtomicMetrics::new().snapshot(), Metrics::default());
    }

    #[test]
    fn test_concurrent_increments() {
        let metrics = Arc::new(AtomicMetrics::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let metrics = Arc::clone(&metrics);
                thread::spawn(move || {
                    for _ in 0..1000 {
                        metrics.increment_accepted();
                        metrics.increment_rejected();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.accepted, 8000);
        assert_eq!(snapshot.rejected, 8000);
        assert_eq!(snapshot.windows_completed, 0);
    }
}
