//! Heartbeat context
//!
//! # Architecture
//!
//! ```text
//!  worker thread A ─┐
//!  worker thread B ─┼──> heartbeat() ──> validate ──> ┌──────── Mutex<ContextState> ────────┐
//!  worker thread C ─┘                                 │ 1. push record, update totals       │
//!                                                     │ 2. compute global/window/instant    │
//!                                                     │ 3. sink.write_record (PerHeartbeat) │
//!                                                     │ 4. window full? → handler, roll over│
//!                                                     └─────────────────────────────────────┘
//! ```
//!
//! # Ordering
//!
//! Records enter the window in the order their callers acquire the lock, not
//! in `start_time` order. The context trusts caller timestamps and makes no
//! causal-ordering guarantee across independent producers; wrap it in an
//! [`OrderedStream`](crate::OrderedStream) when one logical stream is fed
//! from many threads.

use crate::core::builder::{states, HeartbeatContextBuilder};
use crate::core::config::{CallbackDispatch, ContextConfig, LogMode};
use crate::core::metrics::{AtomicMetrics, Metrics};
use crate::core::rate;
use crate::core::record::{Heartbeat, HeartbeatRecord, Rates};
use crate::core::window::{Totals, Window};
use crate::traits::{RecordSink, Result, WindowCompleteHandler};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Consistent view of a context's aggregates, taken under the lock
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeartbeatStats {
    pub capacity: usize,
    pub window_len: usize,
    pub count_since_reset: usize,
    pub last_tag: Option<u64>,
    pub global: Totals,
    pub window: Totals,
    pub perf: Rates,
    pub acc: Rates,
    pub pwr: Rates,
}

/// Everything mutated by `heartbeat()`; only touched with the lock held
struct ContextState {
    window: Window,
    global: Totals,
    next_id: u64,
    last: Option<HeartbeatRecord>,
    sink: Box<dyn RecordSink>,
}

impl ContextState {
    fn commit(&mut self, heartbeat: &Heartbeat) -> HeartbeatRecord {
        let mut record = HeartbeatRecord::from_heartbeat(self.next_id, heartbeat);
        self.next_id += 1;

        let slot = self.window.push(record);
        self.global.add(&record);

        let window = self.window.totals();
        let global = self.global;
        record.perf = Rates {
            global: rate::per_second(global.work, global.time),
            window: rate::per_second(window.work, window.time),
            instant: rate::instant_rate(&record, self.last.as_ref()),
        };
        record.acc = Rates {
            global: rate::per_second(global.accuracy, global.time),
            window: rate::per_second(window.accuracy, window.time),
            instant: rate::per_second(record.accuracy, record.duration()),
        };
        record.pwr = Rates {
            global: rate::power(global.energy, global.time),
            window: rate::power(window.energy, window.time),
            instant: rate::power(record.energy(), record.duration()),
        };

        *self.window.slot_mut(slot) = record;
        self.last = Some(record);
        record
    }

    fn window_rates(&self) -> (Rates, Rates, Rates) {
        let window = self.window.totals();
        let global = self.global;
        let last = self.last.unwrap_or_default();

        let perf = Rates {
            global: rate::per_second(global.work, global.time),
            window: rate::per_second(window.work, window.time),
            instant: last.perf.instant,
        };
        let acc = Rates {
            global: rate::per_second(global.accuracy, global.time),
            window: rate::per_second(window.accuracy, window.time),
            instant: last.acc.instant,
        };
        let pwr = Rates {
            global: rate::power(global.energy, global.time),
            window: rate::power(window.energy, window.time),
            instant: last.pwr.instant,
        };
        (perf, acc, pwr)
    }

    fn log_window(&mut self) -> Result<()> {
        for record in self.window.records() {
            self.sink.write_record(record)?;
        }
        self.sink.flush()
    }
}

/// Shared heartbeat recorder for one monitored unit of work
///
/// Wrap it in an `Arc` and call [`heartbeat`](Self::heartbeat) from any
/// number of threads. The context owns its window storage; the sink and the
/// completion handler are supplied at build time.
pub struct HeartbeatContext {
    state: Mutex<ContextState>,
    handler: Box<dyn WindowCompleteHandler>,
    metrics: AtomicMetrics,
    config: ContextConfig,
}

impl HeartbeatContext {
    /// Start building a context
    pub fn builder() -> HeartbeatContextBuilder<states::NoCapacity> {
        HeartbeatContextBuilder::new()
    }

    /// Context with the given capacity, no sink and no completion handler
    pub fn new(capacity: usize) -> Result<Self> {
        Self::builder().capacity(capacity).build()
    }

    pub(crate) fn from_parts(
        config: ContextConfig,
        mut sink: Box<dyn RecordSink>,
        handler: Box<dyn WindowCompleteHandler>,
    ) -> Result<Self> {
        let window = Window::new(config.capacity, config.policy)?;

        if config.write_header {
            sink.write_header()?;
            sink.flush()?;
        }

        info!(
            "Heartbeat context ready (capacity: {}, policy: {:?}, dispatch: {:?}, log: {:?})",
            config.capacity, config.policy, config.dispatch, config.log_mode
        );

        Ok(Self {
            state: Mutex::new(ContextState {
                window,
                global: Totals::default(),
                next_id: 0,
                last: None,
                sink,
            }),
            handler,
            metrics: AtomicMetrics::new(),
            config,
        })
    }

    /// Issue a heartbeat
    ///
    /// Shorthand for [`issue`](Self::issue) without accuracy or energy data.
    pub fn heartbeat(
        &self,
        tag: u64,
        work: u64,
        start_time: u64,
        end_time: u64,
    ) -> Result<HeartbeatRecord> {
        self.issue(Heartbeat::new(tag, work, start_time, end_time))
    }

    /// Record a completed unit of work
    ///
    /// Invalid samples are rejected with `InvalidRecord` before the lock is
    /// taken, leaving the window untouched. A sink write failure does not
    /// fail the call: the record is already committed, the failure is logged
    /// and counted in [`metrics`](Self::metrics).
    ///
    /// When this call fills the window the completion handler runs before
    /// `issue` returns. Under `CallbackDispatch::Locked` it runs with the
    /// lock held and must not call back into this context. A panicking
    /// handler unwinds out of `issue`, but the window has still rolled over.
    ///
    /// Returns the committed record with its computed rates.
    pub fn issue(&self, heartbeat: Heartbeat) -> Result<HeartbeatRecord> {
        if let Err(e) = heartbeat.validate() {
            self.metrics.increment_rejected();
            warn!("Rejected heartbeat (tag {}): {}", heartbeat.tag, e);
            return Err(e);
        }

        let mut state = self.state.lock();
        let record = state.commit(&heartbeat);
        self.metrics.increment_accepted();

        if self.config.log_mode == LogMode::PerHeartbeat {
            let result = state.sink.write_record(&record);
            self.note_sink_result(result);
        }

        if !state.window.is_complete() {
            return Ok(record);
        }

        self.metrics.increment_windows_completed();
        debug!(
            "Window complete at heartbeat {} (work: {}, time: {}ns)",
            record.id,
            state.window.totals().work,
            state.window.totals().time
        );

        if self.config.log_mode == LogMode::PerWindow {
            let result = state.log_window();
            self.note_sink_result(result);
        }

        match self.config.dispatch {
            CallbackDispatch::Locked => {
                let completed = state.window.roll_over();
                self.handler.on_window_complete(&completed);
            }
            CallbackDispatch::Snapshot => {
                let completed = state.window.clone();
                state.window.roll_over();
                drop(state);
                self.handler.on_window_complete(&completed);
            }
        }

        Ok(record)
    }

    fn note_sink_result(&self, result: Result<()>) {
        if let Err(e) = result {
            self.metrics.increment_sink_failures();
            warn!("Heartbeat sink write failed: {}", e);
        }
    }

    /// Emit the sink's column header
    pub fn write_header(&self) -> Result<()> {
        let mut state = self.state.lock();
        state.sink.write_header()?;
        state.sink.flush()
    }

    /// Write every live record in the current window to the sink, oldest first
    pub fn log_window(&self) -> Result<()> {
        self.state.lock().log_window()
    }

    pub fn flush_sink(&self) -> Result<()> {
        self.state.lock().sink.flush()
    }

    /// Work per second over the current window's records
    ///
    /// Divides window work by the summed durations of the window's records.
    /// Returns 0.0 before the first heartbeat.
    pub fn windowed_rate(&self) -> f64 {
        let totals = self.state.lock().window.totals();
        rate::per_second(totals.work, totals.time)
    }

    /// Instantaneous work per second of the most recent heartbeat, 0.0 if none
    pub fn current_rate(&self) -> f64 {
        self.state.lock().last.map_or(0.0, |r| r.perf.instant)
    }

    /// Work per second across every heartbeat since creation
    pub fn global_rate(&self) -> f64 {
        let totals = self.state.lock().global;
        rate::global_rate(totals.work, totals.time)
    }

    /// Accuracy per second over the current window
    pub fn window_accuracy_rate(&self) -> f64 {
        let totals = self.state.lock().window.totals();
        rate::per_second(totals.accuracy, totals.time)
    }

    /// Watts over the current window
    pub fn window_power(&self) -> f64 {
        let totals = self.state.lock().window.totals();
        rate::power(totals.energy, totals.time)
    }

    /// Watts across every heartbeat since creation
    pub fn global_power(&self) -> f64 {
        let totals = self.state.lock().global;
        rate::power(totals.energy, totals.time)
    }

    /// Watts drawn by the most recent heartbeat
    pub fn instant_power(&self) -> f64 {
        self.state.lock().last.map_or(0.0, |r| r.pwr.instant)
    }

    /// Tag of the most recent heartbeat
    pub fn last_tag(&self) -> Option<u64> {
        self.state.lock().last.map(|r| r.tag)
    }

    pub fn global_work(&self) -> u64 {
        self.state.lock().global.work
    }

    pub fn window_work(&self) -> u64 {
        self.state.lock().window.totals().work
    }

    pub fn global_time(&self) -> u64 {
        self.state.lock().global.time
    }

    pub fn window_time(&self) -> u64 {
        self.state.lock().window.totals().time
    }

    /// All aggregates and rates from a single lock acquisition
    pub fn stats(&self) -> HeartbeatStats {
        let state = self.state.lock();
        let (perf, acc, pwr) = state.window_rates();
        HeartbeatStats {
            capacity: state.window.capacity(),
            window_len: state.window.len(),
            count_since_reset: state.window.count_since_reset(),
            last_tag: state.last.map(|r| r.tag),
            global: state.global,
            window: state.window.totals(),
            perf,
            acc,
            pwr,
        }
    }

    /// Copy of the current window, safe to inspect without the lock
    pub fn snapshot(&self) -> Window {
        self.state.lock().window.clone()
    }

    /// Borrow the current window under the lock
    ///
    /// The closure runs with the lock held; the same reentrancy rule as for
    /// completion handlers applies.
    pub fn with_window<R>(&self, f: impl FnOnce(&Window) -> R) -> R {
        f(&self.state.lock().window)
    }

    pub fn metrics(&self) -> Metrics {
        self.metrics.snapshot()
    }

    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    pub fn config(&self) -> &ContextConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::WindowPolicy;
    use crate::error::HeartbeatError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const SEC: u64 = 1_000_000_000;

    #[test]
    fn test_zero_capacity_is_rejected() {
        let err = HeartbeatContext::new(0).err().unwrap();
        assert!(matches!(err, HeartbeatError::InvalidCapacity(0)));
    }

    #[test]
    fn test_rates_before_first_heartbeat() {
        let ctx = HeartbeatContext::new(4).unwrap();
        assert_eq!(ctx.windowed_rate(), 0.0);
        assert_eq!(ctx.current_rate(), 0.0);
        assert_eq!(ctx.global_rate(), 0.0);
        assert_eq!(ctx.window_power(), 0.0);
        assert_eq!(ctx.last_tag(), None);
    }

    #[test]
    fn test_two_record_window() {
        let fired = Arc::new(AtomicUsize::new(0));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let ctx = {
            let fired = Arc::clone(&fired);
            let seen = Arc::clone(&seen);
            HeartbeatContext::builder()
                .capacity(2)
                .on_window_complete(move |window: &Window| {
                    fired.fetch_add(1, Ordering::SeqCst);
                    seen.lock().extend(window.records().map(|r| r.tag));
                    assert_eq!(rate::windowed_rate(window), 2.0);
                })
                .build()
                .unwrap()
        };

        ctx.heartbeat(0, 1, 0, SEC).unwrap();
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        ctx.heartbeat(1, 3, SEC, 2 * SEC).unwrap();

        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(*seen.lock(), vec![0, 1]);
        assert_eq!(ctx.windowed_rate(), 2.0);
        assert_eq!(ctx.current_rate(), 3.0);
        assert_eq!(ctx.last_tag(), Some(1));
    }

    #[test]
    fn test_record_carries_rates() {
        let ctx = HeartbeatContext::new(5).unwrap();
        let first = ctx
            .issue(Heartbeat::new(0, 2, 0, SEC).accuracy(1).energy(0, 2_000_000))
            .unwrap();
        assert_eq!(first.id, 0);
        assert_eq!(first.perf.instant, 2.0);
        assert_eq!(first.perf.window, 2.0);
        assert_eq!(first.perf.global, 2.0);
        assert_eq!(first.acc.window, 1.0);
        assert_eq!(first.pwr.instant, 2.0);

        let second = ctx.heartbeat(1, 4, SEC, 2 * SEC).unwrap();
        assert_eq!(second.id, 1);
        assert_eq!(second.perf.instant, 4.0);
        assert_eq!(second.perf.window, 3.0);
        assert_eq!(second.pwr.window, 1.0);
    }

    #[test]
    fn test_invalid_record_leaves_state_untouched() {
        let ctx = HeartbeatContext::new(3).unwrap();
        ctx.heartbeat(0, 1, 0, SEC).unwrap();
        let before = ctx.stats();

        let err = ctx.heartbeat(1, 1, 2 * SEC, SEC).unwrap_err();
        assert!(matches!(err, HeartbeatError::InvalidRecord { .. }));
        assert!(ctx.heartbeat(2, 0, SEC, 2 * SEC).is_err());

        assert_eq!(ctx.stats(), before);
        assert_eq!(ctx.metrics().rejected, 2);
        assert_eq!(ctx.metrics().accepted, 1);
    }

    #[test]
    fn test_reset_policy_starts_empty_window() {
        let ctx = HeartbeatContext::builder()
            .capacity(2)
            .policy(WindowPolicy::Reset)
            .build()
            .unwrap();

        ctx.heartbeat(0, 1, 0, SEC).unwrap();
        ctx.heartbeat(1, 1, SEC, 2 * SEC).unwrap();
        assert_eq!(ctx.window_work(), 0);
        assert_eq!(ctx.windowed_rate(), 0.0);
        assert_eq!(ctx.global_work(), 2);
        // The latest heartbeat survives the reset
        assert_eq!(ctx.current_rate(), 1.0);

        ctx.heartbeat(2, 5, 2 * SEC, 3 * SEC).unwrap();
        assert_eq!(ctx.window_work(), 5);
        assert_eq!(ctx.windowed_rate(), 5.0);
    }

    #[test]
    fn test_wrap_policy_keeps_last_capacity_records() {
        let ctx = HeartbeatContext::new(2).unwrap();
        ctx.heartbeat(0, 1, 0, SEC).unwrap();
        ctx.heartbeat(1, 1, SEC, 2 * SEC).unwrap();
        ctx.heartbeat(2, 4, 2 * SEC, 3 * SEC).unwrap();

        assert_eq!(ctx.window_work(), 5);
        assert_eq!(ctx.window_time(), 2 * SEC);
        assert_eq!(ctx.windowed_rate(), 2.5);
        assert_eq!(ctx.global_work(), 6);
        assert_eq!(ctx.global_time(), 3 * SEC);
        assert_eq!(ctx.global_rate(), 2.0);
    }

    #[test]
    fn test_snapshot_dispatch_can_read_context() {
        let ctx = Arc::new_cyclic(|weak: &std::sync::Weak<HeartbeatContext>| {
            let weak = weak.clone();
            HeartbeatContext::builder()
                .capacity(1)
                .dispatch(CallbackDispatch::Snapshot)
                .on_window_complete(move |window: &Window| {
                    // Lock is released, so reading the context does not deadlock
                    if let Some(ctx) = weak.upgrade() {
                        assert_eq!(ctx.last_tag(), window.latest().map(|r| r.tag));
                    }
                })
                .build()
                .unwrap()
        });

        ctx.heartbeat(9, 1, 0, SEC).unwrap();
        assert_eq!(ctx.metrics().windows_completed, 1);
    }

    #[test]
    fn test_stats_are_consistent() {
        let ctx = HeartbeatContext::new(3).unwrap();
        ctx.heartbeat(5, 2, 0, SEC).unwrap();
        let stats = ctx.stats();
        assert_eq!(stats.capacity, 3);
        assert_eq!(stats.window_len, 1);
        assert_eq!(stats.count_since_reset, 1);
        assert_eq!(stats.last_tag, Some(5));
        assert_eq!(stats.window.work, 2);
        assert_eq!(stats.perf.window, 2.0);
        assert_eq!(stats.perf.instant, 2.0);
    }
}
