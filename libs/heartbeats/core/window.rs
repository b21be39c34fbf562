//! Fixed-capacity window of heartbeat records
//!
//! # Layout
//!
//! ```text
//!            write_index
//!                 ↓
//! ┌──────┬──────┬──────┬──────┐
//! │ r4   │ r5   │ r2   │ r3   │   capacity = 4, live = 4
//! └──────┴──────┴──────┴──────┘
//!                 ↑
//!               oldest (next to be overwritten under WindowPolicy::Wrap)
//! ```
//!
//! The buffer is allocated once at construction and never grows. Running
//! totals are updated on every push so rates never need a scan of the
//! buffer.

use crate::core::config::WindowPolicy;
use crate::core::record::HeartbeatRecord;
use crate::error::{HeartbeatError, Result};
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// Running sums over a set of records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub work: u64,
    /// Sum of record durations (ns)
    pub time: u64,
    pub accuracy: u64,
    /// Sum of energy consumed (uJ)
    pub energy: u64,
    pub count: u64,
}

impl Totals {
    pub(crate) fn add(&mut self, record: &HeartbeatRecord) {
        self.work = self.work.saturating_add(record.work);
        self.time = self.time.saturating_add(record.duration());
        self.accuracy = self.accuracy.saturating_add(record.accuracy);
        self.energy = self.energy.saturating_add(record.energy());
        self.count += 1;
    }

    pub(crate) fn remove(&mut self, record: &HeartbeatRecord) {
        self.work = self.work.saturating_sub(record.work);
        self.time = self.time.saturating_sub(record.duration());
        self.accuracy = self.accuracy.saturating_sub(record.accuracy);
        self.energy = self.energy.saturating_sub(record.energy());
        self.count = self.count.saturating_sub(1);
    }
}

/// Ordered ring of the most recent records plus their aggregates
#[derive(Debug, Clone)]
pub struct Window {
    buffer: Vec<HeartbeatRecord>,
    write_index: usize,
    count_since_reset: usize,
    live: usize,
    totals: Totals,
    policy: WindowPolicy,
}

impl Window {
    /// Allocate a window holding `capacity` records
    ///
    /// Returns `InvalidCapacity` if `capacity` is 0.
    pub fn new(capacity: usize, policy: WindowPolicy) -> Result<Self> {
        if capacity == 0 {
            return Err(HeartbeatError::InvalidCapacity(capacity));
        }

        Ok(Self {
            buffer: vec![HeartbeatRecord::default(); capacity],
            write_index: 0,
            count_since_reset: 0,
            live: 0,
            totals: Totals::default(),
            policy,
        })
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    pub fn policy(&self) -> WindowPolicy {
        self.policy
    }

    /// Number of valid records currently held
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Slot the next record will be written to
    pub fn write_index(&self) -> usize {
        self.write_index
    }

    /// Records pushed since the window last completed
    pub fn count_since_reset(&self) -> usize {
        self.count_since_reset
    }

    /// True exactly when `capacity` records have been pushed since the last roll-over
    pub fn is_complete(&self) -> bool {
        self.count_since_reset == self.capacity()
    }

    /// Aggregates over the live records
    pub fn totals(&self) -> Totals {
        self.totals
    }

    /// Most recently pushed record, if any is live
    pub fn latest(&self) -> Option<&HeartbeatRecord> {
        self.nth_newest(0)
    }

    /// Record pushed just before the latest one
    pub fn previous(&self) -> Option<&HeartbeatRecord> {
        self.nth_newest(1)
    }

    fn nth_newest(&self, n: usize) -> Option<&HeartbeatRecord> {
        if n >= self.live {
            return None;
        }
        let capacity = self.capacity();
        let index = (self.write_index + capacity - 1 - n) % capacity;
        Some(&self.buffer[index])
    }

    /// Live records, oldest first
    pub fn records(&self) -> impl Iterator<Item = &HeartbeatRecord> + '_ {
        let capacity = self.capacity();
        let oldest = (self.write_index + capacity - self.live) % capacity;
        (0..self.live).map(move |offset| &self.buffer[(oldest + offset) % capacity])
    }

    /// Store a record at the write position and fold it into the totals
    ///
    /// When every slot is live the record in the target slot is evicted and
    /// subtracted from the totals first. Returns the slot index written.
    pub(crate) fn push(&mut self, record: HeartbeatRecord) -> usize {
        let slot = self.write_index;

        if self.live == self.capacity() {
            let evicted = self.buffer[slot];
            self.totals.remove(&evicted);
        } else {
            self.live += 1;
        }

        self.buffer[slot] = record;
        self.totals.add(&record);
        self.write_index = (slot + 1) % self.capacity();
        self.count_since_reset += 1;

        slot
    }

    /// Overwrite the rates of a record already in the window
    pub(crate) fn slot_mut(&mut self, slot: usize) -> &mut HeartbeatRecord {
        &mut self.buffer[slot]
    }

    /// Begin the next window after completion
    ///
    /// The returned guard still reads as the completed window; the roll-over
    /// happens when it drops, including during an unwind out of a completion
    /// handler. `Wrap` keeps the records and lets them age out one by one;
    /// `Reset` drops them and the totals.
    pub(crate) fn roll_over(&mut self) -> RollOver<'_> {
        RollOver { window: self }
    }

    fn clear(&mut self) {
        self.write_index = 0;
        self.live = 0;
        self.totals = Totals::default();
    }
}

/// Completed window awaiting roll-over, see [`Window::roll_over`]
pub(crate) struct RollOver<'a> {
    window: &'a mut Window,
}

impl Deref for RollOver<'_> {
    type Target = Window;

    fn deref(&self) -> &Window {
        self.window
    }
}

impl Drop for RollOver<'_> {
    fn drop(&mut self) {
        self.window.count_since_reset = 0;
        if self.window.policy == WindowPolicy::Reset {
            self.window.clear();
        }
    }
}
