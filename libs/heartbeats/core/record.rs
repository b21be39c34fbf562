//! Heartbeat samples and committed records
//!
//! A [`Heartbeat`] is what a worker reports. A [`HeartbeatRecord`] is what the
//! context stores: the same sample stamped with an id and the rates computed
//! at the moment it was committed. Records are plain `Copy` values and are
//! never mutated once they sit in a window slot.

use crate::error::{HeartbeatError, Result};
use serde::{Deserialize, Serialize};

/// Global, window and instantaneous value of one rate
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rates {
    /// Cumulative since the context was created
    pub global: f64,
    /// Over the records currently in the window
    pub window: f64,
    /// From the most recent heartbeat alone
    pub instant: f64,
}

/// One reported unit of completed work
///
/// Timestamps are nanoseconds, energy readings are microjoules. Both come
/// from the caller; the context trusts them and only checks that each
/// interval is well-formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Heartbeat {
    pub tag: u64,
    pub work: u64,
    pub start_time: u64,
    pub end_time: u64,
    pub accuracy: u64,
    pub start_energy: u64,
    pub end_energy: u64,
}

impl Heartbeat {
    /// Create a heartbeat with no accuracy or energy data
    pub fn new(tag: u64, work: u64, start_time: u64, end_time: u64) -> Self {
        Self {
            tag,
            work,
            start_time,
            end_time,
            accuracy: 0,
            start_energy: 0,
            end_energy: 0,
        }
    }

    /// Attach an accuracy measure for the work done
    pub fn accuracy(mut self, accuracy: u64) -> Self {
        self.accuracy = accuracy;
        self
    }

    /// Attach energy counter readings taken at start and end (microjoules)
    pub fn energy(mut self, start_energy: u64, end_energy: u64) -> Self {
        self.start_energy = start_energy;
        self.end_energy = end_energy;
        self
    }

    /// Check the sample before it is allowed near the window
    pub fn validate(&self) -> Result<()> {
        if self.work == 0 {
            return Err(HeartbeatError::invalid_record("work must be at least 1"));
        }
        if self.end_time < self.start_time {
            return Err(HeartbeatError::invalid_record(format!(
                "end_time {} precedes start_time {}",
                self.end_time, self.start_time
            )));
        }
        if self.end_energy < self.start_energy {
            return Err(HeartbeatError::invalid_record(format!(
                "end_energy {} is below start_energy {}",
                self.end_energy, self.start_energy
            )));
        }
        Ok(())
    }

    /// Interval length, 0 for a reversed interval
    pub fn duration(&self) -> u64 {
        self.end_time.saturating_sub(self.start_time)
    }

    /// Energy consumed, 0 if the readings go backwards
    pub fn energy_used(&self) -> u64 {
        self.end_energy.saturating_sub(self.start_energy)
    }
}

/// A heartbeat as stored in a window slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HeartbeatRecord {
    /// Position in the context's commit order, starting at 0
    pub id: u64,
    pub tag: u64,
    pub work: u64,
    pub start_time: u64,
    pub end_time: u64,
    /// Work per second
    pub perf: Rates,
    pub accuracy: u64,
    /// Accuracy per second
    pub acc: Rates,
    pub start_energy: u64,
    pub end_energy: u64,
    /// Watts
    pub pwr: Rates,
}

impl HeartbeatRecord {
    /// Stamp a validated sample with its commit id; rates are filled in by the context
    pub(crate) fn from_heartbeat(id: u64, heartbeat: &Heartbeat) -> Self {
        Self {
            id,
            tag: heartbeat.tag,
            work: heartbeat.work,
            start_time: heartbeat.start_time,
            end_time: heartbeat.end_time,
            perf: Rates::default(),
            accuracy: heartbeat.accuracy,
            acc: Rates::default(),
            start_energy: heartbeat.start_energy,
            end_energy: heartbeat.end_energy,
            pwr: Rates::default(),
        }
    }

    pub fn duration(&self) -> u64 {
        self.end_time.saturating_sub(self.start_time)
    }

    pub fn energy(&self) -> u64 {
        self.end_energy.saturating_sub(self.start_energy)
    }
}
