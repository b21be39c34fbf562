//! Ordered heartbeat stream
//!
//! A context accepts records in lock-acquisition order and trusts whatever
//! timestamps it is given. When several threads report on one logical
//! stream, their intervals can arrive out of order or overlap. An
//! [`OrderedStream`] serialises them: each interval is clamped so it starts
//! no earlier than the previous one ended.
//!
//! ```text
//!  last_end ──────────┐
//!                     ▼
//!  reported:    [start ........ end]
//!  issued:            [start' . end']   start' = max(start, last_end)
//!                                       end'   = max(end, start')
//! ```

use crate::core::context::HeartbeatContext;
use crate::core::record::{Heartbeat, HeartbeatRecord};
use crate::error::Result;
use parking_lot::Mutex;
use std::sync::Arc;

/// Wrapper that enforces non-overlapping, chronological intervals
pub struct OrderedStream {
    context: Arc<HeartbeatContext>,
    last_end: Mutex<u64>,
}

impl OrderedStream {
    pub fn new(context: Arc<HeartbeatContext>) -> Self {
        Self {
            context,
            last_end: Mutex::new(0),
        }
    }

    pub fn context(&self) -> &Arc<HeartbeatContext> {
        &self.context
    }

    /// End time of the last interval issued through this stream
    pub fn last_end_time(&self) -> u64 {
        *self.last_end.lock()
    }

    pub fn heartbeat(
        &self,
        tag: u64,
        work: u64,
        start_time: u64,
        end_time: u64,
    ) -> Result<HeartbeatRecord> {
        self.issue(Heartbeat::new(tag, work, start_time, end_time))
    }

    /// Clamp the interval against the previous one and issue it
    ///
    /// Only valid samples are clamped. An invalid one (zero work, end before
    /// start) goes to the context untouched, which rejects and counts it.
    ///
    /// The stream lock is held across the context call, so clamping and
    /// insertion happen in the same order. `last_end` only advances when the
    /// context accepts the heartbeat.
    pub fn issue(&self, heartbeat: Heartbeat) -> Result<HeartbeatRecord> {
        if heartbeat.validate().is_err() {
            return self.context.issue(heartbeat);
        }

        let mut last_end = self.last_end.lock();

        let start_time = heartbeat.start_time.max(*last_end);
        let end_time = heartbeat.end_time.max(start_time);
        let record = self.context.issue(Heartbeat {
            start_time,
            end_time,
            ..heartbeat
        })?;

        *last_end = end_time;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HeartbeatError;

    fn stream(capacity: usize) -> OrderedStream {
        OrderedStream::new(Arc::new(HeartbeatContext::new(capacity).unwrap()))
    }

    #[test]
    fn test_in_order_intervals_pass_through() {
        let stream = stream(4);
        let record = stream.heartbeat(0, 1, 10, 20).unwrap();
        assert_eq!((record.start_time, record.end_time), (10, 20));
        assert_eq!(stream.last_end_time(), 20);
    }

    #[test]
    fn test_overlapping_start_is_clamped() {
        let stream = stream(4);
        stream.heartbeat(0, 1, 0, 100).unwrap();
        let record = stream.heartbeat(1, 1, 50, 150).unwrap();
        assert_eq!((record.start_time, record.end_time), (100, 150));
    }

    #[test]
    fn test_stale_interval_collapses_to_last_end() {
        let stream = stream(4);
        stream.heartbeat(0, 1, 0, 100).unwrap();
        let record = stream.heartbeat(1, 1, 20, 60).unwrap();
        assert_eq!((record.start_time, record.end_time), (100, 100));
        assert_eq!(stream.last_end_time(), 100);
    }

    #[test]
    fn test_rejected_heartbeat_does_not_advance() {
        let stream = stream(4);
        stream.heartbeat(0, 1, 0, 100).unwrap();
        assert!(stream.heartbeat(1, 0, 100, 500).is_err());
        assert_eq!(stream.last_end_time(), 100);
    }

    #[test]
    fn test_reversed_interval_is_rejected_not_clamped() {
        let stream = stream(4);
        let err = stream.heartbeat(0, 1, 500, 100).unwrap_err();
        assert!(matches!(err, HeartbeatError::InvalidRecord { .. }));
        assert_eq!(stream.last_end_time(), 0);

        stream.heartbeat(1, 1, 0, 200).unwrap();
        let err = stream.heartbeat(2, 1, 150, 50).unwrap_err();
        assert!(matches!(err, HeartbeatError::InvalidRecord { .. }));
        assert_eq!(stream.last_end_time(), 200);

        let metrics = stream.context().metrics();
        assert_eq!(metrics.accepted, 1);
        assert_eq!(metrics.rejected, 2);
    }
}
