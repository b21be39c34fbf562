//! Record Sink
//!
//! The sink is the only place a context talks to the outside world. It is
//! invoked by the thread that holds the context lock, so a sink never needs
//! its own synchronisation, but a sink that blocks on I/O blocks every
//! producer. Use [`ChannelSink`](crate::ChannelSink) to move slow writes
//! onto a dedicated thread.

use crate::core::record::HeartbeatRecord;
use crate::error::Result;
use parking_lot::Mutex;
use std::sync::Arc;

/// Consumer of committed heartbeat records
pub trait RecordSink: Send + 'static {
    /// Emit column labels; called at most once per output stream by the caller
    fn write_header(&mut self) -> Result<()>;

    /// Emit one committed record together with the rates computed for it
    fn write_record(&mut self, record: &HeartbeatRecord) -> Result<()>;

    /// Push buffered output to its destination
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Share one sink between several contexts
///
/// Each context locks the sink only for the duration of a single write.
impl<S: RecordSink> RecordSink for Arc<Mutex<S>> {
    fn write_header(&mut self) -> Result<()> {
        self.lock().write_header()
    }

    fn write_record(&mut self, record: &HeartbeatRecord) -> Result<()> {
        self.lock().write_record(record)
    }

    fn flush(&mut self) -> Result<()> {
        self.lock().flush()
    }
}

/// A sink that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpSink;

impl RecordSink for NoOpSink {
    fn write_header(&mut self) -> Result<()> {
        Ok(())
    }

    fn write_record(&mut self, _record: &HeartbeatRecord) -> Result<()> {
        Ok(())
    }
}
