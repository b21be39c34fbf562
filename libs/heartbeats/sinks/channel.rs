//! Off-thread record sink
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────┐
//! │  heartbeat()        │
//! │  (lock held)        │
//! │  write_record ──────┼──> Unbounded Channel ──> Writer Thread ──> inner sink (file, stdout)
//! └─────────────────────┘
//! ```
//!
//! Sending never blocks, so slow I/O no longer stalls producers. The cost is
//! that the writer may lag behind and that write errors surface on the
//! writer thread, where they are logged, instead of in the context's
//! metrics.

use crate::core::record::HeartbeatRecord;
use crate::traits::{HeartbeatError, RecordSink, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

/// Message carried from a context to the writer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SinkEvent {
    Header,
    Record(HeartbeatRecord),
    Flush,
}

/// Sender half of an off-thread sink; clone it to feed several contexts
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: Sender<SinkEvent>,
}

impl ChannelSink {
    /// Create a sink and the receiver its events arrive on
    pub fn new() -> (Self, Receiver<SinkEvent>) {
        let (tx, rx) = unbounded();
        (Self { tx }, rx)
    }

    /// Spawn a thread that drains events into `inner`
    ///
    /// The thread exits once every clone of the returned sink has been
    /// dropped, flushes `inner` and hands it back through the join handle.
    pub fn spawn_writer<S>(inner: S) -> (Self, JoinHandle<S>)
    where
        S: RecordSink,
    {
        let (sink, rx) = Self::new();
        let handle = thread::spawn(move || drain(rx, inner));
        (sink, handle)
    }

    fn send(&self, event: SinkEvent) -> Result<()> {
        self.tx
            .send(event)
            .map_err(|_| HeartbeatError::SinkDisconnected("sink receiver dropped".to_string()))
    }
}

fn drain<S: RecordSink>(rx: Receiver<SinkEvent>, mut inner: S) -> S {
    debug!("Sink writer thread started");

    for event in rx.iter() {
        let result = match event {
            SinkEvent::Header => inner.write_header(),
            SinkEvent::Record(record) => inner.write_record(&record),
            SinkEvent::Flush => inner.flush(),
        };
        if let Err(e) = result {
            warn!("Sink writer failed: {}", e);
        }
    }

    if let Err(e) = inner.flush() {
        warn!("Final sink flush failed: {}", e);
    }
    debug!("Sink writer thread exiting");
    inner
}

impl RecordSink for ChannelSink {
    fn write_header(&mut self) -> Result<()> {
        self.send(SinkEvent::Header)
    }

    fn write_record(&mut self, record: &HeartbeatRecord) -> Result<()> {
        self.send(SinkEvent::Record(*record))
    }

    fn flush(&mut self) -> Result<()> {
        self.send(SinkEvent::Flush)
    }
}
