//! Common test utilities for heartbeats integration tests

#![allow(dead_code)]

use heartbeats::{HeartbeatRecord, RecordSink, TextSink, Window};
use parking_lot::Mutex;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Nanoseconds per second
pub const SEC: u64 = 1_000_000_000;

/// Macro for verbose test output (controlled by TEST_VERBOSE env var)
#[macro_export]
macro_rules! verbose_println {
    ($($arg:tt)*) => {
        if std::env::var("TEST_VERBOSE").is_ok() {
            println!($($arg)*);
        }
    };
}

/// Text sink the test keeps a handle to after giving it to a context
pub type SharedText = Arc<Mutex<TextSink<Vec<u8>>>>;

pub fn shared_text_sink() -> SharedText {
    Arc::new(Mutex::new(TextSink::new(Vec::new())))
}

pub fn output(sink: &SharedText) -> String {
    String::from_utf8(sink.lock().get_ref().clone()).unwrap()
}

/// Records every completed window the context reports
#[derive(Default)]
pub struct CompletionLog {
    count: AtomicUsize,
    windows: Mutex<Vec<Vec<HeartbeatRecord>>>,
}

impl CompletionLog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    pub fn windows(&self) -> Vec<Vec<HeartbeatRecord>> {
        self.windows.lock().clone()
    }

    /// Handler closure that appends to this log
    pub fn handler(self: &Arc<Self>) -> impl Fn(&Window) + Send + Sync + 'static {
        let log = Arc::clone(self);
        move |window: &Window| {
            log.windows.lock().push(window.records().copied().collect());
            log.count.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Sink whose every write fails
pub struct FailingSink;

impl RecordSink for FailingSink {
    fn write_header(&mut self) -> heartbeats::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "header refused").into())
    }

    fn write_record(&mut self, _record: &HeartbeatRecord) -> heartbeats::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "record refused").into())
    }
}
