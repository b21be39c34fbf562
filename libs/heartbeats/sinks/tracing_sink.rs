use crate::core::record::HeartbeatRecord;
use crate::traits::{RecordSink, Result};
use tracing::{debug, info};

/// Emits each record as a structured `tracing` event
///
/// Events use the `heartbeats::record` target so they can be filtered
/// separately, e.g. `RUST_LOG=heartbeats::record=info`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl TracingSink {
    pub fn new() -> Self {
        Self
    }
}

impl RecordSink for TracingSink {
    fn write_header(&mut self) -> Result<()> {
        debug!(target: "heartbeats::record", "Heartbeat records follow");
        Ok(())
    }

    fn write_record(&mut self, record: &HeartbeatRecord) -> Result<()> {
        info!(
            target: "heartbeats::record",
            id = record.id,
            tag = record.tag,
            work = record.work,
            start_time = record.start_time,
            end_time = record.end_time,
            global_perf = record.perf.global,
            window_perf = record.perf.window,
            instant_perf = record.perf.instant,
            window_pwr = record.pwr.window,
            "heartbeat"
        );
        Ok(())
    }
}
