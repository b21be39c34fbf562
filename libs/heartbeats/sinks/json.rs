use crate::core::record::HeartbeatRecord;
use crate::traits::{RecordSink, Result};
use std::io::{self, Write};

/// Writes each record as a single-line JSON object
///
/// Self-describing, so no header line is written.
pub struct JsonLinesSink<W> {
    writer: W,
}

impl<W> JsonLinesSink<W>
where
    W: Write + Send + 'static,
{
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W> RecordSink for JsonLinesSink<W>
where
    W: Write + Send + 'static,
{
    fn write_header(&mut self) -> Result<()> {
        Ok(())
    }

    fn write_record(&mut self, record: &HeartbeatRecord) -> Result<()> {
        serde_json::to_writer(&mut self.writer, record).map_err(io::Error::from)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
