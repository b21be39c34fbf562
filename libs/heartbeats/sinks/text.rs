//! Delimited text log
//!
//! The column order below is a stable contract: downstream tools parse the
//! log by position. Rates are printed with six decimal places.

use crate::core::record::HeartbeatRecord;
use crate::traits::{RecordSink, Result};
use std::io::Write;

/// Column labels, in output order
pub const COLUMNS: [&str; 17] = [
    "HB",
    "Tag",
    "Work",
    "Start_Time",
    "End_Time",
    "Global_Perf",
    "Window_Perf",
    "Instant_Perf",
    "Accuracy",
    "Global_Acc",
    "Window_Acc",
    "Instant_Acc",
    "Start_Energy",
    "End_Energy",
    "Global_Pwr",
    "Window_Pwr",
    "Instant_Pwr",
];

/// Writes one delimited line per record to any `Write`
pub struct TextSink<W> {
    writer: W,
    delimiter: char,
}

impl<W> TextSink<W>
where
    W: Write + Send + 'static,
{
    /// Tab-delimited output
    pub fn new(writer: W) -> Self {
        Self::with_delimiter(writer, '\t')
    }

    /// Comma-delimited output
    pub fn csv(writer: W) -> Self {
        Self::with_delimiter(writer, ',')
    }

    pub fn with_delimiter(writer: W, delimiter: char) -> Self {
        Self { writer, delimiter }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Render a record as one line, without the trailing newline
    pub fn format_record(&self, r: &HeartbeatRecord) -> String {
        let fields = [
            r.id.to_string(),
            r.tag.to_string(),
            r.work.to_string(),
            r.start_time.to_string(),
            r.end_time.to_string(),
            format!("{:.6}", r.perf.global),
            format!("{:.6}", r.perf.window),
            format!("{:.6}", r.perf.instant),
            r.accuracy.to_string(),
            format!("{:.6}", r.acc.global),
            format!("{:.6}", r.acc.window),
            format!("{:.6}", r.acc.instant),
            r.start_energy.to_string(),
            r.end_energy.to_string(),
            format!("{:.6}", r.pwr.global),
            format!("{:.6}", r.pwr.window),
            format!("{:.6}", r.pwr.instant),
        ];
        fields.join(&self.delimiter.to_string())
    }
}

impl<W> RecordSink for TextSink<W>
where
    W: Write + Send + 'static,
{
    fn write_header(&mut self) -> Result<()> {
        let header = COLUMNS.join(&self.delimiter.to_string());
        writeln!(self.writer, "{}", header)?;
        Ok(())
    }

    fn write_record(&mut self, record: &HeartbeatRecord) -> Result<()> {
        let line = self.format_record(record);
        writeln!(self.writer, "{}", line)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
