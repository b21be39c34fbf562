//! Record sink implementations
//!
//! - **TextSink**: Stable delimited columns, one line per record
//! - **JsonLinesSink**: One JSON object per line
//! - **TracingSink**: Structured `tracing` events
//! - **ChannelSink**: Hands records to another thread over a crossbeam channel

pub mod channel;
pub mod json;
pub mod text;
pub mod tracing_sink;

pub use channel::{ChannelSink, SinkEvent};
pub use json::JsonLinesSink;
pub use text::{TextSink, COLUMNS};
pub use tracing_sink::TracingSink;
