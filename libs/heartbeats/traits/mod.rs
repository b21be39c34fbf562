//! # Heartbeats Traits
//!
//! The seams where callers plug their own behaviour into a context:
//!
//! - **RecordSink**: Consume committed records (log line, metrics pipe)
//! - **WindowCompleteHandler**: React to a window filling up
//!
//! Both are invoked from the thread that holds the context lock, so
//! implementations must be fast and must never call back into the same
//! context.

pub mod error;
pub mod handler;
pub mod sink;

// Re-export commonly used types
pub use error::{HeartbeatError, Result};
pub use handler::{NoOpHandler, WindowCompleteHandler};
pub use sink::{NoOpSink, RecordSink};
