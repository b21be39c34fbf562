//! # Heartbeats Core
//!
//! The recording data structure and its concurrency-safe update protocol.
//!
//! ## Example
//!
//! ```rust,ignore
//! use heartbeats::{HeartbeatContext, TextSink, Window};
//! use std::sync::Arc;
//!
//! let ctx = Arc::new(
//!     HeartbeatContext::builder()
//!         .capacity(20)
//!         .sink(TextSink::new(std::io::stdout()))
//!         .write_header(true)
//!         .on_window_complete(|window: &Window| {
//!             println!("window done: {} records", window.len());
//!         })
//!         .build()?,
//! );
//!
//! // From any worker thread
//! ctx.heartbeat(tag, 1, start_ns, end_ns)?;
//! println!("rate: {:.2}/s", ctx.windowed_rate());
//! ```

pub mod builder;
pub mod clock;
pub mod config;
pub mod context;
pub mod metrics;
pub mod ordered;
pub mod rate;
pub mod record;
pub mod window;

// Re-export main types
pub use builder::{states, HeartbeatContextBuilder};
pub use clock::{wall_clock_ns, MonotonicClock};
pub use config::{CallbackDispatch, ConfigError, ContextConfig, LogMode, WindowPolicy};
pub use context::{HeartbeatContext, HeartbeatStats};
pub use metrics::{AtomicMetrics, Metrics};
pub use ordered::OrderedStream;
pub use record::{Heartbeat, HeartbeatRecord, Rates};
pub use window::{Totals, Window};

// Re-export traits for convenience
pub use crate::traits::*;

/// Create a new heartbeat context builder
///
/// This is a convenience function for starting the builder pattern.
///
/// # Example
/// ```ignore
/// let ctx = heartbeats::core::builder()
///     .capacity(10)
///     .policy(WindowPolicy::Reset)
///     .build()?;
/// ```
pub fn builder() -> HeartbeatContextBuilder<builder::states::NoCapacity> {
    HeartbeatContextBuilder::new()
}
