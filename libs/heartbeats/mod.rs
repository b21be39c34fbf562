//! # Heartbeats
//!
//! A lightweight, embeddable instrumentation core for tracking the throughput
//! of recurring work. Worker threads report completed units of work
//! ("heartbeats"), the context aggregates them over a fixed-capacity sliding
//! window and notifies an observer every time the window fills.
//!
//! ## Features
//!
//! - **Owned window storage**: The context allocates its own ring buffer, no external lifetimes
//! - **Type-state builder**: Compile-time guarantee that a capacity is configured
//! - **Short critical section**: One `parking_lot` mutex around append + arithmetic + callback
//! - **Pluggable sinks**: Text, JSON lines, tracing, or a channel that moves I/O off-thread
//! - **Lock-free metrics**: Atomic counters readable without touching the window lock

pub mod traits;
pub mod core;
pub mod sinks;

// Re-export all traits
pub use traits::*;

// Re-export core functionality
pub use self::core::{
    builder, clock, config, context, metrics, ordered, rate, record, window,
    builder::{states, HeartbeatContextBuilder},
    clock::{wall_clock_ns, MonotonicClock},
    config::{CallbackDispatch, ConfigError, ContextConfig, LogMode, WindowPolicy},
    context::{HeartbeatContext, HeartbeatStats},
    metrics::{AtomicMetrics, Metrics},
    ordered::OrderedStream,
    record::{Heartbeat, HeartbeatRecord, Rates},
    window::{Totals, Window},
};

// Re-export sinks
pub use sinks::{ChannelSink, JsonLinesSink, SinkEvent, TextSink, TracingSink, COLUMNS};

// Convenience function
pub use self::core::builder as context_builder;

/// Type alias for Result with HeartbeatError
pub type Result<T> = std::result::Result<T, traits::HeartbeatError>;
