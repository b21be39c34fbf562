pub mod states;

use crate::core::config::{CallbackDispatch, ContextConfig, LogMode, WindowPolicy};
use crate::core::context::HeartbeatContext;
use crate::traits::*;
use states::*;

/// Type-state builder for HeartbeatContext
///
/// This builder uses Rust's type system to enforce that a window capacity
/// is set before the context can be built. Capacity 0 still compiles and is
/// rejected by `build()` with `InvalidCapacity`.
pub struct HeartbeatContextBuilder<C>
where
    C: CapacityState,
{
    _state: TypeState<C>,
    config: ContextConfig,
    sink: Option<Box<dyn RecordSink>>,
    handler: Option<Box<dyn WindowCompleteHandler>>,
}

impl HeartbeatContextBuilder<NoCapacity> {
    /// Create a new builder instance
    pub fn new() -> Self {
        Self {
            _state: TypeState::new(),
            config: ContextConfig::default(),
            sink: None,
            handler: None,
        }
    }

    /// Number of records per window
    pub fn capacity(self, capacity: usize) -> HeartbeatContextBuilder<HasCapacity> {
        let mut config = self.config;
        config.capacity = capacity;
        HeartbeatContextBuilder {
            _state: TypeState::new(),
            config,
            sink: self.sink,
            handler: self.handler,
        }
    }

    /// Take every setting, capacity included, from a loaded config
    pub fn config(self, config: ContextConfig) -> HeartbeatContextBuilder<HasCapacity> {
        HeartbeatContextBuilder {
            _state: TypeState::new(),
            config,
            sink: self.sink,
            handler: self.handler,
        }
    }
}

impl Default for HeartbeatContextBuilder<NoCapacity> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> HeartbeatContextBuilder<C>
where
    C: CapacityState,
{
    /// Destination for committed records (default: discard)
    pub fn sink<S>(mut self, sink: S) -> Self
    where
        S: RecordSink,
    {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Observer called every time the window fills (default: none)
    pub fn on_window_complete<H>(mut self, handler: H) -> Self
    where
        H: WindowCompleteHandler,
    {
        self.handler = Some(Box::new(handler));
        self
    }

    pub fn policy(mut self, policy: WindowPolicy) -> Self {
        self.config.policy = policy;
        self
    }

    pub fn dispatch(mut self, dispatch: CallbackDispatch) -> Self {
        self.config.dispatch = dispatch;
        self
    }

    pub fn log_mode(mut self, log_mode: LogMode) -> Self {
        self.config.log_mode = log_mode;
        self
    }

    /// Write the sink's column header during `build()`
    pub fn write_header(mut self, write_header: bool) -> Self {
        self.config.write_header = write_header;
        self
    }
}

impl HeartbeatContextBuilder<HasCapacity> {
    /// Allocate the window and produce the context
    ///
    /// # Errors
    /// * `InvalidCapacity` - capacity is 0
    /// * `Sink` - the header could not be written
    pub fn build(self) -> Result<HeartbeatContext> {
        let sink = self.sink.unwrap_or_else(|| Box::new(NoOpSink));
        let handler = self.handler.unwrap_or_else(|| Box::new(NoOpHandler));
        HeartbeatContext::from_parts(self.config, sink, handler)
    }
}
