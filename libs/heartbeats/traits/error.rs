use thiserror::Error;

/// Main error type for heartbeats
#[derive(Error, Debug)]
pub enum HeartbeatError {
    /// Window capacity must be at least one record
    #[error("Invalid capacity: {0} (window must hold at least one record)")]
    InvalidCapacity(usize),

    /// Heartbeat rejected before touching window state
    #[error("Invalid record: {reason}")]
    InvalidRecord { reason: String },

    /// I/O failure while writing to the record sink
    #[error("Sink failure: {0}")]
    Sink(#[from] std::io::Error),

    /// Sink could not hand the record off (e.g. receiver dropped)
    #[error("Sink disconnected: {0}")]
    SinkDisconnected(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl HeartbeatError {
    pub(crate) fn invalid_record(reason: impl Into<String>) -> Self {
        HeartbeatError::InvalidRecord {
            reason: reason.into(),
        }
    }

    /// Whether this error came from the output side rather than the caller's input
    pub fn is_sink_error(&self) -> bool {
        matches!(
            self,
            HeartbeatError::Sink(_) | HeartbeatError::SinkDisconnected(_)
        )
    }
}

/// Result type for heartbeats operations
pub type Result<T> = std::result::Result<T, HeartbeatError>;
