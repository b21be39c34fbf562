//! Heartbeat Monitor - Main Library
//!
//! This crate ties the heartbeats instrumentation core to runnable
//! binaries.
//!
//! ## Architecture
//!
//! - **bin_common**: Common utilities for binary executables (CLI, runners)
//! - **heartbeats**: Heartbeat recording core (re-exported from workspace)
//!
//! ## Usage in Binaries
//!
//! ```rust
//! use heartbeat_monitor::bin_common::{load_config_from_env, ConfigType};
//! use heartbeat_monitor::heartbeats::HeartbeatContext;
//! ```

// Re-export workspace libraries for convenience
pub use heartbeats;

// Binary common utilities
pub mod bin_common {
    //! Common utilities for binary executables
    //!
    //! Provides shared functionality for the binaries: locating and loading
    //! configuration, and a uniform run/banner lifecycle.

    pub mod cli;
    pub mod runner;

    pub use cli::{load_config_from_env, load_context_config, parse_args, ConfigType};
    pub use runner::{BinaryRunner, RunConfig};
}
