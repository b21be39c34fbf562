//! Binary runner utilities
//!
//! Provides a standardized way to run binaries with proper
//! logging and shutdown banners.

use std::time::Duration;
use tracing::info;

/// Configuration for running a binary application
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Name of the binary (for logging)
    pub name: String,
    /// Number of worker threads
    pub threads: usize,
    /// Heartbeats issued by each worker
    pub iterations: usize,
    /// Simulated duration of one unit of work
    pub work_interval: Duration,
}

impl RunConfig {
    /// Create a new run configuration
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            threads: 10,
            iterations: 10,
            work_interval: Duration::from_millis(100),
        }
    }

    /// Set worker thread count
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Set heartbeats per worker
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set simulated work duration
    pub fn with_work_interval(mut self, work_interval: Duration) -> Self {
        self.work_interval = work_interval;
        self
    }

    /// Total heartbeats the run will issue
    pub fn total_heartbeats(&self) -> usize {
        self.threads * self.iterations
    }
}

/// Trait for binary applications
///
/// Implement this trait to get a uniform banner/run/shutdown lifecycle.
pub trait BinaryRunner {
    /// Run the application
    fn run(&mut self) -> anyhow::Result<()>;

    /// Get the run configuration
    fn config(&self) -> &RunConfig;

    /// Summary printed in the shutdown banner
    fn summary(&self) -> Option<String> {
        None
    }

    /// Print startup banner
    fn print_banner(&self) {
        let config = self.config();
        info!("");
        info!("========================================");
        info!("Starting {}", config.name);
        info!(
            "{} workers x {} heartbeats, {:?} per unit of work",
            config.threads, config.iterations, config.work_interval
        );
        info!("========================================");
        info!("");
    }

    /// Print shutdown banner
    fn print_shutdown(&self, stats: Option<&str>) {
        let config = self.config();
        info!("");
        info!("========================================");
        info!("{} finished", config.name);
        if let Some(stats) = stats {
            info!("{}", stats);
        }
        info!("========================================");
    }

    /// Execute the binary with proper initialization and cleanup
    fn execute(&mut self) -> anyhow::Result<()> {
        self.print_banner();
        let result = self.run();
        let summary = self.summary();
        self.print_shutdown(summary.as_deref());
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_config_builder() {
        let config = RunConfig::new("test-binary")
            .with_threads(4)
            .with_iterations(25)
            .with_work_interval(Duration::from_millis(5));

        assert_eq!(config.name, "test-binary");
        assert_eq!(config.threads, 4);
        assert_eq!(config.iterations, 25);
        assert_eq!(config.work_interval, Duration::from_millis(5));
        assert_eq!(config.total_heartbeats(), 100);
    }

    #[test]
    fn test_default_config() {
        let config = RunConfig::new("default");
        assert_eq!(config.threads, 10);
        assert_eq!(config.iterations, 10);
        assert_eq!(config.work_interval, Duration::from_millis(100));
    }

    struct Counting {
        config: RunConfig,
        runs: usize,
    }

    impl BinaryRunner for Counting {
        fn run(&mut self) -> anyhow::Result<()> {
            self.runs += 1;
            Ok(())
        }

        fn config(&self) -> &RunConfig {
            &self.config
        }
    }

    #[test]
    fn test_execute_runs_once() {
        let mut runner = Counting {
            config: RunConfig::new("counting"),
            runs: 0,
        };
        runner.execute().unwrap();
        assert_eq!(runner.runs, 1);
    }
}
