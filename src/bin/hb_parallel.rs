//! Parallel heartbeat demo
//!
//! Spawns a pool of worker threads that each simulate a unit of work, then
//! report it through one shared ordered stream. Every record is written to
//! stdout as a tab-separated line; window completions are logged.
//!
//! Usage: hb-parallel [threads] [iterations] [work_ms] [config.yaml]
//!
//! Without a config argument the context is configured from
//! `HEARTBEAT_CONFIG_PATH` (default `config/heartbeat.yaml`), falling back
//! to built-in defaults when the file is absent.

use anyhow::Context;
use dotenv::dotenv;
use heartbeat_monitor::bin_common::{
    load_config_from_env, load_context_config, parse_args, BinaryRunner, ConfigType, RunConfig,
};
use heartbeat_monitor::heartbeats::{
    rate, HeartbeatContext, MonotonicClock, OrderedStream, TextSink, Window,
};
use std::io;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{error, info};

struct ParallelDemo {
    config: RunConfig,
    stream: Arc<OrderedStream>,
    clock: MonotonicClock,
}

impl ParallelDemo {
    fn context(&self) -> &HeartbeatContext {
        self.stream.context()
    }
}

impl BinaryRunner for ParallelDemo {
    fn run(&mut self) -> anyhow::Result<()> {
        let handles: Vec<_> = (0..self.config.threads)
            .map(|worker| {
                let stream = Arc::clone(&self.stream);
                let clock = self.clock;
                let iterations = self.config.iterations;
                let work_interval = self.config.work_interval;

                thread::Builder::new()
                    .name(format!("hb-worker-{}", worker))
                    .spawn(move || -> heartbeat_monitor::heartbeats::Result<()> {
                        for i in 0..iterations {
                            let start = clock.now_ns();
                            thread::sleep(work_interval);
                            let end = clock.now_ns();
                            stream.heartbeat((worker * iterations + i) as u64, 1, start, end)?;
                        }
                        Ok(())
                    })
            })
            .collect::<io::Result<_>>()
            .context("spawning worker threads")?;

        let mut failures = 0;
        for handle in handles {
            match handle.join() {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    error!("Worker failed: {}", e);
                    failures += 1;
                }
                Err(_) => {
                    error!("Worker panicked");
                    failures += 1;
                }
            }
        }

        self.context().flush_sink()?;
        if failures > 0 {
            anyhow::bail!("{} worker(s) did not finish", failures);
        }
        Ok(())
    }

    fn config(&self) -> &RunConfig {
        &self.config
    }

    fn summary(&self) -> Option<String> {
        let stats = self.context().stats();
        let metrics = self.context().metrics();
        Some(format!(
            "{} heartbeats, {} windows, global rate {:.3}/s, window rate {:.3}/s",
            metrics.accepted,
            metrics.windows_completed,
            stats.perf.global,
            stats.perf.window
        ))
    }
}

fn parse_run_config(args: &[String]) -> anyhow::Result<RunConfig> {
    let mut config = RunConfig::new("hb-parallel");
    if let Some(threads) = args.first() {
        config = config.with_threads(threads.parse().context("threads must be a number")?);
    }
    if let Some(iterations) = args.get(1) {
        config = config.with_iterations(iterations.parse().context("iterations must be a number")?);
    }
    if let Some(work_ms) = args.get(2) {
        let work_ms: u64 = work_ms.parse().context("work_ms must be a number")?;
        config = config.with_work_interval(Duration::from_millis(work_ms));
    }
    Ok(config)
}

fn log_completed_window(window: &Window) {
    let totals = window.totals();
    info!(
        "Window complete: {} records, {} work over {} ns, {:.3}/s",
        window.len(),
        totals.work,
        rate::window_span(window),
        rate::windowed_rate(window)
    );
}

fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Records go to stdout, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = parse_args();
    let run_config = parse_run_config(&args)?;
    let config_type = match args.get(3) {
        Some(path) => ConfigType::Custom(path.clone()),
        None => ConfigType::Context,
    };
    let config_path = load_config_from_env(config_type);
    let context_config = load_context_config(&config_path)?;

    let context = HeartbeatContext::builder()
        .config(context_config)
        .sink(TextSink::new(io::stdout()))
        .on_window_complete(|window: &Window| log_completed_window(window))
        .build()?;

    let mut demo = ParallelDemo {
        config: run_config,
        stream: Arc::new(OrderedStream::new(Arc::new(context))),
        clock: MonotonicClock::new(),
    };

    demo.execute()
}
