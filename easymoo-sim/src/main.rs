//! Desktop simulator for the EasyMoo collar.
//!
//! Runs the core polling loop against a randomized collar model and a radio
//! stand-in that logs every report. Without `--realtime` cycles run back to
//! back; with it they follow the configured 5 s interval.
//!
//! ```text
//! easymoo-sim [CYCLES] [--seed N] [--fail-rate P] [--realtime] [--json]
//! ```
//!
//! `RUST_LOG=debug` shows state transitions and phase changes.

mod collar;
mod radio;

use std::env;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use easymoo_core::constants::time::MS_PER_SECOND;
use easymoo_core::time::{ImmediateWake, IntervalWake, MonotonicTime, WakeSource};
use easymoo_core::{Metric, Monitor, MonitorConfig};

use collar::CollarModel;
use radio::LoggingRadio;

const DEFAULT_CYCLES: u64 = 120;
const DEFAULT_SEED: u64 = 7;
const DEFAULT_FAIL_RATE: f64 = 0.01;
/// Reports between two receiver connections.
const CONNECT_EVERY: u32 = 4;

/// Sleeps between polls of a wake source that is not due yet.
struct Paced<W>(W);

impl<W: WakeSource> WakeSource for Paced<W> {
    type Error = W::Error;

    fn poll_wake(&mut self) -> nb::Result<(), W::Error> {
        let result = self.0.poll_wake();
        if let Err(nb::Error::WouldBlock) = result {
            thread::sleep(Duration::from_millis(20));
        }
        result
    }
}

struct Options {
    cycles: u64,
    seed: u64,
    fail_rate: f64,
    realtime: bool,
    json: bool,
}

fn parse_args() -> Result<Options> {
    let mut options = Options {
        cycles: DEFAULT_CYCLES,
        seed: DEFAULT_SEED,
        fail_rate: DEFAULT_FAIL_RATE,
        realtime: false,
        json: false,
    };

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => {
                let value = args.next().context("--seed needs a value")?;
                options.seed = value.parse().with_context(|| format!("bad seed '{value}'"))?;
            }
            "--fail-rate" => {
                let value = args.next().context("--fail-rate needs a value")?;
                options.fail_rate = value
                    .parse()
                    .with_context(|| format!("bad failure rate '{value}'"))?;
                if !(0.0..=1.0).contains(&options.fail_rate) {
                    bail!("failure rate must be within 0..=1, got {}", options.fail_rate);
                }
            }
            "--realtime" => options.realtime = true,
            "--json" => options.json = true,
            other => {
                options.cycles = other
                    .parse()
                    .with_context(|| format!("bad cycle count '{other}'"))?;
            }
        }
    }
    Ok(options)
}

fn simulate<W: WakeSource>(
    config: &MonitorConfig,
    options: &Options,
    wake: W,
) -> Result<()>
where
    W::Error: std::error::Error + Send + Sync + 'static,
{
    let collar = CollarModel::new(StdRng::seed_from_u64(options.seed), options.fail_rate);
    let radio = LoggingRadio::new(CONNECT_EVERY, options.json);
    let mut monitor = Monitor::new(config, collar, radio, wake)?;

    monitor.run(options.cycles)?;

    let stats = monitor.stats();
    let engine = monitor.engine();
    let summary = engine.summarize();
    info!(
        "done: {} cycles, {} reports, {} read errors, {} dropped samples, {} sessions",
        stats.cycles,
        monitor.sink().sent(),
        stats.read_errors,
        engine.dropped_samples(),
        stats.sessions
    );
    for metric in Metric::ALL {
        info!("  {:<16} avg {:>7.2}", metric.name(), summary.average(metric));
    }
    info!("  score {:.1}", summary.score.value());
    info!("  animal phase at end: {:?}", monitor.source_mut().phase());
    info!("state machine:\n{}", monitor.fsm());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = parse_args()?;
    let config = MonitorConfig::default();

    info!(
        "easymoo-sim {}: {} cycles, seed {}, {} s per cycle{}",
        easymoo_core::VERSION,
        options.cycles,
        options.seed,
        config.cycle_interval_ms / MS_PER_SECOND,
        if options.realtime { "" } else { " (fast)" }
    );

    if options.realtime {
        let wake = Paced(IntervalWake::new(MonotonicTime::new(), config.cycle_interval_ms));
        simulate(&config, &options, wake)
    } else {
        simulate(&config, &options, ImmediateWake)
    }
}
