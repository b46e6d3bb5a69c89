//! Aggregation Engine
//!
//! ## Overview
//!
//! The engine turns the per-cycle [`SensorFrame`] into
//!
//! - three debounced alert [`Flags`] (inactive, too dark, too hot), updated
//!   every cycle, and
//! - a [`CompositeScore`] computed from the rolling averages of the metric
//!   windows, on reporting cycles.
//!
//! ## Per-Cycle Flow
//!
//! ```text
//! SensorFrame
//!     │ derive
//!     ▼
//! Light ─── Temperature ─── AccelMagnitude ─── GyroDelta     readings
//!     │           │               │                │
//!     ▼           ▼               ▼                ▼
//!  window      window          window           window       push (evict oldest)
//!
//! combined light < dark cutoff    ──► dark debouncer     ─┐
//! temperature    > hot cutoff     ──► hot debouncer      ─┼─► Flags
//! |accel axes|   < inactive cutoff──► inactive debouncer ─┘
//! ```
//!
//! Every `prune_every` cycles the windows are pruned back to `retain_max`.
//!
//! ## Lost Samples
//!
//! A reading that cannot be stored (not finite, allocation failure) is
//! logged and dropped. Its window keeps what it already has and its
//! debouncer is left untouched for that cycle. Nothing here can stop the
//! polling loop.

use crate::config::MonitorConfig;
use crate::debounce::Debouncer;
use crate::errors::ConfigResult;
use crate::reading::{Metric, SensorFrame};
use crate::score::{composite_score, CompositeScore};
use crate::window::SlidingWindow;

/// Debounced alert flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Flags {
    /// The animal has been still for the whole inactivity streak
    pub inactive: bool,
    /// Combined light has stayed below the darkness cutoff
    pub too_dark: bool,
    /// Temperature has stayed above the heat cutoff
    pub too_hot: bool,
}

impl Flags {
    /// Either environmental alert is raised
    pub fn dark_or_hot(&self) -> bool {
        self.too_dark || self.too_hot
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Flags {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "inactive={} dark={} hot={}",
            self.inactive,
            self.too_dark,
            self.too_hot
        )
    }
}

/// Rolling averages and score computed on a reporting cycle
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Summary {
    /// Rolling average per metric, in [`Metric::ALL`] order
    pub averages: [f32; Metric::COUNT],
    /// Composite score over the configured terms
    pub score: CompositeScore,
}

impl Summary {
    /// Average of one metric
    pub fn average(&self, metric: Metric) -> f32 {
        self.averages[metric.index()]
    }
}

/// Per-metric windows, debouncers and cadence bookkeeping
#[derive(Debug, Clone)]
pub struct AggregationEngine {
    config: MonitorConfig,
    windows: [SlidingWindow; Metric::COUNT],
    dark: Debouncer,
    hot: Debouncer,
    inactive: Debouncer,
    /// Last frame with a usable gyroscope vector
    previous: Option<SensorFrame>,
    /// Last frame ingested, as reported
    latest: Option<SensorFrame>,
    flags: Flags,
    cycles: u64,
    dropped_samples: u32,
}

impl AggregationEngine {
    /// Build an engine, rejecting invalid configuration
    pub fn new(config: &MonitorConfig) -> ConfigResult<Self> {
        config.validate()?;

        let capacity = config.window_capacity;
        Ok(Self {
            windows: core::array::from_fn(|_| SlidingWindow::new(capacity)),
            dark: Debouncer::new("too_dark", config.dark.streak)?,
            hot: Debouncer::new("too_hot", config.hot.streak)?,
            inactive: Debouncer::new("inactive", config.inactive.streak)?,
            config: config.clone(),
            previous: None,
            latest: None,
            flags: Flags::default(),
            cycles: 0,
            dropped_samples: 0,
        })
    }

    /// Run one cycle on a fresh frame and return the updated flags
    pub fn ingest(&mut self, frame: &SensorFrame) -> Flags {
        self.cycles += 1;

        for reading in frame.readings(self.previous.as_ref()) {
            let window = &mut self.windows[reading.metric.index()];
            if let Err(e) = window.push(reading.value) {
                self.dropped_samples = self.dropped_samples.saturating_add(1);
                log_warn!(
                    "cycle {}: dropped {} sample: {}",
                    self.cycles,
                    reading.metric.name(),
                    e
                );
            }
        }

        let light = frame.combined_light();
        if light.is_finite() {
            self.flags.too_dark = self.dark.update(light < self.config.dark.cutoff);
        }
        if frame.temperature.is_finite() {
            self.flags.too_hot = self.hot.update(frame.temperature > self.config.hot.cutoff);
        }
        if frame.accel.is_finite() {
            self.flags.inactive = self
                .inactive
                .update(frame.accel.all_below(self.config.inactive.cutoff));
        }

        if frame.gyro.is_finite() {
            self.previous = Some(*frame);
        }
        self.latest = Some(*frame);

        self.prune_if_due();
        self.flags
    }

    /// Count a cycle whose sensor read failed
    ///
    /// Windows, debouncers and flags are left as they are.
    pub fn skip_cycle(&mut self) -> Flags {
        self.cycles += 1;
        self.prune_if_due();
        self.flags
    }

    fn prune_if_due(&mut self) {
        if self.cycles % u64::from(self.config.prune_every) != 0 {
            return;
        }
        let retain = self.config.retain_max;
        let evicted: usize = self.windows.iter_mut().map(|w| w.prune_to(retain)).sum();
        log_debug!("cycle {}: pruned windows, {} readings evicted", self.cycles, evicted);
    }

    /// True when the cycle just completed is a reporting cycle
    pub fn report_due(&self) -> bool {
        self.cycles > 0 && self.cycles % u64::from(self.config.report_every) == 0
    }

    /// Current debounced flags
    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// Rolling average of one metric, `0.0` for an empty window
    pub fn average(&self, metric: Metric) -> f32 {
        self.windows[metric.index()].average()
    }

    /// Composite score from the current windows
    pub fn composite_score(&self) -> CompositeScore {
        composite_score(&self.config.score_terms, |metric| self.average(metric))
    }

    /// Averages of every window plus the composite score
    pub fn summarize(&self) -> Summary {
        Summary {
            averages: Metric::ALL.map(|metric| self.average(metric)),
            score: self.composite_score(),
        }
    }

    /// Window backing `metric`
    pub fn window(&self, metric: Metric) -> &SlidingWindow {
        &self.windows[metric.index()]
    }

    /// Last frame ingested
    pub fn latest_frame(&self) -> Option<&SensorFrame> {
        self.latest.as_ref()
    }

    /// Cycles run so far, including skipped ones
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Readings dropped because they could not be stored
    pub fn dropped_samples(&self) -> u32 {
        self.dropped_samples
    }

    /// Configuration the engine was built with
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }
}
