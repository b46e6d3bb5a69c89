//! Static Monitor Configuration
//!
//! Everything tunable about the collar is fixed at initialization:
//!
//! - per-alert raw cutoff and debounce streak length
//! - sliding window capacity and the length windows are pruned back to
//! - reporting and pruning cadences (in cycles)
//! - polling interval handed to the wake source
//! - score terms and their target reference values
//!
//! Invalid settings are fatal. [`MonitorConfig::validate`] (called by the
//! builder, the engine and the monitor) reports them before the polling
//! loop starts; after that nothing can fail for configuration reasons.
//!
//! ```rust
//! use easymoo_core::{Metric, MonitorConfig};
//!
//! let config = MonitorConfig::builder()
//!     .window_capacity(24)
//!     .report_every(6)
//!     .hot(38.0, 6)
//!     .score_term(Metric::Light, 25.0)
//!     .score_term(Metric::GyroDelta, 10.0)
//!     .build()?;
//!
//! assert_eq!(config.score_terms.len(), 2);
//! # Ok::<(), easymoo_core::ConfigError>(())
//! ```

use heapless::Vec;

use crate::constants::{
    thresholds::MIN_SCORE_TERMS, ACTIVITY_TARGET, CYCLE_INTERVAL_MS, DARK_CUTOFF, DARK_STREAK,
    HOT_CUTOFF, HOT_STREAK, INACTIVE_CUTOFF, INACTIVE_STREAK, LIGHT_TARGET, PRUNE_EVERY_CYCLES,
    REPORT_EVERY_CYCLES, WINDOW_CAPACITY,
};
use crate::errors::{ConfigError, ConfigResult};
use crate::reading::Metric;
use crate::score::ScoreTerm;

/// Raw cutoff plus the streak needed to raise an alert flag
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlertThreshold {
    /// Value the raw condition compares against
    pub cutoff: f32,
    /// Consecutive cycles before the flag is raised
    pub streak: u32,
}

impl AlertThreshold {
    /// Build a threshold
    pub const fn new(cutoff: f32, streak: u32) -> Self {
        Self { cutoff, streak }
    }
}

/// Score terms, at most one per metric
pub type ScoreTerms = Vec<ScoreTerm, { Metric::COUNT }>;

/// Complete monitor configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonitorConfig {
    /// Combined light below cutoff → darkness
    pub dark: AlertThreshold,
    /// Temperature above cutoff → heat
    pub hot: AlertThreshold,
    /// Every acceleration axis below cutoff → stillness
    pub inactive: AlertThreshold,

    /// Readings kept per metric window
    pub window_capacity: usize,
    /// Length windows are pruned back to
    pub retain_max: usize,

    /// Cycles between reports
    pub report_every: u32,
    /// Cycles between pruning passes
    pub prune_every: u32,
    /// Wall-clock interval between cycles, for the wake source
    pub cycle_interval_ms: u64,

    /// Metrics combined into the composite score
    pub score_terms: ScoreTerms,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        let defaults = [
            ScoreTerm::new(Metric::Light, LIGHT_TARGET),
            ScoreTerm::new(Metric::AccelMagnitude, ACTIVITY_TARGET),
        ];

        Self {
            dark: AlertThreshold::new(DARK_CUTOFF, DARK_STREAK),
            hot: AlertThreshold::new(HOT_CUTOFF, HOT_STREAK),
            inactive: AlertThreshold::new(INACTIVE_CUTOFF, INACTIVE_STREAK),
            window_capacity: WINDOW_CAPACITY,
            retain_max: WINDOW_CAPACITY,
            report_every: REPORT_EVERY_CYCLES,
            prune_every: PRUNE_EVERY_CYCLES,
            cycle_interval_ms: CYCLE_INTERVAL_MS,
            score_terms: Vec::from_slice(&defaults).unwrap_or_default(),
        }
    }
}

impl MonitorConfig {
    /// Start from the defaults
    pub fn builder() -> MonitorConfigBuilder {
        MonitorConfigBuilder::new()
    }

    /// Check every setting, returning the first problem found
    pub fn validate(&self) -> ConfigResult<()> {
        if self.window_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.retain_max < self.window_capacity {
            return Err(ConfigError::RetainBelowCapacity {
                retain_max: self.retain_max,
                capacity: self.window_capacity,
            });
        }

        for (name, alert) in [
            ("too_dark", &self.dark),
            ("too_hot", &self.hot),
            ("inactive", &self.inactive),
        ] {
            if alert.streak == 0 {
                return Err(ConfigError::ZeroStreak { flag: name });
            }
            if !alert.cutoff.is_finite() {
                return Err(ConfigError::InvalidCutoff { cutoff: name });
            }
        }

        if self.report_every == 0 {
            return Err(ConfigError::ZeroCadence { cadence: "report_every" });
        }
        if self.prune_every == 0 {
            return Err(ConfigError::ZeroCadence { cadence: "prune_every" });
        }

        if self.score_terms.len() < MIN_SCORE_TERMS {
            return Err(ConfigError::TooFewScoreTerms {
                required: MIN_SCORE_TERMS,
                configured: self.score_terms.len(),
            });
        }
        for (i, term) in self.score_terms.iter().enumerate() {
            if !term.target.is_finite() || term.target <= 0.0 {
                return Err(ConfigError::InvalidTarget {
                    metric: term.metric.name(),
                    target: term.target,
                });
            }
            if self.score_terms[..i].iter().any(|t| t.metric == term.metric) {
                return Err(ConfigError::DuplicateScoreTerm {
                    metric: term.metric.name(),
                });
            }
        }

        Ok(())
    }

    /// Target for `metric`, if it is part of the score
    pub fn target_for(&self, metric: Metric) -> Option<f32> {
        self.score_terms
            .iter()
            .find(|term| term.metric == metric)
            .map(|term| term.target)
    }
}

/// Builder for [`MonitorConfig`]
///
/// Setters never fail; problems surface from [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct MonitorConfigBuilder {
    config: MonitorConfig,
    custom_terms: bool,
    overflow: bool,
}

impl MonitorConfigBuilder {
    /// Builder seeded with [`MonitorConfig::default`]
    pub fn new() -> Self {
        Self {
            config: MonitorConfig::default(),
            custom_terms: false,
            overflow: false,
        }
    }

    /// Darkness cutoff and streak
    pub fn dark(mut self, cutoff: f32, streak: u32) -> Self {
        self.config.dark = AlertThreshold::new(cutoff, streak);
        self
    }

    /// Heat cutoff and streak
    pub fn hot(mut self, cutoff: f32, streak: u32) -> Self {
        self.config.hot = AlertThreshold::new(cutoff, streak);
        self
    }

    /// Stillness cutoff and streak
    pub fn inactive(mut self, cutoff: f32, streak: u32) -> Self {
        self.config.inactive = AlertThreshold::new(cutoff, streak);
        self
    }

    /// Window capacity; raises `retain_max` along with it if needed
    pub fn window_capacity(mut self, capacity: usize) -> Self {
        self.config.window_capacity = capacity;
        self.config.retain_max = self.config.retain_max.max(capacity);
        self
    }

    /// Length windows are pruned back to
    pub fn retain_max(mut self, retain_max: usize) -> Self {
        self.config.retain_max = retain_max;
        self
    }

    /// Cycles between reports
    pub fn report_every(mut self, cycles: u32) -> Self {
        self.config.report_every = cycles;
        self
    }

    /// Cycles between pruning passes
    pub fn prune_every(mut self, cycles: u32) -> Self {
        self.config.prune_every = cycles;
        self
    }

    /// Interval between cycles in milliseconds
    pub fn cycle_interval_ms(mut self, interval_ms: u64) -> Self {
        self.config.cycle_interval_ms = interval_ms;
        self
    }

    /// Add a score term
    ///
    /// The first call replaces the default terms.
    pub fn score_term(mut self, metric: Metric, target: f32) -> Self {
        if !self.custom_terms {
            self.config.score_terms.clear();
            self.custom_terms = true;
        }
        if self.config.score_terms.push(ScoreTerm::new(metric, target)).is_err() {
            self.overflow = true;
        }
        self
    }

    /// Validate and return the configuration
    pub fn build(self) -> ConfigResult<MonitorConfig> {
        if self.overflow {
            return Err(ConfigError::TooManyScoreTerms);
        }
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for MonitorConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
