//! Constants for EasyMoo Core
//!
//! Default values for every knob in [`MonitorConfig`](crate::MonitorConfig)
//! plus the fixed markers of the collar's report payload.
//!
//! ## Organization
//!
//! - **Thresholds**: alert cutoffs, debounce streaks, score targets
//! - **Time**: polling cadence and the cycle counts derived from it
//! - **Wire**: report payload layout
//!
//! Values are in the raw units delivered by the sensor collaborators; the
//! core never converts them.

/// Alert cutoffs, debounce streak lengths and score targets.
pub mod thresholds;

/// Polling, reporting and pruning cadences.
pub mod time;

/// Report payload layout and field markers.
pub mod wire;

pub use thresholds::{
    DARK_CUTOFF, HOT_CUTOFF, INACTIVE_CUTOFF,
    DARK_STREAK, HOT_STREAK, INACTIVE_STREAK,
    LIGHT_TARGET, ACTIVITY_TARGET,
};

pub use time::{
    CYCLE_INTERVAL_MS, REPORT_EVERY_CYCLES, PRUNE_EVERY_CYCLES,
    WINDOW_CAPACITY,
};

pub use wire::REPORT_LEN;
