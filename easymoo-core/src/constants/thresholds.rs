//! Alert Cutoffs, Debounce Streaks and Score Targets
//!
//! The collar's light/temperature front end reports 8-bit counts per
//! channel, and the motion front end reports linear acceleration with
//! gravity already removed. Cutoffs below are in those units.

// ===== ALERT CUTOFFS =====

/// Combined light (sum of the three color channels) below which the animal
/// is considered to be in the dark.
///
/// Roughly a barn interior at night for the color sensor's default gain.
pub const DARK_CUTOFF: f32 = 10.0;

/// Temperature above which the collar raises a heat alert.
///
/// The on-board temperature channel of the light sensor, in °C counts.
/// Cattle enter heat stress well before this, so it is a hard ceiling.
pub const HOT_CUTOFF: f32 = 40.0;

/// Per-axis linear acceleration below which the animal counts as still.
///
/// Every axis must be below the cutoff in the same sample.
pub const INACTIVE_CUTOFF: f32 = 2.0;

// ===== DEBOUNCE STREAKS =====

/// Consecutive still cycles before the inactivity flag is raised.
///
/// At the default 5 s cycle this is 50 minutes of stillness, long enough
/// to ignore a cow lying down to ruminate for a short while.
pub const INACTIVE_STREAK: u32 = 600;

/// Consecutive dark cycles before the darkness flag is raised (one minute).
pub const DARK_STREAK: u32 = 12;

/// Consecutive hot cycles before the heat flag is raised (one minute).
pub const HOT_STREAK: u32 = 12;

// ===== SCORE TARGETS =====

/// Rolling light average that counts as a fully healthy 100%.
///
/// Field snapshots disagreed between 8 and 25; the lower value matches the
/// later collar revision.
pub const LIGHT_TARGET: f32 = 8.0;

/// Rolling acceleration magnitude that counts as fully active.
pub const ACTIVITY_TARGET: f32 = 16.0;

/// Minimum number of metrics combined into the composite score.
pub const MIN_SCORE_TERMS: usize = 2;

/// Upper bound of the composite score.
pub const SCORE_MAX: f32 = 100.0;
