//! Cadence Constants
//!
//! Everything in the core is counted in polling cycles. The only wall-clock
//! value is the cycle interval handed to the wake source.

// ===== POLLING =====

/// Interval between polling cycles (milliseconds).
///
/// Matches the collar's RTC alarm tick of 5 seconds.
pub const CYCLE_INTERVAL_MS: u64 = 5000;

/// Milliseconds per second.
pub const MS_PER_SECOND: u64 = 1000;

// ===== WINDOWS =====

/// Number of readings kept per metric (one minute at the default cadence).
pub const WINDOW_CAPACITY: usize = 12;

// ===== DERIVED CADENCES =====

/// Cycles between two reports to the radio (once a minute).
pub const REPORT_EVERY_CYCLES: u32 = 12;

/// Cycles between two window pruning passes (once an hour).
pub const PRUNE_EVERY_CYCLES: u32 = 720;
