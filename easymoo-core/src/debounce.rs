//! Streak Debouncer for Alert Flags
//!
//! Raw sensor conditions flicker: a shadow passes, the animal twitches. A
//! flag is only raised after its raw condition has held for `critical`
//! consecutive cycles, and dropped the moment the condition fails once.
//!
//! ```text
//! critical = 3
//!
//! raw      T  T  F  T  T  T  T  F
//! streak   1  2  0  1  2  3  4  0
//! flag     .  .  .  .  .  ■  ■  .
//! ```
//!
//! Slow to trigger, fast to clear. Every tracked condition owns its own
//! debouncer; nothing is shared between them.

use crate::errors::{ConfigError, ConfigResult};

/// Consecutive-violation counter turning a raw condition into a stable flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Debouncer {
    critical: u32,
    streak: u32,
}

impl Debouncer {
    /// Create a debouncer raising its flag after `critical` consecutive hits
    ///
    /// `flag` names the condition in the error when `critical` is zero.
    pub fn new(flag: &'static str, critical: u32) -> ConfigResult<Self> {
        if critical == 0 {
            return Err(ConfigError::ZeroStreak { flag });
        }
        Ok(Self { critical, streak: 0 })
    }

    /// Feed one cycle's raw condition, returning the debounced flag
    pub fn update(&mut self, condition: bool) -> bool {
        if condition {
            self.streak = self.streak.saturating_add(1);
        } else {
            self.streak = 0;
        }
        self.is_active()
    }

    /// Current debounced flag
    pub fn is_active(&self) -> bool {
        self.streak >= self.critical
    }

    /// Consecutive cycles the raw condition has held
    pub fn streak(&self) -> u32 {
        self.streak
    }

    /// Configured streak length
    pub fn critical(&self) -> u32 {
        self.critical
    }

    /// Forget the current streak
    pub fn reset(&mut self) {
        self.streak = 0;
    }
}
