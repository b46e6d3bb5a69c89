//! Error Types for Queue Operations and Configuration
//!
//! ## Design Philosophy
//!
//! The collar runs a single polling loop that must never stop because of one
//! bad sample. Errors are therefore split by when they can happen:
//!
//! 1. **Runtime (`QueueError`)**: returned by the FIFO queue and the sliding
//!    windows built on it. The aggregation engine logs them and drops the
//!    offending sample; they never travel further up.
//!
//! 2. **Startup (`ConfigError`)**: returned while validating the static
//!    configuration. These are fatal and must be handled before the loop
//!    starts.
//!
//! Both enums are `Copy`, carry only inline data and `&'static str` context,
//! and allocate nothing.
//!
//! ## Error Handling Strategy
//!
//! ```rust
//! use easymoo_core::{QueueError, SlidingWindow};
//!
//! let mut window = SlidingWindow::new(4);
//! match window.push(f32::NAN) {
//!     Ok(_) => {}
//!     Err(QueueError::InvalidArgument { .. }) => {
//!         // malformed sample, drop it and keep going
//!     }
//!     Err(QueueError::AllocationFailure) => {
//!         // out of heap, drop it and keep going
//!     }
//!     Err(_) => {}
//! }
//! ```
//!
//! Note that averaging an empty window is *not* an error: it returns the
//! neutral value `0.0`.

use thiserror_no_std::Error;

/// Result type for queue and window operations
pub type QueueResult<T> = Result<T, QueueError>;

/// Result type for configuration validation
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Queue-layer errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    /// Item rejected before insertion (malformed sample)
    #[error("Invalid argument: {reason}")]
    InvalidArgument {
        /// What was wrong with the item
        reason: &'static str,
    },

    /// Dequeue on a queue with no elements
    #[error("Queue is empty")]
    Empty,

    /// The element to remove is not in the queue
    #[error("Element not found in queue")]
    NotFound,

    /// Destroy requested while elements remain
    #[error("Queue still holds {remaining} elements")]
    NotEmpty {
        /// Elements left in the queue
        remaining: usize,
    },

    /// Storage for a new node could not be reserved
    #[error("Allocation failure while growing queue")]
    AllocationFailure,
}

/// Fatal configuration errors, raised before the polling loop starts
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Window capacity of zero
    #[error("Window capacity must be at least 1")]
    ZeroCapacity,

    /// Debounce critical streak of zero
    #[error("Debounce streak for '{flag}' must be at least 1")]
    ZeroStreak {
        /// Name of the flag being configured
        flag: &'static str,
    },

    /// A cadence (reporting, pruning) of zero cycles
    #[error("Cadence '{cadence}' must be at least 1 cycle")]
    ZeroCadence {
        /// Name of the cadence being configured
        cadence: &'static str,
    },

    /// Pruned window length smaller than the sliding window itself
    #[error("Retained length {retain_max} is below window capacity {capacity}")]
    RetainBelowCapacity {
        /// Configured maximum retained length
        retain_max: usize,
        /// Configured window capacity
        capacity: usize,
    },

    /// Score target that is zero, negative or not a number
    #[error("Score target for '{metric}' must be positive and finite, got {target}")]
    InvalidTarget {
        /// Metric whose target is broken
        metric: &'static str,
        /// The offending target
        target: f32,
    },

    /// Alert cutoff that is not a finite number
    #[error("Cutoff '{cutoff}' is not a finite number")]
    InvalidCutoff {
        /// Name of the cutoff
        cutoff: &'static str,
    },

    /// Composite score needs at least two metrics
    #[error("Composite score needs at least {required} terms, got {configured}")]
    TooFewScoreTerms {
        /// Minimum number of terms
        required: usize,
        /// Number of terms configured
        configured: usize,
    },

    /// More score terms than there are metrics
    #[error("Too many score terms")]
    TooManyScoreTerms,

    /// The same metric appears twice in the score
    #[error("Metric '{metric}' appears more than once in the score")]
    DuplicateScoreTerm {
        /// The repeated metric
        metric: &'static str,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for QueueError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::InvalidArgument { reason } =>
                defmt::write!(fmt, "Invalid argument: {}", reason),
            Self::Empty => defmt::write!(fmt, "Queue empty"),
            Self::NotFound => defmt::write!(fmt, "Element not found"),
            Self::NotEmpty { remaining } =>
                defmt::write!(fmt, "Queue holds {} elements", remaining),
            Self::AllocationFailure => defmt::write!(fmt, "Allocation failure"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::ZeroCapacity => defmt::write!(fmt, "Zero window capacity"),
            Self::ZeroStreak { flag } => defmt::write!(fmt, "Zero streak for {}", flag),
            Self::ZeroCadence { cadence } => defmt::write!(fmt, "Zero cadence {}", cadence),
            Self::RetainBelowCapacity { retain_max, capacity } =>
                defmt::write!(fmt, "Retain {} below capacity {}", retain_max, capacity),
            Self::InvalidTarget { metric, target } =>
                defmt::write!(fmt, "Bad target {} for {}", target, metric),
            Self::InvalidCutoff { cutoff } => defmt::write!(fmt, "Bad cutoff {}", cutoff),
            Self::TooFewScoreTerms { required, configured } =>
                defmt::write!(fmt, "Need {} score terms, have {}", required, configured),
            Self::TooManyScoreTerms => defmt::write!(fmt, "Too many score terms"),
            Self::DuplicateScoreTerm { metric } =>
                defmt::write!(fmt, "Duplicate score term {}", metric),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn queue_error_messages() {
        assert_eq!(QueueError::Empty.to_string(), "Queue is empty");
        assert_eq!(
            QueueError::NotEmpty { remaining: 3 }.to_string(),
            "Queue still holds 3 elements"
        );
    }

    #[test]
    fn config_error_names_the_flag() {
        let err = ConfigError::ZeroStreak { flag: "too_hot" };
        assert!(err.to_string().contains("too_hot"));
    }
}
