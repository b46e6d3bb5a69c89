//! Composite Well-Being Score
//!
//! Each configured [`ScoreTerm`] compares one metric's rolling average with a
//! target reference value and expresses it as a percentage:
//!
//! ```text
//! normalized = min(average / target * 100, 100)      (negative, NaN → 0)
//! score      = mean(normalized over all terms)
//! ```
//!
//! An average at or above its target saturates at 100 for that term, so a
//! very bright day cannot compensate for a motionless animal. Terms are
//! unweighted. The score is recomputed from the windows every reporting
//! cycle and keeps no memory of earlier values.

use crate::constants::thresholds::SCORE_MAX;
use crate::reading::Metric;

/// One metric contributing to the composite score
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreTerm {
    /// Metric whose rolling average is normalized
    pub metric: Metric,
    /// Rolling average counted as 100%
    pub target: f32,
}

impl ScoreTerm {
    /// Build a term
    pub const fn new(metric: Metric, target: f32) -> Self {
        Self { metric, target }
    }

    /// Normalize `average` against this term's target
    pub fn normalize(&self, average: f32) -> f32 {
        normalize(average, self.target)
    }
}

/// Express `average` as a percentage of `target`, clamped to `[0, 100]`
///
/// NaN, negative averages and non-positive targets yield 0. A positive
/// infinite average saturates like any other value above target.
pub fn normalize(average: f32, target: f32) -> f32 {
    if average.is_nan() || !(target > 0.0) || average <= 0.0 {
        return 0.0;
    }
    let ratio = average / target * SCORE_MAX;
    if ratio.is_finite() {
        ratio.min(SCORE_MAX)
    } else {
        SCORE_MAX
    }
}

/// Bounded composite score in `[0, 100]`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompositeScore(f32);

impl CompositeScore {
    /// Lowest possible score
    pub const ZERO: CompositeScore = CompositeScore(0.0);

    /// Build from a raw value, clamping into range
    pub fn new(value: f32) -> Self {
        if value.is_finite() {
            Self(value.clamp(0.0, SCORE_MAX))
        } else {
            Self::ZERO
        }
    }

    /// Score value
    pub fn value(&self) -> f32 {
        self.0
    }

    /// Score rounded to the nearest whole point, as sent on the wire
    pub fn as_byte(&self) -> u8 {
        // In range by construction, so the cast cannot truncate
        libm::roundf(self.0) as u8
    }
}

/// Mean of the normalized terms
///
/// `average_of` supplies each metric's rolling average. No terms → 0.
pub fn composite_score<F>(terms: &[ScoreTerm], mut average_of: F) -> CompositeScore
where
    F: FnMut(Metric) -> f32,
{
    if terms.is_empty() {
        return CompositeScore::ZERO;
    }

    let total: f32 = terms
        .iter()
        .map(|term| term.normalize(average_of(term.metric)))
        .sum();

    CompositeScore::new(total / terms.len() as f32)
}
