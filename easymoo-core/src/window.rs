//! Sliding Window for Per-Metric Reading History
//!
//! ## Overview
//!
//! Each tracked metric keeps its most recent readings in a sliding window.
//! The window sits on top of a [`Queue`] and applies the eviction policy the
//! queue deliberately leaves to its caller:
//!
//! - insertion at the tail
//! - once `len == capacity`, every insertion evicts the head first
//!
//! so after the window is primed its logical length stays at `capacity`.
//!
//! ```text
//! capacity = 3
//!
//! push 5   [5]
//! push 7   [5, 7]
//! push 9   [5, 7, 9]         primed
//! push 2   [7, 9, 2]         5 evicted, average = 6
//! ```
//!
//! ## Rolling Average
//!
//! The average is recomputed from the stored readings on demand (sum over
//! length, accumulated in `f64`). The mean of finite readings is always
//! finite. An empty window averages to the neutral value `0.0`.
//!
//! ## Pruning
//!
//! [`SlidingWindow::prune_to`] trims the window to a maximum retained length
//! and releases reserved storage. With lock-step eviction the window never
//! outgrows its capacity, so pruning normally only gives back memory.

use crate::errors::{QueueError, QueueResult};
use crate::queue::Queue;

/// Bounded sliding window of `f32` readings
#[derive(Debug, Clone, PartialEq)]
pub struct SlidingWindow {
    queue: Queue<f32>,
    capacity: usize,
}

impl SlidingWindow {
    /// Create an empty window holding at most `capacity` readings
    ///
    /// A zero capacity is rejected by configuration validation before any
    /// window is built; here it is raised to 1 so the invariant holds.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            queue: Queue::with_capacity(capacity),
            capacity,
        }
    }

    /// Add a reading, evicting the oldest when the window is full
    ///
    /// Returns the evicted reading, if any. Non-finite readings are refused
    /// with [`QueueError::InvalidArgument`] and leave the window untouched.
    pub fn push(&mut self, value: f32) -> QueueResult<Option<f32>> {
        if !value.is_finite() {
            return Err(QueueError::InvalidArgument {
                reason: "reading is not a finite number",
            });
        }

        let evicted = if self.queue.len() >= self.capacity {
            Some(self.queue.dequeue()?)
        } else {
            None
        };

        // Evicting freed a slot, so only a growing window can fail here
        self.queue.enqueue(value)?;

        Ok(evicted)
    }

    /// Rolling average, `0.0` when empty
    pub fn average(&self) -> f32 {
        let len = self.queue.len();
        if len == 0 {
            return 0.0;
        }
        // f64 sum so large finite readings cannot overflow to infinity
        let sum: f64 = self.queue.iter().copied().map(f64::from).sum();
        (sum / len as f64) as f32
    }

    /// Most recent reading
    pub fn latest(&self) -> Option<f32> {
        self.queue.last().copied()
    }

    /// Iterate from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        self.queue.iter().copied()
    }

    /// Number of stored readings
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// True when nothing is stored
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// True once the window holds `capacity` readings
    pub fn is_full(&self) -> bool {
        self.queue.len() >= self.capacity
    }

    /// Maximum number of readings held
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop oldest readings until at most `max_len` remain
    ///
    /// Also releases reserved storage above `max(max_len, capacity)`.
    /// Returns how many readings were evicted.
    pub fn prune_to(&mut self, max_len: usize) -> usize {
        let mut evicted = 0;
        while self.queue.len() > max_len {
            if self.queue.dequeue().is_err() {
                break;
            }
            evicted += 1;
        }
        self.queue.shrink_to(max_len.max(self.capacity));
        evicted
    }

    /// Remove every reading
    pub fn clear(&mut self) {
        while self.queue.dequeue().is_ok() {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn empty_window() {
        let window = SlidingWindow::new(5);
        assert!(window.is_empty());
        assert_eq!(window.average(), 0.0);
        assert!(window.latest().is_none());
    }

    #[test]
    fn evicts_oldest_when_full() {
        let mut window = SlidingWindow::new(3);
        assert_eq!(window.push(5.0), Ok(None));
        assert_eq!(window.push(7.0), Ok(None));
        assert_eq!(window.push(9.0), Ok(None));
        assert_eq!(window.push(2.0), Ok(Some(5.0)));

        let values: Vec<f32> = window.iter().collect();
        assert_eq!(values, vec![7.0, 9.0, 2.0]);
        assert_eq!(window.average(), 6.0);
        assert_eq!(window.latest(), Some(2.0));
    }

    #[test]
    fn huge_readings_average_finite() {
        let mut window = SlidingWindow::new(4);
        for _ in 0..4 {
            window.push(2.0e38).unwrap();
        }
        assert!(window.average().is_finite());
        assert_eq!(window.average(), 2.0e38);
    }

    #[test]
    fn rejects_non_finite() {
        let mut window = SlidingWindow::new(3);
        window.push(1.0).unwrap();

        assert!(matches!(
            window.push(f32::NAN),
            Err(QueueError::InvalidArgument { .. })
        ));
        assert!(window.push(f32::INFINITY).is_err());

        assert_eq!(window.len(), 1);
        assert_eq!(window.average(), 1.0);
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let mut window = SlidingWindow::new(0);
        window.push(1.0).unwrap();
        window.push(2.0).unwrap();
        assert_eq!(window.capacity(), 1);
        assert_eq!(window.iter().collect::<Vec<_>>(), vec![2.0]);
    }

    #[test]
    fn prune_keeps_newest() {
        let mut window = SlidingWindow::new(6);
        for v in 1..=6 {
            window.push(v as f32).unwrap();
        }

        assert_eq!(window.prune_to(6), 0);
        assert_eq!(window.prune_to(4), 2);
        assert_eq!(window.iter().collect::<Vec<_>>(), vec![3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn clear_empties() {
        let mut window = SlidingWindow::new(2);
        window.push(3.0).unwrap();
        window.clear();
        assert!(window.is_empty());
    }
}
