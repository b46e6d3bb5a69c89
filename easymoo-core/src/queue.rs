//! FIFO Queue for Sensor Readings
//!
//! ## Overview
//!
//! A first-in first-out queue of owned values, used as the storage behind
//! every sliding window and for ad-hoc buffering. Each queue instance holds a
//! single element type; elements are moved in on `enqueue` and moved out on
//! `dequeue`, so there is no caller-managed lifetime to get wrong.
//!
//! ## Capacity
//!
//! A queue may be created with a capacity. The capacity pre-reserves storage
//! and drives [`Queue::is_full`], but the queue never evicts or refuses on its
//! own: eviction policy belongs to the caller. [`SlidingWindow`] is the caller
//! that evicts in lock-step with insertion.
//!
//! ```text
//!   head (dequeue)                       tail (enqueue)
//!      ↓                                      ↓
//!   ┌─────┬─────┬─────┬─────┬─────┬─────┬─────┐
//!   │  5  │  7  │  9  │  2  │     │     │     │   capacity = 7 (reserved)
//!   └─────┴─────┴─────┴─────┴─────┴─────┴─────┘
//! ```
//!
//! ## Allocation
//!
//! Growth goes through `try_reserve`, so running out of heap surfaces as
//! [`QueueError::AllocationFailure`] instead of aborting the firmware.
//!
//! ## Teardown
//!
//! [`Queue::destroy`] refuses to drop a queue that still holds elements and
//! hands it back, forcing an explicit drain first.
//!
//! [`SlidingWindow`]: crate::window::SlidingWindow

use alloc::collections::VecDeque;

use crate::errors::{QueueError, QueueResult};

/// FIFO queue of owned values
#[derive(Debug, Clone, PartialEq)]
pub struct Queue<T> {
    items: VecDeque<T>,
    /// Advisory capacity, `None` for unbounded
    capacity: Option<usize>,
}

impl<T> Queue<T> {
    /// Create an empty, unbounded queue
    pub const fn new() -> Self {
        Self {
            items: VecDeque::new(),
            capacity: None,
        }
    }

    /// Create an empty queue with a fixed capacity
    ///
    /// Storage for `capacity` elements is reserved up front. If the
    /// reservation fails the queue is still usable and will grow on demand.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut items = VecDeque::new();
        if items.try_reserve_exact(capacity).is_err() {
            log_warn!("queue: could not pre-reserve {} slots", capacity);
        }
        Self {
            items,
            capacity: Some(capacity),
        }
    }

    /// Append an item at the tail
    ///
    /// O(1) amortized. Fails only if storage cannot grow.
    pub fn enqueue(&mut self, item: T) -> QueueResult<()> {
        self.items
            .try_reserve(1)
            .map_err(|_| QueueError::AllocationFailure)?;
        self.items.push_back(item);
        Ok(())
    }

    /// Remove and return the head item
    pub fn dequeue(&mut self) -> QueueResult<T> {
        self.items.pop_front().ok_or(QueueError::Empty)
    }

    /// Look at the head item without removing it
    pub fn peek(&self) -> Option<&T> {
        self.items.front()
    }

    /// Look at the tail item (the newest)
    pub fn last(&self) -> Option<&T> {
        self.items.back()
    }

    /// Current number of elements
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when no elements are stored
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Configured capacity, `None` for unbounded queues
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// True when a bounded queue holds `capacity` or more elements
    ///
    /// Unbounded queues are never full.
    pub fn is_full(&self) -> bool {
        matches!(self.capacity, Some(cap) if self.items.len() >= cap)
    }

    /// Iterate from head (oldest) to tail (newest)
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator + '_ {
        self.items.iter()
    }

    /// First element satisfying `predicate`, scanning from the head
    pub fn find<P>(&self, mut predicate: P) -> Option<&T>
    where
        P: FnMut(&T) -> bool,
    {
        self.items.iter().find(|item| predicate(item))
    }

    /// Release reserved storage beyond `max(len, min_slots)`
    pub fn shrink_to(&mut self, min_slots: usize) {
        self.items.shrink_to(min_slots);
    }

    /// Drop the queue, refusing while elements remain
    ///
    /// On refusal the queue comes back untouched together with the error, so
    /// nothing is lost silently.
    pub fn destroy(self) -> Result<(), (QueueError, Self)> {
        if self.items.is_empty() {
            Ok(())
        } else {
            let remaining = self.items.len();
            Err((QueueError::NotEmpty { remaining }, self))
        }
    }
}

impl<T: PartialEq> Queue<T> {
    /// Delete the first element equal to `item`
    ///
    /// O(n). Order of the remaining elements is preserved. An absent
    /// element is `NotFound`, whether or not the queue is empty.
    pub fn remove(&mut self, item: &T) -> QueueResult<T> {
        let index = self
            .items
            .iter()
            .position(|candidate| candidate == item)
            .ok_or(QueueError::NotFound)?;
        self.items.remove(index).ok_or(QueueError::NotFound)
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}
