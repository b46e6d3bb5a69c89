//! Time and Wake Sources
//!
//! The polling loop has a single wait point: it blocks on a [`WakeSource`]
//! until the next cycle is due. On the collar that is the RTC alarm; on a
//! desktop it is an interval over a [`TimeSource`].
//!
//! Wake sources follow the `nb` convention: `Err(nb::Error::WouldBlock)`
//! until the tick has fired, then `Ok(())` once per tick, so the loop can
//! use `nb::block!` or interleave other work.

use core::convert::Infallible;

/// Milliseconds since boot
pub type Timestamp = u64;

/// Monotonic clock
pub trait TimeSource {
    /// Current time in milliseconds
    fn now(&self) -> Timestamp;
}

/// Clock that only moves when told to
#[derive(Debug, Clone, Default)]
pub struct FixedTime {
    timestamp: Timestamp,
}

impl FixedTime {
    /// Clock stopped at `timestamp`
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp }
    }

    /// Move the clock forward
    pub fn advance(&mut self, ms: u64) {
        self.timestamp = self.timestamp.saturating_add(ms);
    }
}

impl TimeSource for FixedTime {
    fn now(&self) -> Timestamp {
        self.timestamp
    }
}

/// Host monotonic clock (requires std)
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct MonotonicTime {
    start: std::time::Instant,
}

#[cfg(feature = "std")]
impl MonotonicTime {
    /// Clock starting at 0 now
    pub fn new() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for MonotonicTime {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl TimeSource for MonotonicTime {
    fn now(&self) -> Timestamp {
        u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// Signals that the next polling cycle is due
pub trait WakeSource {
    /// Wait failure; most sources cannot fail
    type Error: core::fmt::Debug;

    /// `Ok` once per tick, `WouldBlock` in between
    fn poll_wake(&mut self) -> nb::Result<(), Self::Error>;
}

impl<T: WakeSource + ?Sized> WakeSource for &mut T {
    type Error = T::Error;

    fn poll_wake(&mut self) -> nb::Result<(), Self::Error> {
        (**self).poll_wake()
    }
}

/// Fires on every poll
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateWake;

impl WakeSource for ImmediateWake {
    type Error = Infallible;

    fn poll_wake(&mut self) -> nb::Result<(), Self::Error> {
        Ok(())
    }
}

/// Fires every `interval_ms` of its clock
///
/// Deadlines advance by whole intervals from the start, so a late poll does
/// not shift later ticks. Missed ticks fire once each on following polls.
#[derive(Debug, Clone)]
pub struct IntervalWake<T: TimeSource> {
    clock: T,
    interval_ms: u64,
    deadline: Timestamp,
}

impl<T: TimeSource> IntervalWake<T> {
    /// First tick fires `interval_ms` after now
    pub fn new(clock: T, interval_ms: u64) -> Self {
        let interval_ms = interval_ms.max(1);
        let deadline = clock.now().saturating_add(interval_ms);
        Self {
            clock,
            interval_ms,
            deadline,
        }
    }

    /// Next deadline
    pub fn deadline(&self) -> Timestamp {
        self.deadline
    }

    /// Underlying clock, mutable
    pub fn clock_mut(&mut self) -> &mut T {
        &mut self.clock
    }
}

impl<T: TimeSource> WakeSource for IntervalWake<T> {
    type Error = Infallible;

    fn poll_wake(&mut self) -> nb::Result<(), Self::Error> {
        if self.clock.now() < self.deadline {
            return Err(nb::Error::WouldBlock);
        }
        self.deadline = self.deadline.saturating_add(self.interval_ms);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn immediate_always_fires() {
        let mut wake = ImmediateWake;
        assert!(wake.poll_wake().is_ok());
        assert!(wake.poll_wake().is_ok());
    }

    #[test]
    fn interval_blocks_until_deadline() {
        let mut wake = IntervalWake::new(FixedTime::new(100), 5000);
        assert_eq!(wake.poll_wake(), Err(nb::Error::WouldBlock));

        wake.clock_mut().advance(4999);
        assert_eq!(wake.poll_wake(), Err(nb::Error::WouldBlock));

        wake.clock_mut().advance(1);
        assert_eq!(wake.poll_wake(), Ok(()));
        assert_eq!(wake.deadline(), 10_100);
        assert_eq!(wake.poll_wake(), Err(nb::Error::WouldBlock));
    }

    #[test]
    fn missed_ticks_catch_up() {
        let mut wake = IntervalWake::new(FixedTime::new(0), 10);
        wake.clock_mut().advance(25);
        assert!(wake.poll_wake().is_ok());
        assert!(wake.poll_wake().is_ok());
        assert_eq!(wake.poll_wake(), Err(nb::Error::WouldBlock));
    }

    #[cfg(feature = "std")]
    #[test]
    fn monotonic_does_not_go_back() {
        let clock = MonotonicTime::new();
        let a = clock.now();
        assert!(clock.now() >= a);
    }
}
