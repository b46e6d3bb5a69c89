//! Shared fixtures for integration tests
//!
//! - scripted sensor source (frames and read failures in order)
//! - recording sink with a scripted link state
//! - wake source that blocks a few polls before each tick
//! - frame builders for typical collar situations

#![allow(dead_code)]

use std::collections::VecDeque;
use std::convert::Infallible;

use easymoo_core::reading::Axes;
use easymoo_core::time::WakeSource;
use easymoo_core::{LinkState, Report, ReportSink, SensorFrame, SensorSource};

/// Failure reported by [`ScriptedSource`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadError;

/// Replays a script, then repeats the fallback frame
pub struct ScriptedSource {
    script: VecDeque<Result<SensorFrame, ReadError>>,
    fallback: SensorFrame,
    pub reads: usize,
}

impl ScriptedSource {
    pub fn new(fallback: SensorFrame) -> Self {
        Self {
            script: VecDeque::new(),
            fallback,
            reads: 0,
        }
    }

    pub fn then(mut self, frame: SensorFrame, times: usize) -> Self {
        for _ in 0..times {
            self.script.push_back(Ok(frame));
        }
        self
    }

    pub fn then_fail(mut self, times: usize) -> Self {
        for _ in 0..times {
            self.script.push_back(Err(ReadError));
        }
        self
    }
}

impl SensorSource for ScriptedSource {
    type Error = ReadError;

    fn read_frame(&mut self) -> Result<SensorFrame, ReadError> {
        self.reads += 1;
        self.script.pop_front().unwrap_or(Ok(self.fallback))
    }
}

/// Transmit failure reported by [`RecordingSink`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadioDown;

/// Keeps every report and its encoded payload
#[derive(Default)]
pub struct RecordingSink {
    pub reports: Vec<Report>,
    pub payloads: Vec<[u8; 24]>,
    pub link: LinkState,
    pub refuse: bool,
}

impl RecordingSink {
    pub fn states(&self) -> Vec<easymoo_core::DeviceState> {
        self.reports.iter().map(|r| r.state).collect()
    }
}

impl ReportSink for RecordingSink {
    type Error = RadioDown;

    fn transmit(&mut self, report: &Report) -> Result<(), RadioDown> {
        if self.refuse {
            return Err(RadioDown);
        }
        self.reports.push(*report);
        self.payloads.push(report.encode());
        Ok(())
    }

    fn link_state(&self) -> LinkState {
        self.link
    }
}

/// Returns `WouldBlock` `delay` times before every tick
pub struct SlowWake {
    delay: u32,
    pending: u32,
    pub polls: u32,
}

impl SlowWake {
    pub fn new(delay: u32) -> Self {
        Self {
            delay,
            pending: delay,
            polls: 0,
        }
    }
}

impl WakeSource for SlowWake {
    type Error = Infallible;

    fn poll_wake(&mut self) -> nb::Result<(), Infallible> {
        self.polls += 1;
        if self.pending > 0 {
            self.pending -= 1;
            return Err(nb::Error::WouldBlock);
        }
        self.pending = self.delay;
        Ok(())
    }
}

/// Bright, mild, moving
pub fn grazing() -> SensorFrame {
    SensorFrame {
        light: Axes::new(6.0, 8.0, 4.0),
        temperature: 22.0,
        accel: Axes::new(4.0, -3.0, 2.5),
        gyro: Axes::new(10.0, -5.0, 3.0),
    }
}

/// Bright, mild, still
pub fn resting() -> SensorFrame {
    SensorFrame {
        accel: Axes::new(0.2, -0.1, 0.3),
        gyro: Axes::default(),
        ..grazing()
    }
}

/// Moving in the heat
pub fn heat_stress() -> SensorFrame {
    SensorFrame {
        temperature: 43.0,
        ..grazing()
    }
}

/// Still in the heat
pub fn collapsed() -> SensorFrame {
    SensorFrame {
        temperature: 43.0,
        ..resting()
    }
}

/// Moving in the dark
pub fn night() -> SensorFrame {
    SensorFrame {
        light: Axes::new(1.0, 1.0, 1.0),
        ..grazing()
    }
}
