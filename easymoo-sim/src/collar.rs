//! Randomized stand-in for the collar's sensors.

use std::fmt;

use easymoo_core::reading::Axes;
use easymoo_core::{SensorFrame, SensorSource};
use log::debug;
use rand::rngs::StdRng;
use rand::Rng;

/// What the simulated animal is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Out in the field, moving and in daylight.
    Grazing,
    /// Lying down, barely moving.
    Resting,
    /// Moving in the midday heat.
    HeatStress,
    /// In the barn at night.
    Barn,
}

impl Phase {
    /// Mean cycles spent in the phase before it may change.
    fn mean_length(self) -> u32 {
        match self {
            Phase::Grazing => 40,
            Phase::Resting => 30,
            Phase::HeatStress => 20,
            Phase::Barn => 25,
        }
    }
}

/// Read failure injected by the model.
#[derive(Debug, Clone, Copy)]
pub struct BusTimeout {
    pub cycle: u64,
}

impl fmt::Display for BusTimeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sensor bus timeout on cycle {}", self.cycle)
    }
}

/// Collar model wandering between phases.
pub struct CollarModel {
    rng: StdRng,
    phase: Phase,
    remaining: u32,
    cycle: u64,
    failure_rate: f64,
    heading: f32,
}

impl CollarModel {
    pub fn new(rng: StdRng, failure_rate: f64) -> Self {
        Self {
            rng,
            phase: Phase::Grazing,
            remaining: Phase::Grazing.mean_length(),
            cycle: 0,
            failure_rate,
            heading: 0.0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn advance_phase(&mut self) {
        if self.remaining > 0 {
            self.remaining -= 1;
            return;
        }

        let roll: f32 = self.rng.gen();
        let next = match self.phase {
            Phase::Grazing if roll < 0.5 => Phase::Resting,
            Phase::Grazing if roll < 0.75 => Phase::HeatStress,
            Phase::Grazing => Phase::Barn,
            Phase::Resting | Phase::Barn if roll < 0.8 => Phase::Grazing,
            Phase::Resting => Phase::Barn,
            Phase::Barn => Phase::Resting,
            Phase::HeatStress => Phase::Resting,
        };

        let mean = next.mean_length();
        self.remaining = self.rng.gen_range(mean / 2..=mean + mean / 2);
        if next != self.phase {
            debug!("cycle {}: animal {:?} -> {:?}", self.cycle, self.phase, next);
        }
        self.phase = next;
    }

    fn noise(&mut self, spread: f32) -> f32 {
        self.rng.gen_range(-spread..=spread)
    }

    fn frame(&mut self) -> SensorFrame {
        let (light, temperature, motion) = match self.phase {
            Phase::Grazing => (9.0, 24.0, 5.0),
            Phase::Resting => (7.0, 22.0, 0.4),
            Phase::HeatStress => (11.0, 43.0, 3.0),
            Phase::Barn => (0.8, 17.0, 1.5),
        };

        self.heading += self.noise(0.3) * motion;

        SensorFrame {
            light: Axes::new(
                (light + self.noise(1.0)).max(0.0),
                (light * 1.2 + self.noise(1.0)).max(0.0),
                (light * 0.8 + self.noise(1.0)).max(0.0),
            ),
            temperature: temperature + self.noise(1.5),
            accel: Axes::new(
                self.noise(motion),
                self.noise(motion),
                self.noise(motion * 0.5),
            ),
            gyro: Axes::new(
                self.heading,
                self.noise(motion * 2.0),
                self.noise(motion * 2.0),
            ),
        }
    }
}

impl SensorSource for CollarModel {
    type Error = BusTimeout;

    fn read_frame(&mut self) -> Result<SensorFrame, BusTimeout> {
        self.cycle += 1;
        self.advance_phase();

        if self.rng.gen_bool(self.failure_rate) {
            let timeout = BusTimeout { cycle: self.cycle };
            debug!("{timeout}");
            return Err(timeout);
        }
        Ok(self.frame())
    }
}
