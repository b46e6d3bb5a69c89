//! Sensor Frames, Metrics and Readings
//!
//! The read collaborators deliver one [`SensorFrame`] per cycle: the raw
//! channels of the color/temperature sensor and of the inertial sensor. The
//! aggregation engine derives one [`Reading`] per tracked [`Metric`] from it.
//!
//! | Metric           | Derived from                                   |
//! |------------------|------------------------------------------------|
//! | `Light`          | sum of the three light channels                |
//! | `Temperature`    | temperature channel                            |
//! | `AccelMagnitude` | norm of the linear acceleration vector         |
//! | `GyroDelta`      | norm of the change in angular rate since last frame |

/// Tracked metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Metric {
    /// Combined ambient light
    Light = 0,
    /// Ambient temperature
    Temperature = 1,
    /// Magnitude of linear acceleration
    AccelMagnitude = 2,
    /// Frame-to-frame change in angular rate
    GyroDelta = 3,
}

impl Metric {
    /// Number of tracked metrics
    pub const COUNT: usize = 4;

    /// Every metric, in window order
    pub const ALL: [Metric; Metric::COUNT] = [
        Metric::Light,
        Metric::Temperature,
        Metric::AccelMagnitude,
        Metric::GyroDelta,
    ];

    /// Position of this metric's window
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Human-readable name
    pub const fn name(self) -> &'static str {
        match self {
            Metric::Light => "light",
            Metric::Temperature => "temperature",
            Metric::AccelMagnitude => "accel_magnitude",
            Metric::GyroDelta => "gyro_delta",
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Metric {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}", self.name())
    }
}

/// One derived sample of one metric
///
/// Arrival order is the only timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reading {
    /// Which metric this sample belongs to
    pub metric: Metric,
    /// Sample value in raw sensor units
    pub value: f32,
}

impl Reading {
    /// Build a reading
    pub const fn new(metric: Metric, value: f32) -> Self {
        Self { metric, value }
    }
}

/// Three-axis sample
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Axes {
    /// X axis
    pub x: f32,
    /// Y axis
    pub y: f32,
    /// Z axis
    pub z: f32,
}

impl Axes {
    /// Build from components
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean norm
    pub fn magnitude(&self) -> f32 {
        libm::sqrtf(self.x * self.x + self.y * self.y + self.z * self.z)
    }

    /// Component-wise difference `self - other`
    pub fn delta(&self, other: &Axes) -> Axes {
        Axes::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    /// True when every component's magnitude is below `cutoff`
    pub fn all_below(&self, cutoff: f32) -> bool {
        self.x.abs() < cutoff && self.y.abs() < cutoff && self.z.abs() < cutoff
    }

    /// True when no component is NaN or infinite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Raw per-cycle input from the sensor collaborators
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensorFrame {
    /// Color sensor channels (red, green, blue photodiodes)
    pub light: Axes,
    /// On-board temperature channel
    pub temperature: f32,
    /// Linear acceleration, gravity removed
    pub accel: Axes,
    /// Angular rate
    pub gyro: Axes,
}

impl SensorFrame {
    /// Sum of the three light channels
    pub fn combined_light(&self) -> f32 {
        self.light.x + self.light.y + self.light.z
    }

    /// Magnitude of linear acceleration
    pub fn accel_magnitude(&self) -> f32 {
        self.accel.magnitude()
    }

    /// Change in angular rate since `previous`, 0 without a previous frame
    pub fn gyro_delta(&self, previous: Option<&SensorFrame>) -> f32 {
        previous
            .map(|prev| self.gyro.delta(&prev.gyro).magnitude())
            .unwrap_or(0.0)
    }

    /// Derive one reading per metric, in [`Metric::ALL`] order
    pub fn readings(&self, previous: Option<&SensorFrame>) -> [Reading; Metric::COUNT] {
        [
            Reading::new(Metric::Light, self.combined_light()),
            Reading::new(Metric::Temperature, self.temperature),
            Reading::new(Metric::AccelMagnitude, self.accel_magnitude()),
            Reading::new(Metric::GyroDelta, self.gyro_delta(previous)),
        ]
    }
}
