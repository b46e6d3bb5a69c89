//! Report Snapshot and Payload Encoding
//!
//! A [`Report`] is a `Copy` snapshot of what the collar knows at the end of
//! a cycle. The radio collaborator gets the typed record and, if it wants
//! the collar's historical payload, the 24-byte encoding described in
//! [`constants::wire`](crate::constants::wire).
//!
//! Every value is squeezed into one byte: rounded to the nearest integer and
//! saturated to `0..=255`. Negative values and NaN encode as 0.

use crate::aggregation::Flags;
use crate::constants::wire::{
    MARK_ACCEL, MARK_FLAGS, MARK_GYRO, MARK_LIGHT, MARK_SCORE, MARK_STATE, MARK_TEMP, REPORT_LEN,
};
use crate::fsm::DeviceState;
use crate::reading::{Axes, SensorFrame};
use crate::score::CompositeScore;

/// End-of-cycle snapshot handed to the reporting collaborator
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Report {
    /// Cycle number the snapshot was taken on
    pub cycle: u64,
    /// Latest raw frame
    pub frame: SensorFrame,
    /// Debounced flags
    pub flags: Flags,
    /// Composite score from the last reporting cycle
    pub score: CompositeScore,
    /// Current device state
    pub state: DeviceState,
}

/// Byte-level view of a decoded payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireRecord {
    /// Gyroscope x, y, z
    pub gyro: [u8; 3],
    /// Light channels x, y, z
    pub light: [u8; 3],
    /// Acceleration x, y, z
    pub accel: [u8; 3],
    /// Temperature
    pub temperature: u8,
    /// Debounced flags
    pub flags: Flags,
    /// Composite score
    pub score: u8,
    /// Device state
    pub state: DeviceState,
}

impl Report {
    /// Encode into the collar payload
    pub fn encode(&self) -> [u8; REPORT_LEN] {
        let f = &self.frame;
        let [gx, gy, gz] = axes_to_bytes(&f.gyro);
        let [lx, ly, lz] = axes_to_bytes(&f.light);
        let [ax, ay, az] = axes_to_bytes(&f.accel);

        [
            0,
            0,
            MARK_GYRO,
            gx,
            gy,
            gz,
            MARK_LIGHT,
            lx,
            ly,
            lz,
            MARK_ACCEL,
            ax,
            ay,
            az,
            MARK_TEMP,
            to_byte(f.temperature),
            MARK_FLAGS,
            u8::from(self.flags.too_dark),
            u8::from(self.flags.too_hot),
            u8::from(self.flags.inactive),
            MARK_SCORE,
            self.score.as_byte(),
            MARK_STATE,
            self.state.id(),
        ]
    }

    /// Parse a payload
    ///
    /// `None` when the length, a marker, a flag byte or the state id is off.
    pub fn decode(bytes: &[u8]) -> Option<WireRecord> {
        let b: &[u8; REPORT_LEN] = bytes.try_into().ok()?;

        let markers = [
            (2, MARK_GYRO),
            (6, MARK_LIGHT),
            (10, MARK_ACCEL),
            (14, MARK_TEMP),
            (16, MARK_FLAGS),
            (20, MARK_SCORE),
            (22, MARK_STATE),
        ];
        if b[0] != 0 || b[1] != 0 || markers.iter().any(|&(at, mark)| b[at] != mark) {
            return None;
        }

        Some(WireRecord {
            gyro: [b[3], b[4], b[5]],
            light: [b[7], b[8], b[9]],
            accel: [b[11], b[12], b[13]],
            temperature: b[15],
            flags: Flags {
                too_dark: flag(b[17])?,
                too_hot: flag(b[18])?,
                inactive: flag(b[19])?,
            },
            score: b[21],
            state: DeviceState::from_id(b[23])?,
        })
    }
}

fn to_byte(value: f32) -> u8 {
    // `as` saturates and maps NaN to 0
    libm::roundf(value) as u8
}

fn axes_to_bytes(axes: &Axes) -> [u8; 3] {
    [to_byte(axes.x), to_byte(axes.y), to_byte(axes.z)]
}

fn flag(byte: u8) -> Option<bool> {
    match byte {
        0 => Some(false),
        1 => Some(true),
        _ => None,
    }
}
