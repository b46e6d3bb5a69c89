//! Report Payload Layout
//!
//! The radio collaborator streams the report one byte at a time through a
//! single GATT characteristic, so every field is one byte and each group is
//! preceded by an ASCII marker the phone app synchronizes on.
//!
//! ```text
//! [0..2]   00 00            preamble
//! [2..6]   'G' gx gy gz     latest gyroscope axes
//! [6..10]  'L' lx ly lz     latest light channels
//! [10..14] 'A' ax ay az     latest acceleration axes
//! [14..16] 'T' t            latest temperature
//! [16..20] 'C' dark hot idle debounced flags (0/1)
//! [20..22] 'H' score        composite score 0..=100
//! [22..24] 'S' state        device state id 0..=4
//! ```

/// Total payload length in bytes.
pub const REPORT_LEN: usize = 24;

/// Gyroscope group marker.
pub const MARK_GYRO: u8 = b'G';
/// Light group marker.
pub const MARK_LIGHT: u8 = b'L';
/// Accelerometer group marker.
pub const MARK_ACCEL: u8 = b'A';
/// Temperature marker.
pub const MARK_TEMP: u8 = b'T';
/// Condition flags marker.
pub const MARK_FLAGS: u8 = b'C';
/// Happiness (composite score) marker.
pub const MARK_SCORE: u8 = b'H';
/// Device state marker.
pub const MARK_STATE: u8 = b'S';
