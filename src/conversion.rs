// Copyright 2025 Au-Zone Technologies Inc.
// SPDX-License-Identifier: Apache-2.0

//! Raw-to-physical conversion

use crate::device::{AccelRange, GyroRange, MagDataRate};

/// Full-scale count of a signed 16-bit sample
const FULL_SCALE: f32 = 32768.0;

/// Board mounting of the sensor package, resolved once at construction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Orientation {
    #[default]
    Normal,
    /// Package rotated on the board: `(x, y, z) -> (-y, -x, z)`
    Rotated90,
}

impl Orientation {
    pub fn apply(self, v: [f32; 3]) -> [f32; 3] {
        match self {
            Orientation::Normal => v,
            Orientation::Rotated90 => [-v[1], -v[0], v[2]],
        }
    }
}

/// LSB per g
pub fn accel_scale(range: AccelRange) -> f32 {
    FULL_SCALE / range.g()
}

/// LSB per °/s
pub fn gyro_scale(range: GyroRange) -> f32 {
    FULL_SCALE / range.dps()
}

pub fn to_physical(raw: [i16; 3], scale: f32) -> [f32; 3] {
    raw.map(|v| f32::from(v) / scale)
}

/// Magnetometer rate for a raw data-rate code; unknown codes give 0 Hz
pub fn magnetometer_rate(code: u8) -> f32 {
    MagDataRate::from_code(code).map_or(0.0, MagDataRate::hz)
}
