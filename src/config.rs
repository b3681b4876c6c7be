// Copyright 2025 Au-Zone Technologies Inc.
// SPDX-License-Identifier: Apache-2.0

use crate::bmi270::DEFAULT_READ_WRITE_LEN;
use crate::conversion::Orientation;
use crate::device::{AccelConfig, GyroConfig, PresetMode};

/// What [`Imu::begin`](crate::Imu::begin) does when a step fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InitPolicy {
    /// Report the failure and carry on with the next step
    #[default]
    Lenient,
    /// Stop at the first failure and return it
    Strict,
}

/// Magnetometer tuning applied after the power mode is set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MagnetometerProfile {
    /// Repetition/data-rate preset; `None` keeps the power-on values
    pub preset: Option<PresetMode>,
    /// Route data ready to the DRDY pin
    pub data_ready_pin: bool,
}

/// Operating profile for both devices.
///
/// `Default` is the standard profile: ±4 g and ±2000 °/s at 100 Hz with the
/// performance filter, magnetometer in normal mode without preset tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImuConfig {
    pub accel: AccelConfig,
    pub gyro: GyroConfig,
    pub magnetometer: MagnetometerProfile,
    pub orientation: Orientation,
    pub init_policy: InitPolicy,
    /// BMI270 configuration upload chunk size, used by `Imu::new_i2c`
    pub read_write_len: usize,
}

impl Default for ImuConfig {
    fn default() -> Self {
        Self {
            accel: AccelConfig::default(),
            gyro: GyroConfig::default(),
            magnetometer: MagnetometerProfile::default(),
            orientation: Orientation::Normal,
            init_policy: InitPolicy::Lenient,
            read_write_len: DEFAULT_READ_WRITE_LEN,
        }
    }
}

impl ImuConfig {
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_init_policy(mut self, policy: InitPolicy) -> Self {
        self.init_policy = policy;
        self
    }

    pub fn with_magnetometer(mut self, profile: MagnetometerProfile) -> Self {
        self.magnetometer = profile;
        self
    }
}
