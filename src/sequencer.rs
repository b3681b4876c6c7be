// Copyright 2025 Au-Zone Technologies Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration steps for the two devices.
//!
//! Each sequence stops at the first failing step and returns that step's
//! error unchanged. Reporting is left to the caller.

use crate::config::MagnetometerProfile;
use crate::device::{
    AccelConfig, AccelGyroDevice, FifoConfig, GyroConfig, IntPin, IntPinConfig,
    MagnetometerDevice, PowerMode, SensorConfig, SensorType,
};
use crate::Error;
use log::trace;

/// FIFO sources toggled by continuous / one-shot mode
pub const STREAMING_FIFO: FifoConfig = FifoConfig::ACC_EN.union(FifoConfig::GYR_EN);

/// Wire data-ready to INT1, apply both profiles in one write, then enable
/// both channels.
pub fn configure_accel_gyro<A>(
    dev: &mut A,
    accel: &AccelConfig,
    gyro: &GyroConfig,
) -> Result<(), Error<A::BusError>>
where
    A: AccelGyroDevice,
{
    trace!("configure_accel_gyro");
    dev.set_int_pin_config(&IntPinConfig::data_ready(IntPin::Int1))?;
    dev.map_data_int(IntPin::Int1)?;
    dev.set_sensor_config(&[SensorConfig::Accel(*accel), SensorConfig::Gyro(*gyro)])?;
    dev.enable_sensors(&[SensorType::Accel, SensorType::Gyro])
}

/// Normal power mode first; preset and DRDY pin only once it succeeded.
pub fn configure_magnetometer<M>(
    dev: &mut M,
    profile: &MagnetometerProfile,
) -> Result<(), Error<M::BusError>>
where
    M: MagnetometerDevice,
{
    trace!("configure_magnetometer {:?}", profile);
    dev.set_power_mode(PowerMode::Normal)?;
    if let Some(preset) = profile.preset {
        dev.set_preset_mode(preset)?;
    }
    if profile.data_ready_pin {
        dev.set_data_ready_pin(true)?;
    }
    Ok(())
}

/// Enable or disable accel+gyro FIFO streaming
pub fn set_streaming<A>(dev: &mut A, enable: bool) -> Result<(), Error<A::BusError>>
where
    A: AccelGyroDevice,
{
    dev.set_fifo_config(STREAMING_FIFO, enable)
}
