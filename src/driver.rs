// Copyright 2025 Au-Zone Technologies Inc.
// SPDX-License-Identifier: Apache-2.0

//! Combined BMI270 + BMM150 IMU driver.
//!
//! This module contains the polling driver that initializes both devices,
//! applies the operating profile and converts raw readings to physical units.

use crate::availability::StatusLatch;
use crate::bmi270::Bmi270;
use crate::bmm150::Bmm150;
use crate::config::{ImuConfig, InitPolicy};
use crate::constants::BMM150_INT_ASSERTED_DRDY;
use crate::conversion::{accel_scale, gyro_scale, magnetometer_rate, to_physical};
use crate::device::{
    AccelConfig, AccelGyroDevice, GyroConfig, IntStatus, MagnetometerDevice,
    SensorConfig, SensorType,
};
use crate::diagnostics::{DiagnosticsSink, ErrorCode, Reporter};
use crate::interface::{I2cInterface, SharedBus};
use crate::sequencer;
use crate::Error;
use core::fmt::Debug;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::{debug, trace, warn};

/// Accel/gyro acquisition mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OperatingMode {
    /// FIFO streaming enabled for accel and gyro
    Continuous,
    /// Registers hold the latest sample only
    #[default]
    OneShot,
}

/// Accel (g) and gyro (°/s) from one data read
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotionSample {
    pub acceleration: [f32; 3],
    pub gyroscope: [f32; 3],
}

/// BMI270 + BMM150 polling driver
///
/// Devices are injected through [`AccelGyroDevice`] and
/// [`MagnetometerDevice`]; [`Imu::new_i2c`] wires up the bundled register
/// implementations on one shared bus.
pub struct Imu<A, M> {
    accel_gyro: A,
    magnetometer: M,
    config: ImuConfig,
    mode: OperatingMode,
    /// Data-ready bits observed but not yet consumed
    latch: StatusLatch,
    reporter: Reporter,
    initialized: bool,
}

impl<'a, I2C, D> Imu<Bmi270<I2cInterface<'a, I2C, D>>, Bmm150<I2cInterface<'a, I2C, D>>>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Create a driver for a BMI270 at `accel_gyro_address` and a BMM150 at
    /// `mag_address`, both on `bus`
    ///
    /// # Arguments
    /// * `bus` - Shared I2C bus and delay source
    /// * `accel_gyro_address` - 7-bit BMI270 address (usually 0x68)
    /// * `mag_address` - 7-bit BMM150 address (usually 0x10)
    /// * `config` - Operating profile
    pub fn new_i2c(
        bus: &'a SharedBus<I2C, D>,
        accel_gyro_address: u8,
        mag_address: u8,
        config: ImuConfig,
    ) -> Self {
        let accel_gyro =
            Bmi270::new(bus.device(accel_gyro_address)).with_read_write_len(config.read_write_len);
        let magnetometer = Bmm150::new(bus.device(mag_address));
        Imu::new(accel_gyro, magnetometer, config)
    }
}

impl<A, M> Imu<A, M> {
    pub fn new(accel_gyro: A, magnetometer: M, config: ImuConfig) -> Self {
        Self {
            accel_gyro,
            magnetometer,
            config,
            mode: OperatingMode::OneShot,
            latch: StatusLatch::new(),
            reporter: Reporter::default(),
            initialized: false,
        }
    }

    /// Attach (or with `None`, detach) the diagnostics sink
    pub fn set_diagnostics(&mut self, sink: Option<Box<dyn DiagnosticsSink>>) {
        self.reporter.set_sink(sink);
    }

    pub fn config(&self) -> &ImuConfig {
        &self.config
    }

    pub fn accel_config(&self) -> &AccelConfig {
        &self.config.accel
    }

    pub fn gyro_config(&self) -> &GyroConfig {
        &self.config.gyro
    }

    pub fn mode(&self) -> OperatingMode {
        self.mode
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Returns the device handles
    pub fn free(self) -> (A, M) {
        (self.accel_gyro, self.magnetometer)
    }
}

impl<A, M, E> Imu<A, M>
where
    A: AccelGyroDevice<BusError = E>,
    M: MagnetometerDevice<BusError = E>,
    E: Debug,
{
    /// Report a step outcome; under the strict policy a failure ends `begin`
    fn step(&mut self, name: &str, result: Result<(), Error<E>>) -> Result<(), Error<E>> {
        self.reporter.report(&result);
        match result {
            Ok(()) => {
                trace!("{}: ok", name);
                Ok(())
            }
            Err(e) => {
                warn!("{}: {:?}", name, e);
                match self.config.init_policy {
                    InitPolicy::Strict => Err(e),
                    InitPolicy::Lenient => Ok(()),
                }
            }
        }
    }

    /// Initialize and configure both devices.
    ///
    /// Runs accel/gyro init, accel/gyro configuration, magnetometer init and
    /// magnetometer configuration in that order, reporting each outcome to
    /// the diagnostics sink. With [`InitPolicy::Lenient`] every step runs and
    /// the driver always ends up initialized; with [`InitPolicy::Strict`] the
    /// first failure is returned.
    pub fn begin(&mut self) -> Result<(), Error<E>> {
        debug!("begin, policy {:?}", self.config.init_policy);

        let result = self.accel_gyro.init();
        self.step("accel/gyro init", result)?;

        let (accel, gyro) = (self.config.accel, self.config.gyro);
        let result = sequencer::configure_accel_gyro(&mut self.accel_gyro, &accel, &gyro);
        self.step("accel/gyro configure", result)?;

        let result = self.magnetometer.init();
        self.step("magnetometer init", result)?;

        let profile = self.config.magnetometer;
        let result = sequencer::configure_magnetometer(&mut self.magnetometer, &profile);
        self.step("magnetometer configure", result)?;

        self.latch = StatusLatch::new();
        self.initialized = true;
        Ok(())
    }

    /// Enable accel/gyro FIFO streaming
    pub fn set_continuous_mode(&mut self) -> Result<(), Error<E>> {
        sequencer::set_streaming(&mut self.accel_gyro, true)?;
        self.mode = OperatingMode::Continuous;
        Ok(())
    }

    /// Disable accel/gyro FIFO streaming
    pub fn one_shot_mode(&mut self) -> Result<(), Error<E>> {
        sequencer::set_streaming(&mut self.accel_gyro, false)?;
        self.mode = OperatingMode::OneShot;
        Ok(())
    }

    /// Accel and gyro from a single data read
    pub fn read_motion(&mut self) -> Result<MotionSample, Error<E>> {
        let data = self.accel_gyro.sensor_data()?;
        let orientation = self.config.orientation;
        Ok(MotionSample {
            acceleration: orientation
                .apply(to_physical(data.acc, accel_scale(self.config.accel.range))),
            gyroscope: orientation
                .apply(to_physical(data.gyr, gyro_scale(self.config.gyro.range))),
        })
    }

    /// Acceleration in g
    pub fn read_acceleration(&mut self) -> Result<[f32; 3], Error<E>> {
        Ok(self.read_motion()?.acceleration)
    }

    /// Angular rate in °/s
    pub fn read_gyroscope(&mut self) -> Result<[f32; 3], Error<E>> {
        Ok(self.read_motion()?.gyroscope)
    }

    /// Magnetic field in µT
    pub fn read_magnetic_field(&mut self) -> Result<[f32; 3], Error<E>> {
        self.magnetometer.mag_data()
    }

    fn data_available(&mut self, mask: IntStatus) -> Result<bool, Error<E>> {
        let status = self.accel_gyro.int_status()?;
        Ok(self.latch.take(status, mask))
    }

    /// Has a new accel sample arrived since the last check?
    pub fn acceleration_available(&mut self) -> Result<bool, Error<E>> {
        self.data_available(IntStatus::ACC_DRDY)
    }

    /// Has a new gyro sample arrived since the last check?
    pub fn gyroscope_available(&mut self) -> Result<bool, Error<E>> {
        self.data_available(IntStatus::GYR_DRDY)
    }

    pub fn magnetic_field_available(&mut self) -> Result<bool, Error<E>> {
        let status = self.magnetometer.interrupt_status()?;
        Ok(status & BMM150_INT_ASSERTED_DRDY != 0)
    }

    /// Configured accel output data rate in Hz
    pub fn acceleration_sample_rate(&mut self) -> Result<f32, Error<E>> {
        match self.accel_gyro.sensor_config(SensorType::Accel)? {
            SensorConfig::Accel(cfg) => Ok(cfg.odr.hz()),
            SensorConfig::Gyro(_) => Err(Error::Device(ErrorCode::InvalidSensor)),
        }
    }

    /// Configured gyro output data rate in Hz
    pub fn gyroscope_sample_rate(&mut self) -> Result<f32, Error<E>> {
        match self.accel_gyro.sensor_config(SensorType::Gyro)? {
            SensorConfig::Gyro(cfg) => Ok(cfg.odr.hz()),
            SensorConfig::Accel(_) => Err(Error::Device(ErrorCode::InvalidSensor)),
        }
    }

    /// Magnetometer data rate in Hz, `0.0` for an unrecognized setting
    pub fn magnetic_field_sample_rate(&mut self) -> Result<f32, Error<E>> {
        let settings = self.magnetometer.settings()?;
        Ok(magnetometer_rate(settings.data_rate))
    }
}
