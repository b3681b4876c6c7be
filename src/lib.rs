// Copyright 2025 Au-Zone Technologies Inc.
// SPDX-License-Identifier: Apache-2.0

//! Polling driver for a Bosch BMI270 accelerometer/gyroscope and a BMM150
//! magnetometer that share one I2C bus.
//!
//! The [`Imu`] driver initializes both chips, applies an operating profile
//! and exposes readings in physical units together with data-ready checks and
//! effective sample rates. The chips are reached through the narrow
//! [`AccelGyroDevice`] and [`MagnetometerDevice`] traits, so any register
//! protocol implementation can be injected in place of the bundled
//! [`Bmi270`] and [`Bmm150`] handles.

pub mod availability;
pub mod bmi270;
pub mod bmm150;
pub mod config;
pub mod constants;
pub mod conversion;
pub mod device;
pub mod diagnostics;
pub mod driver;
pub mod interface;
pub mod sequencer;

pub use bmi270::Bmi270;
pub use bmm150::Bmm150;
pub use config::{ImuConfig, InitPolicy, MagnetometerProfile};
pub use conversion::Orientation;
pub use device::{AccelGyroDevice, MagnetometerDevice};
pub use diagnostics::{DiagnosticsSink, ErrorCode, LogSink};
pub use driver::{Imu, MotionSample, OperatingMode};
pub use interface::{I2cInterface, RegisterInterface, SharedBus, MAX_TRANSFER_LEN};

/// Errors in this crate
#[derive(Debug, thiserror::Error)]
pub enum Error<E> {
    /// A register transfer was requested with a length outside
    /// `1..=MAX_TRANSFER_LEN`. The bus is not touched.
    #[error("transfer length {0} outside 1..={max}", max = MAX_TRANSFER_LEN)]
    InvalidLength(usize),
    /// Sensor communication error
    #[error("bus transaction failed: {0:?}")]
    Bus(E),
    /// The device rejected a request or never reached the expected state
    #[error("{0}")]
    Device(ErrorCode),
}

impl<E> Error<E> {
    /// Device error code used when rendering this error for diagnostics
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::InvalidLength(_) => ErrorCode::InvalidInput,
            Error::Bus(_) => ErrorCode::CommunicationFailure,
            Error::Device(code) => *code,
        }
    }
}
