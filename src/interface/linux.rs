// Copyright 2025 Au-Zone Technologies Inc.
// SPDX-License-Identifier: Apache-2.0

use super::SharedBus;
use linux_embedded_hal::i2cdev::linux::LinuxI2CError;
use linux_embedded_hal::{Delay, I2cdev};
use log::debug;
use std::path::Path;

/// Bus type produced by [`open_bus`]
pub type LinuxBus = SharedBus<I2cdev, Delay>;

/// Open an i2c-dev character device (e.g. `/dev/i2c-1`) as a shared bus.
///
/// Hung transactions are bounded by the kernel adapter timeout and surface
/// as bus errors.
pub fn open_bus<P: AsRef<Path>>(path: P) -> Result<LinuxBus, LinuxI2CError> {
    let path = path.as_ref();
    debug!("opening {}", path.display());
    let i2c = I2cdev::new(path)?;
    Ok(SharedBus::new(i2c, Delay))
}
