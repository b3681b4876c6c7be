// Copyright 2025 Au-Zone Technologies Inc.
// SPDX-License-Identifier: Apache-2.0

//! Byte-oriented register transport shared by the device handles.

use crate::Error;
use core::fmt::Debug;

#[cfg(feature = "linux")]
pub mod gpio;
pub mod i2c;
#[cfg(feature = "linux")]
pub mod linux;

pub use i2c::{I2cInterface, SharedBus};

/// Largest register block moved in one transfer
pub const MAX_TRANSFER_LEN: usize = 32;

/// Register-level access to one device on a bus.
///
/// Every transfer length must be in `1..=MAX_TRANSFER_LEN`; anything else is
/// rejected with [`Error::InvalidLength`] before the bus is touched.
pub trait RegisterInterface {
    type BusError: Debug;

    /// Read `buffer.len()` bytes starting at `register`.
    /// Returns the number of bytes delivered.
    fn read_registers(
        &mut self,
        register: u8,
        buffer: &mut [u8],
    ) -> Result<usize, Error<Self::BusError>>;

    /// Write `data` starting at `register` in a single bus transaction
    fn write_registers(
        &mut self,
        register: u8,
        data: &[u8],
    ) -> Result<(), Error<Self::BusError>>;

    /// Busy-wait for at least `us` microseconds
    fn delay_us(&mut self, us: u32);

    fn read_register(&mut self, register: u8) -> Result<u8, Error<Self::BusError>> {
        let mut buf = [0u8; 1];
        self.read_registers(register, &mut buf)?;
        Ok(buf[0])
    }

    fn write_register(
        &mut self,
        register: u8,
        value: u8,
    ) -> Result<(), Error<Self::BusError>> {
        self.write_registers(register, &[value])
    }

    /// Read-modify-write of the bits selected by `mask`
    fn update_register(
        &mut self,
        register: u8,
        mask: u8,
        value: u8,
    ) -> Result<(), Error<Self::BusError>> {
        let current = self.read_register(register)?;
        self.write_register(register, (current & !mask) | (value & mask))
    }
}

pub(crate) fn check_transfer_len<E>(len: usize) -> Result<(), Error<E>> {
    if len == 0 || len > MAX_TRANSFER_LEN {
        return Err(Error::InvalidLength(len));
    }
    Ok(())
}
