// Copyright 2025 Au-Zone Technologies Inc.
// SPDX-License-Identifier: Apache-2.0

use super::{check_transfer_len, RegisterInterface, MAX_TRANSFER_LEN};
use crate::Error;
use core::cell::RefCell;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::trace;

/// One I2C bus and delay source shared by several device handles.
///
/// Access is serialized through `RefCell`, which makes the bus `!Sync`;
/// callers sharing it across threads must serialize access themselves.
pub struct SharedBus<I2C, D> {
    i2c: RefCell<I2C>,
    delay: RefCell<D>,
}

impl<I2C, D> SharedBus<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self {
            i2c: RefCell::new(i2c),
            delay: RefCell::new(delay),
        }
    }

    /// Register interface for the device at the 7-bit `address`
    pub fn device(&self, address: u8) -> I2cInterface<'_, I2C, D> {
        I2cInterface { bus: self, address }
    }

    /// Give back the bus and the delay source
    pub fn release(self) -> (I2C, D) {
        (self.i2c.into_inner(), self.delay.into_inner())
    }
}

/// A device address on a [`SharedBus`]
pub struct I2cInterface<'a, I2C, D> {
    bus: &'a SharedBus<I2C, D>,
    address: u8,
}

impl<I2C, D> I2cInterface<'_, I2C, D> {
    pub fn address(&self) -> u8 {
        self.address
    }
}

impl<I2C, D> RegisterInterface for I2cInterface<'_, I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    type BusError = I2C::Error;

    fn read_registers(
        &mut self,
        register: u8,
        buffer: &mut [u8],
    ) -> Result<usize, Error<Self::BusError>> {
        check_transfer_len(buffer.len())?;
        self.bus
            .i2c
            .borrow_mut()
            .write_read(self.address, &[register], buffer)
            .map_err(Error::Bus)?;
        trace!(
            "i2c 0x{:02X} read 0x{:02X} <- {:02X?}",
            self.address,
            register,
            buffer
        );
        Ok(buffer.len())
    }

    fn write_registers(
        &mut self,
        register: u8,
        data: &[u8],
    ) -> Result<(), Error<Self::BusError>> {
        check_transfer_len(data.len())?;
        // register address followed by the payload
        let mut buf = [0u8; MAX_TRANSFER_LEN + 1];
        buf[0] = register;
        buf[1..=data.len()].copy_from_slice(data);
        trace!(
            "i2c 0x{:02X} write 0x{:02X} -> {:02X?}",
            self.address,
            register,
            data
        );
        self.bus
            .i2c
            .borrow_mut()
            .write(self.address, &buf[..=data.len()])
            .map_err(Error::Bus)
    }

    fn delay_us(&mut self, us: u32) {
        self.bus.delay.borrow_mut().delay_us(us);
    }
}
