// Copyright 2025 Au-Zone Technologies Inc.
// SPDX-License-Identifier: Apache-2.0

//! BMM150 magnetometer over a [`RegisterInterface`].
//!
//! Raw Hall readings are temperature- and offset-compensated with the
//! per-part trim values stored in the device's NVM.

use crate::constants::bmm150_reg as reg;
use crate::constants::*;
use crate::device::{MagSettings, MagnetometerDevice, PowerMode, PresetMode};
use crate::diagnostics::ErrorCode;
use crate::interface::RegisterInterface;
use crate::Error;
use log::{debug, trace, warn};

/// Factory trim values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrimData {
    pub dig_x1: i8,
    pub dig_y1: i8,
    pub dig_x2: i8,
    pub dig_y2: i8,
    pub dig_z1: u16,
    pub dig_z2: i16,
    pub dig_z3: i16,
    pub dig_z4: i16,
    pub dig_xy1: u8,
    pub dig_xy2: i8,
    pub dig_xyz1: u16,
}

impl TrimData {
    /// Build from the three trim blocks at 0x5D (2 bytes), 0x62 (4 bytes)
    /// and 0x68 (10 bytes)
    pub fn parse(x1y1: &[u8; 2], xyz: &[u8; 4], xy1xy2: &[u8; 10]) -> Self {
        Self {
            dig_x1: x1y1[0] as i8,
            dig_y1: x1y1[1] as i8,
            dig_z4: i16::from_le_bytes([xyz[0], xyz[1]]),
            dig_x2: xyz[2] as i8,
            dig_y2: xyz[3] as i8,
            dig_z2: i16::from_le_bytes([xy1xy2[0], xy1xy2[1]]),
            dig_z1: u16::from_le_bytes([xy1xy2[2], xy1xy2[3]]),
            dig_xyz1: u16::from_le_bytes([xy1xy2[4], xy1xy2[5] & 0x7F]),
            dig_z3: i16::from_le_bytes([xy1xy2[6], xy1xy2[7]]),
            dig_xy2: xy1xy2[8] as i8,
            dig_xy1: xy1xy2[9],
        }
    }

    fn compensate_xy(&self, raw: i16, rhall: u16, dig1: i8, dig2: i8) -> f32 {
        if raw == BMM150_OVERFLOW_ADCVAL_XY || rhall == 0 || self.dig_xyz1 == 0 {
            return 0.0;
        }
        let x0 = f32::from(self.dig_xyz1) * 16384.0 / f32::from(rhall);
        let r = x0 - 16384.0;
        let x1 = f32::from(self.dig_xy2) * (r * r / 268_435_456.0);
        let x2 = x1 + r * f32::from(self.dig_xy1) / 16384.0;
        let x3 = f32::from(dig2) + 160.0;
        let x4 = f32::from(raw) * ((x2 + 256.0) * x3);
        (x4 / 8192.0 + f32::from(dig1) * 8.0) / 16.0
    }

    /// Compensated X axis in µT
    pub fn compensate_x(&self, raw: i16, rhall: u16) -> f32 {
        self.compensate_xy(raw, rhall, self.dig_x1, self.dig_x2)
    }

    /// Compensated Y axis in µT
    pub fn compensate_y(&self, raw: i16, rhall: u16) -> f32 {
        self.compensate_xy(raw, rhall, self.dig_y1, self.dig_y2)
    }

    /// Compensated Z axis in µT
    pub fn compensate_z(&self, raw: i16, rhall: u16) -> f32 {
        if raw == BMM150_OVERFLOW_ADCVAL_Z
            || self.dig_z2 == 0
            || self.dig_z1 == 0
            || self.dig_xyz1 == 0
            || rhall == 0
        {
            return 0.0;
        }
        let z0 = f32::from(raw) - f32::from(self.dig_z4);
        let z1 = f32::from(rhall) - f32::from(self.dig_xyz1);
        let z2 = f32::from(self.dig_z3) * z1;
        let z3 = f32::from(self.dig_z1) * f32::from(rhall) / 32768.0;
        let z4 = f32::from(self.dig_z2) + z3;
        let z5 = z0 * 131_072.0 - z2;
        z5 / (z4 * 4.0) / 16.0
    }
}

/// One unpacked data frame (0x42..=0x49)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawMagData {
    pub x: i16,
    pub y: i16,
    pub z: i16,
    pub rhall: u16,
    pub data_ready: bool,
}

impl RawMagData {
    pub fn parse(frame: &[u8; BMM150_DATA_LEN]) -> Self {
        // 13-bit X/Y, 15-bit Z, 14-bit RHALL, all left-justified
        let x = i16::from(frame[1] as i8) * 32 | i16::from(frame[0] >> 3);
        let y = i16::from(frame[3] as i8) * 32 | i16::from(frame[2] >> 3);
        let z = i16::from(frame[5] as i8) * 128 | i16::from(frame[4] >> 1);
        let rhall = u16::from(frame[7]) << 6 | u16::from(frame[6] >> 2);
        Self {
            x,
            y,
            z,
            rhall,
            data_ready: frame[6] & 0x01 != 0,
        }
    }
}

fn preset_values(preset: PresetMode) -> (u8, u8, u8) {
    // (data rate code, REP_XY, REP_Z)
    match preset {
        PresetMode::LowPower => (0, BMM150_REPXY_LOWPOWER, BMM150_REPZ_LOWPOWER),
        PresetMode::Regular => (0, BMM150_REPXY_REGULAR, BMM150_REPZ_REGULAR),
        PresetMode::Enhanced => (0, BMM150_REPXY_ENHANCED, BMM150_REPZ_ENHANCED),
        PresetMode::HighAccuracy => (5, BMM150_REPXY_HIGHACCURACY, BMM150_REPZ_HIGHACCURACY),
    }
}

pub struct Bmm150<I> {
    iface: I,
    trim: TrimData,
}

impl<I> Bmm150<I>
where
    I: RegisterInterface,
{
    pub fn new(iface: I) -> Self {
        Self {
            iface,
            trim: TrimData::default(),
        }
    }

    pub fn trim(&self) -> &TrimData {
        &self.trim
    }

    pub fn release(self) -> I {
        self.iface
    }

    /// Leave suspend: set the power control bit and wait for start-up
    fn power_up(&mut self) -> Result<(), Error<I::BusError>> {
        let power = self.iface.read_register(reg::POWER_CONTROL)?;
        if power & BMM150_POWER_CONTROL_BIT == 0 {
            self.iface
                .write_register(reg::POWER_CONTROL, power | BMM150_POWER_CONTROL_BIT)?;
            self.iface.delay_us(BMM150_START_UP_DELAY_US);
        }
        Ok(())
    }

    fn read_trim(&mut self) -> Result<TrimData, Error<I::BusError>> {
        let mut x1y1 = [0u8; 2];
        let mut xyz = [0u8; 4];
        let mut xy1xy2 = [0u8; 10];
        self.iface.read_registers(reg::DIG_X1, &mut x1y1)?;
        self.iface.read_registers(reg::DIG_Z4_LSB, &mut xyz)?;
        self.iface.read_registers(reg::DIG_Z2_LSB, &mut xy1xy2)?;
        Ok(TrimData::parse(&x1y1, &xyz, &xy1xy2))
    }

    /// Read one unpacked data frame
    pub fn raw_data(&mut self) -> Result<RawMagData, Error<I::BusError>> {
        let mut frame = [0u8; BMM150_DATA_LEN];
        self.iface.read_registers(reg::DATA_X_LSB, &mut frame)?;
        Ok(RawMagData::parse(&frame))
    }
}

impl<I> MagnetometerDevice for Bmm150<I>
where
    I: RegisterInterface,
{
    type BusError = I::BusError;

    fn init(&mut self) -> Result<(), Error<Self::BusError>> {
        self.power_up()?;

        let chip_id = self.iface.read_register(reg::CHIP_ID)?;
        if chip_id != BMM150_CHIP_ID {
            warn!("unexpected BMM150 chip id 0x{:02X}", chip_id);
            return Err(Error::Device(ErrorCode::DeviceNotFound));
        }

        self.trim = self.read_trim()?;
        debug!("BMM150 trim {:?}", self.trim);
        Ok(())
    }

    fn set_power_mode(&mut self, mode: PowerMode) -> Result<(), Error<Self::BusError>> {
        let bits = match mode {
            PowerMode::Normal => 0x00,
            PowerMode::Forced => 0x01,
            PowerMode::Sleep => 0x03,
            PowerMode::Suspend => {
                return self
                    .iface
                    .update_register(reg::POWER_CONTROL, BMM150_POWER_CONTROL_BIT, 0);
            }
        };
        self.power_up()?;
        trace!("BMM150 op mode {:?}", mode);
        self.iface.update_register(
            reg::OP_MODE,
            BMM150_OP_MODE_MASK,
            bits << BMM150_OP_MODE_POS,
        )
    }

    fn set_preset_mode(&mut self, preset: PresetMode) -> Result<(), Error<Self::BusError>> {
        let (rate, rep_xy, rep_z) = preset_values(preset);
        self.iface.update_register(
            reg::OP_MODE,
            BMM150_DATA_RATE_MASK,
            rate << BMM150_DATA_RATE_POS,
        )?;
        // REP_XY and REP_Z are adjacent
        self.iface.write_registers(reg::REP_XY, &[rep_xy, rep_z])
    }

    fn set_data_ready_pin(&mut self, enable: bool) -> Result<(), Error<Self::BusError>> {
        let value = if enable { BMM150_DRDY_PIN_EN } else { 0 };
        self.iface
            .update_register(reg::AXES_ENABLE, BMM150_DRDY_PIN_EN, value)
    }

    fn mag_data(&mut self) -> Result<[f32; 3], Error<Self::BusError>> {
        let raw = self.raw_data()?;
        Ok([
            self.trim.compensate_x(raw.x, raw.rhall),
            self.trim.compensate_y(raw.y, raw.rhall),
            self.trim.compensate_z(raw.z, raw.rhall),
        ])
    }

    fn interrupt_status(&mut self) -> Result<u16, Error<Self::BusError>> {
        // 0x48 data-ready status, 0x49 high byte of RHALL, 0x4A interrupt status
        let mut buf = [0u8; 3];
        self.iface.read_registers(reg::DATA_READY_STATUS, &mut buf)?;
        Ok(u16::from(buf[0] & 0x01) << 8 | u16::from(buf[2]))
    }

    fn settings(&mut self) -> Result<MagSettings, Error<Self::BusError>> {
        // POWER_CONTROL through REP_Z in one burst
        let mut buf = [0u8; 8];
        self.iface.read_registers(reg::POWER_CONTROL, &mut buf)?;
        let op_mode = buf[1];
        let power_mode = if buf[0] & BMM150_POWER_CONTROL_BIT == 0 {
            PowerMode::Suspend
        } else {
            match (op_mode & BMM150_OP_MODE_MASK) >> BMM150_OP_MODE_POS {
                0x00 => PowerMode::Normal,
                0x01 => PowerMode::Forced,
                _ => PowerMode::Sleep,
            }
        };
        Ok(MagSettings {
            power_mode,
            data_rate: (op_mode & BMM150_DATA_RATE_MASK) >> BMM150_DATA_RATE_POS,
            xy_rep: buf[6],
            z_rep: buf[7],
            drdy_pin_en: buf[3] & BMM150_DRDY_PIN_EN != 0,
        })
    }
}
