// Copyright 2025 Au-Zone Technologies Inc.
// SPDX-License-Identifier: Apache-2.0

//! BMI270 accelerometer/gyroscope over a [`RegisterInterface`].

use crate::constants::*;
use crate::device::{
    AccelBandwidth, AccelConfig, AccelGyroDevice, AccelRange, FifoConfig,
    GyroBandwidth, GyroConfig, GyroOisRange, GyroRange, IntPin, IntPinConfig,
    IntStatus, Odr, Performance, SensorConfig, SensorData, SensorType,
};
use crate::diagnostics::ErrorCode;
use crate::interface::{RegisterInterface, MAX_TRANSFER_LEN};
use crate::Error;
use bmi2::config::BMI270_CONFIG_FILE;
use log::{debug, trace, warn};

use crate::constants::bmi270_reg as reg;

/// Configuration upload chunk size, sized for 32-byte bus buffers
pub const DEFAULT_READ_WRITE_LEN: usize = 30;

pub struct Bmi270<I> {
    iface: I,
    config_file: &'static [u8],
    read_write_len: usize,
    /// PWR_CONF advanced power save state, restored after register bursts
    adv_power_save: bool,
}

impl<I> Bmi270<I>
where
    I: RegisterInterface,
{
    pub fn new(iface: I) -> Self {
        Self {
            iface,
            config_file: &BMI270_CONFIG_FILE,
            read_write_len: DEFAULT_READ_WRITE_LEN,
            adv_power_save: false,
        }
    }

    /// Set the configuration upload chunk size. Rounded down to an even
    /// value in `2..=MAX_TRANSFER_LEN`.
    pub fn with_read_write_len(mut self, len: usize) -> Self {
        self.read_write_len = len.clamp(2, MAX_TRANSFER_LEN) & !1;
        self
    }

    /// Replace the bundled configuration file
    pub fn with_config_file(mut self, config_file: &'static [u8]) -> Self {
        self.config_file = config_file;
        self
    }

    pub fn read_write_len(&self) -> usize {
        self.read_write_len
    }

    pub fn adv_power_save(&self) -> bool {
        self.adv_power_save
    }

    pub fn release(self) -> I {
        self.iface
    }

    pub fn chip_id(&mut self) -> Result<u8, Error<I::BusError>> {
        self.iface.read_register(reg::CHIP_ID)
    }

    pub fn soft_reset(&mut self) -> Result<(), Error<I::BusError>> {
        self.iface.write_register(reg::CMD, BMI270_SOFT_RESET_CMD)?;
        self.iface.delay_us(BMI270_SOFT_RESET_DELAY_US);
        Ok(())
    }

    /// Read and cache the advanced power save bit
    fn read_adv_power_save(&mut self) -> Result<bool, Error<I::BusError>> {
        let pwr_conf = self.iface.read_register(reg::PWR_CONF)?;
        self.adv_power_save = pwr_conf & BMI270_PWR_CONF_ADV_POWER_SAVE != 0;
        Ok(self.adv_power_save)
    }

    fn write_adv_power_save(&mut self, enable: bool) -> Result<(), Error<I::BusError>> {
        let value = if enable {
            BMI270_PWR_CONF_ADV_POWER_SAVE
        } else {
            0
        };
        self.iface
            .update_register(reg::PWR_CONF, BMI270_PWR_CONF_ADV_POWER_SAVE, value)?;
        self.iface.delay_us(BMI270_POWER_SAVE_DELAY_US);
        Ok(())
    }

    /// Run `f` with advanced power save off, then restore it
    fn with_power_save_disabled<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, Error<I::BusError>>,
    ) -> Result<T, Error<I::BusError>> {
        let aps = self.adv_power_save;
        if aps {
            self.write_adv_power_save(false)?;
        }
        let result = f(self);
        if aps {
            self.write_adv_power_save(true)?;
        }
        result
    }

    /// Upload the configuration file and wait for the device to accept it
    fn load_config_file(&mut self) -> Result<(), Error<I::BusError>> {
        self.iface.write_register(reg::INIT_CTRL, 0x00)?;

        let config_file = self.config_file;
        let mut offset = 0usize;
        for chunk in config_file.chunks(self.read_write_len) {
            // address counts 16-bit words: low nibble in INIT_ADDR_0
            let word = offset / 2;
            let addr = [(word & 0x0F) as u8, (word >> 4) as u8];
            self.iface.write_registers(reg::INIT_ADDR_0, &addr)?;
            self.iface.write_registers(reg::INIT_DATA, chunk)?;
            offset += chunk.len();
        }
        trace!("uploaded {} config bytes", offset);

        self.iface.write_register(reg::INIT_CTRL, 0x01)?;

        for _ in 0..BMI270_CONFIG_LOAD_POLL_COUNT {
            self.iface.delay_us(BMI270_CONFIG_LOAD_POLL_US);
            let status = self.iface.read_register(reg::INTERNAL_STATUS)?;
            match status & BMI270_INTERNAL_STATUS_MSG_MASK {
                BMI270_INTERNAL_STATUS_INIT_OK => return Ok(()),
                0x00 => continue,
                msg => {
                    warn!("config load rejected, internal status 0x{:02X}", msg);
                    break;
                }
            }
        }
        Err(Error::Device(ErrorCode::ConfigLoad))
    }

    fn encode_accel(cfg: &AccelConfig) -> Result<[u8; 2], Error<I::BusError>> {
        if !(0x01..=0x0C).contains(&cfg.odr.0) {
            return Err(Error::Device(ErrorCode::AccelInvalidConfig));
        }
        let conf = (cfg.odr.0 & BMI270_CONF_ODR_MASK)
            | ((cfg.bandwidth as u8) << BMI270_ACC_BWP_POS) & BMI270_ACC_BWP_MASK
            | (cfg.filter_perf as u8) << BMI270_FILTER_PERF_POS;
        Ok([conf, cfg.range as u8])
    }

    fn encode_gyro(cfg: &GyroConfig) -> Result<[u8; 2], Error<I::BusError>> {
        if !(0x06..=0x0D).contains(&cfg.odr.0) {
            return Err(Error::Device(ErrorCode::GyroInvalidConfig));
        }
        let conf = (cfg.odr.0 & BMI270_CONF_ODR_MASK)
            | ((cfg.bandwidth as u8) << BMI270_GYR_BWP_POS) & BMI270_GYR_BWP_MASK
            | (cfg.noise_perf as u8) << BMI270_GYR_NOISE_PERF_POS
            | (cfg.filter_perf as u8) << BMI270_FILTER_PERF_POS;
        let range = (cfg.range as u8) | (cfg.ois_range as u8) << BMI270_GYR_OIS_RANGE_POS;
        Ok([conf, range])
    }

    fn decode_accel(bytes: [u8; 2]) -> AccelConfig {
        AccelConfig {
            odr: Odr(bytes[0] & BMI270_CONF_ODR_MASK),
            range: AccelRange::from_bits(bytes[1] & BMI270_ACC_RANGE_MASK),
            bandwidth: AccelBandwidth::from_bits(
                (bytes[0] & BMI270_ACC_BWP_MASK) >> BMI270_ACC_BWP_POS,
            ),
            filter_perf: Performance::from_bit(bytes[0] >> BMI270_FILTER_PERF_POS & 1 != 0),
        }
    }

    fn decode_gyro(bytes: [u8; 2]) -> Result<GyroConfig, Error<I::BusError>> {
        let invalid = Error::Device(ErrorCode::GyroInvalidConfig);
        let range = GyroRange::from_bits(bytes[1] & BMI270_GYR_RANGE_MASK);
        let bandwidth =
            GyroBandwidth::from_bits((bytes[0] & BMI270_GYR_BWP_MASK) >> BMI270_GYR_BWP_POS);
        let (Some(range), Some(bandwidth)) = (range, bandwidth) else {
            return Err(invalid);
        };
        let ois_range = if bytes[1] >> BMI270_GYR_OIS_RANGE_POS & 1 != 0 {
            GyroOisRange::Dps2000
        } else {
            GyroOisRange::Dps250
        };
        Ok(GyroConfig {
            odr: Odr(bytes[0] & BMI270_CONF_ODR_MASK),
            range,
            ois_range,
            bandwidth,
            noise_perf: Performance::from_bit(bytes[0] >> BMI270_GYR_NOISE_PERF_POS & 1 != 0),
            filter_perf: Performance::from_bit(bytes[0] >> BMI270_FILTER_PERF_POS & 1 != 0),
        })
    }
}

impl<I> AccelGyroDevice for Bmi270<I>
where
    I: RegisterInterface,
{
    type BusError = I::BusError;

    fn init(&mut self) -> Result<(), Error<Self::BusError>> {
        let chip_id = self.chip_id()?;
        if chip_id != BMI270_CHIP_ID {
            warn!("unexpected BMI270 chip id 0x{:02X}", chip_id);
            return Err(Error::Device(ErrorCode::DeviceNotFound));
        }

        self.soft_reset()?;

        let aps = self.read_adv_power_save()?;
        if aps {
            self.write_adv_power_save(false)?;
        }
        let loaded = self.load_config_file();
        if aps {
            self.write_adv_power_save(true)?;
        }
        loaded?;

        debug!("BMI270 initialized, advanced power save {}", aps);
        Ok(())
    }

    fn set_int_pin_config(
        &mut self,
        config: &IntPinConfig,
    ) -> Result<(), Error<Self::BusError>> {
        let io_ctrl = u8::from(config.active_high) << BMI270_INT_LVL_POS
            | u8::from(config.open_drain) << BMI270_INT_OD_POS
            | u8::from(config.output_enable) << BMI270_INT_OUTPUT_EN_POS
            | u8::from(config.input_enable) << BMI270_INT_INPUT_EN_POS;
        let register = match config.pin {
            IntPin::Int1 => reg::INT1_IO_CTRL,
            IntPin::Int2 => reg::INT2_IO_CTRL,
        };
        self.with_power_save_disabled(|dev| {
            dev.iface.write_register(register, io_ctrl)?;
            dev.iface
                .update_register(reg::INT_LATCH, 0x01, u8::from(config.latched))
        })
    }

    fn map_data_int(&mut self, pin: IntPin) -> Result<(), Error<Self::BusError>> {
        let bit = match pin {
            IntPin::Int1 => BMI270_INT1_DRDY_MAP,
            IntPin::Int2 => BMI270_INT2_DRDY_MAP,
        };
        self.with_power_save_disabled(|dev| {
            dev.iface.update_register(reg::INT_MAP_DATA, bit, bit)
        })
    }

    fn set_sensor_config(
        &mut self,
        configs: &[SensorConfig],
    ) -> Result<(), Error<Self::BusError>> {
        let mut accel = None;
        let mut gyro = None;
        for cfg in configs {
            match cfg {
                SensorConfig::Accel(c) => accel = Some(Self::encode_accel(c)?),
                SensorConfig::Gyro(c) => gyro = Some(Self::encode_gyro(c)?),
            }
        }

        self.with_power_save_disabled(|dev| match (accel, gyro) {
            // ACC_CONF..GYR_RANGE are contiguous
            (Some(a), Some(g)) => dev
                .iface
                .write_registers(reg::ACC_CONF, &[a[0], a[1], g[0], g[1]]),
            (Some(a), None) => dev.iface.write_registers(reg::ACC_CONF, &a),
            (None, Some(g)) => dev.iface.write_registers(reg::GYR_CONF, &g),
            (None, None) => Ok(()),
        })
    }

    fn enable_sensors(
        &mut self,
        sensors: &[SensorType],
    ) -> Result<(), Error<Self::BusError>> {
        let bits = sensors.iter().fold(0u8, |acc, s| {
            acc | match s {
                SensorType::Accel => BMI270_PWR_CTRL_ACC_EN,
                SensorType::Gyro => BMI270_PWR_CTRL_GYR_EN,
                SensorType::Aux => BMI270_PWR_CTRL_AUX_EN,
                SensorType::Temperature => BMI270_PWR_CTRL_TEMP_EN,
            }
        });
        self.with_power_save_disabled(|dev| dev.iface.update_register(reg::PWR_CTRL, bits, bits))
    }

    fn set_fifo_config(
        &mut self,
        config: FifoConfig,
        enable: bool,
    ) -> Result<(), Error<Self::BusError>> {
        let mask = (config.bits() >> 8) as u8;
        let value = if enable { mask } else { 0 };
        self.with_power_save_disabled(|dev| {
            dev.iface.update_register(reg::FIFO_CONFIG_1, mask, value)
        })
    }

    fn sensor_data(&mut self) -> Result<SensorData, Error<Self::BusError>> {
        let mut buf = [0u8; BMI270_SENSOR_DATA_LEN];
        self.iface.read_registers(reg::ACC_X_LSB, &mut buf)?;
        let word = |i: usize| i16::from_le_bytes([buf[i], buf[i + 1]]);
        Ok(SensorData {
            acc: [word(0), word(2), word(4)],
            gyr: [word(6), word(8), word(10)],
        })
    }

    fn int_status(&mut self) -> Result<IntStatus, Error<Self::BusError>> {
        let mut buf = [0u8; 2];
        self.iface.read_registers(reg::INT_STATUS_0, &mut buf)?;
        Ok(IntStatus::from_bits_retain(u16::from_le_bytes(buf)))
    }

    fn sensor_config(
        &mut self,
        sensor: SensorType,
    ) -> Result<SensorConfig, Error<Self::BusError>> {
        let mut buf = [0u8; 2];
        match sensor {
            SensorType::Accel => {
                self.iface.read_registers(reg::ACC_CONF, &mut buf)?;
                Ok(SensorConfig::Accel(Self::decode_accel(buf)))
            }
            SensorType::Gyro => {
                self.iface.read_registers(reg::GYR_CONF, &mut buf)?;
                Ok(SensorConfig::Gyro(Self::decode_gyro(buf)?))
            }
            _ => Err(Error::Device(ErrorCode::InvalidSensor)),
        }
    }
}
