// Copyright 2025 Au-Zone Technologies Inc.
// SPDX-License-Identifier: Apache-2.0

//! Capability traits through which the driver reaches the two chips, and the
//! configuration types they exchange.

use crate::constants::BMI270_ODR_BASE_HZ;
use crate::Error;
use bitflags::bitflags;
use core::fmt::Debug;

// =============================================================================
// Accelerometer / gyroscope types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorType {
    Accel,
    Gyro,
    Aux,
    Temperature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntPin {
    Int1,
    Int2,
}

/// Electrical behaviour of one interrupt pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntPinConfig {
    pub pin: IntPin,
    pub latched: bool,
    pub active_high: bool,
    pub open_drain: bool,
    pub output_enable: bool,
    pub input_enable: bool,
}

impl IntPinConfig {
    /// Non-latched, active-high, push-pull output
    pub fn data_ready(pin: IntPin) -> Self {
        Self {
            pin,
            latched: false,
            active_high: true,
            open_drain: false,
            output_enable: true,
            input_enable: false,
        }
    }
}

/// Output data rate register code. The rate is `2^code * 0.39` Hz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Odr(pub u8);

impl Odr {
    pub const HZ_25: Odr = Odr(0x06);
    pub const HZ_50: Odr = Odr(0x07);
    pub const HZ_100: Odr = Odr(0x08);
    pub const HZ_200: Odr = Odr(0x09);
    pub const HZ_400: Odr = Odr(0x0A);
    pub const HZ_800: Odr = Odr(0x0B);
    pub const HZ_1600: Odr = Odr(0x0C);

    pub fn hz(self) -> f32 {
        (1u32 << u32::from(self.0 & 0x0F)) as f32 * BMI270_ODR_BASE_HZ
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccelRange {
    G2 = 0,
    G4 = 1,
    G8 = 2,
    G16 = 3,
}

impl AccelRange {
    pub fn g(self) -> f32 {
        match self {
            AccelRange::G2 => 2.0,
            AccelRange::G4 => 4.0,
            AccelRange::G8 => 8.0,
            AccelRange::G16 => 16.0,
        }
    }

    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => AccelRange::G2,
            1 => AccelRange::G4,
            2 => AccelRange::G8,
            _ => AccelRange::G16,
        }
    }
}

/// Accelerometer bandwidth: oversampling in performance mode, averaging
/// depth in power mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccelBandwidth {
    Osr4Avg1 = 0,
    Osr2Avg2 = 1,
    NormalAvg4 = 2,
    CicAvg8 = 3,
    ResAvg16 = 4,
    ResAvg32 = 5,
    ResAvg64 = 6,
    ResAvg128 = 7,
}

impl AccelBandwidth {
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            0 => AccelBandwidth::Osr4Avg1,
            1 => AccelBandwidth::Osr2Avg2,
            2 => AccelBandwidth::NormalAvg4,
            3 => AccelBandwidth::CicAvg8,
            4 => AccelBandwidth::ResAvg16,
            5 => AccelBandwidth::ResAvg32,
            6 => AccelBandwidth::ResAvg64,
            _ => AccelBandwidth::ResAvg128,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GyroRange {
    Dps2000 = 0,
    Dps1000 = 1,
    Dps500 = 2,
    Dps250 = 3,
    Dps125 = 4,
}

impl GyroRange {
    pub fn dps(self) -> f32 {
        match self {
            GyroRange::Dps2000 => 2000.0,
            GyroRange::Dps1000 => 1000.0,
            GyroRange::Dps500 => 500.0,
            GyroRange::Dps250 => 250.0,
            GyroRange::Dps125 => 125.0,
        }
    }

    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits & 0x07 {
            0 => Some(GyroRange::Dps2000),
            1 => Some(GyroRange::Dps1000),
            2 => Some(GyroRange::Dps500),
            3 => Some(GyroRange::Dps250),
            4 => Some(GyroRange::Dps125),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GyroOisRange {
    Dps250 = 0,
    Dps2000 = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GyroBandwidth {
    Osr4 = 0,
    Osr2 = 1,
    Normal = 2,
}

impl GyroBandwidth {
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits & 0x03 {
            0 => Some(GyroBandwidth::Osr4),
            1 => Some(GyroBandwidth::Osr2),
            2 => Some(GyroBandwidth::Normal),
            _ => None,
        }
    }
}

/// Filter / noise optimisation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Performance {
    PowerOptimized = 0,
    PerformanceOptimized = 1,
}

impl Performance {
    pub fn from_bit(set: bool) -> Self {
        if set {
            Performance::PerformanceOptimized
        } else {
            Performance::PowerOptimized
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccelConfig {
    pub odr: Odr,
    pub range: AccelRange,
    pub bandwidth: AccelBandwidth,
    pub filter_perf: Performance,
}

impl Default for AccelConfig {
    /// ±4 g, 100 Hz, performance filter, OSR2 / averaging 2
    fn default() -> Self {
        Self {
            odr: Odr::HZ_100,
            range: AccelRange::G4,
            bandwidth: AccelBandwidth::Osr2Avg2,
            filter_perf: Performance::PerformanceOptimized,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GyroConfig {
    pub odr: Odr,
    pub range: GyroRange,
    pub ois_range: GyroOisRange,
    pub bandwidth: GyroBandwidth,
    pub noise_perf: Performance,
    pub filter_perf: Performance,
}

impl Default for GyroConfig {
    /// ±2000 °/s (OIS ±2000 °/s), 100 Hz, performance filter, OSR2
    fn default() -> Self {
        Self {
            odr: Odr::HZ_100,
            range: GyroRange::Dps2000,
            ois_range: GyroOisRange::Dps2000,
            bandwidth: GyroBandwidth::Osr2,
            noise_perf: Performance::PowerOptimized,
            filter_perf: Performance::PerformanceOptimized,
        }
    }
}

/// One entry of a batched sensor configuration write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorConfig {
    Accel(AccelConfig),
    Gyro(GyroConfig),
}

impl SensorConfig {
    pub fn sensor_type(&self) -> SensorType {
        match self {
            SensorConfig::Accel(_) => SensorType::Accel,
            SensorConfig::Gyro(_) => SensorType::Gyro,
        }
    }
}

/// Raw accel + gyro snapshot in LSB
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SensorData {
    pub acc: [i16; 3],
    pub gyr: [i16; 3],
}

bitflags! {
    /// Interrupt status word: INT_STATUS_0 in the low byte, INT_STATUS_1 in
    /// the high byte
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct IntStatus: u16 {
        const AUX_DRDY = 0x2000;
        const GYR_DRDY = 0x4000;
        const ACC_DRDY = 0x8000;
    }
}

bitflags! {
    /// FIFO frame sources, FIFO_CONFIG_1 in the high byte
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FifoConfig: u16 {
        const HEADER_EN = 0x1000;
        const AUX_EN = 0x2000;
        const ACC_EN = 0x4000;
        const GYR_EN = 0x8000;
    }
}

/// Operations the driver needs from the accelerometer/gyroscope chip
pub trait AccelGyroDevice {
    type BusError: Debug;

    /// Reset, verify identity and load the device firmware
    fn init(&mut self) -> Result<(), Error<Self::BusError>>;
    fn set_int_pin_config(
        &mut self,
        config: &IntPinConfig,
    ) -> Result<(), Error<Self::BusError>>;
    /// Route the data-ready interrupt to `pin`
    fn map_data_int(&mut self, pin: IntPin) -> Result<(), Error<Self::BusError>>;
    /// Apply all entries as one configuration transaction
    fn set_sensor_config(
        &mut self,
        configs: &[SensorConfig],
    ) -> Result<(), Error<Self::BusError>>;
    fn enable_sensors(
        &mut self,
        sensors: &[SensorType],
    ) -> Result<(), Error<Self::BusError>>;
    /// Set (`enable == true`) or clear the selected FIFO sources
    fn set_fifo_config(
        &mut self,
        config: FifoConfig,
        enable: bool,
    ) -> Result<(), Error<Self::BusError>>;
    fn sensor_data(&mut self) -> Result<SensorData, Error<Self::BusError>>;
    fn int_status(&mut self) -> Result<IntStatus, Error<Self::BusError>>;
    /// Read back the configuration of an accel or gyro channel
    fn sensor_config(
        &mut self,
        sensor: SensorType,
    ) -> Result<SensorConfig, Error<Self::BusError>>;
}

// =============================================================================
// Magnetometer types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerMode {
    Normal,
    Forced,
    Sleep,
    Suspend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetMode {
    /// 10 Hz, XY repetitions 3, Z repetitions 3
    LowPower,
    /// 10 Hz, XY repetitions 9, Z repetitions 15
    Regular,
    /// 10 Hz, XY repetitions 15, Z repetitions 27
    Enhanced,
    /// 20 Hz, XY repetitions 47, Z repetitions 83
    HighAccuracy,
}

/// BMM150 output data rate, in register code order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MagDataRate {
    Hz10 = 0,
    Hz2 = 1,
    Hz6 = 2,
    Hz8 = 3,
    Hz15 = 4,
    Hz20 = 5,
    Hz25 = 6,
    Hz30 = 7,
}

impl MagDataRate {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(MagDataRate::Hz10),
            1 => Some(MagDataRate::Hz2),
            2 => Some(MagDataRate::Hz6),
            3 => Some(MagDataRate::Hz8),
            4 => Some(MagDataRate::Hz15),
            5 => Some(MagDataRate::Hz20),
            6 => Some(MagDataRate::Hz25),
            7 => Some(MagDataRate::Hz30),
            _ => None,
        }
    }

    pub fn hz(self) -> f32 {
        match self {
            MagDataRate::Hz10 => 10.0,
            MagDataRate::Hz2 => 2.0,
            MagDataRate::Hz6 => 6.0,
            MagDataRate::Hz8 => 8.0,
            MagDataRate::Hz15 => 15.0,
            MagDataRate::Hz20 => 20.0,
            MagDataRate::Hz25 => 25.0,
            MagDataRate::Hz30 => 30.0,
        }
    }
}

/// Magnetometer settings as read back from the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MagSettings {
    pub power_mode: PowerMode,
    /// Raw data-rate code, see [`MagDataRate::from_code`]
    pub data_rate: u8,
    pub xy_rep: u8,
    pub z_rep: u8,
    pub drdy_pin_en: bool,
}

/// Operations the driver needs from the magnetometer chip
pub trait MagnetometerDevice {
    type BusError: Debug;

    /// Power up, verify identity and read the trim data
    fn init(&mut self) -> Result<(), Error<Self::BusError>>;
    fn set_power_mode(&mut self, mode: PowerMode) -> Result<(), Error<Self::BusError>>;
    fn set_preset_mode(
        &mut self,
        preset: PresetMode,
    ) -> Result<(), Error<Self::BusError>>;
    fn set_data_ready_pin(&mut self, enable: bool) -> Result<(), Error<Self::BusError>>;
    /// Compensated field in µT
    fn mag_data(&mut self) -> Result<[f32; 3], Error<Self::BusError>>;
    /// 16-bit status word; bit 8 is data ready
    fn interrupt_status(&mut self) -> Result<u16, Error<Self::BusError>>;
    fn settings(&mut self) -> Result<MagSettings, Error<Self::BusError>>;
}

/// Scriptable in-memory devices for driver tests
#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use crate::diagnostics::ErrorCode;
    use std::collections::VecDeque;

    fn step(
        calls: &mut Vec<&'static str>,
        fail_on: &[(&'static str, ErrorCode)],
        name: &'static str,
    ) -> Result<(), Error<()>> {
        calls.push(name);
        match fail_on.iter().find(|(n, _)| *n == name) {
            Some((_, code)) => Err(Error::Device(*code)),
            None => Ok(()),
        }
    }

    #[derive(Default)]
    pub struct FakeAccelGyro {
        pub calls: Vec<&'static str>,
        pub fail_on: Vec<(&'static str, ErrorCode)>,
        pub int_pin: Option<IntPinConfig>,
        pub mapped: Option<IntPin>,
        pub applied: Vec<SensorConfig>,
        pub enabled: Vec<SensorType>,
        pub fifo: u16,
        pub data: SensorData,
        pub statuses: VecDeque<u16>,
        pub accel_readback: Option<AccelConfig>,
        pub gyro_readback: Option<GyroConfig>,
    }

    impl AccelGyroDevice for FakeAccelGyro {
        type BusError = ();

        fn init(&mut self) -> Result<(), Error<()>> {
            step(&mut self.calls, &self.fail_on, "init")
        }

        fn set_int_pin_config(&mut self, config: &IntPinConfig) -> Result<(), Error<()>> {
            step(&mut self.calls, &self.fail_on, "set_int_pin_config")?;
            self.int_pin = Some(*config);
            Ok(())
        }

        fn map_data_int(&mut self, pin: IntPin) -> Result<(), Error<()>> {
            step(&mut self.calls, &self.fail_on, "map_data_int")?;
            self.mapped = Some(pin);
            Ok(())
        }

        fn set_sensor_config(&mut self, configs: &[SensorConfig]) -> Result<(), Error<()>> {
            step(&mut self.calls, &self.fail_on, "set_sensor_config")?;
            self.applied = configs.to_vec();
            Ok(())
        }

        fn enable_sensors(&mut self, sensors: &[SensorType]) -> Result<(), Error<()>> {
            step(&mut self.calls, &self.fail_on, "enable_sensors")?;
            self.enabled = sensors.to_vec();
            Ok(())
        }

        fn set_fifo_config(&mut self, config: FifoConfig, enable: bool) -> Result<(), Error<()>> {
            step(&mut self.calls, &self.fail_on, "set_fifo_config")?;
            if enable {
                self.fifo |= config.bits();
            } else {
                self.fifo &= !config.bits();
            }
            Ok(())
        }

        fn sensor_data(&mut self) -> Result<SensorData, Error<()>> {
            step(&mut self.calls, &self.fail_on, "sensor_data")?;
            Ok(self.data)
        }

        fn int_status(&mut self) -> Result<IntStatus, Error<()>> {
            step(&mut self.calls, &self.fail_on, "int_status")?;
            Ok(IntStatus::from_bits_retain(
                self.statuses.pop_front().unwrap_or(0),
            ))
        }

        fn sensor_config(&mut self, sensor: SensorType) -> Result<SensorConfig, Error<()>> {
            step(&mut self.calls, &self.fail_on, "sensor_config")?;
            match sensor {
                SensorType::Accel => Ok(SensorConfig::Accel(
                    self.accel_readback.unwrap_or_default(),
                )),
                SensorType::Gyro => Ok(SensorConfig::Gyro(
                    self.gyro_readback.unwrap_or_default(),
                )),
                _ => Err(Error::Device(ErrorCode::InvalidSensor)),
            }
        }
    }

    pub struct FakeMagnetometer {
        pub calls: Vec<&'static str>,
        pub fail_on: Vec<(&'static str, ErrorCode)>,
        pub power_mode: Option<PowerMode>,
        pub preset: Option<PresetMode>,
        pub drdy_pin: bool,
        pub field: [f32; 3],
        pub statuses: VecDeque<u16>,
        pub data_rate: u8,
    }

    impl Default for FakeMagnetometer {
        fn default() -> Self {
            Self {
                calls: Vec::new(),
                fail_on: Vec::new(),
                power_mode: None,
                preset: None,
                drdy_pin: false,
                field: [0.0; 3],
                statuses: VecDeque::new(),
                data_rate: MagDataRate::Hz10 as u8,
            }
        }
    }

    impl MagnetometerDevice for FakeMagnetometer {
        type BusError = ();

        fn init(&mut self) -> Result<(), Error<()>> {
            step(&mut self.calls, &self.fail_on, "init")
        }

        fn set_power_mode(&mut self, mode: PowerMode) -> Result<(), Error<()>> {
            step(&mut self.calls, &self.fail_on, "set_power_mode")?;
            self.power_mode = Some(mode);
            Ok(())
        }

        fn set_preset_mode(&mut self, preset: PresetMode) -> Result<(), Error<()>> {
            step(&mut self.calls, &self.fail_on, "set_preset_mode")?;
            self.preset = Some(preset);
            Ok(())
        }

        fn set_data_ready_pin(&mut self, enable: bool) -> Result<(), Error<()>> {
            step(&mut self.calls, &self.fail_on, "set_data_ready_pin")?;
            self.drdy_pin = enable;
            Ok(())
        }

        fn mag_data(&mut self) -> Result<[f32; 3], Error<()>> {
            step(&mut self.calls, &self.fail_on, "mag_data")?;
            Ok(self.field)
        }

        fn interrupt_status(&mut self) -> Result<u16, Error<()>> {
            step(&mut self.calls, &self.fail_on, "interrupt_status")?;
            Ok(self.statuses.pop_front().unwrap_or(0))
        }

        fn settings(&mut self) -> Result<MagSettings, Error<()>> {
            step(&mut self.calls, &self.fail_on, "settings")?;
            Ok(MagSettings {
                power_mode: self.power_mode.unwrap_or(PowerMode::Suspend),
                data_rate: self.data_rate,
                xy_rep: 0,
                z_rep: 0,
                drdy_pin_en: self.drdy_pin,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn odr_follows_power_of_two_law() {
        assert!((Odr(7).hz() - 49.92).abs() < 1e-3);
        assert!((Odr::HZ_100.hz() - 99.84).abs() < 1e-3);
        assert!((Odr::HZ_1600.hz() - 1597.44).abs() < 1e-2);
    }

    #[test]
    fn range_bits_decode() {
        assert_eq!(AccelRange::from_bits(0x01), AccelRange::G4);
        assert_eq!(AccelRange::from_bits(0xFF), AccelRange::G16);
        assert_eq!(GyroRange::from_bits(0x08), Some(GyroRange::Dps2000));
        assert_eq!(GyroRange::from_bits(0x05), None);
    }

    #[test]
    fn mag_data_rate_codes() {
        let rates: Vec<f32> = (0..8)
            .filter_map(MagDataRate::from_code)
            .map(MagDataRate::hz)
            .collect();
        assert_eq!(rates, vec![10.0, 2.0, 6.0, 8.0, 15.0, 20.0, 25.0, 30.0]);
        assert_eq!(MagDataRate::from_code(8), None);
    }

    #[test]
    fn status_word_keeps_unknown_bits() {
        let status = IntStatus::from_bits_retain(0x8001);
        assert!(status.contains(IntStatus::ACC_DRDY));
        assert_eq!(status.bits(), 0x8001);
    }
}
