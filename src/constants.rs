// Copyright 2025 Au-Zone Technologies Inc.
// SPDX-License-Identifier: Apache-2.0

//! Register map and bit-field constants for the BMI270 and BMM150.
//!
//! Values follow the Bosch datasheets (BST-BMI270-DS000, BST-BMM150-DS001)
//! and the field layout used by the vendor sensor APIs.

/// Default 7-bit I2C address of the BMI270 (SDO low)
pub const BMI270_I2C_ADDR: u8 = 0x68;
/// Alternate BMI270 address (SDO high)
pub const BMI270_I2C_ADDR_ALT: u8 = 0x69;
/// Default 7-bit I2C address of the BMM150 (CSB and SDO low)
pub const BMM150_I2C_ADDR: u8 = 0x10;

// =============================================================================
// BMI270 Registers
// =============================================================================

pub mod bmi270_reg {
    pub const CHIP_ID: u8 = 0x00;
    pub const ERR_REG: u8 = 0x02;
    pub const STATUS: u8 = 0x03;
    /// First accelerometer data byte; gyroscope data follows at 0x12
    pub const ACC_X_LSB: u8 = 0x0C;
    pub const INT_STATUS_0: u8 = 0x1C;
    pub const INTERNAL_STATUS: u8 = 0x21;
    pub const ACC_CONF: u8 = 0x40;
    pub const ACC_RANGE: u8 = 0x41;
    pub const GYR_CONF: u8 = 0x42;
    pub const GYR_RANGE: u8 = 0x43;
    pub const FIFO_CONFIG_0: u8 = 0x48;
    pub const FIFO_CONFIG_1: u8 = 0x49;
    pub const INT1_IO_CTRL: u8 = 0x53;
    pub const INT2_IO_CTRL: u8 = 0x54;
    pub const INT_LATCH: u8 = 0x55;
    pub const INT_MAP_DATA: u8 = 0x58;
    pub const INIT_CTRL: u8 = 0x59;
    pub const INIT_ADDR_0: u8 = 0x5B;
    pub const INIT_ADDR_1: u8 = 0x5C;
    pub const INIT_DATA: u8 = 0x5E;
    pub const PWR_CONF: u8 = 0x7C;
    pub const PWR_CTRL: u8 = 0x7D;
    pub const CMD: u8 = 0x7E;
}

/// Expected BMI270 chip id
pub const BMI270_CHIP_ID: u8 = 0x24;
/// Soft reset command written to CMD
pub const BMI270_SOFT_RESET_CMD: u8 = 0xB6;

/// INTERNAL_STATUS message field mask
pub const BMI270_INTERNAL_STATUS_MSG_MASK: u8 = 0x0F;
/// INTERNAL_STATUS message once the configuration file is active
pub const BMI270_INTERNAL_STATUS_INIT_OK: u8 = 0x01;

/// PWR_CTRL channel enable bits
pub const BMI270_PWR_CTRL_AUX_EN: u8 = 0x01;
pub const BMI270_PWR_CTRL_GYR_EN: u8 = 0x02;
pub const BMI270_PWR_CTRL_ACC_EN: u8 = 0x04;
pub const BMI270_PWR_CTRL_TEMP_EN: u8 = 0x08;

/// PWR_CONF advanced power save bit
pub const BMI270_PWR_CONF_ADV_POWER_SAVE: u8 = 0x01;

/// ACC_CONF / GYR_CONF field layout
pub const BMI270_CONF_ODR_MASK: u8 = 0x0F;
pub const BMI270_ACC_BWP_MASK: u8 = 0x70;
pub const BMI270_ACC_BWP_POS: u8 = 4;
pub const BMI270_GYR_BWP_MASK: u8 = 0x30;
pub const BMI270_GYR_BWP_POS: u8 = 4;
pub const BMI270_GYR_NOISE_PERF_POS: u8 = 6;
pub const BMI270_FILTER_PERF_POS: u8 = 7;

/// ACC_RANGE / GYR_RANGE field layout
pub const BMI270_ACC_RANGE_MASK: u8 = 0x03;
pub const BMI270_GYR_RANGE_MASK: u8 = 0x07;
pub const BMI270_GYR_OIS_RANGE_POS: u8 = 3;

/// INTx_IO_CTRL bit positions
pub const BMI270_INT_LVL_POS: u8 = 1;
pub const BMI270_INT_OD_POS: u8 = 2;
pub const BMI270_INT_OUTPUT_EN_POS: u8 = 3;
pub const BMI270_INT_INPUT_EN_POS: u8 = 4;

/// INT_MAP_DATA data-ready routing bits
pub const BMI270_INT1_DRDY_MAP: u8 = 0x04;
pub const BMI270_INT2_DRDY_MAP: u8 = 0x40;

/// Raw accel + gyro snapshot length (6 axes, 2 bytes each)
pub const BMI270_SENSOR_DATA_LEN: usize = 12;

/// Base frequency of the output-data-rate law: `rate = 2^odr * 0.39 Hz`
pub const BMI270_ODR_BASE_HZ: f32 = 0.39;

// =============================================================================
// BMI270 Startup Timing (microseconds)
// =============================================================================

pub const BMI270_SOFT_RESET_DELAY_US: u32 = 2_000;
pub const BMI270_POWER_SAVE_DELAY_US: u32 = 450;
pub const BMI270_CONFIG_LOAD_POLL_US: u32 = 10_000;
pub const BMI270_CONFIG_LOAD_POLL_COUNT: usize = 20;

// =============================================================================
// BMM150 Registers
// =============================================================================

pub mod bmm150_reg {
    pub const CHIP_ID: u8 = 0x40;
    pub const DATA_X_LSB: u8 = 0x42;
    pub const DATA_READY_STATUS: u8 = 0x48;
    pub const INTERRUPT_STATUS: u8 = 0x4A;
    pub const POWER_CONTROL: u8 = 0x4B;
    pub const OP_MODE: u8 = 0x4C;
    pub const INT_CONFIG: u8 = 0x4D;
    pub const AXES_ENABLE: u8 = 0x4E;
    pub const LOW_THRESHOLD: u8 = 0x4F;
    pub const HIGH_THRESHOLD: u8 = 0x50;
    pub const REP_XY: u8 = 0x51;
    pub const REP_Z: u8 = 0x52;
    pub const DIG_X1: u8 = 0x5D;
    pub const DIG_Z4_LSB: u8 = 0x62;
    pub const DIG_Z2_LSB: u8 = 0x68;
}

/// Expected BMM150 chip id
pub const BMM150_CHIP_ID: u8 = 0x32;

/// Power control bit (suspend <-> sleep)
pub const BMM150_POWER_CONTROL_BIT: u8 = 0x01;

/// OP_MODE field layout
pub const BMM150_OP_MODE_MASK: u8 = 0x06;
pub const BMM150_OP_MODE_POS: u8 = 1;
pub const BMM150_DATA_RATE_MASK: u8 = 0x38;
pub const BMM150_DATA_RATE_POS: u8 = 3;

/// AXES_ENABLE data-ready pin enable bit
pub const BMM150_DRDY_PIN_EN: u8 = 0x80;

/// Raw data frame length: X, Y, Z and RHALL, two bytes each
pub const BMM150_DATA_LEN: usize = 8;

/// Data-ready bit in the 16-bit interrupt status word
pub const BMM150_INT_ASSERTED_DRDY: u16 = 0x0100;

/// Sentinel ADC values reported on axis overflow
pub const BMM150_OVERFLOW_ADCVAL_XY: i16 = -4096;
pub const BMM150_OVERFLOW_ADCVAL_Z: i16 = -16384;

/// XY / Z repetition register values per preset
pub const BMM150_REPXY_LOWPOWER: u8 = 0x01;
pub const BMM150_REPZ_LOWPOWER: u8 = 0x02;
pub const BMM150_REPXY_REGULAR: u8 = 0x04;
pub const BMM150_REPZ_REGULAR: u8 = 0x0E;
pub const BMM150_REPXY_ENHANCED: u8 = 0x07;
pub const BMM150_REPZ_ENHANCED: u8 = 0x1A;
pub const BMM150_REPXY_HIGHACCURACY: u8 = 0x17;
pub const BMM150_REPZ_HIGHACCURACY: u8 = 0x52;

/// Start-up time after setting the power control bit
pub const BMM150_START_UP_DELAY_US: u32 = 3_000;
