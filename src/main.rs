// Copyright 2025 Au-Zone Technologies Inc.
// SPDX-License-Identifier: Apache-2.0

use bmi270_bmm150::constants::{BMI270_I2C_ADDR, BMM150_I2C_ADDR};
use bmi270_bmm150::interface::gpio::InterruptLine;
use bmi270_bmm150::interface::linux::open_bus;
use bmi270_bmm150::{Imu, ImuConfig, LogSink};

use std::{env, error::Error, thread::sleep, time::Duration};

const DEFAULT_BUS: &str = "/dev/i2c-1";
const LOOP_INTERVAL: Duration = Duration::from_millis(20);
const RATE_REPORT_EVERY: u32 = 250;

/// Usage: `imu-poll [i2c-device] [int1-line-name]`
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let bus_path = args.next().unwrap_or_else(|| DEFAULT_BUS.to_owned());
    let int_line = match args.next() {
        Some(name) => Some(InterruptLine::from_symbol(&name)?),
        None => None,
    };

    let bus = open_bus(&bus_path)?;
    let mut imu = Imu::new_i2c(&bus, BMI270_I2C_ADDR, BMM150_I2C_ADDR, ImuConfig::default());
    imu.set_diagnostics(Some(Box::new(LogSink)));
    imu.begin()?;

    println!(
        "rates: accel {:.2} Hz, gyro {:.2} Hz, mag {:.1} Hz",
        imu.acceleration_sample_rate()?,
        imu.gyroscope_sample_rate()?,
        imu.magnetic_field_sample_rate()?
    );

    let mut loops = 0u32;
    loop {
        sleep(LOOP_INTERVAL);
        loops = loops.wrapping_add(1);

        if let Some(line) = &int_line {
            if !line.is_asserted()? {
                continue;
            }
        }

        if imu.acceleration_available()? {
            let [x, y, z] = imu.read_acceleration()?;
            println!("Acceleration: {:.3} {:.3} {:.3} g", x, y, z);
        }
        if imu.gyroscope_available()? {
            let [x, y, z] = imu.read_gyroscope()?;
            println!("Gyroscope: {:.2} {:.2} {:.2} dps", x, y, z);
        }
        if imu.magnetic_field_available()? {
            let [x, y, z] = imu.read_magnetic_field()?;
            println!("Magnetic field: {:.1} {:.1} {:.1} uT", x, y, z);
        }

        if loops % RATE_REPORT_EVERY == 0 {
            println!(
                "rates: accel {:.2} Hz, gyro {:.2} Hz, mag {:.1} Hz",
                imu.acceleration_sample_rate()?,
                imu.gyroscope_sample_rate()?,
                imu.magnetic_field_sample_rate()?
            );
        }
    }
}
