// Copyright 2025 Au-Zone Technologies Inc.
// SPDX-License-Identifier: Apache-2.0

use gpiod::{Chip, Input, Lines, Options};
use log::trace;
use std::io::{self, Error, ErrorKind};
use std::path::Path;

/// Input pin reading the BMI270 INT1 line.
///
/// INT1 is configured push-pull and active-high, so a high level means a
/// data-ready event is pending.
pub struct InterruptLine {
    input: Lines<Input>,
}

impl InterruptLine {
    pub fn new(chip: &Chip, pin: u32) -> io::Result<InterruptLine> {
        let opts = Options::input([pin]).consumer("bmi270-int1");

        Ok(InterruptLine {
            input: chip.request_lines(opts)?,
        })
    }

    /// Open `chip` (e.g. `/dev/gpiochip0`) and request line `pin`
    pub fn open<P: AsRef<Path>>(chip: P, pin: u32) -> io::Result<InterruptLine> {
        let chip = Chip::new(chip)?;
        Self::new(&chip, pin)
    }

    /// Find the line by its symbolic name (e.g. `"IMU_INT"`) across all GPIO
    /// chips on the system
    pub fn from_symbol(name: &str) -> io::Result<InterruptLine> {
        for entry in Chip::list_devices()? {
            let chip = Chip::new(&entry)?;
            for i in 0..chip.num_lines() {
                let line_name = chip.line_info(i)?.name;
                trace!("--- {} ---", line_name);
                if line_name == name {
                    return Self::new(&chip, i);
                }
            }
        }
        Err(Error::new(
            ErrorKind::AddrNotAvailable,
            format!("Did not find interrupt pin \"{}\"", name),
        ))
    }

    /// Is the interrupt line asserted (high)?
    pub fn is_asserted(&self) -> io::Result<bool> {
        let values = self.input.get_values([false])?;
        Ok(values[0])
    }
}
