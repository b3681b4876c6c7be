// Copyright 2025 Au-Zone Technologies Inc.
// SPDX-License-Identifier: Apache-2.0

//! Device error codes and the optional human-readable diagnostics sink.

use core::fmt;
use log::warn;

macro_rules! error_codes {
    ($($(#[$doc:meta])* $name:ident = $code:literal => $msg:literal,)+) => {
        /// Device-level error codes, numbered as in the Bosch BMI2 sensor API
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum ErrorCode {
            $($(#[$doc])* $name,)+
            /// A code outside the known table
            Unknown(i8),
        }

        impl ErrorCode {
            /// Numeric code (always negative)
            pub fn code(self) -> i8 {
                match self {
                    $(ErrorCode::$name => $code,)+
                    ErrorCode::Unknown(code) => code,
                }
            }

            /// Decode a numeric code. `0` means success and yields `None`.
            pub fn from_code(code: i8) -> Option<ErrorCode> {
                match code {
                    0 => None,
                    $($code => Some(ErrorCode::$name),)+
                    other => Some(ErrorCode::Unknown(other)),
                }
            }

            pub fn message(self) -> &'static str {
                match self {
                    $(ErrorCode::$name => $msg,)+
                    ErrorCode::Unknown(_) => "Unknown error code",
                }
            }
        }
    };
}

error_codes! {
    NullPointer = -1 => "Null pointer",
    CommunicationFailure = -2 => "Communication failure",
    DeviceNotFound = -3 => "Device not found",
    OutOfRange = -4 => "Out of range",
    AccelInvalidConfig = -5 => "Invalid accel configuration",
    GyroInvalidConfig = -6 => "Invalid gyro configuration",
    AccelGyroInvalidConfig = -7 => "Invalid accel/gyro configuration",
    InvalidSensor = -8 => "Invalid sensor",
    /// Configuration file upload did not complete
    ConfigLoad = -9 => "Configuration loading error",
    InvalidPage = -10 => "Invalid page",
    InvalidFeatureBit = -11 => "Invalid feature bit",
    InvalidIntPin = -12 => "Invalid interrupt pin",
    SetAdvancedPowerSaveFail = -13 => "Setting advanced power mode failed",
    AuxInvalidConfig = -14 => "Invalid auxiliary configuration",
    AuxBusy = -15 => "Auxiliary busy",
    SelfTestFail = -16 => "Self test failed",
    RemapError = -17 => "Remapping error",
    GyroUserGainUpdateFail = -18 => "Gyro user gain update failed",
    SelfTestNotDone = -19 => "Self test not done",
    InvalidInput = -20 => "Invalid input",
    InvalidStatus = -21 => "Invalid status",
    CrtError = -22 => "CRT error",
    SelfTestAlreadyRunning = -23 => "Self test already running",
    CrtReadyForDownloadFailAbort = -24 => "CRT ready for DL fail abort",
    DownloadError = -25 => "DL error",
    PreconditionError = -26 => "PRECON error",
    AbortError = -27 => "Abort error",
    GyroSelfTestError = -28 => "Gyro self test error",
    GyroSelfTestTimeout = -29 => "Gyro self test timeout",
    WriteCycleOngoing = -30 => "Write cycle ongoing",
    WriteCycleTimeout = -31 => "Write cycle timeout",
    SelfTestNotRunning = -32 => "Self test not running",
    DataReadyIntFailed = -33 => "Data ready interrupt failed",
    InvalidFocPosition = -34 => "Invalid FOC position",
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error [{}] : {}", self.code(), self.message())
    }
}

/// Render a raw result code as one diagnostics line.
/// Returns `None` for `0` (no error).
pub fn render(code: i8) -> Option<String> {
    ErrorCode::from_code(code).map(|c| c.to_string())
}

/// Receiver of human-readable diagnostics lines
pub trait DiagnosticsSink {
    fn write_line(&mut self, line: &str);
}

/// Forwards diagnostics to the `log` facade at warn level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticsSink for LogSink {
    fn write_line(&mut self, line: &str) {
        warn!("{}", line);
    }
}

/// Collects lines in memory
impl DiagnosticsSink for Vec<String> {
    fn write_line(&mut self, line: &str) {
        self.push(line.to_owned());
    }
}

/// Holds the optional sink. Reporting never changes control flow.
#[derive(Default)]
pub struct Reporter {
    sink: Option<Box<dyn DiagnosticsSink>>,
}

impl Reporter {
    pub fn set_sink(&mut self, sink: Option<Box<dyn DiagnosticsSink>>) {
        self.sink = sink;
    }

    pub fn has_sink(&self) -> bool {
        self.sink.is_some()
    }

    pub fn report_code(&mut self, code: i8) {
        if let Some(sink) = self.sink.as_mut() {
            if let Some(line) = render(code) {
                sink.write_line(&line);
            }
        }
    }

    /// Report the outcome of one step; `Ok` emits nothing
    pub fn report<T, E>(&mut self, result: &Result<T, crate::Error<E>>) {
        if let Err(err) = result {
            self.report_code(err.code().code());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Shared(Rc<RefCell<Vec<String>>>);

    impl DiagnosticsSink for Shared {
        fn write_line(&mut self, line: &str) {
            self.0.borrow_mut().push(line.to_owned());
        }
    }

    #[test]
    fn codes_roundtrip_through_the_table() {
        for code in -34..=-1 {
            let decoded = ErrorCode::from_code(code).unwrap();
            assert!(!matches!(decoded, ErrorCode::Unknown(_)), "{code}");
            assert_eq!(decoded.code(), code);
        }
        assert_eq!(ErrorCode::from_code(0), None);
    }

    #[test]
    fn renders_fixed_messages() {
        assert_eq!(
            render(-2).as_deref(),
            Some("Error [-2] : Communication failure")
        );
        assert_eq!(
            render(-3).as_deref(),
            Some("Error [-3] : Device not found")
        );
        assert_eq!(
            render(-12).as_deref(),
            Some("Error [-12] : Invalid interrupt pin")
        );
        assert_eq!(render(0), None);
    }

    #[test]
    fn unknown_codes_render_generic_message() {
        assert_eq!(ErrorCode::from_code(-99), Some(ErrorCode::Unknown(-99)));
        assert_eq!(
            render(-99).as_deref(),
            Some("Error [-99] : Unknown error code")
        );
        assert_eq!(
            render(5).as_deref(),
            Some("Error [5] : Unknown error code")
        );
    }

    #[test]
    fn reporter_without_sink_is_silent() {
        let mut reporter = Reporter::default();
        assert!(!reporter.has_sink());
        reporter.report_code(-2);
        reporter.report::<(), ()>(&Err(crate::Error::Bus(())));
    }

    #[test]
    fn reporter_skips_success() {
        let lines = Rc::new(RefCell::new(Vec::new()));
        let mut reporter = Reporter::default();
        reporter.set_sink(Some(Box::new(Shared(lines.clone()))));

        reporter.report::<(), ()>(&Ok(()));
        reporter.report_code(0);
        assert!(lines.borrow().is_empty());

        reporter.report::<(), ()>(&Err(crate::Error::Bus(())));
        reporter.report::<(), ()>(&Err(crate::Error::InvalidLength(40)));
        reporter.report::<(), ()>(&Err(crate::Error::Device(
            ErrorCode::AccelInvalidConfig,
        )));
        assert_eq!(
            *lines.borrow(),
            vec![
                "Error [-2] : Communication failure".to_string(),
                "Error [-20] : Invalid input".to_string(),
                "Error [-5] : Invalid accel configuration".to_string(),
            ]
        );
    }
}
