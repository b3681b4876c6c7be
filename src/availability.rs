// Copyright 2025 Au-Zone Technologies Inc.
// SPDX-License-Identifier: Apache-2.0

use crate::device::IntStatus;

/// Remembers data-ready bits seen by one check until the check for their
/// own axis group consumes them.
///
/// Reading the interrupt status clears it on the device, so an accel check
/// must not lose a gyro bit it happened to observe (and vice versa).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusLatch {
    pending: u16,
}

impl StatusLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Combine a fresh status read with the pending bits, report whether any
    /// bit of `mask` is set and drop `mask` from the pending set.
    pub fn take(&mut self, status: IntStatus, mask: IntStatus) -> bool {
        let ready = (status.bits() | self.pending) & mask.bits();
        self.pending = status.bits() & !mask.bits();
        ready != 0
    }

    pub fn pending(&self) -> IntStatus {
        IntStatus::from_bits_retain(self.pending)
    }
}
