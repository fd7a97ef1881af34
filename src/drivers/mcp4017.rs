// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! MCP4017 I2C digital potentiometer used to set the motor driver current limit.
//!
//! The wiper register is written with a single data byte; there is no register address.

use embedded_hal::blocking::i2c::Write;
use log::warn;
use thiserror::Error;

/// 7-bit bus address of the MCP4017.
pub const ADDRESS: u8 = 0x2F;

/// Largest accepted step value.
pub const MAX_STEPS: u8 = 128;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum CurrentLimitError {
    #[error("current limit of {steps} steps exceeds {max}", max = MAX_STEPS)]
    OutOfRange { steps: u8 },
    #[error("I2C write to current-limit potentiometer failed")]
    Bus,
}

pub struct Mcp4017<I2C> {
    i2c: I2C,
}

impl<I2C: Write> Mcp4017<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    /// Program the wiper to `steps`. Out-of-range values write nothing.
    pub fn set_current_limit(&mut self, steps: u8) -> Result<(), CurrentLimitError> {
        if steps > MAX_STEPS {
            warn!("current limit {} out of range, not set", steps);
            return Err(CurrentLimitError::OutOfRange { steps });
        }
        self.i2c
            .write(ADDRESS, &[steps])
            .map_err(|_| CurrentLimitError::Bus)
    }

    pub fn free(self) -> I2C {
        self.i2c
    }
}
