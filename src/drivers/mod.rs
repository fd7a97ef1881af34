// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Device-Specific Drivers
//!
//! This module contains device-specific drivers that sit above the raw `hw/` layer and below the
//! supervisor.
//!
//! ## Existing drivers
//!
//! - [`tb6612`] – Toshiba TB6612FNG dual H-bridge motor driver
//! - [`mcp4017`] – Microchip MCP4017 I2C digital potentiometer (motor current limit)

pub mod mcp4017;
pub mod tb6612;

pub use mcp4017::{CurrentLimitError, Mcp4017};
pub use tb6612::{Direction, Motor, MotorPair};

use crate::protocol::messages::SideCommand;

/// Differential drive used by the built-in MOVE and BRAKE commands.
pub trait Drive {
    fn drive(&mut self, left: SideCommand, right: SideCommand);
    fn brake(&mut self);
}
