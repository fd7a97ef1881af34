// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Supervisor
//!
//! The robot's supervisory control loop: command dispatch, the periodic battery check, and the
//! fail-safe halt.
//!
//! ## Modules
//!
//! - [`command_table`] - Integrator handler table and its installation rules.
//! - [`dispatcher`] - Override-then-fallback resolution of decoded commands.
//! - [`cadence`] - Loop-count trigger for periodic work.
//! - [`health`] - Battery sampling and threshold check.
//! - [`failsafe`] - Alternating alert followed by a terminal low-power halt.
//! - [`main_loop`] - The `Supervisor` tying the above together.

pub mod cadence;
pub mod command_table;
pub mod dispatcher;
pub mod failsafe;
pub mod health;
pub mod main_loop;

pub use cadence::Cadence;
pub use command_table::{CommandEntry, CommandHandler, CommandTable, TableError, NO_COMMAND};
pub use dispatcher::{Dispatcher, Route};
pub use failsafe::{FailSafe, HaltReason, Indicator, LowPower, Shutdown};
pub use health::{BatteryMonitor, BatterySense, Health};
pub use main_loop::Supervisor;
