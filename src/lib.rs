// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # ArxBot Firmware
//!
//! This crate contains the supervisory control loop of a small tracked robot, written in Rust,
//! targeting an STM32F777 MCU. The supervisor decodes command frames, hands them to
//! integrator-installed handlers or to the built-in behavior, re-arms the watchdog, and halts the
//! robot when the battery runs low.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`supervisor`] | Command dispatch, battery check, fail-safe halt, main loop |
//! | [`protocol`]   | Frame format, parser, and the serial `Transport` |
//! | [`drivers`]    | Device-level drivers (TB6612FNG, MCP4017) |
//! | [`hw`]         | Indicator LEDs and MCU-level wrappers (ADC, USART, IWDG, pins) |
//! | [`config`]     | Calibration constants and startup configuration |
//!
//! ## Getting Started
//!
//! Run the host tests:
//!
//! ```bash
//! cargo test
//! ```
//!
//! Flash the board:
//!
//! ```bash
//! cargo run --release --features firmware --target thumbv7em-none-eabihf
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod drivers;
pub mod hw;
pub mod protocol;
pub mod supervisor;

#[cfg(test)]
mod testing;

pub use config::SupervisorConfig;
pub use supervisor::{CommandEntry, Supervisor};
