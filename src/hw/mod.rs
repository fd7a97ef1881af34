// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! MCU-level wrappers. [`led`] is portable; everything else binds the STM32F777 and is only
//! built with the `firmware` feature.

pub mod led;

#[cfg(feature = "firmware")]
pub mod adc;
#[cfg(feature = "firmware")]
pub mod pins;
#[cfg(feature = "firmware")]
pub mod power;
#[cfg(feature = "firmware")]
pub mod usart;

pub use led::{ActiveLevel, Led};

#[cfg(feature = "firmware")]
pub use adc::{Adc, BatteryChannel};
#[cfg(feature = "firmware")]
pub use pins::BoardPins;
#[cfg(feature = "firmware")]
pub use power::{DeepSleep, Iwdg};
#[cfg(feature = "firmware")]
pub use usart::{CommandRx, CommandTx, Usart, UsartLogger};
