// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Indicator LED abstraction over any `OutputPin`.

use embedded_hal::digital::v2::OutputPin;

use crate::supervisor::Indicator;

/// Whether the LED is driven active-high or active-low on the board wiring.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ActiveLevel {
    High,
    Low,
}

/// LED that remembers its active level and last commanded state.
///
/// Pin errors are ignored; an indicator that fails to switch must not stop the caller.
pub struct Led<PIN: OutputPin> {
    pin: PIN,
    active: ActiveLevel,
    is_on: bool,
}

impl<PIN: OutputPin> Led<PIN> {
    /// Create an LED wrapper, initializing it to OFF.
    pub fn new(pin: PIN, active: ActiveLevel) -> Self {
        let mut led = Self {
            pin,
            active,
            is_on: false,
        };
        led.set(false);
        led
    }

    pub fn active_high(pin: PIN) -> Self {
        Self::new(pin, ActiveLevel::High)
    }

    pub fn active_low(pin: PIN) -> Self {
        Self::new(pin, ActiveLevel::Low)
    }

    /// Drive the LED logically ON (true) or OFF (false).
    pub fn set(&mut self, on: bool) {
        let high = match self.active {
            ActiveLevel::High => on,
            ActiveLevel::Low => !on,
        };
        if high {
            self.pin.set_high().ok();
        } else {
            self.pin.set_low().ok();
        }
        self.is_on = on;
    }

    #[inline]
    pub fn on(&mut self) {
        self.set(true);
    }

    #[inline]
    pub fn off(&mut self) {
        self.set(false);
    }

    pub fn toggle(&mut self) {
        self.set(!self.is_on);
    }

    #[inline]
    pub fn is_on(&self) -> bool {
        self.is_on
    }

    pub fn free(self) -> PIN {
        self.pin
    }
}

impl<PIN: OutputPin> Indicator for Led<PIN> {
    #[inline]
    fn set(&mut self, on: bool) {
        Led::set(self, on);
    }
}
