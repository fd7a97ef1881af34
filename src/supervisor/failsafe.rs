// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Fail-safe shutdown.
//!
//! Blinks two indicator groups in phase opposition for a fixed time, then parks the MCU in a
//! low-power state that only an external reset leaves. The alternating pattern is the
//! diagnostic signature of a battery fault, so it must not degrade into "all blink together".

use embedded_hal::blocking::delay::DelayMs;
use log::error;

use crate::config::AlertConfig;

/// Why the supervisor stopped.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum HaltReason {
    /// Battery reading below threshold.
    UnderVoltage { level: u16 },
    /// Battery sense source reported an error.
    SenseFault,
}

/// A binary visual output.
pub trait Indicator {
    fn set(&mut self, on: bool);
}

/// A pair of indicators driven together.
impl<A: Indicator, B: Indicator> Indicator for (A, B) {
    fn set(&mut self, on: bool) {
        self.0.set(on);
        self.1.set(on);
    }
}

/// Terminal low-power state.
pub trait LowPower {
    fn sleep_forever(&mut self) -> !;
}

/// Irrevocable stop of normal operation.
pub trait Shutdown {
    fn shutdown(&mut self, reason: HaltReason) -> !;
}

pub struct FailSafe<A, B, D, L> {
    group_a: A,
    group_b: B,
    delay: D,
    low_power: L,
    config: AlertConfig,
}

impl<A, B, D, L> FailSafe<A, B, D, L>
where
    A: Indicator,
    B: Indicator,
    D: DelayMs<u16>,
    L: LowPower,
{
    pub fn new(group_a: A, group_b: B, delay: D, low_power: L, config: AlertConfig) -> Self {
        Self {
            group_a,
            group_b,
            delay,
            low_power,
            config,
        }
    }

    /// Run the alternating alert pattern. Blocks for `2 * cycles * phase_ms` milliseconds.
    pub fn alert(&mut self) {
        for _ in 0..self.config.cycles {
            self.group_a.set(true);
            self.group_b.set(false);
            self.delay.delay_ms(self.config.phase_ms);

            self.group_a.set(false);
            self.group_b.set(true);
            self.delay.delay_ms(self.config.phase_ms);
        }
    }
}

impl<A, B, D, L> Shutdown for FailSafe<A, B, D, L>
where
    A: Indicator,
    B: Indicator,
    D: DelayMs<u16>,
    L: LowPower,
{
    fn shutdown(&mut self, reason: HaltReason) -> ! {
        error!("fail-safe halt: {:?}", reason);
        self.alert();
        self.low_power.sleep_forever()
    }
}
