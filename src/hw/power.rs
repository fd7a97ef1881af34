// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Independent watchdog and the terminal deep-sleep state.

use cortex_m::peripheral::SCB;
use embedded_hal::watchdog::{Watchdog, WatchdogEnable};
use stm32f7xx_hal::{pac, prelude::*, watchdog::IndependentWatchdog};

use crate::supervisor::LowPower;

/// IWDG, started on construction. Once running it cannot be stopped.
pub struct Iwdg {
    iwdg: IndependentWatchdog,
}

impl Iwdg {
    pub fn start(iwdg: pac::IWDG, timeout_ms: u32) -> Self {
        let mut iwdg = IndependentWatchdog::new(iwdg);
        iwdg.start(timeout_ms.millis());
        Self { iwdg }
    }
}

impl Watchdog for Iwdg {
    #[inline]
    fn feed(&mut self) {
        self.iwdg.feed();
    }
}

/// Deep sleep with interrupts masked; only a reset wakes the core.
pub struct DeepSleep {
    scb: SCB,
}

impl DeepSleep {
    pub fn new(scb: SCB) -> Self {
        Self { scb }
    }
}

impl LowPower for DeepSleep {
    fn sleep_forever(&mut self) -> ! {
        cortex_m::interrupt::disable();
        self.scb.set_sleepdeep();
        cortex_m::asm::dsb();
        loop {
            cortex_m::asm::wfi();
        }
    }
}
