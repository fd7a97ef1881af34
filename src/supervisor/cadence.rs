// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Loop-count cadence for periodic work.
//!
//! Loop iterations have no fixed duration, so "every N iterations" is a cost bound rather than a
//! wall-clock period.

use crate::config::HEALTH_CHECK_PERIOD;

/// Bounded loop counter that fires once every `period` ticks.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Cadence {
    count: u16,
    period: u16,
}

impl Default for Cadence {
    fn default() -> Self {
        Self::new(HEALTH_CHECK_PERIOD)
    }
}

impl Cadence {
    /// `period` is clamped to at least 1.
    pub fn new(period: u16) -> Self {
        Self {
            count: 0,
            period: period.max(1),
        }
    }

    /// Count one loop iteration. Returns `true` when the counter reaches the sentinel
    /// (`period - 1`), which happens once per `period` calls.
    pub fn tick(&mut self) -> bool {
        self.count = (self.count + 1) % self.period;
        self.count == self.sentinel()
    }

    #[inline]
    pub fn count(&self) -> u16 {
        self.count
    }

    #[inline]
    pub fn period(&self) -> u16 {
        self.period
    }

    #[inline]
    fn sentinel(&self) -> u16 {
        self.period - 1
    }
}
