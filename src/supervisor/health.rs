// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Battery voltage monitor.
//!
//! A reading is the sum of `samples` consecutive raw conversions divided by `divisor`. With the
//! reference calibration (7 samples, divisor 5) this is an amplified average, not a mean; the
//! threshold is tuned against that scale.

use log::debug;

use crate::config::HealthConfig;

/// Source of raw battery conversions.
///
/// An error means the analog source is unavailable. The supervisor treats that as a hard fault.
pub trait BatterySense {
    type Error: core::fmt::Debug;

    fn sample(&mut self) -> Result<u16, Self::Error>;
}

impl<S: BatterySense + ?Sized> BatterySense for &mut S {
    type Error = S::Error;

    fn sample(&mut self) -> Result<u16, Self::Error> {
        (**self).sample()
    }
}

/// Outcome of one battery check.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Health {
    Nominal { level: u16 },
    UnderVoltage { level: u16 },
}

pub struct BatteryMonitor<S> {
    sense: S,
    config: HealthConfig,
}

impl<S: BatterySense> BatteryMonitor<S> {
    pub fn new(sense: S, config: HealthConfig) -> Self {
        Self { sense, config }
    }

    /// Take one battery reading.
    pub fn read_level(&mut self) -> Result<u16, S::Error> {
        let mut total: u32 = 0;
        for _ in 0..self.config.samples {
            total += u32::from(self.sense.sample()?);
        }
        let level = total / u32::from(self.config.divisor.max(1));
        Ok(level.min(u32::from(u16::MAX)) as u16)
    }

    /// Take a reading and compare it against the threshold.
    pub fn check(&mut self) -> Result<Health, S::Error> {
        let level = self.read_level()?;
        debug!("battery level {} (threshold {})", level, self.config.threshold);

        if level < self.config.threshold {
            Ok(Health::UnderVoltage { level })
        } else {
            Ok(Health::Nominal { level })
        }
    }

    #[inline]
    pub fn config(&self) -> HealthConfig {
        self.config
    }

    pub fn free(self) -> S {
        self.sense
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{calls, Event, FakeSense, SenseUnavailable};

    #[test]
    fn reading_divides_seven_samples_by_five() {
        let sense = FakeSense::sequence(&[500, 510, 520, 530, 540, 550, 561]);
        let mut monitor = BatteryMonitor::new(sense, HealthConfig::default());
        // 3711 / 5 = 742.2
        assert_eq!(monitor.read_level(), Ok(742));
        let samples = calls().iter().filter(|e| **e == Event::BatterySample).count();
        assert_eq!(samples, 7);
    }

    #[test]
    fn reading_truncates() {
        let mut monitor = BatteryMonitor::new(FakeSense::constant(1), HealthConfig::default());
        // 7 / 5
        assert_eq!(monitor.read_level(), Ok(1));
    }

    #[test]
    fn full_scale_ten_bit_reading_fits() {
        let mut monitor = BatteryMonitor::new(FakeSense::constant(1023), HealthConfig::default());
        assert_eq!(monitor.read_level(), Ok(1432));
    }

    #[test]
    fn below_threshold_is_under_voltage() {
        // 500 * 7 / 5 = 700
        let mut monitor = BatteryMonitor::new(FakeSense::constant(500), HealthConfig::default());
        assert_eq!(monitor.check(), Ok(Health::UnderVoltage { level: 700 }));
    }

    #[test]
    fn threshold_itself_is_nominal() {
        // 3725 / 5 = 745
        let sense = FakeSense::sequence(&[532, 532, 532, 532, 532, 532, 533]);
        let mut monitor = BatteryMonitor::new(sense, HealthConfig::default());
        assert_eq!(monitor.check(), Ok(Health::Nominal { level: 745 }));
    }

    #[test]
    fn sense_failure_is_propagated() {
        let mut monitor = BatteryMonitor::new(FakeSense::failing(), HealthConfig::default());
        assert_eq!(monitor.check(), Err(SenseUnavailable));
    }
}
