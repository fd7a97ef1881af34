// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Battery sense input on ADC1 using direct PAC register access.
//!
//! Blocking single-channel reads. The 12-bit result is scaled down to 10 bits so the battery
//! threshold stays in the 10-bit scale of the battery divider calibration.
//!
//! Example:
//! ```ignore
//! let adc1 = Adc::adc1(dp.ADC1);
//! let mut vbatt = adc1.channel(5);
//! let raw = vbatt.sample();
//! ```

use core::convert::Infallible;

use stm32f7xx_hal::pac;

use crate::supervisor::BatterySense;

/// ADC1 wrapper.
pub struct Adc {
    adc: pac::ADC1,
}

impl Adc {
    /// Create and initialize ADC1.
    pub fn adc1(adc1: pac::ADC1) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb2enr.modify(|_, w| w.adc1en().set_bit());

        let common = unsafe { &*pac::ADC_COMMON::ptr() };
        // ADC prescaler: PCLK2 / 4
        common.ccr.modify(|_, w| w.adcpre().div4());

        // Power off to configure
        adc1.cr2.modify(|_, w| w.adon().clear_bit());

        // 12-bit, right-aligned, software trigger
        adc1.cr1.modify(|_, w| w.res().bits(0b00));
        adc1.cr2.modify(|_, w| {
            w.cont().clear_bit();
            w.align().right();
            w.exten().disabled();
            w
        });

        // Power on
        adc1.cr2.modify(|_, w| w.adon().set_bit());

        Self { adc: adc1 }
    }

    /// Read a single channel (0..=9).
    pub fn read(&self, channel: u8) -> u16 {
        let adc = &self.adc;

        // Long sample time for the high-impedance divider
        adc.smpr2.modify(|_, w| match channel {
            0 => w.smp0().bits(0b111),
            1 => w.smp1().bits(0b111),
            2 => w.smp2().bits(0b111),
            3 => w.smp3().bits(0b111),
            4 => w.smp4().bits(0b111),
            5 => w.smp5().bits(0b111),
            6 => w.smp6().bits(0b111),
            7 => w.smp7().bits(0b111),
            8 => w.smp8().bits(0b111),
            _ => w.smp9().bits(0b111),
        });

        // Sequence length = 1 conversion
        adc.sqr1.modify(|_, w| w.l().bits(0));
        adc.sqr3.modify(|_, w| unsafe { w.sq1().bits(channel & 0x1F) });

        adc.cr2.modify(|_, w| w.swstart().set_bit());
        while adc.sr.read().eoc().bit_is_clear() {}

        adc.dr.read().data().bits() as u16
    }

    /// Bind a channel as the battery sense source.
    pub fn channel(self, channel: u8) -> BatteryChannel {
        BatteryChannel { adc: self, channel }
    }

    #[inline]
    pub fn free(self) -> pac::ADC1 {
        self.adc
    }
}

/// One ADC channel wired to the battery divider.
pub struct BatteryChannel {
    adc: Adc,
    channel: u8,
}

impl BatterySense for BatteryChannel {
    type Error = Infallible;

    fn sample(&mut self) -> Result<u16, Self::Error> {
        Ok(self.adc.read(self.channel) >> 2)
    }
}
