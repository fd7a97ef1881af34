// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin definitions for the STM32F777 robot controller board.

use stm32f7xx_hal::{
    gpio::{gpioa, gpiob, gpiod, gpioe, Alternate, Analog, OpenDrain, Output, PushPull},
    pac,
    prelude::*,
};

/// All board pins. Construct this once at startup using:
///
/// ```ignore
/// let pins = BoardPins::new(dp.GPIOA, dp.GPIOB, dp.GPIOD, dp.GPIOE);
/// ```
pub struct BoardPins {
    pub leds: LedPins,
    pub usart1: Usart1Pins,
    pub usart2: Usart2Pins,
    pub left: MotorPins<gpioe::PE2<Output<PushPull>>, gpioe::PE3<Output<PushPull>>>,
    pub right: MotorPins<gpioe::PE4<Output<PushPull>>, gpioe::PE5<Output<PushPull>>>,
    pub pwm: PwmPins,
    pub i2c1: I2c1Pins,
    pub vbatt: gpioa::PA5<Analog>, // ADC1_IN5
}

/// Status LEDs. Red/yellow and green/blue form the two fail-safe indicator groups.
pub struct LedPins {
    pub red: gpiod::PD8<Output<PushPull>>,
    pub yellow: gpiod::PD9<Output<PushPull>>,
    pub green: gpiod::PD10<Output<PushPull>>,
    pub blue: gpiod::PD11<Output<PushPull>>,
}

/// Debug USART (ST-LINK VCP)
pub struct Usart1Pins {
    pub tx: gpioa::PA9<Alternate<7>>,
    pub rx: gpioa::PA10<Alternate<7>>,
}

/// Secondary USART (radio module header)
pub struct Usart2Pins {
    pub tx: gpiod::PD5<Alternate<7>>,
    pub rx: gpiod::PD6<Alternate<7>>,
}

/// TB6612 direction inputs for one channel
pub struct MotorPins<IN1, IN2> {
    pub in1: IN1,
    pub in2: IN2,
}

/// TB6612 PWMA/PWMB inputs
pub struct PwmPins {
    pub left: gpiod::PD12<Alternate<2>>,  // TIM4_CH1
    pub right: gpiod::PD13<Alternate<2>>, // TIM4_CH2
}

/// Current-limit potentiometer bus
pub struct I2c1Pins {
    pub scl: gpiob::PB8<Alternate<4, OpenDrain>>,
    pub sda: gpiob::PB9<Alternate<4, OpenDrain>>,
}

impl BoardPins {
    /// Create all named pins from raw GPIO peripherals.
    pub fn new(gpioa: pac::GPIOA, gpiob: pac::GPIOB, gpiod: pac::GPIOD, gpioe: pac::GPIOE) -> Self {
        let gpioa = gpioa.split();
        let gpiob = gpiob.split();
        let gpiod = gpiod.split();
        let gpioe = gpioe.split();

        Self {
            leds: LedPins {
                red: gpiod.pd8.into_push_pull_output(),
                yellow: gpiod.pd9.into_push_pull_output(),
                green: gpiod.pd10.into_push_pull_output(),
                blue: gpiod.pd11.into_push_pull_output(),
            },

            usart1: Usart1Pins {
                tx: gpioa.pa9.into_alternate::<7>(),
                rx: gpioa.pa10.into_alternate::<7>(),
            },

            usart2: Usart2Pins {
                tx: gpiod.pd5.into_alternate::<7>(),
                rx: gpiod.pd6.into_alternate::<7>(),
            },

            left: MotorPins {
                in1: gpioe.pe2.into_push_pull_output(),
                in2: gpioe.pe3.into_push_pull_output(),
            },

            right: MotorPins {
                in1: gpioe.pe4.into_push_pull_output(),
                in2: gpioe.pe5.into_push_pull_output(),
            },

            pwm: PwmPins {
                left: gpiod.pd12.into_alternate::<2>(),
                right: gpiod.pd13.into_alternate::<2>(),
            },

            i2c1: I2c1Pins {
                scl: gpiob.pb8.into_alternate_open_drain::<4>(),
                sda: gpiob.pb9.into_alternate_open_drain::<4>(),
            },

            vbatt: gpioa.pa5.into_analog(),
        }
    }
}
