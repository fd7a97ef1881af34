// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! TB6612FNG dual H-bridge, one channel per [`Motor`].
//!
//! | IN1 | IN2 | Output |
//! | --- | --- | ------ |
//! | H   | L   | forward |
//! | L   | H   | reverse |
//! | H   | H   | short brake |
//! | L   | L   | coast |
//!
//! Speed is applied as PWM duty on the channel's PWM input.

use embedded_hal::digital::v2::OutputPin;
use embedded_hal::PwmPin;

use crate::drivers::Drive;
use crate::protocol::messages::SideCommand;

/// Commanded motor direction.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Direction {
    Forward,
    Reverse,
    Brake,
    Coast,
}

impl Direction {
    /// Wire encoding: 1 forward, 2 reverse, 3 brake, 4 coast. Anything else brakes.
    pub fn from_byte(b: u8) -> Self {
        match b {
            1 => Direction::Forward,
            2 => Direction::Reverse,
            4 => Direction::Coast,
            _ => Direction::Brake,
        }
    }
}

/// One H-bridge channel.
pub struct Motor<IN1, IN2, PWM> {
    in1: IN1,
    in2: IN2,
    pwm: PWM,
}

impl<IN1, IN2, PWM> Motor<IN1, IN2, PWM>
where
    IN1: OutputPin,
    IN2: OutputPin,
    PWM: PwmPin<Duty = u16>,
{
    /// Wrap the channel pins and leave the motor braked with the PWM output enabled.
    pub fn new(in1: IN1, in2: IN2, mut pwm: PWM) -> Self {
        pwm.set_duty(0);
        pwm.enable();
        let mut motor = Self { in1, in2, pwm };
        motor.brake();
        motor
    }

    /// Drive in `direction` at `speed` (0..=255 of full scale).
    pub fn go(&mut self, direction: Direction, speed: u8) {
        let (in1, in2) = match direction {
            Direction::Forward => (true, false),
            Direction::Reverse => (false, true),
            Direction::Brake => (true, true),
            Direction::Coast => (false, false),
        };
        set_level(&mut self.in1, in1);
        set_level(&mut self.in2, in2);

        let duty = match direction {
            Direction::Forward | Direction::Reverse => scale_duty(speed, self.pwm.get_max_duty()),
            Direction::Brake | Direction::Coast => 0,
        };
        self.pwm.set_duty(duty);
    }

    /// Short-brake the motor.
    pub fn brake(&mut self) {
        self.go(Direction::Brake, 0);
    }

    pub fn free(self) -> (IN1, IN2, PWM) {
        (self.in1, self.in2, self.pwm)
    }
}

fn set_level<P: OutputPin>(pin: &mut P, high: bool) {
    if high {
        pin.set_high().ok();
    } else {
        pin.set_low().ok();
    }
}

/// Map an 8-bit speed onto `0..=max_duty`.
fn scale_duty(speed: u8, max_duty: u16) -> u16 {
    (u32::from(speed) * u32::from(max_duty) / 255) as u16
}

/// Left and right drive motors.
pub struct MotorPair<L, R> {
    pub left: L,
    pub right: R,
}

impl<L1, L2, LP, R1, R2, RP> Drive for MotorPair<Motor<L1, L2, LP>, Motor<R1, R2, RP>>
where
    L1: OutputPin,
    L2: OutputPin,
    LP: PwmPin<Duty = u16>,
    R1: OutputPin,
    R2: OutputPin,
    RP: PwmPin<Duty = u16>,
{
    fn drive(&mut self, left: SideCommand, right: SideCommand) {
        self.left.go(left.direction, left.speed);
        self.right.go(right.direction, right.speed);
    }

    fn brake(&mut self) {
        self.left.brake();
        self.right.brake();
    }
}
