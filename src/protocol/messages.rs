// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Command frame protocol used to talk to the robot.
//!
//! ```text
//! 0xA5 | id | len | payload[len] | checksum
//! ```
//!
//! `checksum` is the wrapping sum of `id`, `len` and every payload byte.

use crate::drivers::tb6612::Direction;

/// Sync byte for the protocol.
pub const START_BYTE: u8 = 0xA5;

/// Longest payload a frame may carry.
pub const MAX_PAYLOAD: usize = 16;

// Built-in command IDs
pub const MSG_MOVE: u8 = 0x01;
pub const MSG_BRAKE: u8 = 0x02;
pub const MSG_PING: u8 = 0x03;

// Telemetry IDs
pub const TLM_PONG: u8 = 0x83;

/// Motor setpoint for one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SideCommand {
    pub direction: Direction,
    pub speed: u8,
}

/// Commands the transport handles on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Move { left: SideCommand, right: SideCommand },
    Brake,
    Ping,
}

impl Builtin {
    /// Decode a built-in command. Unknown ids and short payloads yield `None`.
    pub fn parse(id: u8, payload: &[u8]) -> Option<Self> {
        match (id, payload) {
            (MSG_MOVE, [ld, ls, rd, rs, ..]) => Some(Builtin::Move {
                left: SideCommand {
                    direction: Direction::from_byte(*ld),
                    speed: *ls,
                },
                right: SideCommand {
                    direction: Direction::from_byte(*rd),
                    speed: *rs,
                },
            }),
            (MSG_BRAKE, _) => Some(Builtin::Brake),
            (MSG_PING, _) => Some(Builtin::Ping),
            _ => None,
        }
    }
}

/// Wrapping-sum checksum over a frame's id, length and payload.
pub fn checksum(id: u8, payload: &[u8]) -> u8 {
    payload
        .iter()
        .fold(id.wrapping_add(payload.len() as u8), |acc, b| acc.wrapping_add(*b))
}
