// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Frame parser for the command protocol.
//!
//! Bytes are pushed one at a time. Corrupt or oversized frames are dropped and the parser goes
//! back to hunting for the start byte.

use log::trace;

use crate::protocol::messages::*;
use crate::supervisor::NO_COMMAND;

/// A complete, checksum-verified frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    id: u8,
    len: u8,
    data: [u8; MAX_PAYLOAD],
}

impl Frame {
    pub const fn empty() -> Self {
        Self {
            id: NO_COMMAND,
            len: 0,
            data: [0; MAX_PAYLOAD],
        }
    }

    #[inline]
    pub fn id(&self) -> u8 {
        self.id
    }

    #[inline]
    pub fn len(&self) -> u8 {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.data[..self.len as usize]
    }
}

enum State {
    WaitStart,
    WaitId,
    WaitLen,
    Payload,
    WaitChecksum,
}

pub struct Parser {
    state: State,
    frame: Frame,
    filled: u8,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Self {
            state: State::WaitStart,
            frame: Frame::empty(),
            filled: 0,
        }
    }

    /// Process a single incoming byte. Returns `Some(Frame)` if a complete frame is received.
    pub fn push(&mut self, byte: u8) -> Option<Frame> {
        match self.state {
            State::WaitStart => {
                if byte == START_BYTE {
                    self.frame = Frame::empty();
                    self.filled = 0;
                    self.state = State::WaitId;
                }
            }
            State::WaitId => {
                if byte == NO_COMMAND {
                    trace!("dropping frame with reserved id");
                    self.state = State::WaitStart;
                } else {
                    self.frame.id = byte;
                    self.state = State::WaitLen;
                }
            }
            State::WaitLen => {
                if byte as usize > MAX_PAYLOAD {
                    trace!("dropping frame {:#04x}: length {}", self.frame.id, byte);
                    self.state = State::WaitStart;
                } else {
                    self.frame.len = byte;
                    self.state = if byte == 0 {
                        State::WaitChecksum
                    } else {
                        State::Payload
                    };
                }
            }
            State::Payload => {
                self.frame.data[self.filled as usize] = byte;
                self.filled += 1;
                if self.filled == self.frame.len {
                    self.state = State::WaitChecksum;
                }
            }
            State::WaitChecksum => {
                self.state = State::WaitStart; // Reset for next frame

                if byte == checksum(self.frame.id, self.frame.payload()) {
                    return Some(self.frame);
                }
                trace!("dropping frame {:#04x}: bad checksum", self.frame.id);
            }
        }
        None
    }
}

/// Encode a frame into `out`. Returns the number of bytes written, or `None` if `out` is too
/// small or the payload too long.
pub fn encode(id: u8, payload: &[u8], out: &mut [u8]) -> Option<usize> {
    let total = payload.len() + 4;
    if payload.len() > MAX_PAYLOAD || out.len() < total {
        return None;
    }
    out[0] = START_BYTE;
    out[1] = id;
    out[2] = payload.len() as u8;
    out[3..3 + payload.len()].copy_from_slice(payload);
    out[total - 1] = checksum(id, payload);
    Some(total)
}
