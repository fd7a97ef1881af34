// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Serial command link.
//!
//! `Telecom` frames bytes from a serial port into commands, runs the built-in handlers
//! (MOVE, BRAKE, PING) and queues outgoing telemetry. Everything is non-blocking: reads stop at
//! the first `WouldBlock`, writes stop when the UART cannot take another byte.

use embedded_hal::serial::{Read, Write};
use heapless::Deque;
use log::trace;

use crate::drivers::Drive;
use crate::protocol::messages::{Builtin, MAX_PAYLOAD, TLM_PONG};
use crate::protocol::parser::{encode, Frame, Parser};
use crate::protocol::Transport;
use crate::supervisor::NO_COMMAND;

/// Upper bound on bytes consumed by one `poll`.
pub const MAX_BYTES_PER_POLL: usize = 32;

/// Outgoing telemetry buffer size in bytes.
pub const TELEMETRY_CAPACITY: usize = 64;

pub struct Telecom<RX, TX, D> {
    rx: RX,
    tx: TX,
    drive: D,
    parser: Parser,
    ready: Option<Frame>,
    current: Frame,
    outbox: Deque<u8, TELEMETRY_CAPACITY>,
}

impl<RX, TX, D> Telecom<RX, TX, D>
where
    RX: Read<u8>,
    TX: Write<u8>,
    D: Drive,
{
    pub fn new(rx: RX, tx: TX, drive: D) -> Self {
        Self {
            rx,
            tx,
            drive,
            parser: Parser::new(),
            ready: None,
            current: Frame::empty(),
            outbox: Deque::new(),
        }
    }

    /// Queue one telemetry frame. Returns `false` (and queues nothing) if it does not fit.
    pub fn queue_telemetry(&mut self, id: u8, payload: &[u8]) -> bool {
        let mut buf = [0u8; MAX_PAYLOAD + 4];
        let Some(n) = encode(id, payload, &mut buf) else {
            return false;
        };
        if self.outbox.capacity() - self.outbox.len() < n {
            trace!("telemetry {:#04x} dropped: queue full", id);
            return false;
        }
        for &b in &buf[..n] {
            // Space was checked above.
            let _ = self.outbox.push_back(b);
        }
        true
    }

    /// Bytes waiting to be sent.
    #[inline]
    pub fn pending_telemetry(&self) -> usize {
        self.outbox.len()
    }

    #[inline]
    pub fn drive_mut(&mut self) -> &mut D {
        &mut self.drive
    }

    pub fn free(self) -> (RX, TX, D) {
        (self.rx, self.tx, self.drive)
    }
}

impl<RX, TX, D> Transport for Telecom<RX, TX, D>
where
    RX: Read<u8>,
    TX: Write<u8>,
    D: Drive,
{
    fn poll(&mut self) -> bool {
        if self.ready.is_some() {
            return true;
        }

        let mut received = false;
        for _ in 0..MAX_BYTES_PER_POLL {
            match self.rx.read() {
                Ok(byte) => {
                    received = true;
                    if let Some(frame) = self.parser.push(byte) {
                        self.ready = Some(frame);
                        break;
                    }
                }
                Err(nb::Error::WouldBlock) => break,
                Err(nb::Error::Other(_)) => {
                    trace!("serial read error");
                    break;
                }
            }
        }
        received
    }

    fn decode_next(&mut self) -> u8 {
        self.current = self.ready.take().unwrap_or(Frame::empty());
        self.current.id()
    }

    fn payload(&self) -> &[u8] {
        self.current.payload()
    }

    fn payload_len(&self) -> u8 {
        self.current.len()
    }

    fn run_builtin_handler(&mut self) {
        let frame = self.current;
        if frame.id() == NO_COMMAND {
            return;
        }

        match Builtin::parse(frame.id(), frame.payload()) {
            Some(Builtin::Move { left, right }) => self.drive.drive(left, right),
            Some(Builtin::Brake) => self.drive.brake(),
            Some(Builtin::Ping) => {
                self.queue_telemetry(TLM_PONG, frame.payload());
            }
            None => trace!("no built-in handler for {:#04x}", frame.id()),
        }
    }

    fn emit_pending_telemetry(&mut self) {
        while let Some(&byte) = self.outbox.front() {
            match self.tx.write(byte) {
                Ok(()) => {
                    self.outbox.pop_front();
                }
                Err(nb::Error::WouldBlock) => break,
                Err(nb::Error::Other(_)) => {
                    trace!("serial write error");
                    break;
                }
            }
        }
    }
}
