// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Recording fakes shared by the unit tests.
//!
//! Every fake appends to one thread-local event log so tests can assert on ordering across
//! collaborators. libtest runs each test on its own thread.

use core::convert::Infallible;
use std::cell::RefCell;
use std::collections::VecDeque;

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::digital::v2::OutputPin;
use embedded_hal::watchdog::Watchdog;

use crate::protocol::Transport;
use crate::supervisor::{BatterySense, LowPower};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Event {
    BringUp,
    UserHandler { id: u8, len: usize },
    Builtin { id: u8 },
    Telemetry,
    WatchdogFeed,
    BatterySample,
    Pin { name: &'static str, high: bool },
    Delay(u16),
    Sleep,
}

thread_local! {
    static CALLS: RefCell<Vec<Event>> = const { RefCell::new(Vec::new()) };
}

pub fn record_call(event: Event) {
    CALLS.with(|c| c.borrow_mut().push(event));
}

pub fn calls() -> Vec<Event> {
    CALLS.with(|c| c.borrow().clone())
}

pub fn reset_calls() {
    CALLS.with(|c| c.borrow_mut().clear());
}

/// Panic message used by [`FakeSleep`] in place of halting.
pub const HALTED: &str = "halted";

/// Whether a `catch_unwind` result came from [`FakeSleep`].
pub fn halted(result: std::thread::Result<()>) -> bool {
    match result {
        Ok(()) => false,
        Err(payload) => payload.downcast_ref::<&str>() == Some(&HALTED),
    }
}

/// Transport fed from a queue of pre-decoded commands. Id 0 models bytes that did not form a
/// complete command.
#[derive(Default)]
pub struct FakeTransport {
    pending: VecDeque<(u8, Vec<u8>)>,
    current_id: u8,
    current_payload: Vec<u8>,
    builtin_runs: usize,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_command(&mut self, id: u8, payload: &[u8]) {
        self.pending.push_back((id, payload.to_vec()));
    }

    pub fn push_noise(&mut self) {
        self.pending.push_back((0, Vec::new()));
    }

    pub fn builtin_runs(&self) -> usize {
        self.builtin_runs
    }
}

impl Transport for FakeTransport {
    fn poll(&mut self) -> bool {
        !self.pending.is_empty()
    }

    fn decode_next(&mut self) -> u8 {
        let (id, payload) = self.pending.pop_front().unwrap_or_default();
        self.current_id = id;
        self.current_payload = payload;
        id
    }

    fn payload(&self) -> &[u8] {
        &self.current_payload
    }

    fn run_builtin_handler(&mut self) {
        self.builtin_runs += 1;
        record_call(Event::Builtin { id: self.current_id });
    }

    fn emit_pending_telemetry(&mut self) {
        record_call(Event::Telemetry);
    }
}

pub struct FakeWatchdog;

impl Watchdog for FakeWatchdog {
    fn feed(&mut self) {
        record_call(Event::WatchdogFeed);
    }
}

#[derive(Debug, Eq, PartialEq)]
pub struct SenseUnavailable;

/// Battery source replaying a sequence of raw samples; the last one repeats.
pub struct FakeSense {
    samples: VecDeque<u16>,
    last: u16,
    fail: bool,
}

impl FakeSense {
    pub fn constant(value: u16) -> Self {
        Self::sequence(&[value])
    }

    pub fn sequence(values: &[u16]) -> Self {
        Self {
            samples: values.iter().copied().collect(),
            last: values.last().copied().unwrap_or(0),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            samples: VecDeque::new(),
            last: 0,
            fail: true,
        }
    }
}

impl BatterySense for FakeSense {
    type Error = SenseUnavailable;

    fn sample(&mut self) -> Result<u16, Self::Error> {
        if self.fail {
            return Err(SenseUnavailable);
        }
        record_call(Event::BatterySample);
        Ok(self.samples.pop_front().unwrap_or(self.last))
    }
}

/// Output pin that logs every level change under its name.
pub struct FakePin(pub &'static str);

impl OutputPin for FakePin {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Self::Error> {
        record_call(Event::Pin { name: self.0, high: false });
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        record_call(Event::Pin { name: self.0, high: true });
        Ok(())
    }
}

pub struct FakeDelay;

impl DelayMs<u16> for FakeDelay {
    fn delay_ms(&mut self, ms: u16) {
        record_call(Event::Delay(ms));
    }
}

/// Records the halt, then unwinds instead of sleeping forever.
pub struct FakeSleep;

impl LowPower for FakeSleep {
    fn sleep_forever(&mut self) -> ! {
        record_call(Event::Sleep);
        std::panic::panic_any(HALTED)
    }
}
