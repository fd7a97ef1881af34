// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! USART abstraction layer and the debug-port logger.
//!
//! [`CommandRx`]/[`CommandTx`] hide which USART carries command frames, so the transport does
//! not care whether the board uses the debug port or the secondary port. [`UsartLogger`] routes
//! `log` records to the debug USART when it is not carrying commands.
//!
//! To access the terminal on the host machine, connect to the debug USB port and use
//! ```text
//! $ screen /dev/tty.usbmodem* 115200
//! ```

use core::cell::RefCell;
use core::fmt::{self, Write as _};

use cortex_m::interrupt::{self, Mutex};
use embedded_hal::serial::{Read, Write};
use log::{LevelFilter, Log, Metadata, Record};
use nb::block;
use stm32f7xx_hal::{
    pac::{USART1, USART2},
    serial::{Rx, Tx},
};

/// Blocking writer on a USART TX half.
pub struct Usart<U> {
    tx: Tx<U>,
}

impl<U> Usart<U>
where
    Tx<U>: Write<u8>,
{
    pub fn new(tx: Tx<U>) -> Self {
        Self { tx }
    }

    #[inline]
    pub fn write_byte(&mut self, b: u8) {
        let _ = block!(self.tx.write(b));
    }

    pub fn write_str(&mut self, s: &str) {
        for &b in s.as_bytes() {
            self.write_byte(b);
        }
    }
}

impl<U> fmt::Write for Usart<U>
where
    Tx<U>: Write<u8>,
{
    fn write_str(&mut self, s: &str) -> fmt::Result {
        Usart::write_str(self, s);
        Ok(())
    }
}

static DEBUG_USART: Mutex<RefCell<Option<Usart<USART1>>>> = Mutex::new(RefCell::new(None));

/// `log` sink writing `[LEVEL] target: message` lines to the debug USART.
pub struct UsartLogger;

static LOGGER: UsartLogger = UsartLogger;

impl Log for UsartLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        interrupt::free(|cs| {
            if let Some(usart) = DEBUG_USART.borrow(cs).borrow_mut().as_mut() {
                let _ = write!(
                    usart,
                    "[{}] {}: {}\r\n",
                    record.level(),
                    record.target(),
                    record.args()
                );
            }
        });
    }

    fn flush(&self) {}
}

/// Install the debug USART as the global logger.
pub fn init_logger(usart: Usart<USART1>, level: LevelFilter) {
    interrupt::free(|cs| DEBUG_USART.borrow(cs).replace(Some(usart)));
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

/// Receive half of whichever USART carries commands.
pub enum CommandRx {
    Primary(Rx<USART1>),
    Secondary(Rx<USART2>),
}

/// Transmit half of whichever USART carries commands.
pub enum CommandTx {
    Primary(Tx<USART1>),
    Secondary(Tx<USART2>),
}

impl Read<u8> for CommandRx {
    type Error = ();

    fn read(&mut self) -> nb::Result<u8, ()> {
        match self {
            CommandRx::Primary(rx) => rx.read().map_err(|e| e.map(|_| ())),
            CommandRx::Secondary(rx) => rx.read().map_err(|e| e.map(|_| ())),
        }
    }
}

impl Write<u8> for CommandTx {
    type Error = ();

    fn write(&mut self, word: u8) -> nb::Result<(), ()> {
        match self {
            CommandTx::Primary(tx) => tx.write(word).map_err(|e| e.map(|_| ())),
            CommandTx::Secondary(tx) => tx.write(word).map_err(|e| e.map(|_| ())),
        }
    }

    fn flush(&mut self) -> nb::Result<(), ()> {
        match self {
            CommandTx::Primary(tx) => tx.flush().map_err(|e| e.map(|_| ())),
            CommandTx::Secondary(tx) => tx.flush().map_err(|e| e.map(|_| ())),
        }
    }
}
