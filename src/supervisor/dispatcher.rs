// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Override-then-fallback command dispatch.
//!
//! A decoded command goes to the first matching user handler, if any. The user handler's return
//! value decides whether the built-in handler runs afterwards. Commands without a user handler
//! always reach the built-in handler exactly once.

use log::debug;

use crate::protocol::Transport;
use crate::supervisor::command_table::CommandTable;

/// Who ended up handling a command.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Route {
    /// No user handler; built-in only.
    Builtin,
    /// User handler consumed the command.
    User,
    /// User handler ran, then the built-in handler.
    UserThenBuiltin,
}

/// Resolves command ids against the installed table.
#[derive(Copy, Clone, Debug, Default)]
pub struct Dispatcher<'t> {
    table: CommandTable<'t>,
}

impl<'t> Dispatcher<'t> {
    pub fn new(table: CommandTable<'t>) -> Self {
        Self { table }
    }

    /// Replace the table wholesale.
    pub(crate) fn install(&mut self, table: CommandTable<'t>) {
        self.table = table;
    }

    #[inline]
    pub fn table(&self) -> CommandTable<'t> {
        self.table
    }

    /// Dispatch the transport's current command `id`.
    ///
    /// `id` must be non-zero.
    pub fn dispatch<T: Transport>(&self, transport: &mut T, id: u8) -> Route {
        let Some(entry) = self.table.lookup(id) else {
            debug!("cmd {:#04x}: built-in", id);
            transport.run_builtin_handler();
            return Route::Builtin;
        };

        let also_builtin = (entry.handler)(id, transport.payload());
        if also_builtin {
            debug!("cmd {:#04x}: user, then built-in", id);
            transport.run_builtin_handler();
            Route::UserThenBuiltin
        } else {
            debug!("cmd {:#04x}: user", id);
            Route::User
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::supervisor::command_table::CommandEntry;
    use crate::testing::{calls, record_call, Event, FakeTransport};

    fn consume(id: u8, payload: &[u8]) -> bool {
        record_call(Event::UserHandler { id, len: payload.len() });
        false
    }

    fn fallthrough(id: u8, payload: &[u8]) -> bool {
        record_call(Event::UserHandler { id, len: payload.len() });
        true
    }

    static TABLE: [CommandEntry; 2] = [
        CommandEntry::new(0x40, consume),
        CommandEntry::new(0x41, fallthrough),
    ];

    fn dispatcher() -> Dispatcher<'static> {
        Dispatcher::new(CommandTable::new(&TABLE).unwrap())
    }

    #[test]
    fn empty_table_always_runs_builtin_once() {
        let d = Dispatcher::default();
        for id in 1..=u8::MAX {
            let mut t = FakeTransport::new();
            t.push_command(id, &[]);
            t.decode_next();
            assert_eq!(d.dispatch(&mut t, id), Route::Builtin);
            assert_eq!(t.builtin_runs(), 1);
        }
    }

    #[test]
    fn unmatched_id_runs_builtin_once() {
        let mut t = FakeTransport::new();
        t.push_command(0x42, &[1, 2]);
        t.decode_next();

        assert_eq!(dispatcher().dispatch(&mut t, 0x42), Route::Builtin);
        assert_eq!(t.builtin_runs(), 1);
        // Only the built-in handler ran; no user handler was consulted.
        assert_eq!(calls(), [Event::Builtin { id: 0x42 }]);
    }

    #[test]
    fn consuming_handler_suppresses_builtin() {
        let mut t = FakeTransport::new();
        t.push_command(0x40, &[9, 8, 7]);
        t.decode_next();

        assert_eq!(dispatcher().dispatch(&mut t, 0x40), Route::User);
        assert_eq!(t.builtin_runs(), 0);
        assert_eq!(calls(), [Event::UserHandler { id: 0x40, len: 3 }]);
    }

    #[test]
    fn fallthrough_handler_runs_before_builtin() {
        let mut t = FakeTransport::new();
        t.push_command(0x41, &[5]);
        t.decode_next();

        assert_eq!(dispatcher().dispatch(&mut t, 0x41), Route::UserThenBuiltin);
        assert_eq!(t.builtin_runs(), 1);
        assert_eq!(
            calls(),
            [
                Event::UserHandler { id: 0x41, len: 1 },
                Event::Builtin { id: 0x41 },
            ]
        );
    }

    #[test]
    fn install_replaces_table() {
        let mut d = dispatcher();
        d.install(CommandTable::empty());

        let mut t = FakeTransport::new();
        t.push_command(0x40, &[]);
        t.decode_next();
        assert_eq!(d.dispatch(&mut t, 0x40), Route::Builtin);
    }
}
