// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Integrator-supplied command handlers.
//!
//! The table is owned by the integrator (usually a `static` array) and only borrowed by the
//! supervisor, so installing it never allocates or copies entries.

use thiserror::Error;

/// Command id meaning "no command decoded". Never valid in a table.
pub const NO_COMMAND: u8 = 0;

/// User command handler.
///
/// Receives the command id and its payload. Returning `true` asks the dispatcher to also run the
/// built-in handler for the same command; `false` means the command was fully handled.
pub type CommandHandler = fn(id: u8, payload: &[u8]) -> bool;

/// One `(command id, handler)` pair.
#[derive(Copy, Clone)]
pub struct CommandEntry {
    pub id: u8,
    pub handler: CommandHandler,
}

impl CommandEntry {
    pub const fn new(id: u8, handler: CommandHandler) -> Self {
        Self { id, handler }
    }
}

impl core::fmt::Debug for CommandEntry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CommandEntry")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum TableError {
    /// Entry at `index` uses the reserved "no command" id.
    #[error("command table entry {index} uses reserved id 0")]
    ReservedId { index: usize },
    /// The main loop has already started iterating.
    #[error("command table cannot change once the loop is running")]
    LoopStarted,
}

/// Borrowed, immutable view of an installed handler table.
#[derive(Copy, Clone, Debug, Default)]
pub struct CommandTable<'t> {
    entries: &'t [CommandEntry],
}

impl<'t> CommandTable<'t> {
    /// The empty table: every command goes to the built-in handler.
    pub const fn empty() -> Self {
        Self { entries: &[] }
    }

    /// Validate and wrap an integrator table.
    ///
    /// Ids are not checked for uniqueness; lookup returns the first match.
    pub fn new(entries: &'t [CommandEntry]) -> Result<Self, TableError> {
        if let Some(index) = entries.iter().position(|e| e.id == NO_COMMAND) {
            return Err(TableError::ReservedId { index });
        }
        Ok(Self { entries })
    }

    /// First entry registered for `id`.
    pub fn lookup(&self, id: u8) -> Option<&'t CommandEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn entries(&self) -> &'t [CommandEntry] {
        self.entries
    }
}
