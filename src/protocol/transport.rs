// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Contract between the supervisor and the link layer.
//!
//! The supervisor never parses raw bytes. It only asks the transport whether input is pending,
//! which command id was decoded, and to run the built-in behavior for that command.

/// Command link seen from the supervisor.
///
/// Every method must return promptly: the main loop is a non-blocking poll loop.
pub trait Transport {
    /// Pull pending input from the link. Returns `true` if a command is ready to decode.
    fn poll(&mut self) -> bool;

    /// Take the next decoded command id, or `0` if nothing complete was received.
    ///
    /// The returned command stays "current" until the next call; `payload` and
    /// `run_builtin_handler` refer to it.
    fn decode_next(&mut self) -> u8;

    /// Payload of the current command.
    fn payload(&self) -> &[u8];

    /// Payload length of the current command.
    fn payload_len(&self) -> u8 {
        self.payload().len() as u8
    }

    /// Run the built-in behavior for the current command. Unknown ids must be a no-op.
    fn run_builtin_handler(&mut self);

    /// Send whatever outgoing telemetry is queued, without blocking.
    fn emit_pending_telemetry(&mut self);
}
