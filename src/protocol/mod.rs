// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

pub mod messages;
pub mod parser;
pub mod telecom;
pub mod transport;

pub use messages::Builtin;
pub use parser::{Frame, Parser};
pub use telecom::Telecom;
pub use transport::Transport;
