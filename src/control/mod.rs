//! Command socket
//! Location: src/control/mod.rs

pub mod client;
pub mod command;
pub mod framing;
pub mod server;

pub use client::send_command;
pub use command::{Command, Reply};
pub use framing::{decode_command, read_command};
pub use server::CommandServer;
