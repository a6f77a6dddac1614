//! Command-line client for the dumbbell command socket.
//!
//! Usage:
//!   dumbbell-ctl --device 127.0.0.1:12345 use
//!   dumbbell-ctl act:curl

use std::process;
use std::time::Duration;

use clap::Parser;
use dumbbell_core::control::{send_command, Reply};

#[derive(Parser, Debug)]
#[command(name = "dumbbell-ctl", version, about = "Send one command to a dumbbell device")]
struct Cli {
    /// Device command socket
    #[arg(long, short, default_value = "127.0.0.1:12345")]
    device: String,

    /// Seconds to wait for the reply
    #[arg(long, default_value_t = 5)]
    timeout: u64,

    /// Command text, e.g. `use` or `act:<payload>`
    command: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let timeout = Duration::from_secs(cli.timeout);
    let reply = match send_command(cli.device.as_str(), &cli.command, timeout).await {
        Ok(reply) => reply,
        Err(e) => {
            eprintln!("Error: {}: {}", cli.device, e);
            process::exit(1);
        }
    };

    println!("{}", reply);
    match Reply::parse(&reply) {
        Some(Reply::UnknownCommand) | Some(Reply::Busy) => process::exit(3),
        Some(_) => {}
        None => process::exit(4),
    }
}
