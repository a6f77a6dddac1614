// src/control/client.rs
//! Client side of the command socket, as used by a dashboard

use crate::error::{DeviceError, DeviceResult};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, ToSocketAddrs};

/// Send `command` and return the device's reply.
///
/// The command is written LF-terminated and the write half is closed, so
/// the device sees exactly one command. The whole exchange is bounded by
/// `timeout`.
pub async fn send_command<A>(addr: A, command: &str, timeout: Duration) -> DeviceResult<String>
where
    A: ToSocketAddrs,
{
    tokio::time::timeout(timeout, exchange(addr, command))
        .await
        .map_err(|_| DeviceError::Timeout { operation: "command exchange", after: timeout })?
}

async fn exchange<A: ToSocketAddrs>(addr: A, command: &str) -> DeviceResult<String> {
    let mut stream = TcpStream::connect(addr)
        .await
        .map_err(|e| DeviceError::io("connect", e))?;

    let line = format!("{command}\n");
    stream
        .write_all(line.as_bytes())
        .await
        .map_err(|e| DeviceError::io("send command", e))?;
    stream.shutdown().await.map_err(|e| DeviceError::io("send command", e))?;

    let mut reply = Vec::new();
    stream
        .read_to_end(&mut reply)
        .await
        .map_err(|e| DeviceError::io("read reply", e))?;

    if reply.is_empty() {
        return Err(DeviceError::Protocol(
            "device closed the connection without a reply".to_string(),
        ));
    }
    String::from_utf8(reply).map_err(|e| DeviceError::Decode(e.utf8_error()))
}
