// src/control/framing.rs
//! Reading one command off a connection
//!
//! A command is taken from a single read of at most `max_bytes`. The first
//! LF ends it and a CR before the LF is dropped. Without an LF the whole
//! chunk is the command. Anything after the command is discarded.

use crate::error::{DeviceError, DeviceResult};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Read and decode one command from `reader`
pub async fn read_command<R>(
    reader: &mut R,
    max_bytes: usize,
    timeout: Duration,
) -> DeviceResult<String>
where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; max_bytes.max(1)];
    let n = tokio::time::timeout(timeout, reader.read(&mut buf))
        .await
        .map_err(|_| DeviceError::Timeout { operation: "read command", after: timeout })?
        .map_err(|e| DeviceError::io("read command", e))?;

    if n == 0 {
        return Err(DeviceError::Protocol(
            "connection closed before a command was sent".to_string(),
        ));
    }

    decode_command(&buf[..n]).map(str::to_string)
}

/// Extract the command text from raw bytes
pub fn decode_command(bytes: &[u8]) -> DeviceResult<&str> {
    let line = match bytes.iter().position(|&b| b == b'\n') {
        Some(end) => {
            let line = &bytes[..end];
            line.strip_suffix(b"\r").unwrap_or(line)
        }
        None => bytes,
    };
    Ok(std::str::from_utf8(line)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(1);

    #[test]
    fn test_decode_line_terminated() {
        assert_eq!(decode_command(b"use\n").unwrap(), "use");
        assert_eq!(decode_command(b"use\r\n").unwrap(), "use");
        assert_eq!(decode_command(b"act:x\nuse\n").unwrap(), "act:x");
    }

    #[test]
    fn test_decode_bare_text() {
        assert_eq!(decode_command(b"use").unwrap(), "use");
        assert_eq!(decode_command(b"").unwrap(), "");
    }

    #[test]
    fn test_decode_invalid_utf8() {
        assert!(matches!(decode_command(&[0xff, 0xfe, b'\n']), Err(DeviceError::Decode(_))));
    }

    #[tokio::test]
    async fn test_read_command() {
        let mut input: &[u8] = b"act:press\ntrailing";
        assert_eq!(read_command(&mut input, 1024, TIMEOUT).await.unwrap(), "act:press");
    }

    #[tokio::test]
    async fn test_read_is_bounded() {
        let mut input: &[u8] = b"useuseuse";
        assert_eq!(read_command(&mut input, 3, TIMEOUT).await.unwrap(), "use");
    }

    #[tokio::test]
    async fn test_immediate_eof_is_protocol_error() {
        let mut input: &[u8] = b"";
        let result = read_command(&mut input, 1024, TIMEOUT).await;
        assert!(matches!(result, Err(DeviceError::Protocol(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_silent_peer_times_out() {
        let (_writer, mut reader) = tokio::io::duplex(64);
        let result = read_command(&mut reader, 1024, Duration::from_secs(5)).await;
        assert!(matches!(result, Err(DeviceError::Timeout { operation: "read command", .. })));
    }
}
