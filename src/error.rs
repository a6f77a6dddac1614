// src/error.rs
//! Unified error handling for dumbbell-core
//!
//! Only configuration and bind failures are allowed to end the process.
//! Everything raised while serving a single connection is logged at the
//! connection boundary, and telemetry delivery never produces an error at
//! all (see [`crate::device::DeliveryOutcome`]).

use crate::config::ConfigError;
use crate::utils::validation::ValidationError;
use std::io;
use std::time::Duration;
use thiserror::Error;

/// Unified error type for the device
#[derive(Debug, Error)]
pub enum DeviceError {
    /// Configuration could not be loaded
    #[error("[CONFIG] {0}")]
    Configuration(#[from] ConfigError),

    /// A configuration value failed validation
    #[error("[CONFIG] {0}")]
    Validation(#[from] ValidationError),

    /// The command socket could not be bound; fatal
    #[error("[SOCKET] failed to bind command socket on {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    /// I/O failure while serving one connection
    #[error("[SOCKET] I/O error during {operation}: {source}")]
    Io {
        operation: &'static str,
        #[source]
        source: io::Error,
    },

    /// Command bytes were not valid UTF-8
    #[error("[PROTOCOL] command is not valid UTF-8: {0}")]
    Decode(#[from] std::str::Utf8Error),

    /// Peer violated the command protocol
    #[error("[PROTOCOL] {0}")]
    Protocol(String),

    /// An operation exceeded its deadline
    #[error("[TIMEOUT] {operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    /// The HTTP client could not be constructed
    #[error("[TRANSPORT] {0}")]
    Transport(#[from] reqwest::Error),
}

impl DeviceError {
    /// Wrap an I/O error with the operation that produced it
    pub fn io(operation: &'static str, source: io::Error) -> Self {
        DeviceError::Io { operation, source }
    }

    /// Whether this error must stop the process
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DeviceError::Configuration(_) | DeviceError::Validation(_) | DeviceError::Bind { .. }
        )
    }
}

/// Result type alias for device operations
pub type DeviceResult<T> = Result<T, DeviceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_error_display_tags() {
        let err = DeviceError::Bind {
            address: "0.0.0.0:12345".to_string(),
            source: io::Error::new(io::ErrorKind::AddrInUse, "in use"),
        };
        let text = err.to_string();
        assert!(text.starts_with("[SOCKET]"));
        assert!(text.contains("0.0.0.0:12345"));
        assert!(err.source().is_some());

        let err = DeviceError::Protocol("empty command".to_string());
        assert_eq!(err.to_string(), "[PROTOCOL] empty command");
    }

    #[test]
    fn test_fatality() {
        let bind = DeviceError::Bind {
            address: "x".to_string(),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert!(bind.is_fatal());
        let missing = ValidationError::RequiredFieldMissing("device.id".into());
        assert!(DeviceError::Validation(missing).is_fatal());

        let reset = io::Error::from(io::ErrorKind::ConnectionReset);
        assert!(!DeviceError::io("read command", reset).is_fatal());
        assert!(!DeviceError::Protocol("x".into()).is_fatal());
        let timeout = DeviceError::Timeout {
            operation: "read command",
            after: Duration::from_secs(1),
        };
        assert!(!timeout.is_fatal());
    }

    #[test]
    fn test_decode_conversion() {
        let bytes = vec![0xff, 0xfe];
        let utf8_err = std::str::from_utf8(&bytes).unwrap_err();
        let err: DeviceError = utf8_err.into();
        assert!(matches!(err, DeviceError::Decode(_)));
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync + 'static>() {}
        assert_send_sync::<DeviceError>();
    }
}
