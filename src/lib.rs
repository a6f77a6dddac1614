//! Dumbbell-Core: smart dumbbell device simulator
//!
//! The device waits on a TCP command socket. A `use` command starts a
//! simulated workout that streams kinematic telemetry to a collector
//! service over HTTP. It features:
//!
//! - Kinematic waveform generation for dumbbell and elbow sensors
//! - Telemetry frame assembly with synthetic vitals
//! - A cancellable workout session loop with rest between sets
//! - Best-effort HTTP delivery to the collector
//! - Layered configuration from defaults, TOML files and environment
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use dumbbell_core::config::SystemConfig;
//! use dumbbell_core::control::CommandServer;
//! use dumbbell_core::transport::CollectorClient;
//! use dumbbell_core::workout::WorkoutCoordinator;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SystemConfig::default();
//!     let sink = Arc::new(CollectorClient::new(&config.network)?);
//!     let coordinator = Arc::new(WorkoutCoordinator::new(config.workout.clone(), sink));
//!
//!     let server = CommandServer::bind(&config.network, coordinator.clone()).await?;
//!     server.run(CancellationToken::new()).await?;
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod control;
pub mod device;
pub mod error;
pub mod simulation;
pub mod transport;
pub mod utils;
pub mod workout;

// Re-export commonly used types for convenience
pub use config::{ConfigLoader, SystemConfig};
pub use control::{Command, CommandServer, Reply};
pub use device::{
    DeliveryOutcome, DeviceIdentity, SensorPosition, SensorPositions, TelemetryFrame, TelemetrySink,
};
pub use error::{DeviceError, DeviceResult};
pub use transport::CollectorClient;
pub use workout::{OverlapPolicy, WorkoutCoordinator, WorkoutSession, WorkoutSummary};

pub use utils::{
    time::TimeProvider,
    validation::{ValidationError, ValidationResult},
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn version_info() -> VersionInfo {
    VersionInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: "Smart dumbbell device simulator".to_string(),
        features: vec![
            "Kinematic telemetry generation".to_string(),
            "Workout session loop".to_string(),
            "HTTP collector client".to_string(),
            "TCP command socket".to_string(),
        ],
    }
}

/// Library version information
#[derive(Debug, Clone)]
pub struct VersionInfo {
    /// Library name
    pub name: String,
    /// Version string
    pub version: String,
    /// Description
    pub description: String,
    /// List of features
    pub features: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_info() {
        let info = version_info();
        assert_eq!(info.name, NAME);
        assert_eq!(info.version, VERSION);
        assert!(!info.features.is_empty());
    }

    #[test]
    fn test_constants() {
        assert!(!VERSION.is_empty());
        assert_eq!(NAME, "dumbbell-core");
    }
}
