// src/device/types.rs
//! Core types shared between the simulator, the workout loop and the
//! collector client. Field names match the JSON the collector ingests.

use crate::config::SystemConfig;
use crate::utils::validation::ValidationResult;
use serde::{Deserialize, Serialize, Serializer};

/// Identity announced to the collector via `/handle_info`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceIdentity {
    pub id: String,
    pub name: String,
    #[serde(serialize_with = "serialize_weight")]
    pub weight: f64,
    pub addr: String,
    pub port: u16,
}

impl DeviceIdentity {
    /// Build the identity from configuration.
    ///
    /// `addr` is `device.advertise_host` when set, otherwise the IP part of
    /// `network.listen_address`; `port` is always the listen port.
    pub fn from_config(config: &SystemConfig) -> ValidationResult<Self> {
        let listen = config.network.listen_socket_addr()?;
        let addr = config
            .device
            .advertise_host
            .clone()
            .unwrap_or_else(|| listen.ip().to_string());

        Ok(Self {
            id: config.device.id.clone(),
            name: config.device.name.clone(),
            weight: config.device.weight,
            addr,
            port: listen.port(),
        })
    }
}

/// Sensor position in metres
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SensorPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl SensorPosition {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// The four tracked points of one frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SensorPositions {
    pub left_dumbbell: SensorPosition,
    pub right_dumbbell: SensorPosition,
    pub left_elbow: SensorPosition,
    pub right_elbow: SensorPosition,
}

/// One telemetry snapshot, transmitted once and never retained
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryFrame {
    /// Local wall-clock time, `YYYY-MM-DD HH:MM:SS`
    pub timestamp: String,
    pub exercise: String,
    #[serde(serialize_with = "serialize_weight")]
    pub weight: f64,
    pub current_set: u32,
    /// 1-indexed rep within the current set
    pub current_rep: u32,
    pub total_reps: u32,
    pub sensors: SensorPositions,
    /// Synthetic temperature, °C
    #[serde(rename = "temp")]
    pub temperature: f64,
    /// Synthetic battery level, percent
    pub battery: u8,
}

/// Whole-kilogram weights go on the wire as integers (`10`, not `10.0`)
fn serialize_weight<S: Serializer>(weight: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0; // 2^53
    if weight.fract() == 0.0 && weight.abs() < MAX_EXACT {
        serializer.serialize_i64(*weight as i64)
    } else {
        serializer.serialize_f64(*weight)
    }
}
