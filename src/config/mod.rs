// src/config/mod.rs
//! Configuration management
//!
//! One [`SystemConfig`] is assembled at startup (defaults, TOML files,
//! environment, command line) and then shared read-only. Components take
//! the section they need when they are constructed.

pub mod constants;
pub mod loader;

pub use constants::*;
pub use loader::{ConfigError, ConfigLoader};

use crate::utils::validation::{
    validate_finite_range, validate_http_url, validate_non_empty, validate_positive,
    validate_range, validate_socket_addr, ValidationResult,
};
use crate::workout::OverlapPolicy;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Complete device configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct SystemConfig {
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub workout: WorkoutConfig,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Identity announced to the collector on startup
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DeviceConfig {
    #[serde(default = "defaults::device_id")]
    pub id: String,

    #[serde(default = "defaults::device_name")]
    pub name: String,

    #[serde(default = "defaults::device_weight")]
    pub weight: f64,

    /// Host advertised in the registration; the listen IP is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advertise_host: Option<String>,
}

/// Exercise plan executed for every `use` command
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct WorkoutConfig {
    #[serde(default = "defaults::exercise")]
    pub exercise: String,

    /// Target weight in kg
    #[serde(default = "defaults::workout_weight")]
    pub weight: f64,

    #[serde(default = "defaults::reps_per_set")]
    pub reps_per_set: u32,

    #[serde(default = "defaults::total_sets")]
    pub total_sets: u32,

    /// Seconds per rep (up + down)
    #[serde(default = "defaults::rep_duration")]
    pub rep_duration: f64,

    /// Seconds of rest between sets
    #[serde(default = "defaults::rest_between_sets")]
    pub rest_between_sets: f64,

    #[serde(default)]
    pub overlap_policy: OverlapPolicy,
}

/// Command socket and collector endpoints
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct NetworkConfig {
    #[serde(default = "defaults::listen_address")]
    pub listen_address: String,

    #[serde(default = "defaults::collector_url")]
    pub collector_url: String,

    #[serde(default = "defaults::request_timeout_ms")]
    pub request_timeout_ms: u64,

    #[serde(default = "defaults::register_on_startup")]
    pub register_on_startup: bool,

    #[serde(default = "defaults::max_concurrent_connections")]
    pub max_concurrent_connections: usize,

    #[serde(default = "defaults::max_command_bytes")]
    pub max_command_bytes: usize,

    #[serde(default = "defaults::read_timeout_ms")]
    pub read_timeout_ms: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when `RUST_LOG` is not set
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

/// Default value providers using constants
mod defaults {
    use crate::config::constants::*;

    pub fn device_id() -> String { device::DEFAULT_DEVICE_ID.to_string() }
    pub fn device_name() -> String { device::DEFAULT_DEVICE_NAME.to_string() }
    pub fn device_weight() -> f64 { device::DEFAULT_DEVICE_WEIGHT }

    pub fn exercise() -> String { workout::DEFAULT_EXERCISE.to_string() }
    pub fn workout_weight() -> f64 { workout::DEFAULT_WEIGHT_KG }
    pub fn reps_per_set() -> u32 { workout::DEFAULT_REPS_PER_SET }
    pub fn total_sets() -> u32 { workout::DEFAULT_TOTAL_SETS }
    pub fn rep_duration() -> f64 { workout::DEFAULT_REP_DURATION_SECS }
    pub fn rest_between_sets() -> f64 { workout::DEFAULT_REST_BETWEEN_SETS_SECS }

    pub fn listen_address() -> String { network::DEFAULT_LISTEN_ADDRESS.to_string() }
    pub fn collector_url() -> String { network::DEFAULT_COLLECTOR_URL.to_string() }
    pub fn request_timeout_ms() -> u64 { network::DEFAULT_REQUEST_TIMEOUT_MS }
    pub fn register_on_startup() -> bool { true }
    pub fn max_concurrent_connections() -> usize { network::DEFAULT_MAX_CONCURRENT_CONNECTIONS }
    pub fn max_command_bytes() -> usize { network::DEFAULT_MAX_COMMAND_BYTES }
    pub fn read_timeout_ms() -> u64 { network::DEFAULT_READ_TIMEOUT_MS }

    pub fn log_level() -> String { logging::DEFAULT_LOG_LEVEL.to_string() }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            id: defaults::device_id(),
            name: defaults::device_name(),
            weight: defaults::device_weight(),
            advertise_host: None,
        }
    }
}

impl Default for WorkoutConfig {
    fn default() -> Self {
        Self {
            exercise: defaults::exercise(),
            weight: defaults::workout_weight(),
            reps_per_set: defaults::reps_per_set(),
            total_sets: defaults::total_sets(),
            rep_duration: defaults::rep_duration(),
            rest_between_sets: defaults::rest_between_sets(),
            overlap_policy: OverlapPolicy::default(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            listen_address: defaults::listen_address(),
            collector_url: defaults::collector_url(),
            request_timeout_ms: defaults::request_timeout_ms(),
            register_on_startup: defaults::register_on_startup(),
            max_concurrent_connections: defaults::max_concurrent_connections(),
            max_command_bytes: defaults::max_command_bytes(),
            read_timeout_ms: defaults::read_timeout_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: defaults::log_level() }
    }
}

impl SystemConfig {
    /// Validate every section, stopping at the first offending field.
    pub fn validate(&self) -> ValidationResult<()> {
        self.device.validate()?;
        self.workout.validate()?;
        self.network.validate()?;
        Ok(())
    }

    /// Short human-readable summary for the startup log line.
    pub fn get_summary(&self) -> ConfigSummary {
        ConfigSummary {
            device_id: self.device.id.clone(),
            exercise: self.workout.exercise.clone(),
            reps_per_set: self.workout.reps_per_set,
            total_sets: self.workout.total_sets,
            listen_address: self.network.listen_address.clone(),
            collector_url: self.network.collector_url.clone(),
        }
    }
}

impl DeviceConfig {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_non_empty("device.id", &self.id)?;
        validate_non_empty("device.name", &self.name)?;
        validate_finite_range("device.weight", self.weight, 0.0, workout::MAX_WEIGHT_KG)?;
        if let Some(host) = &self.advertise_host {
            validate_non_empty("device.advertise_host", host)?;
        }
        Ok(())
    }
}

impl WorkoutConfig {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_non_empty("workout.exercise", &self.exercise)?;
        validate_finite_range("workout.weight", self.weight, 0.0, workout::MAX_WEIGHT_KG)?;
        validate_range(
            "workout.reps_per_set",
            self.reps_per_set,
            workout::MIN_REPS_PER_SET,
            workout::MAX_REPS_PER_SET,
        )?;
        validate_range(
            "workout.total_sets",
            self.total_sets,
            workout::MIN_TOTAL_SETS,
            workout::MAX_TOTAL_SETS,
        )?;
        validate_positive(
            "workout.rep_duration",
            self.rep_duration,
            workout::MAX_REP_DURATION_SECS,
        )?;
        validate_finite_range(
            "workout.rest_between_sets",
            self.rest_between_sets,
            0.0,
            workout::MAX_REST_BETWEEN_SETS_SECS,
        )?;
        Ok(())
    }
}

impl NetworkConfig {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_socket_addr("network.listen_address", &self.listen_address)?;
        validate_http_url("network.collector_url", &self.collector_url)?;
        validate_range(
            "network.request_timeout_ms",
            self.request_timeout_ms,
            1,
            network::MAX_REQUEST_TIMEOUT_MS,
        )?;
        validate_range(
            "network.max_concurrent_connections",
            self.max_concurrent_connections,
            network::MIN_CONCURRENT_CONNECTIONS,
            network::MAX_CONCURRENT_CONNECTIONS,
        )?;
        validate_range(
            "network.max_command_bytes",
            self.max_command_bytes,
            network::MIN_COMMAND_BYTES,
            network::MAX_COMMAND_BYTES,
        )?;
        validate_range(
            "network.read_timeout_ms",
            self.read_timeout_ms,
            1,
            network::MAX_READ_TIMEOUT_MS,
        )?;
        Ok(())
    }

    pub fn listen_socket_addr(&self) -> ValidationResult<SocketAddr> {
        validate_socket_addr("network.listen_address", &self.listen_address)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

/// Configuration summary for display/logging
#[derive(Debug, Clone, Serialize)]
pub struct ConfigSummary {
    pub device_id: String,
    pub exercise: String,
    pub reps_per_set: u32,
    pub total_sets: u32,
    pub listen_address: String,
    pub collector_url: String,
}
