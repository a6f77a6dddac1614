// src/config/constants.rs
//! System-wide configuration constants

/// Device identity defaults
pub mod device {
    pub const DEFAULT_DEVICE_ID: &str = "kgsghhoaNhzlkln";
    pub const DEFAULT_DEVICE_NAME: &str = "Dumbells Pro";
    pub const DEFAULT_DEVICE_WEIGHT: f64 = 25.0;
}

/// Workout plan defaults and limits
pub mod workout {
    pub const DEFAULT_EXERCISE: &str = "shoulder_press";
    pub const DEFAULT_WEIGHT_KG: f64 = 10.0;
    pub const DEFAULT_REPS_PER_SET: u32 = 8;
    pub const DEFAULT_TOTAL_SETS: u32 = 3;
    pub const DEFAULT_REP_DURATION_SECS: f64 = 3.0;
    pub const DEFAULT_REST_BETWEEN_SETS_SECS: f64 = 30.0;

    pub const MIN_REPS_PER_SET: u32 = 1;
    pub const MAX_REPS_PER_SET: u32 = 1000;
    pub const MIN_TOTAL_SETS: u32 = 1;
    pub const MAX_TOTAL_SETS: u32 = 1000;
    pub const MAX_REP_DURATION_SECS: f64 = 600.0;
    pub const MAX_REST_BETWEEN_SETS_SECS: f64 = 3600.0;
    pub const MAX_WEIGHT_KG: f64 = 1000.0;

    /// Frames sampled per movement phase (progress = i / 9)
    pub const SAMPLES_PER_PHASE: usize = 10;
    /// One rep is an up phase followed by a down phase
    pub const FRAMES_PER_REP: usize = 2 * SAMPLES_PER_PHASE;
    /// Deliveries a session keeps open before it starts dropping frames
    pub const MAX_FRAMES_IN_FLIGHT: usize = 32;
}

/// Kinematic model geometry, metres
pub mod kinematics {
    pub const LEFT_SHOULDER_POS: (f64, f64, f64) = (-0.2, 1.4, 0.0);
    pub const RIGHT_SHOULDER_POS: (f64, f64, f64) = (0.2, 1.4, 0.0);

    pub const VERTICAL_TRAVEL_M: f64 = 0.4;
    pub const HORIZONTAL_JITTER_M: f64 = 0.03;

    pub const ELBOW_LATERAL_OFFSET_M: f64 = 0.1;
    pub const ELBOW_DEPTH_OFFSET_M: f64 = 0.1;
    pub const ELBOW_DROP_M: f64 = 0.25;
    pub const ELBOW_TRAVEL_REDUCTION_M: f64 = 0.1;

    pub const POSITION_DECIMALS: u32 = 3;
}

/// Synthetic vitals ranges
pub mod vitals {
    pub const MIN_TEMPERATURE_C: f64 = 20.0;
    pub const MAX_TEMPERATURE_C: f64 = 30.0;
    pub const TEMPERATURE_DECIMALS: u32 = 1;

    pub const MIN_BATTERY_PERCENT: u8 = 60;
    pub const MAX_BATTERY_PERCENT: u8 = 100;
}

/// Network and command socket constants
pub mod network {
    pub const DEFAULT_LISTEN_ADDRESS: &str = "0.0.0.0:12345";
    pub const DEFAULT_COLLECTOR_URL: &str = "http://localhost:5000";

    pub const INFO_ENDPOINT: &str = "handle_info";
    pub const TELEMETRY_ENDPOINT: &str = "handle_use";

    pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 2000;
    pub const MAX_REQUEST_TIMEOUT_MS: u64 = 60_000;

    pub const DEFAULT_MAX_CONCURRENT_CONNECTIONS: usize = 64;
    pub const MIN_CONCURRENT_CONNECTIONS: usize = 1;
    pub const MAX_CONCURRENT_CONNECTIONS: usize = 4096;

    pub const DEFAULT_MAX_COMMAND_BYTES: usize = 1024;
    pub const MIN_COMMAND_BYTES: usize = 16;
    pub const MAX_COMMAND_BYTES: usize = 65_536;

    pub const DEFAULT_READ_TIMEOUT_MS: u64 = 5000;
    pub const MAX_READ_TIMEOUT_MS: u64 = 300_000;
}

/// Configuration file locations
pub mod paths {
    pub const SYSTEM_CONFIG_PATH: &str = "/etc/dumbbell/config.toml";
    pub const USER_CONFIG_DIR: &str = ".config/dumbbell";
    pub const DEFAULT_CONFIG_FILE: &str = "dumbbell.toml";
    pub const LOCAL_CONFIG_FILE: &str = "dumbbell.local.toml";

    /// Prefix for environment overrides, e.g. `DUMBBELL_WORKOUT__TOTAL_SETS`
    pub const ENV_PREFIX: &str = "DUMBBELL_";
    pub const ENV_SECTION_SEPARATOR: &str = "__";
}

/// Logging defaults
pub mod logging {
    pub const DEFAULT_LOG_LEVEL: &str = "info";
}
