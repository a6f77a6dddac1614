// tests/config_loading.rs
//! Layered configuration: files, environment and validation

use dumbbell_core::config::{ConfigError, ConfigLoader, SystemConfig};
use dumbbell_core::device::DeviceIdentity;
use dumbbell_core::workout::OverlapPolicy;
use serial_test::serial;
use std::io::Write;
use tempfile::NamedTempFile;

fn toml_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

struct EnvGuard(Vec<&'static str>);

impl EnvGuard {
    fn set(pairs: &[(&'static str, &str)]) -> Self {
        for (key, value) in pairs {
            std::env::set_var(key, value);
        }
        Self(pairs.iter().map(|(key, _)| *key).collect())
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for key in &self.0 {
            std::env::remove_var(key);
        }
    }
}

#[test]
#[serial]
fn test_later_files_override_earlier_ones() {
    let base = toml_file(
        r#"
[device]
id = "base-id"

[workout]
reps_per_set = 10
total_sets = 4
"#,
    );
    let local = toml_file(
        r#"
[workout]
total_sets = 2
overlap_policy = "allow"
"#,
    );

    let loader =
        ConfigLoader::with_paths(vec![base.path().to_path_buf(), local.path().to_path_buf()]);
    let config = loader.load_system_config().unwrap();

    assert_eq!(config.device.id, "base-id");
    assert_eq!(config.workout.reps_per_set, 10);
    assert_eq!(config.workout.total_sets, 2);
    assert_eq!(config.workout.overlap_policy, OverlapPolicy::Allow);
    assert_eq!(config.network, SystemConfig::default().network);
}

#[test]
#[serial]
fn test_environment_beats_files() {
    let file = toml_file(
        r#"
[workout]
rest_between_sets = 45.0

[network]
collector_url = "http://collector.local:5000"
"#,
    );
    let _env = EnvGuard::set(&[
        ("DUMBBELL_WORKOUT__REST_BETWEEN_SETS", "5"),
        ("DUMBBELL_NETWORK__LISTEN_ADDRESS", "127.0.0.1:23456"),
        ("DUMBBELL_DEVICE__ADVERTISE_HOST", "10.0.0.7"),
    ]);

    let config = ConfigLoader::with_paths(vec![file.path().to_path_buf()])
        .load_system_config()
        .unwrap();

    assert_eq!(config.workout.rest_between_sets, 5.0);
    assert_eq!(config.network.collector_url, "http://collector.local:5000");
    assert_eq!(config.network.listen_address, "127.0.0.1:23456");

    let identity = DeviceIdentity::from_config(&config).unwrap();
    assert_eq!(identity.addr, "10.0.0.7");
    assert_eq!(identity.port, 23456);
}

#[test]
#[serial]
fn test_invalid_environment_value_fails_validation() {
    let _env = EnvGuard::set(&[("DUMBBELL_NETWORK__MAX_COMMAND_BYTES", "4")]);

    let result = ConfigLoader::with_paths(Vec::new()).load_system_config();
    assert!(matches!(result, Err(ConfigError::ValidationError(_))));
}

#[test]
#[serial]
fn test_defaults_match_device_script() {
    let config = ConfigLoader::with_paths(Vec::new()).load_system_config().unwrap();

    assert_eq!(config.device.id, "kgsghhoaNhzlkln");
    assert_eq!(config.device.name, "Dumbells Pro");
    assert_eq!(config.device.weight, 25.0);
    assert_eq!(config.workout.exercise, "shoulder_press");
    assert_eq!(config.workout.reps_per_set, 8);
    assert_eq!(config.workout.total_sets, 3);
    assert_eq!(config.network.listen_address, "0.0.0.0:12345");
    assert_eq!(config.network.collector_url, "http://localhost:5000");

    let identity = DeviceIdentity::from_config(&config).unwrap();
    assert_eq!(identity.addr, "0.0.0.0");
    assert_eq!(identity.port, 12345);
}

#[test]
fn test_wrong_type_in_file_is_parse_error() {
    let file = toml_file("[workout]\nreps_per_set = \"many\"\n");
    let result = ConfigLoader::with_paths(vec![file.path().to_path_buf()])
        .with_env_prefix("DUMBBELL_TYPE_TEST_UNUSED_")
        .load_system_config();
    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}
