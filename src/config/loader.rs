// src/config/loader.rs
//! Layered configuration loader
//!
//! Precedence, lowest first: built-in defaults, each TOML file that exists
//! (in the order given), then `DUMBBELL_<SECTION>__<KEY>` environment
//! variables. The merged table is deserialized and validated once.

use crate::config::{constants::paths, SystemConfig};
use crate::utils::validation::ValidationError;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),

    #[error("Configuration validation error: {0}")]
    ValidationError(#[from] ValidationError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Configuration loader
pub struct ConfigLoader {
    config_paths: Vec<PathBuf>,
    env_prefix: String,
}

impl ConfigLoader {
    /// Create a loader that searches the standard locations
    pub fn new() -> Self {
        Self {
            config_paths: Self::discover_config_paths(),
            env_prefix: paths::ENV_PREFIX.to_string(),
        }
    }

    /// Create loader with custom paths
    pub fn with_paths(paths: Vec<PathBuf>) -> Self {
        Self {
            config_paths: paths,
            env_prefix: paths::ENV_PREFIX.to_string(),
        }
    }

    /// Use a different environment prefix (tests use this to stay isolated)
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = prefix.to_string();
        self
    }

    pub fn config_paths(&self) -> &[PathBuf] {
        &self.config_paths
    }

    /// Load, merge and validate the configuration
    pub fn load_system_config(&self) -> Result<SystemConfig, ConfigError> {
        let mut merged = toml::Value::try_from(SystemConfig::default())
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        for config_path in &self.config_paths {
            match self.load_config_file(config_path) {
                Ok(file_config) => {
                    debug!(path = %config_path.display(), "merging configuration file");
                    merge_toml_values(&mut merged, file_config);
                }
                Err(ConfigError::FileNotFound(_)) => continue,
                Err(e) => return Err(e),
            }
        }

        self.apply_environment_overrides(&mut merged, std::env::vars());

        let config: SystemConfig = merged
            .try_into()
            .map_err(|e: toml::de::Error| {
                ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a single file without touching the environment
    pub fn validate_config_file<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<SystemConfig, ConfigError> {
        let file_config = self.load_config_file(path)?;
        let mut merged = toml::Value::try_from(SystemConfig::default())
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        merge_toml_values(&mut merged, file_config);

        let config: SystemConfig = merged.try_into()?;
        config.validate()?;
        Ok(config)
    }

    /// Write a configuration to disk as TOML
    pub fn export_config<P: AsRef<Path>>(
        config: &SystemConfig,
        path: P,
    ) -> Result<(), ConfigError> {
        let toml_content =
            toml::to_string_pretty(config).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        std::fs::write(path, toml_content)?;
        Ok(())
    }

    fn load_config_file<P: AsRef<Path>>(&self, path: P) -> Result<toml::Value, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)?;
        let config: toml::Value = toml::from_str(&content)?;

        Ok(config)
    }

    fn apply_environment_overrides<I>(&self, config: &mut toml::Value, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            let Some(rest) = key.strip_prefix(&self.env_prefix) else {
                continue;
            };
            let Some((section, field)) = rest.split_once(paths::ENV_SECTION_SEPARATOR) else {
                continue;
            };
            if section.is_empty() || field.is_empty() {
                continue;
            }

            let section = section.to_lowercase();
            let field = field.to_lowercase();
            debug!(%section, %field, "applying environment override");
            set_nested_value(config, &section, &field, parse_env_value(&value));
        }
    }

    fn discover_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // System-wide configuration
        paths.push(PathBuf::from(paths::SYSTEM_CONFIG_PATH));

        // User configuration
        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(paths::USER_CONFIG_DIR).join("config.toml"));
        }

        // Local configurations (in order of precedence)
        paths.push(PathBuf::from(paths::DEFAULT_CONFIG_FILE));
        paths.push(PathBuf::from(paths::LOCAL_CONFIG_FILE));

        paths
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn merge_toml_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                if let Some(base_value) = base_table.get_mut(&key) {
                    merge_toml_values(base_value, value);
                } else {
                    base_table.insert(key, value);
                }
            }
        }
        (base_value, overlay_value) => {
            *base_value = overlay_value;
        }
    }
}

fn parse_env_value(value: &str) -> toml::Value {
    if let Ok(int_val) = value.parse::<i64>() {
        toml::Value::Integer(int_val)
    } else if let Ok(float_val) = value.parse::<f64>() {
        toml::Value::Float(float_val)
    } else if let Ok(bool_val) = value.parse::<bool>() {
        toml::Value::Boolean(bool_val)
    } else {
        toml::Value::String(value.to_string())
    }
}

fn set_nested_value(config: &mut toml::Value, section: &str, field: &str, value: toml::Value) {
    let toml::Value::Table(root) = config else {
        return;
    };
    let entry = root
        .entry(section.to_string())
        .or_insert_with(|| toml::Value::Table(toml::value::Table::new()));

    if let toml::Value::Table(table) = entry {
        // Float fields written as whole numbers ("12") arrive as integers
        let value = match (table.get(field), value) {
            (Some(toml::Value::Float(_)), toml::Value::Integer(i)) => toml::Value::Float(i as f64),
            (Some(toml::Value::String(_)), toml::Value::Integer(i)) => {
                toml::Value::String(i.to_string())
            }
            (_, value) => value,
        };
        table.insert(field.to_string(), value);
    }
}

// Cross-platform directory discovery
mod dirs {
    use std::path::PathBuf;

    pub fn home_dir() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            std::env::var_os("USERPROFILE").map(PathBuf::from)
        }
        #[cfg(not(target_os = "windows"))]
        {
            std::env::var_os("HOME").map(PathBuf::from)
        }
    }
}
