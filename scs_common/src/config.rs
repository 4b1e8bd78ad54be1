//! Configuration loading traits and types.
//!
//! Every section is optional: a missing file section falls back to the
//! built-in device, region and schema.
//!
//! # Usage
//!
//! ```rust,no_run
//! use scs_common::config::{ConfigError, ConfigLoader, PluginConfig};
//! use std::path::Path;
//!
//! fn main() -> Result<(), ConfigError> {
//!     let config = PluginConfig::load(Path::new("scs_input.toml"))?;
//!     config.validate()?;
//!     println!("Device: {}", config.device.name);
//!     Ok(())
//! }
//! ```
//!
//! # TOML Example
//!
//! ```toml
//! [shared]
//! log_level = "debug"
//!
//! [device]
//! name = "laneassist"
//! display_name = "ETS2 Lane Assist"
//!
//! [region]
//! name = "SCSControls"
//! directory = "/dev/shm/SCS"
//!
//! [[inputs]]
//! name = "steering"
//! display_name = "Steering"
//! kind = "float"
//!
//! [[inputs]]
//! name = "lblinkerh"
//! kind = "bool"
//! ```

use crate::consts::{
    CONFIG_ENV_VAR, DEFAULT_DEVICE_DISPLAY_NAME, DEFAULT_DEVICE_NAME, DEFAULT_REGION_NAME,
    DEFAULT_SHM_DIR,
};
use crate::schema::{InputDescriptor, InputSchema};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for configuration loading operations.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at specified path.
    #[error("Configuration file not found")]
    FileNotFound,

    /// TOML parsing failed.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Semantic validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Log level for application logging.
///
/// Uses lowercase serde values for TOML compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Most verbose, detailed tracing information.
    Trace,
    /// Debug information useful during development.
    Debug,
    /// General information about plugin operation.
    #[default]
    Info,
    /// Warning messages for potentially problematic situations.
    Warn,
    /// Error messages for serious problems.
    Error,
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`.
    pub const fn as_filter(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Common configuration fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SharedConfig {
    /// Logging verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Identity of the device registered with the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Device identifier.
    pub name: String,

    /// Name shown in the host's UI.
    pub display_name: String,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_DEVICE_NAME.to_string(),
            display_name: DEFAULT_DEVICE_DISPLAY_NAME.to_string(),
        }
    }
}

/// Identity of the shared memory region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionConfig {
    /// Logical region name shared with the producer.
    pub name: String,

    /// Backing directory on filesystem-backed platforms. Ignored on Windows.
    #[serde(default = "default_shm_dir")]
    pub directory: PathBuf,
}

fn default_shm_dir() -> PathBuf {
    PathBuf::from(DEFAULT_SHM_DIR)
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_REGION_NAME.to_string(),
            directory: default_shm_dir(),
        }
    }
}

/// Full plugin configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Logging settings.
    #[serde(default)]
    pub shared: SharedConfig,

    /// Device identity.
    #[serde(default)]
    pub device: DeviceConfig,

    /// Region identity.
    #[serde(default)]
    pub region: RegionConfig,

    /// Ordered input list. Empty means the built-in schema.
    #[serde(default)]
    pub inputs: Vec<InputDescriptor>,
}

impl PluginConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if:
    /// - the device name or display name is empty or contains NUL
    /// - the region name is empty or contains a path separator
    /// - the input list does not form a valid schema
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("device.name", &self.device.name),
            ("device.display_name", &self.device.display_name),
        ] {
            if value.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "{field} cannot be empty"
                )));
            }
            if value.contains('\0') {
                return Err(ConfigError::ValidationError(format!(
                    "{field} cannot contain NUL"
                )));
            }
        }

        let region = &self.region.name;
        if region.is_empty() {
            return Err(ConfigError::ValidationError(
                "region.name cannot be empty".to_string(),
            ));
        }
        if region.contains(['/', '\\', '\0']) {
            return Err(ConfigError::ValidationError(format!(
                "region.name must be a plain name: {region:?}"
            )));
        }

        self.schema().map(|_| ())
    }

    /// Schema described by this configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if the inputs do not form a
    /// valid schema.
    pub fn schema(&self) -> Result<InputSchema, ConfigError> {
        if self.inputs.is_empty() {
            return Ok(InputSchema::lane_assist());
        }
        InputSchema::new(self.inputs.clone())
            .map_err(|e| ConfigError::ValidationError(e.to_string()))
    }

    /// Load from the file named by `SCS_INPUT_CONFIG`, or fall back to the
    /// defaults when the variable is unset.
    ///
    /// # Errors
    ///
    /// Propagates loading errors for a file that was explicitly named.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => {
                tracing::debug!("Loading configuration from {:?}", path);
                Self::load(Path::new(&path))
            }
            None => Ok(Self::default()),
        }
    }
}

/// Trait for loading configuration from TOML files.
///
/// # Contract
///
/// - Returns `ConfigError::FileNotFound` if the file does not exist
/// - Returns `ConfigError::ParseError` if TOML syntax is invalid
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the TOML configuration file
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::ParseError(e.to_string())
            }
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

// Blanket implementation for all types that implement DeserializeOwned.
impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ValueKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_log_level_default() {
        assert_eq!(LogLevel::default(), LogLevel::Info);
    }

    #[test]
    fn test_log_level_deserialization() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct TestWrapper {
            level: LogLevel,
        }

        for (text, level) in [
            ("trace", LogLevel::Trace),
            ("debug", LogLevel::Debug),
            ("info", LogLevel::Info),
            ("warn", LogLevel::Warn),
            ("error", LogLevel::Error),
        ] {
            let parsed: TestWrapper = toml::from_str(&format!("level = \"{text}\"")).unwrap();
            assert_eq!(parsed.level, level);
            assert_eq!(level.as_filter(), text);
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = PluginConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.device.name, DEFAULT_DEVICE_NAME);
        assert_eq!(config.region.name, DEFAULT_REGION_NAME);
        assert_eq!(config.region.directory, PathBuf::from(DEFAULT_SHM_DIR));
        assert_eq!(config.schema().unwrap(), InputSchema::lane_assist());
    }

    #[test]
    fn test_empty_device_name_rejected() {
        let mut config = PluginConfig::default();
        config.device.name.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_region_name_with_separator_rejected() {
        let mut config = PluginConfig::default();
        config.region.name = "../escape".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let mut config = PluginConfig::default();
        config.inputs = vec![
            InputDescriptor::new("steer", ValueKind::Float),
            InputDescriptor::new("steer", ValueKind::Float),
        ];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_config_loader_file_not_found() {
        let result = PluginConfig::load(Path::new("/nonexistent/path/scs_input.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound)));
    }

    #[test]
    fn test_config_loader_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "invalid toml {{{{").unwrap();

        let result = PluginConfig::load(file.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_config_loader_success() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[shared]
log_level = "debug"

[device]
name = "assist"
display_name = "Assist"

[region]
name = "AssistControls"

[[inputs]]
name = "steer"
kind = "float"

[[inputs]]
name = "engaged"
display_name = "Engaged"
kind = "bool"
"#
        )
        .unwrap();
        file.flush().unwrap();

        let config = PluginConfig::load(file.path()).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.shared.log_level, LogLevel::Debug);
        assert_eq!(config.device.name, "assist");
        assert_eq!(config.region.name, "AssistControls");
        assert_eq!(config.region.directory, PathBuf::from(DEFAULT_SHM_DIR));

        let schema = config.schema().unwrap();
        assert_eq!(schema.len(), 2);
        assert_eq!(schema.region_size(), 5);
        assert_eq!(schema.get(1).unwrap().display_name(), "Engaged");
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let file = NamedTempFile::new().unwrap();
        let config = PluginConfig::load(file.path()).unwrap();
        assert_eq!(config.shared.log_level, LogLevel::Info);
        assert_eq!(config.device, DeviceConfig::default());
        assert!(config.inputs.is_empty());
    }
}
