//! Configuration system for the meshaddr CLI.

use meshaddr::{AddressCodec, DEFAULT_PREFIX_HEX, NetworkPrefix, RunLengthPolicy};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// meshaddr configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Addressing configuration
    #[serde(default)]
    pub addressing: AddressingConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Addressing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressingConfig {
    /// Network prefix (hex)
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Handling of run lengths that do not fit the address format
    #[serde(default)]
    pub run_length_policy: RunLengthPolicy,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default values

fn default_prefix() -> String {
    DEFAULT_PREFIX_HEX.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AddressingConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            run_length_policy: RunLengthPolicy::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, contents)?;
        Ok(())
    }

    /// Get default config path
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join("meshaddr/config.toml")
    }

    /// Load an explicit config file, or the default one if it exists
    ///
    /// An explicit path that does not exist is an error; a missing default
    /// file falls back to built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be loaded.
    pub fn resolve(explicit: Option<&Path>) -> anyhow::Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let path = Self::default_path();
                if path.exists() {
                    Self::load(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Parse the configured network prefix
    ///
    /// # Errors
    ///
    /// Returns an error if the prefix is not a usable hex literal.
    pub fn parse_prefix(&self) -> anyhow::Result<NetworkPrefix> {
        Ok(NetworkPrefix::from_hex(&self.addressing.prefix)?)
    }

    /// Build the address codec this configuration describes
    ///
    /// # Errors
    ///
    /// Returns an error if the prefix is invalid.
    pub fn codec(&self) -> anyhow::Result<AddressCodec> {
        Ok(AddressCodec::new(self.parse_prefix()?).with_policy(self.addressing.run_length_policy))
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.parse_prefix()?;

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            anyhow::bail!(
                "Invalid log level: {}. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            );
        }

        Ok(())
    }
}
