// SPDX-License-Identifier: MIT

//! Rig configuration (C11): serde-layered config with a TOML file, CLI
//! override support, and built-in defaults.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::model::ModelId;

/// Configuration for one CAT session, loadable from a TOML file and
/// overridable field-by-field by the daemon's CLI flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RigConfig {
    /// Serial device path, e.g. `/dev/ttyUSB0`.
    pub serial_path: String,

    /// Baud rate override; falls back to the model's `default_baud`.
    #[serde(default)]
    pub baud: Option<u32>,

    /// CI-V address override; falls back to the model's registered address.
    #[serde(default)]
    pub civ_address: Option<u8>,

    pub model: ModelId,

    /// Default round-trip timeout in milliseconds.
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,

    /// State cache TTL in milliseconds.
    #[serde(default = "default_cache_ttl_ms")]
    pub cache_ttl_ms: u64,
}

fn default_read_timeout_ms() -> u64 {
    500
}

fn default_cache_ttl_ms() -> u64 {
    500
}

impl RigConfig {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Save configuration to a TOML file.
    pub fn to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| ConfigError::Io(e.to_string()))
    }

    /// Merge CLI-supplied overrides on top of this config: a `Some` CLI
    /// value always wins over the file/default value (§8 property 9).
    pub fn merge_cli_overrides(
        mut self,
        serial_path: Option<String>,
        baud: Option<u32>,
        civ_address: Option<u8>,
        read_timeout_ms: Option<u64>,
        cache_ttl_ms: Option<u64>,
    ) -> Self {
        if let Some(path) = serial_path {
            self.serial_path = path;
        }
        if baud.is_some() {
            self.baud = baud;
        }
        if civ_address.is_some() {
            self.civ_address = civ_address;
        }
        if let Some(ms) = read_timeout_ms {
            self.read_timeout_ms = ms;
        }
        if let Some(ms) = cache_ttl_ms {
            self.cache_ttl_ms = ms;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.serial_path.is_empty() {
            return Err(ConfigError::InvalidValue("serial_path cannot be empty".into()));
        }
        if self.read_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue("read_timeout_ms cannot be 0".into()));
        }
        if let Some(addr) = self.civ_address {
            if addr == 0x00 || addr == 0xFF {
                return Err(ConfigError::InvalidValue(
                    "civ_address cannot be a broadcast or null address".into(),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub enum ConfigError {
    Io(String),
    Parse(String),
    Serialize(String),
    InvalidValue(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(s) => write!(f, "I/O error: {s}"),
            Self::Parse(s) => write!(f, "parse error: {s}"),
            Self::Serialize(s) => write!(f, "serialize error: {s}"),
            Self::InvalidValue(s) => write!(f, "invalid value: {s}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RigConfig {
        RigConfig {
            serial_path: "/dev/ttyUSB0".into(),
            baud: None,
            civ_address: None,
            model: ModelId::Ic7100,
            read_timeout_ms: default_read_timeout_ms(),
            cache_ttl_ms: default_cache_ttl_ms(),
        }
    }

    #[test]
    fn round_trips_through_toml() {
        let config = sample();
        let toml_text = toml::to_string_pretty(&config).unwrap();
        let parsed: RigConfig = toml::from_str(&toml_text).unwrap();
        assert_eq!(parsed.serial_path, config.serial_path);
        assert_eq!(parsed.model, config.model);
    }

    #[test]
    fn validate_rejects_empty_path() {
        let mut config = sample();
        config.serial_path = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_broadcast_civ_address() {
        let mut config = sample();
        config.civ_address = Some(0x00);
        assert!(config.validate().is_err());
    }

    #[test]
    fn cli_override_wins_over_file_value() {
        let config = sample().merge_cli_overrides(None, Some(57600), None, None, None);
        assert_eq!(config.baud, Some(57600));
    }

    #[test]
    fn unset_cli_override_falls_back_to_file_value() {
        let mut config = sample();
        config.baud = Some(19200);
        let merged = config.clone().merge_cli_overrides(None, None, None, None, None);
        assert_eq!(merged.baud, Some(19200));
    }
}
