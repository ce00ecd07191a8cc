// SPDX-License-Identifier: MIT

//! Daemon configuration (C11): layers CLI flags over a TOML file over
//! built-in defaults, mirroring `hdds-discovery-server`'s `ServerConfig`.

use std::net::IpAddr;
use std::path::Path;

use catcore::config::RigConfig;
use catcore::model::ModelId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonConfig {
    pub serial_path: String,
    #[serde(default)]
    pub baud: Option<u32>,
    #[serde(default)]
    pub civ_address: Option<u8>,
    pub model: ModelId,
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,
    #[serde(default = "default_cache_ttl_ms")]
    pub cache_ttl_ms: u64,

    #[serde(default = "default_bind_address")]
    pub bind_address: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_read_timeout_ms() -> u64 {
    500
}

fn default_cache_ttl_ms() -> u64 {
    500
}

fn default_bind_address() -> IpAddr {
    "127.0.0.1".parse().unwrap()
}

fn default_port() -> u16 {
    4532
}

fn default_log_level() -> String {
    "info".into()
}

impl DaemonConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| ConfigError::Io(e.to_string()))
    }

    /// CLI-supplied `Some` values always win over the file/default (§8
    /// property 9).
    #[allow(clippy::too_many_arguments)]
    pub fn merge_cli_overrides(
        mut self,
        serial_path: Option<String>,
        baud: Option<u32>,
        civ_address: Option<u8>,
        model: Option<ModelId>,
        read_timeout_ms: Option<u64>,
        cache_ttl_ms: Option<u64>,
        bind_address: Option<IpAddr>,
        port: Option<u16>,
        log_level: Option<String>,
    ) -> Self {
        if let Some(v) = serial_path {
            self.serial_path = v;
        }
        if baud.is_some() {
            self.baud = baud;
        }
        if civ_address.is_some() {
            self.civ_address = civ_address;
        }
        if let Some(v) = model {
            self.model = v;
        }
        if let Some(v) = read_timeout_ms {
            self.read_timeout_ms = v;
        }
        if let Some(v) = cache_ttl_ms {
            self.cache_ttl_ms = v;
        }
        if let Some(v) = bind_address {
            self.bind_address = v;
        }
        if let Some(v) = port {
            self.port = v;
        }
        if let Some(v) = log_level {
            self.log_level = v;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.serial_path.is_empty() {
            return Err(ConfigError::InvalidValue("serial_path cannot be empty".into()));
        }
        if self.port == 0 {
            return Err(ConfigError::InvalidValue("port cannot be 0".into()));
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

    /// Project the daemon config down to the core's `RigConfig`.
    pub fn rig_config(&self) -> RigConfig {
        RigConfig {
            serial_path: self.serial_path.clone(),
            baud: self.baud,
            civ_address: self.civ_address,
            model: self.model,
            read_timeout_ms: self.read_timeout_ms,
            cache_ttl_ms: self.cache_ttl_ms,
        }
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

    fn sample() -> DaemonConfig {
        DaemonConfig {
            serial_path: "/dev/ttyUSB0".into(),
            baud: None,
            civ_address: None,
            model: ModelId::ElecraftK3,
            read_timeout_ms: default_read_timeout_ms(),
            cache_ttl_ms: default_cache_ttl_ms(),
            bind_address: default_bind_address(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }

    #[test]
    fn round_trips_through_toml() {
        let config = sample();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: DaemonConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.serial_path, config.serial_path);
        assert_eq!(parsed.port, config.port);
    }

    #[test]
    fn validate_rejects_port_zero() {
        let mut config = sample();
        config.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn cli_override_wins_over_file_value() {
        let config = sample().merge_cli_overrides(
            None, None, None, None, None, None, None, Some(4533), None,
        );
        assert_eq!(config.port, 4533);
    }

    #[test]
    fn unset_cli_override_falls_back_to_file_value() {
        let mut config = sample();
        config.port = 4600;
        let merged = config.clone().merge_cli_overrides(
            None, None, None, None, None, None, None, None, None,
        );
        assert_eq!(merged.port, 4600);
    }
}
