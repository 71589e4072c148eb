//! Application configuration.
//!
//! `FeedConfig` is the persisted, user-editable surface; it translates
//! into the session and calibration settings at bootstrap. Every field
//! has a default so a missing or partial file still yields a working
//! configuration.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::calibration::{Calibration, SpeedUnits, DEFAULT_BARO_IN_HG};
use crate::session::SessionConfig;

use super::error::ConfigError;

fn default_host() -> String {
    "192.168.10.1".to_string()
}

fn default_port() -> u16 {
    80
}

fn default_sensor_port() -> u16 {
    43211
}

fn default_airspeed_factor() -> f64 {
    1.0
}

fn default_baro_setting() -> f64 {
    DEFAULT_BARO_IN_HG
}

fn default_status_timeout_secs() -> u64 {
    10
}

fn default_reconnect_delay_secs() -> u64 {
    1
}

/// Persisted application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Host-unit address.
    pub host: String,

    /// Host-unit stream port.
    pub port: u16,

    /// UDP port the attitude sensor broadcasts on.
    pub sensor_port: u16,

    /// Display units for speed channels.
    pub units: SpeedUnits,

    /// Airspeed calibration factor.
    pub airspeed_factor: f64,

    /// Barometric pressure setting in inHg.
    pub baro_setting_in_hg: f64,

    /// Maximum status silence before a forced reconnect, in seconds.
    pub status_timeout_secs: u64,

    /// Delay between failed connection attempts, in seconds.
    pub reconnect_delay_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            sensor_port: default_sensor_port(),
            units: SpeedUnits::default(),
            airspeed_factor: default_airspeed_factor(),
            baro_setting_in_hg: default_baro_setting(),
            status_timeout_secs: default_status_timeout_secs(),
            reconnect_delay_secs: default_reconnect_delay_secs(),
        }
    }
}

impl FeedConfig {
    /// Default config file location, `<config dir>/skyfeed/config.json`.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("skyfeed")
            .join("config.json")
    }

    /// Load from a JSON file; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the configuration as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        }
        let contents = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, contents).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Session settings derived from this configuration.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            host: self.host.clone(),
            port: self.port,
            sensor_port: self.sensor_port,
            status_timeout: Duration::from_secs(self.status_timeout_secs),
            reconnect_delay: Duration::from_secs(self.reconnect_delay_secs),
            ..SessionConfig::default()
        }
    }

    /// Calibration settings derived from this configuration.
    pub fn calibration(&self) -> Calibration {
        Calibration {
            units: self.units,
            airspeed_factor: self.airspeed_factor,
            baro_setting_in_hg: self.baro_setting_in_hg,
            ..Calibration::default()
        }
    }
}
