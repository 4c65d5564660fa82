//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub call: CallConfig,
    pub notifications: NotificationConfig,
    pub socket: SocketConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CallConfig {
    /// Bound on Calling/Ringing/Connecting before the session is reaped
    pub watchdog_secs: u64,
    /// How long an ended session stays visible before the slot clears
    pub ended_grace_secs: u64,
}

impl CallConfig {
    pub fn watchdog(&self) -> Duration {
        Duration::from_secs(self.watchdog_secs)
    }

    pub fn ended_grace(&self) -> Duration {
        Duration::from_secs(self.ended_grace_secs)
    }
}

impl Default for CallConfig {
    fn default() -> Self {
        Self {
            watchdog_secs: 45,
            ended_grace_secs: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// How long a dedup key blocks re-admission
    pub dedup_window_secs: u64,
    /// How long a visible item stays up before auto-close
    pub display_timeout_secs: u64,
}

impl NotificationConfig {
    pub fn dedup_window(&self) -> Duration {
        Duration::from_secs(self.dedup_window_secs)
    }

    pub fn display_timeout(&self) -> Duration {
        Duration::from_secs(self.display_timeout_secs)
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            dedup_window_secs: 10,
            display_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SocketConfig {
    /// WebSocket endpoint; when unset the in-process bridge is used
    pub url: Option<String>,
}

impl Config {
    /// Parse a TOML configuration document
    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Load configuration from a file, falling back to defaults when absent
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(Self::from_toml_str(&raw)?)
    }
}
