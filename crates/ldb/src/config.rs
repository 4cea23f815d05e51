// LDB - Levels Debugger
// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


//! Configuration file for LDB
//!
//! The configuration lives in `~/.ldb.toml` and is created with default
//! values the first time LDB runs. Command line flags take precedence over
//! the values read from the file.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use eyre::{Result, WrapErr};
use ldb_common::{
    protocol::{WireFormat, DEFAULT_ASSIGN_SYMBOL, DEFAULT_DELIMITER},
    types::DEFAULT_CHANGE_HIGHLIGHT,
};
use ldb_engine::SessionConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Default host the debuggee connects to.
pub const DEFAULT_HOST: &str = "localhost";
/// Default port the debuggee connects to.
pub const DEFAULT_PORT: u16 = 59598;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where to listen for the debuggee
    pub channel: ChannelConfig,
    /// Tokens of the line protocol
    pub protocol: ProtocolConfig,
    /// Session behaviour
    pub session: SessionSettings,
}

/// Socket settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Host to listen on
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

/// Wire protocol settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolConfig {
    /// Token separating the fields of a message
    pub delimiter: String,
    /// Token separating key and value of an attribute
    pub assign_symbol: String,
}

/// Session settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// How long a changed variable stays highlighted, in milliseconds
    pub highlight_ms: u64,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self { host: DEFAULT_HOST.to_string(), port: DEFAULT_PORT }
    }
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER.to_string(),
            assign_symbol: DEFAULT_ASSIGN_SYMBOL.to_string(),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self { highlight_ms: DEFAULT_CHANGE_HIGHLIGHT.as_millis() as u64 }
    }
}

impl Config {
    /// Get the config file path (~/.ldb.toml)
    pub fn config_path() -> Result<PathBuf> {
        let home =
            dirs::home_dir().ok_or_else(|| eyre::eyre!("Unable to determine home directory"))?;
        Ok(home.join(".ldb.toml"))
    }

    /// Load configuration from `~/.ldb.toml`, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, creating default if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("Config file not found, creating default at {:?}", path);
            let default_config = Self::default();
            default_config.save_to(path)?;
            return Ok(default_config);
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path:?}"))?;

        let config: Self =
            toml::from_str(&content).with_context(|| "Failed to parse config file as TOML")?;

        debug!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to `~/.ldb.toml`
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = self.to_toml()?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {path:?}"))?;

        debug!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).with_context(|| "Failed to serialize config to TOML")
    }

    /// Reject settings the protocol cannot work with
    pub fn validate(&self) -> Result<()> {
        let protocol = &self.protocol;
        if protocol.delimiter.is_empty() {
            eyre::bail!("Protocol delimiter must not be empty");
        }
        if protocol.assign_symbol.is_empty() {
            eyre::bail!("Protocol assign symbol must not be empty");
        }
        if protocol.delimiter.contains(['\n', '\r']) {
            eyre::bail!("Protocol delimiter must not contain line breaks");
        }
        if protocol.delimiter == protocol.assign_symbol {
            eyre::bail!("Protocol delimiter and assign symbol must differ");
        }
        if self.channel.host.is_empty() {
            eyre::bail!("Channel host must not be empty");
        }
        Ok(())
    }

    /// Wire format described by the `[protocol]` section
    pub fn wire_format(&self) -> WireFormat {
        WireFormat::new(&self.protocol.delimiter, &self.protocol.assign_symbol)
    }

    /// Session settings for the engine
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            wire: self.wire_format(),
            highlight_window: Duration::from_millis(self.session.highlight_ms),
        }
    }

    /// Address to listen on, `host:port`
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.channel.host, self.channel.port)
    }
}
