//! Agent configuration.
//!
//! Loaded from an optional JSON file and adjusted at runtime through the
//! host's `setoption` command. Every field has a default, so `{}` is a valid
//! configuration.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

/// Default decision service address.
pub const DEFAULT_ENDPOINT: &str = "localhost:2004";

/// Default read timeout for one decision round trip (five minutes).
pub const DEFAULT_TIMEOUT_MS: u64 = 300_000;

/// Consecutive declined offers tolerated before deferring to the negotiator.
pub const DEFAULT_DECLINE_THRESHOLD: u32 = 2;

/// Errors from loading or updating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown option: '{0}'")]
    UnknownOption(String),

    #[error("option '{name}' needs a value")]
    MissingValue { name: String },

    #[error("invalid value '{value}' for option '{name}'")]
    InvalidValue { name: String, value: String },
}

/// Tile choice used when the decision service cannot answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FallbackPolicy {
    /// Always the first enumerated land tile.
    #[default]
    FirstTile,
    /// The local scoring heuristic.
    Heuristic,
}

/// Where a class of decisions is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// Ask the external decision service.
    Offload,
    /// Decide in-process.
    Local,
}

impl StrategyKind {
    fn from_name(s: &str) -> Option<StrategyKind> {
        match s {
            "offload" => Some(StrategyKind::Offload),
            "local" => Some(StrategyKind::Local),
            _ => None,
        }
    }
}

impl FallbackPolicy {
    fn from_name(s: &str) -> Option<FallbackPolicy> {
        match s {
            "first-tile" => Some(FallbackPolicy::FirstTile),
            "heuristic" => Some(FallbackPolicy::Heuristic),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// `host:port` of the decision service.
    pub endpoint: String,
    /// Connect and read timeout for one round trip, in milliseconds.
    pub timeout_ms: u64,
    pub fallback: FallbackPolicy,
    pub tile_strategy: StrategyKind,
    pub trade_strategy: StrategyKind,
    pub decline_threshold: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        AgentConfig {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            fallback: FallbackPolicy::FirstTile,
            tile_strategy: StrategyKind::Offload,
            trade_strategy: StrategyKind::Local,
            decline_threshold: DEFAULT_DECLINE_THRESHOLD,
        }
    }
}

impl AgentConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Applies a host `setoption`. Names are case-sensitive.
    pub fn set_option(&mut self, name: &str, value: Option<&str>) -> Result<(), ConfigError> {
        let value = value.ok_or_else(|| ConfigError::MissingValue {
            name: name.to_string(),
        })?;
        let invalid = || ConfigError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
        };
        match name {
            "Endpoint" => self.endpoint = value.to_string(),
            "TimeoutMs" => self.timeout_ms = value.parse().map_err(|_| invalid())?,
            "Fallback" => self.fallback = FallbackPolicy::from_name(value).ok_or_else(invalid)?,
            "TileStrategy" => {
                self.tile_strategy = StrategyKind::from_name(value).ok_or_else(invalid)?
            }
            "TradeStrategy" => {
                self.trade_strategy = StrategyKind::from_name(value).ok_or_else(invalid)?
            }
            "DeclineThreshold" => self.decline_threshold = value.parse().map_err(|_| invalid())?,
            other => return Err(ConfigError::UnknownOption(other.to_string())),
        }
        Ok(())
    }
}
