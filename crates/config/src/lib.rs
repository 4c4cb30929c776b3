//! Neo Wallet Configuration
//!
//! Network and chain selection plus the settings consumed by the send
//! workflow: collaborator timeouts, the legacy-chain migration rule and
//! logging.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Address version byte used by Neo N3.
pub const N3_ADDRESS_VERSION: u8 = 0x35;
/// Address version byte used by the legacy (Neo 2) chain.
pub const LEGACY_ADDRESS_VERSION: u8 = 0x17;

/// Default fee-calculation timeout in milliseconds
pub const DEFAULT_FEE_TIMEOUT_MS: u64 = 30_000;
/// Default submission timeout in milliseconds
pub const DEFAULT_SUBMIT_TIMEOUT_MS: u64 = 30_000;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid setting {field}: {reason}")]
    InvalidSetting { field: &'static str, reason: String },
}

/// Network type for Neo blockchain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum NetworkType {
    #[serde(alias = "mainnet", alias = "main")]
    MainNet,
    #[default]
    #[serde(alias = "testnet", alias = "test")]
    TestNet,
    #[serde(alias = "private", alias = "privnet")]
    Private,
}

impl NetworkType {
    /// Gets the network magic number
    pub fn magic(&self) -> u32 {
        match self {
            NetworkType::MainNet => 0x334f454e, // "NEO3" in little endian
            NetworkType::TestNet => 0x3254334e, // "N3T2" in little endian
            NetworkType::Private => 0x00000000,
        }
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkType::MainNet => write!(f, "mainnet"),
            NetworkType::TestNet => write!(f, "testnet"),
            NetworkType::Private => write!(f, "private"),
        }
    }
}

impl FromStr for NetworkType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mainnet" | "main" => Ok(NetworkType::MainNet),
            "testnet" | "test" => Ok(NetworkType::TestNet),
            "private" | "privnet" => Ok(NetworkType::Private),
            _ => Err(format!("Unknown network type: {}", s)),
        }
    }
}

/// Which generation of the chain the wallet is talking to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ChainType {
    /// Neo 2, only reachable for migrating assets
    #[serde(alias = "neo2", alias = "legacy")]
    Legacy,
    #[default]
    #[serde(alias = "neo3", alias = "n3")]
    N3,
}

impl ChainType {
    /// Gets the address version
    pub fn address_version(&self) -> u8 {
        match self {
            ChainType::Legacy => LEGACY_ADDRESS_VERSION,
            ChainType::N3 => N3_ADDRESS_VERSION,
        }
    }
}

impl fmt::Display for ChainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainType::Legacy => write!(f, "neo2"),
            ChainType::N3 => write!(f, "neo3"),
        }
    }
}

impl FromStr for ChainType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "neo2" | "legacy" => Ok(ChainType::Legacy),
            "neo3" | "n3" => Ok(ChainType::N3),
            _ => Err(format!("Unknown chain type: {}", s)),
        }
    }
}

/// Timeouts applied to the external fee and submission services
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SendSettings {
    pub fee_timeout_ms: u64,
    pub submit_timeout_ms: u64,
}

impl SendSettings {
    pub fn fee_timeout(&self) -> Duration {
        Duration::from_millis(self.fee_timeout_ms)
    }

    pub fn submit_timeout(&self) -> Duration {
        Duration::from_millis(self.submit_timeout_ms)
    }
}

impl Default for SendSettings {
    fn default() -> Self {
        Self {
            fee_timeout_ms: DEFAULT_FEE_TIMEOUT_MS,
            submit_timeout_ms: DEFAULT_SUBMIT_TIMEOUT_MS,
        }
    }
}

/// Settings for the legacy-to-N3 migration follow-up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationSettings {
    pub enabled: bool,
    /// Legacy-chain address that receives assets being migrated
    pub swap_address: Option<String>,
    /// Asset symbols eligible for migration
    pub assets: Vec<String>,
}

impl MigrationSettings {
    /// Whether `symbol` is one of the migratable assets
    pub fn covers_asset(&self, symbol: &str) -> bool {
        self.assets.iter().any(|asset| asset == symbol)
    }
}

impl Default for MigrationSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            swap_address: None,
            assets: vec!["NEO".to_string(), "GAS".to_string()],
        }
    }
}

/// Logger configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub active: bool,
    /// Log level, e.g. `info` or `debug`
    pub level: String,
    /// `text`, `json` or `pretty`
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            active: true,
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

/// Wallet configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WalletConfig {
    pub network: NetworkType,
    pub chain: ChainType,
    pub send: SendSettings,
    pub migration: MigrationSettings,
    pub logging: LoggingSettings,
}

impl WalletConfig {
    /// Parses a configuration from TOML text and validates it
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: WalletConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Checks the invariants serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.send.fee_timeout_ms == 0 {
            return Err(ConfigError::InvalidSetting {
                field: "send.fee_timeout_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.send.submit_timeout_ms == 0 {
            return Err(ConfigError::InvalidSetting {
                field: "send.submit_timeout_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.migration.enabled {
            let has_address = self
                .migration
                .swap_address
                .as_deref()
                .map(str::trim)
                .is_some_and(|address| !address.is_empty());
            if !has_address {
                return Err(ConfigError::InvalidSetting {
                    field: "migration.swap_address",
                    reason: "required when migration is enabled".to_string(),
                });
            }
        }
        match self.logging.format.to_ascii_lowercase().as_str() {
            "text" | "json" | "pretty" => Ok(()),
            other => Err(ConfigError::InvalidSetting {
                field: "logging.format",
                reason: format!("unknown format {}", other),
            }),
        }
    }
}
