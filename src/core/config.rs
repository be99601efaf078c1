// Copyright (c) 2026 Amunchain
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//     http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Node configuration (TOML).

use crate::core::incentive::keepers::{KeeperError, MemoryBank, MemoryCollateral, StaticOracle};
use crate::core::math::Dec;
use crate::core::types::{Address, Coin};
use serde::{Deserialize, Serialize};
use std::fs;
use std::str::FromStr;
use thiserror::Error;

/// Config errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config read")]
    Read,
    #[error("config parse: {0}")]
    Parse(String),
    #[error("config value: {0}")]
    Value(String),
    #[error("keeper: {0}")]
    Keeper(#[from] KeeperError),
}

/// Node configuration root.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Node settings.
    pub node: NodeSettings,
    /// HTTP endpoints.
    pub http: HttpConfig,
    /// Block production.
    pub chain: ChainConfig,
    /// Logging.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Registered tokens (exponent and oracle price).
    #[serde(default)]
    pub tokens: Vec<TokenConfig>,
    /// Initial in-process balances and collateral.
    #[serde(default)]
    pub accounts: Vec<AccountConfig>,
}

/// Node settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeSettings {
    /// Human-readable name.
    pub name: String,
    /// Data directory (sled db).
    pub data_dir: String,
}

/// HTTP config.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Listen address, e.g. 0.0.0.0:9090.
    pub listen_addr: String,
    /// Serve `POST /msgs`. Messages are unsigned, so any caller can act for
    /// any account and submit governance messages; enable on local dev
    /// nodes only.
    #[serde(default)]
    pub accept_msgs: bool,
}

/// Block driver config.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Milliseconds between end-of-block calls.
    pub block_interval_ms: u64,
    /// Genesis JSON imported into an empty store. Default genesis if unset.
    #[serde(default)]
    pub genesis_path: Option<String>,
}

/// Log output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable single line.
    #[default]
    Compact,
    /// One JSON object per line.
    Json,
}

/// Logging config.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
    /// Max level: error, warn, info, debug or trace.
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: default_level(),
        }
    }
}

/// A registered base token.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Base denom, e.g. `uumee`.
    pub base_denom: String,
    /// Decimal exponent, e.g. 6.
    pub exponent: u32,
    /// USD price of one whole token, as a decimal string.
    #[serde(default)]
    pub price: Option<String>,
}

/// Initial state of one account in the in-process keepers.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Account address (base58).
    pub address: String,
    /// Spendable coins, e.g. `["1000000uumee"]`.
    #[serde(default)]
    pub balances: Vec<String>,
    /// Collateral uTokens, e.g. `["500000u/uumee"]`.
    #[serde(default)]
    pub collateral: Vec<String>,
}

fn parse_coin(raw: &str) -> Result<Coin, ConfigError> {
    Coin::from_str(raw).map_err(|e| ConfigError::Value(e.to_string()))
}

impl NodeConfig {
    /// Parse a TOML document.
    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Read and parse a TOML file.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|_| ConfigError::Read)?;
        Self::from_toml(&raw)
    }

    /// Build the in-process collaborators described by this config.
    pub fn build_keepers(&self) -> Result<(MemoryBank, MemoryCollateral, StaticOracle), ConfigError> {
        let mut bank = MemoryBank::new();
        let mut collateral = MemoryCollateral::new();
        let mut oracle = StaticOracle::new();

        for t in self.tokens.iter() {
            collateral.register_token(t.base_denom.clone(), t.exponent);
            if let Some(p) = t.price.as_deref() {
                let price = Dec::from_str(p).map_err(|_| ConfigError::Value(format!("price {p}")))?;
                oracle.set_price(t.base_denom.clone(), price, t.exponent);
            }
        }

        for a in self.accounts.iter() {
            let addr = Address::from_str(&a.address)
                .map_err(|e| ConfigError::Value(format!("{}: {e}", a.address)))?;
            for raw in a.balances.iter() {
                bank.mint(&addr, &parse_coin(raw)?)?;
            }
            for raw in a.collateral.iter() {
                collateral.deposit(&addr, &parse_coin(raw)?)?;
            }
        }
        Ok((bank, collateral, oracle))
    }
}
