use std::path::Path;

use anyhow::Context;
use rust_decimal::Decimal;
use serde::Deserialize;

use entrega_core::{OrderPolicy, SHIPPING_SURCHARGE};

/// Server configuration: TOML file with env/CLI overrides applied by the
/// binary. Every section has working defaults so a bare deploy only needs
/// `DATABASE_URL`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub orders: OrdersConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OrdersConfig {
    /// Enforce the status transition table instead of accepting any
    /// non-empty string. Off by default for client compatibility.
    #[serde(default)]
    pub strict_transitions: bool,
    /// Only serve tracking reads for orders currently `en camino`.
    #[serde(default)]
    pub require_in_transit: bool,
    #[serde(default = "default_surcharge")]
    pub shipping_surcharge: Decimal,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    4567
}

fn default_max_connections() -> u32 {
    10
}

fn default_surcharge() -> Decimal {
    SHIPPING_SURCHARGE
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_max_connections(),
        }
    }
}

impl Default for OrdersConfig {
    fn default() -> Self {
        Self {
            strict_transitions: false,
            require_in_transit: false,
            shipping_surcharge: default_surcharge(),
        }
    }
}

impl Config {
    /// Parse the file at `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    pub fn order_policy(&self) -> OrderPolicy {
        OrderPolicy {
            strict_transitions: self.orders.strict_transitions,
            require_in_transit: self.orders.require_in_transit,
            shipping_surcharge: self.orders.shipping_surcharge,
        }
    }
}
