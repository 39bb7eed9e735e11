//! Chain and transport configuration.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Connection and chain parameters for the gRPC transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    /// gRPC endpoint URL (e.g. "https://grpc.example.org:443")
    pub grpc_endpoint: String,
    /// Chain ID the endpoint is expected to serve
    pub chain_id: String,
    /// Bech32 address prefix used by the chain
    pub address_prefix: String,
    /// Per-unit gas price, e.g. "0.025ustake"
    pub gas_price: String,
    /// Multiplier applied to simulated gas
    pub gas_adjustment: f64,
    /// Connection timeout in seconds
    pub connection_timeout: u64,
    /// Request timeout in seconds
    pub request_timeout: u64,
    /// How many times to poll for block inclusion after a sync broadcast
    pub broadcast_poll_attempts: u32,
    /// Delay between inclusion polls in milliseconds
    pub broadcast_poll_interval_ms: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            grpc_endpoint: "http://localhost:9090".to_string(),
            chain_id: "testing".to_string(),
            address_prefix: "cosmos".to_string(),
            gas_price: "0.025ustake".to_string(),
            gas_adjustment: 1.3,
            connection_timeout: 10,
            request_timeout: 30,
            broadcast_poll_attempts: 30,
            broadcast_poll_interval_ms: 1000,
        }
    }
}

impl ChainConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ChainConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrips_through_toml() {
        let config = ChainConfig::default();
        let rendered = toml::to_string_pretty(&config).unwrap();
        let parsed: ChainConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.grpc_endpoint, config.grpc_endpoint);
        assert_eq!(parsed.address_prefix, "cosmos");
        assert_eq!(parsed.broadcast_poll_attempts, 30);
    }
}
