//! Application configuration.
//!
//! Loaded from a TOML file; only the contract addresses are mandatory.
//! Everything else falls back to the Sepolia network and the coordinator
//! defaults. The signing key can come from the file or from the
//! `ACCESSCHAIN_PRIVATE_KEY` environment variable, which wins.

use accesschain_chain::{ContractAddresses, NetworkDescriptor};
use accesschain_verification::config::{
    DEFAULT_MAX_ATTEMPTS, DEFAULT_PLATFORM_URL, DEFAULT_POLL_INTERVAL,
};
use accesschain_verification::CoordinatorConfig;
use anyhow::Context;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const PRIVATE_KEY_ENV: &str = "ACCESSCHAIN_PRIVATE_KEY";

#[derive(Clone, Debug, Default, Deserialize)]
pub struct WalletSettings {
    pub private_key: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    #[serde(default = "NetworkDescriptor::sepolia")]
    pub network: NetworkDescriptor,
    pub contracts: ContractAddresses,
    #[serde(default)]
    pub wallet: WalletSettings,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_platform_url")]
    pub platform_url: String,
}

fn default_poll_interval_secs() -> u64 {
    DEFAULT_POLL_INTERVAL.as_secs()
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_platform_url() -> String {
    DEFAULT_PLATFORM_URL.to_owned()
}

impl AppConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.contracts.validate()?;
        Ok(config)
    }

    /// Signing key for write commands.
    pub fn private_key(&self) -> anyhow::Result<String> {
        if let Ok(key) = std::env::var(PRIVATE_KEY_ENV) {
            if !key.trim().is_empty() {
                return Ok(key);
            }
        }
        self.wallet
            .private_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .with_context(|| {
                format!("no signing key: set wallet.private_key or {PRIVATE_KEY_ENV}")
            })
    }

    pub fn coordinator_config(&self) -> CoordinatorConfig {
        let mut config = CoordinatorConfig::new(self.network.chain_id, self.contracts.verifier);
        config.poll_interval = Duration::from_secs(self.poll_interval_secs);
        config.max_attempts = self.max_attempts;
        config.platform_url = self.platform_url.clone();
        config
    }
}
