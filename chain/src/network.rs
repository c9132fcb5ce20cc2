//! Network descriptors for the supported chains.

use accesschain_types::ChainError;
use serde::{Deserialize, Serialize};

/// Currency metadata as `wallet_addEthereumChain` expects it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// One chain the application can target.
///
/// Carries everything needed both to open an HTTP connection and to ask a
/// wallet endpoint to add the network. Descriptors are TOML-configurable;
/// [`NetworkDescriptor::sepolia`] and [`NetworkDescriptor::local`] are the
/// built-in defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDescriptor {
    pub chain_id: u64,
    pub name: String,
    pub native_currency: NativeCurrency,
    pub rpc_urls: Vec<String>,
    #[serde(default)]
    pub block_explorer_urls: Vec<String>,
}

impl NetworkDescriptor {
    /// The Sepolia test network, the designated deployment target.
    pub fn sepolia() -> Self {
        Self {
            chain_id: 11_155_111,
            name: "Sepolia".into(),
            native_currency: NativeCurrency {
                name: "Sepolia Ether".into(),
                symbol: "ETH".into(),
                decimals: 18,
            },
            rpc_urls: vec!["https://rpc.sepolia.org".into()],
            block_explorer_urls: vec!["https://sepolia.etherscan.io".into()],
        }
    }

    /// A local Hardhat-style devnet.
    pub fn local() -> Self {
        Self {
            chain_id: 31_337,
            name: "Localhost".into(),
            native_currency: NativeCurrency {
                name: "Ether".into(),
                symbol: "ETH".into(),
                decimals: 18,
            },
            rpc_urls: vec!["http://127.0.0.1:8545".into()],
            block_explorer_urls: Vec::new(),
        }
    }

    /// Chain id as the 0x-prefixed hex string wallet methods expect.
    pub fn hex_chain_id(&self) -> String {
        format!("{:#x}", self.chain_id)
    }

    /// First configured RPC endpoint.
    pub fn primary_rpc_url(&self) -> Result<&str, ChainError> {
        self.rpc_urls
            .first()
            .map(String::as_str)
            .ok_or_else(|| {
                ChainError::Config(format!("network {} has no rpc urls", self.name))
            })
    }

    /// The `wallet_addEthereumChain` parameter object for this network.
    pub fn add_chain_params(&self) -> serde_json::Value {
        serde_json::json!({
            "chainId": self.hex_chain_id(),
            "chainName": self.name,
            "nativeCurrency": {
                "name": self.native_currency.name,
                "symbol": self.native_currency.symbol,
                "decimals": self.native_currency.decimals,
            },
            "rpcUrls": self.rpc_urls,
            "blockExplorerUrls": self.block_explorer_urls,
        })
    }
}
