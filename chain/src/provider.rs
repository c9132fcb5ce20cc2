//! Provider construction.

use crate::network::NetworkDescriptor;
use accesschain_types::ChainError;
use alloy::network::EthereumWallet;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use alloy_primitives::Address;

/// Read-only HTTP provider for `network`.
pub fn connect(network: &NetworkDescriptor) -> Result<DynProvider, ChainError> {
    let raw = network.primary_rpc_url()?;
    let url = raw
        .parse()
        .map_err(|err| ChainError::Config(format!("invalid rpc url {raw}: {err}")))?;
    Ok(ProviderBuilder::new().connect_http(url).erased())
}

/// HTTP provider signing with a local private key.
///
/// Returns the signer's address alongside the provider so callers know
/// which account transactions will run as.
pub fn connect_with_signer(
    network: &NetworkDescriptor,
    private_key: &str,
) -> Result<(DynProvider, Address), ChainError> {
    let raw = network.primary_rpc_url()?;
    let url = raw
        .parse()
        .map_err(|err| ChainError::Config(format!("invalid rpc url {raw}: {err}")))?;

    let signer: PrivateKeySigner = private_key
        .trim()
        .parse()
        .map_err(|err| ChainError::Config(format!("invalid private key: {err}")))?;
    let address = signer.address();

    let provider = ProviderBuilder::new()
        .wallet(EthereumWallet::from(signer))
        .connect_http(url)
        .erased();
    Ok((provider, address))
}
