//! NGO registry administration.

use crate::config::AppConfig;
use crate::display;
use accesschain_chain::{connect, connect_with_signer, NgoRegistry};
use accesschain_grants::NgoClient;
use alloy_primitives::Address;
use std::sync::Arc;

#[derive(clap::Subcommand)]
pub enum NgoAction {
    /// Register the configured signer as an NGO.
    Register {
        #[arg(long)]
        name: String,
    },
    /// Registry state for an address.
    Status { address: Address },
    /// Allow an NGO to create grants. Admin only.
    Authorize { address: Address },
    /// Withdraw grant-creation rights. Admin only.
    Revoke { address: Address },
}

pub async fn run(config: &AppConfig, action: NgoAction) -> anyhow::Result<()> {
    match action {
        NgoAction::Register { name } => {
            let (client, signer) = write_client(config)?;
            client.register(signer, &name).await?;
            println!("Registered {signer} as {name:?}");
        }
        NgoAction::Status { address } => {
            let client = read_client(config)?;
            let profile = client.profile(address).await?;
            println!("{}", display::ngo_line(&profile));
        }
        NgoAction::Authorize { address } => {
            let (client, _) = write_client(config)?;
            client.authorize(address).await?;
            println!("Authorized {address}");
        }
        NgoAction::Revoke { address } => {
            let (client, _) = write_client(config)?;
            client.revoke(address).await?;
            println!("Revoked {address}");
        }
    }
    Ok(())
}

fn read_client(config: &AppConfig) -> anyhow::Result<NgoClient> {
    let provider = connect(&config.network)?;
    let registry = Arc::new(NgoRegistry::new(
        provider,
        config.contracts.ngo_access_control,
    ));
    Ok(NgoClient::new(registry))
}

fn write_client(config: &AppConfig) -> anyhow::Result<(NgoClient, Address)> {
    let key = config.private_key()?;
    let (provider, signer) = connect_with_signer(&config.network, &key)?;
    let registry = Arc::new(NgoRegistry::new(
        provider,
        config.contracts.ngo_access_control,
    ));
    Ok((NgoClient::new(registry), signer))
}
