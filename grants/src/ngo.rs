//! NGO registry operations.

use crate::error::GrantError;
use crate::gateway::NgoGateway;
use accesschain_types::NgoProfile;
use alloy_primitives::Address;
use std::sync::Arc;

/// Client for the NGO registry.
///
/// Registration and authorization are separate steps: anyone may register an
/// organization, but only authorized ones may create grants. The client
/// checks the current registry state before sending either transaction.
pub struct NgoClient {
    gateway: Arc<dyn NgoGateway>,
}

impl NgoClient {
    pub fn new(gateway: Arc<dyn NgoGateway>) -> Self {
        Self { gateway }
    }

    /// Register an organization under the caller's address.
    pub async fn register(&self, caller: Address, name: &str) -> Result<(), GrantError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GrantError::EmptyField("name"));
        }
        if self.gateway.profile(caller).await?.registered {
            return Err(GrantError::NgoAlreadyRegistered(caller));
        }

        self.gateway.register(name).await?;
        tracing::info!(%name, "ngo registered");
        Ok(())
    }

    pub async fn profile(&self, address: Address) -> Result<NgoProfile, GrantError> {
        Ok(self.gateway.profile(address).await?)
    }

    /// Grant an organization permission to create grants.
    pub async fn authorize(&self, address: Address) -> Result<(), GrantError> {
        let profile = self.gateway.profile(address).await?;
        if !profile.registered {
            return Err(GrantError::NgoNotRegistered(address));
        }
        if profile.authorized {
            return Err(GrantError::NgoAlreadyAuthorized(address));
        }

        self.gateway.authorize(address).await?;
        tracing::info!(ngo = %address, "ngo authorized");
        Ok(())
    }

    /// Withdraw an organization's permission to create grants.
    pub async fn revoke(&self, address: Address) -> Result<(), GrantError> {
        let profile = self.gateway.profile(address).await?;
        if !profile.authorized {
            return Err(GrantError::NgoNotAuthorized(address));
        }

        self.gateway.revoke(address).await?;
        tracing::info!(ngo = %address, "ngo authorization revoked");
        Ok(())
    }
}
