//! Gateways for the grant and NGO registry contracts.

use crate::calls::{call_error, ensure_success};
use crate::contracts::{AccessGrant, NGOAccessControl};
use accesschain_grants::{GrantGateway, GrantPlan, NgoGateway};
use accesschain_types::{
    Application, ApplicationStatus, ChainError, Grant, GrantStatus, Milestone, MilestoneStatus,
    NgoProfile,
};
use alloy::providers::DynProvider;
use alloy::sol_types::SolEvent;
use alloy_primitives::{Address, Log, U256};
use async_trait::async_trait;

/// [`GrantGateway`] over the AccessGrant contract.
pub struct GrantRegistry {
    contract: AccessGrant::AccessGrantInstance<DynProvider>,
}

impl GrantRegistry {
    pub fn new(provider: DynProvider, address: Address) -> Self {
        Self {
            contract: AccessGrant::new(address, provider),
        }
    }

    pub fn address(&self) -> Address {
        *self.contract.address()
    }
}

/// Grant id carried by the first `GrantCreated` event `contract` emitted.
fn grant_created_id<'a>(
    logs: impl Iterator<Item = &'a Log>,
    contract: Address,
) -> Option<u64> {
    logs.filter(|log| log.address == contract)
        .find(|log| {
            log.data.topics().first() == Some(&AccessGrant::GrantCreated::SIGNATURE_HASH)
        })
        .and_then(|log| log.data.topics().get(1))
        .and_then(|topic| u64::try_from(U256::from_be_bytes(topic.0)).ok())
}

#[async_trait]
impl GrantGateway for GrantRegistry {
    async fn create_grant(&self, plan: &GrantPlan) -> Result<u64, ChainError> {
        let descriptions: Vec<String> = plan
            .milestones
            .iter()
            .map(|milestone| milestone.description.clone())
            .collect();
        let amounts: Vec<U256> = plan
            .milestones
            .iter()
            .map(|milestone| milestone.amount)
            .collect();

        let call = self.contract.createGrant(
            plan.title.clone(),
            plan.description.clone(),
            plan.total_amount,
            descriptions,
            amounts,
        );
        call.call().await.map_err(call_error)?;
        let receipt = call
            .send()
            .await
            .map_err(call_error)?
            .get_receipt()
            .await
            .map_err(|err| ChainError::Rpc(err.to_string()))?;
        ensure_success(&receipt)?;

        let id = grant_created_id(
            receipt.inner.logs().iter().map(|log| &log.inner),
            self.address(),
        )
        .ok_or_else(|| ChainError::Decode("no GrantCreated event in receipt".into()))?;
        tracing::info!(grant = id, tx = %receipt.transaction_hash, "grant created on chain");
        Ok(id)
    }

    async fn grant_count(&self) -> Result<u64, ChainError> {
        let count = self.contract.grantCount().call().await.map_err(call_error)?;
        u64::try_from(count).map_err(|_| ChainError::Decode("grant count exceeds u64".into()))
    }

    async fn grant(&self, id: u64) -> Result<Grant, ChainError> {
        let raw = self
            .contract
            .getGrant(U256::from(id))
            .call()
            .await
            .map_err(call_error)?;
        let status = GrantStatus::from_raw(raw.status)?;
        let milestone_count = u64::try_from(raw.milestoneCount)
            .map_err(|_| ChainError::Decode("milestone count exceeds u64".into()))?;

        let mut milestones = Vec::with_capacity(milestone_count as usize);
        for index in 0..milestone_count {
            let milestone = self
                .contract
                .getMilestone(U256::from(id), U256::from(index))
                .call()
                .await
                .map_err(call_error)?;
            milestones.push(Milestone {
                description: milestone.description,
                amount: milestone.amount,
                status: MilestoneStatus::from_raw(milestone.status)?,
            });
        }

        Ok(Grant {
            id,
            ngo: raw.ngo,
            title: raw.title,
            description: raw.description,
            total_amount: raw.totalAmount,
            status,
            milestones,
        })
    }

    async fn apply(&self, grant_id: u64) -> Result<(), ChainError> {
        let call = self.contract.applyForGrant(U256::from(grant_id));
        call.call().await.map_err(call_error)?;
        let receipt = call
            .send()
            .await
            .map_err(call_error)?
            .get_receipt()
            .await
            .map_err(|err| ChainError::Rpc(err.to_string()))?;
        ensure_success(&receipt)
    }

    async fn applicants(&self, grant_id: u64) -> Result<Vec<Application>, ChainError> {
        let addresses = self
            .contract
            .getApplicants(U256::from(grant_id))
            .call()
            .await
            .map_err(call_error)?;

        let mut applications = Vec::with_capacity(addresses.len());
        for applicant in addresses {
            let raw = self
                .contract
                .getApplicationStatus(U256::from(grant_id), applicant)
                .call()
                .await
                .map_err(call_error)?;
            applications.push(Application {
                grant_id,
                applicant,
                status: ApplicationStatus::from_raw(raw)?,
            });
        }
        Ok(applications)
    }

    async fn approve_application(
        &self,
        grant_id: u64,
        applicant: Address,
    ) -> Result<(), ChainError> {
        let call = self
            .contract
            .approveApplication(U256::from(grant_id), applicant);
        call.call().await.map_err(call_error)?;
        let receipt = call
            .send()
            .await
            .map_err(call_error)?
            .get_receipt()
            .await
            .map_err(|err| ChainError::Rpc(err.to_string()))?;
        ensure_success(&receipt)
    }

    async fn submit_milestone(&self, grant_id: u64, index: u64) -> Result<(), ChainError> {
        let call = self
            .contract
            .submitMilestone(U256::from(grant_id), U256::from(index));
        call.call().await.map_err(call_error)?;
        let receipt = call
            .send()
            .await
            .map_err(call_error)?
            .get_receipt()
            .await
            .map_err(|err| ChainError::Rpc(err.to_string()))?;
        ensure_success(&receipt)
    }

    async fn approve_milestone(&self, grant_id: u64, index: u64) -> Result<(), ChainError> {
        let call = self
            .contract
            .approveMilestone(U256::from(grant_id), U256::from(index));
        call.call().await.map_err(call_error)?;
        let receipt = call
            .send()
            .await
            .map_err(call_error)?
            .get_receipt()
            .await
            .map_err(|err| ChainError::Rpc(err.to_string()))?;
        ensure_success(&receipt)
    }
}

/// [`NgoGateway`] over the NGOAccessControl contract.
pub struct NgoRegistry {
    contract: NGOAccessControl::NGOAccessControlInstance<DynProvider>,
}

impl NgoRegistry {
    pub fn new(provider: DynProvider, address: Address) -> Self {
        Self {
            contract: NGOAccessControl::new(address, provider),
        }
    }

    pub fn address(&self) -> Address {
        *self.contract.address()
    }
}

#[async_trait]
impl NgoGateway for NgoRegistry {
    async fn register(&self, name: &str) -> Result<(), ChainError> {
        let call = self.contract.registerNGO(name.to_owned());
        call.call().await.map_err(call_error)?;
        let receipt = call
            .send()
            .await
            .map_err(call_error)?
            .get_receipt()
            .await
            .map_err(|err| ChainError::Rpc(err.to_string()))?;
        ensure_success(&receipt)?;
        tracing::info!(%name, tx = %receipt.transaction_hash, "ngo registered on chain");
        Ok(())
    }

    async fn profile(&self, ngo: Address) -> Result<NgoProfile, ChainError> {
        let details = self
            .contract
            .getNGODetails(ngo)
            .call()
            .await
            .map_err(call_error)?;
        let authorized = self
            .contract
            .isAuthorizedNGO(ngo)
            .call()
            .await
            .map_err(call_error)?;
        Ok(NgoProfile {
            address: ngo,
            name: details.name,
            registered: details.registered,
            authorized,
        })
    }

    async fn authorize(&self, ngo: Address) -> Result<(), ChainError> {
        let call = self.contract.addAuthorizedNGO(ngo);
        call.call().await.map_err(call_error)?;
        let receipt = call
            .send()
            .await
            .map_err(call_error)?
            .get_receipt()
            .await
            .map_err(|err| ChainError::Rpc(err.to_string()))?;
        ensure_success(&receipt)
    }

    async fn revoke(&self, ngo: Address) -> Result<(), ChainError> {
        let call = self.contract.removeAuthorizedNGO(ngo);
        call.call().await.map_err(call_error)?;
        let receipt = call
            .send()
            .await
            .map_err(call_error)?
            .get_receipt()
            .await
            .map_err(|err| ChainError::Rpc(err.to_string()))?;
        ensure_success(&receipt)
    }
}
