//! Transaction gateways for the grant and NGO contracts.
//!
//! The clients in this crate hold the domain rules; everything that
//! actually reads or writes the chain goes through these traits so the
//! rules can be tested against in-memory implementations.

use crate::plan::GrantPlan;
use accesschain_types::{Application, ChainError, Grant, NgoProfile};
use alloy_primitives::Address;
use async_trait::async_trait;

/// Operations on the grant contract.
#[async_trait]
pub trait GrantGateway: Send + Sync {
    /// Submit a new grant. Returns the identifier assigned on chain.
    async fn create_grant(&self, plan: &GrantPlan) -> Result<u64, ChainError>;

    /// Number of grants ever created; identifiers are `0..count`.
    async fn grant_count(&self) -> Result<u64, ChainError>;

    /// Fetch one grant with its milestones.
    async fn grant(&self, id: u64) -> Result<Grant, ChainError>;

    /// Apply for a grant as the connected signer.
    async fn apply(&self, grant_id: u64) -> Result<(), ChainError>;

    /// Everyone who applied to a grant.
    async fn applicants(&self, grant_id: u64) -> Result<Vec<Application>, ChainError>;

    /// Approve one application; the grant moves to in-progress.
    async fn approve_application(&self, grant_id: u64, applicant: Address)
        -> Result<(), ChainError>;

    /// Submit a milestone for review, as the approved recipient.
    async fn submit_milestone(&self, grant_id: u64, index: u64) -> Result<(), ChainError>;

    /// Approve a submitted milestone, releasing its tranche.
    async fn approve_milestone(&self, grant_id: u64, index: u64) -> Result<(), ChainError>;
}

/// Operations on the NGO access-control contract.
#[async_trait]
pub trait NgoGateway: Send + Sync {
    /// Register the connected signer as an NGO under `name`.
    async fn register(&self, name: &str) -> Result<(), ChainError>;

    /// Registry record for an address; unknown addresses report an
    /// unregistered profile rather than an error.
    async fn profile(&self, ngo: Address) -> Result<NgoProfile, ChainError>;

    /// Grant `ngo` the right to create grants. Admin only.
    async fn authorize(&self, ngo: Address) -> Result<(), ChainError>;

    /// Withdraw that right. Admin only.
    async fn revoke(&self, ngo: Address) -> Result<(), ChainError>;
}
