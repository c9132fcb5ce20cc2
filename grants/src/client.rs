//! Grant operations with the domain rules applied.

use crate::error::GrantError;
use crate::gateway::GrantGateway;
use crate::plan::GrantPlan;
use accesschain_types::{Application, ChainReader, Grant};
use alloy_primitives::Address;
use std::sync::Arc;

/// Client for the grant lifecycle.
///
/// Wraps a [`GrantGateway`] with the checks the application applies before
/// spending gas: plans must validate, applicants must be verified, and
/// milestone actions must match the milestone's state.
pub struct GrantClient {
    gateway: Arc<dyn GrantGateway>,
    verifier: Arc<dyn ChainReader>,
}

impl GrantClient {
    pub fn new(gateway: Arc<dyn GrantGateway>, verifier: Arc<dyn ChainReader>) -> Self {
        Self { gateway, verifier }
    }

    /// Validate and submit a new grant. Returns the new grant's identifier.
    pub async fn create_grant(&self, plan: &GrantPlan) -> Result<u64, GrantError> {
        plan.validate()?;
        let id = self.gateway.create_grant(plan).await?;
        tracing::info!(grant = id, title = %plan.title, "grant created");
        Ok(id)
    }

    /// Every grant on the contract, in creation order.
    pub async fn grants(&self) -> Result<Vec<Grant>, GrantError> {
        let count = self.gateway.grant_count().await?;
        let mut grants = Vec::with_capacity(count as usize);
        for id in 0..count {
            grants.push(self.gateway.grant(id).await?);
        }
        Ok(grants)
    }

    pub async fn grant(&self, id: u64) -> Result<Grant, GrantError> {
        Ok(self.gateway.grant(id).await?)
    }

    pub async fn applicants(&self, grant_id: u64) -> Result<Vec<Application>, GrantError> {
        Ok(self.gateway.applicants(grant_id).await?)
    }

    /// Apply for a grant.
    ///
    /// The applicant must hold a completed verification on the verifier
    /// contract and the grant must still be open. Both are checked before
    /// the transaction is sent.
    pub async fn apply(&self, grant_id: u64, applicant: Address) -> Result<(), GrantError> {
        if !self.verifier.is_verified(applicant).await? {
            return Err(GrantError::ApplicantNotVerified(applicant));
        }

        let grant = self.gateway.grant(grant_id).await?;
        if !grant.status.accepts_applications() {
            return Err(GrantError::GrantClosed {
                id: grant_id,
                status: grant.status,
            });
        }

        self.gateway.apply(grant_id).await?;
        tracing::info!(grant = grant_id, %applicant, "application submitted");
        Ok(())
    }

    /// Approve one application, closing the grant to further applicants.
    pub async fn approve_application(
        &self,
        grant_id: u64,
        applicant: Address,
    ) -> Result<(), GrantError> {
        let grant = self.gateway.grant(grant_id).await?;
        if !grant.status.accepts_applications() {
            return Err(GrantError::GrantClosed {
                id: grant_id,
                status: grant.status,
            });
        }

        self.gateway.approve_application(grant_id, applicant).await?;
        tracing::info!(grant = grant_id, %applicant, "application approved");
        Ok(())
    }

    /// Submit a pending milestone for review.
    pub async fn submit_milestone(&self, grant_id: u64, index: u64) -> Result<(), GrantError> {
        let grant = self.gateway.grant(grant_id).await?;
        let milestone = grant
            .milestones
            .get(index as usize)
            .ok_or(GrantError::MilestoneOutOfRange {
                index,
                count: grant.milestones.len(),
            })?;
        if !milestone.status.accepts_submission() {
            return Err(GrantError::MilestoneNotSubmittable {
                index,
                status: milestone.status,
            });
        }

        self.gateway.submit_milestone(grant_id, index).await?;
        tracing::info!(grant = grant_id, milestone = index, "milestone submitted");
        Ok(())
    }

    /// Approve a submitted milestone, releasing its tranche.
    pub async fn approve_milestone(&self, grant_id: u64, index: u64) -> Result<(), GrantError> {
        let grant = self.gateway.grant(grant_id).await?;
        let milestone = grant
            .milestones
            .get(index as usize)
            .ok_or(GrantError::MilestoneOutOfRange {
                index,
                count: grant.milestones.len(),
            })?;
        if milestone.status != accesschain_types::MilestoneStatus::Submitted {
            return Err(GrantError::MilestoneNotSubmitted {
                index,
                status: milestone.status,
            });
        }

        self.gateway.approve_milestone(grant_id, index).await?;
        tracing::info!(grant = grant_id, milestone = index, "milestone approved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::MilestoneInput;
    use accesschain_nullables::NullChainReader;
    use accesschain_types::{ChainError, GrantStatus, Milestone, MilestoneStatus};
    use alloy_primitives::U256;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Scripted gateway that records every write without sending anything.
    #[derive(Default)]
    struct MockGateway {
        grants: Mutex<Vec<Grant>>,
        applications: Mutex<Vec<u64>>,
        submissions: Mutex<Vec<(u64, u64)>>,
        approvals: Mutex<Vec<(u64, u64)>>,
        created: Mutex<Vec<GrantPlan>>,
    }

    impl MockGateway {
        fn with_grant(grant: Grant) -> Self {
            let gateway = Self::default();
            gateway.grants.lock().unwrap().push(grant);
            gateway
        }
    }

    #[async_trait]
    impl GrantGateway for MockGateway {
        async fn create_grant(&self, plan: &GrantPlan) -> Result<u64, ChainError> {
            let mut created = self.created.lock().unwrap();
            created.push(plan.clone());
            Ok(created.len() as u64 - 1)
        }

        async fn grant_count(&self) -> Result<u64, ChainError> {
            Ok(self.grants.lock().unwrap().len() as u64)
        }

        async fn grant(&self, id: u64) -> Result<Grant, ChainError> {
            self.grants
                .lock()
                .unwrap()
                .get(id as usize)
                .cloned()
                .ok_or_else(|| ChainError::Reverted("grant does not exist".into()))
        }

        async fn apply(&self, grant_id: u64) -> Result<(), ChainError> {
            self.applications.lock().unwrap().push(grant_id);
            Ok(())
        }

        async fn applicants(&self, _grant_id: u64) -> Result<Vec<Application>, ChainError> {
            Ok(Vec::new())
        }

        async fn approve_application(
            &self,
            _grant_id: u64,
            _applicant: Address,
        ) -> Result<(), ChainError> {
            Ok(())
        }

        async fn submit_milestone(&self, grant_id: u64, index: u64) -> Result<(), ChainError> {
            self.submissions.lock().unwrap().push((grant_id, index));
            Ok(())
        }

        async fn approve_milestone(&self, grant_id: u64, index: u64) -> Result<(), ChainError> {
            self.approvals.lock().unwrap().push((grant_id, index));
            Ok(())
        }
    }

    fn applicant() -> Address {
        Address::repeat_byte(0x44)
    }

    fn open_grant() -> Grant {
        Grant {
            id: 0,
            ngo: Address::repeat_byte(0x99),
            title: "Clean water wells".into(),
            description: "Dig three wells".into(),
            total_amount: U256::from(1_000u64),
            status: GrantStatus::Open,
            milestones: vec![
                Milestone {
                    description: "Survey sites".into(),
                    amount: U256::from(400u64),
                    status: MilestoneStatus::Pending,
                },
                Milestone {
                    description: "Dig wells".into(),
                    amount: U256::from(600u64),
                    status: MilestoneStatus::Submitted,
                },
            ],
        }
    }

    fn client(gateway: Arc<MockGateway>, reader: Arc<NullChainReader>) -> GrantClient {
        GrantClient::new(gateway, reader)
    }

    #[tokio::test]
    async fn unverified_applicant_is_rejected_before_any_transaction() {
        let gateway = Arc::new(MockGateway::with_grant(open_grant()));
        let reader = Arc::new(NullChainReader::new());
        let client = client(Arc::clone(&gateway), reader);

        let result = client.apply(0, applicant()).await;
        assert!(matches!(
            result,
            Err(GrantError::ApplicantNotVerified(a)) if a == applicant()
        ));
        assert!(gateway.applications.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn verified_applicant_applies_to_an_open_grant() {
        let gateway = Arc::new(MockGateway::with_grant(open_grant()));
        let reader = Arc::new(NullChainReader::new());
        reader.set_verified(applicant(), true).await;
        let client = client(Arc::clone(&gateway), reader);

        client.apply(0, applicant()).await.unwrap();
        assert_eq!(*gateway.applications.lock().unwrap(), vec![0]);
    }

    #[tokio::test]
    async fn applications_to_settled_grants_are_rejected() {
        let mut grant = open_grant();
        grant.status = GrantStatus::InProgress;
        let gateway = Arc::new(MockGateway::with_grant(grant));
        let reader = Arc::new(NullChainReader::new());
        reader.set_verified(applicant(), true).await;
        let client = client(Arc::clone(&gateway), reader);

        let result = client.apply(0, applicant()).await;
        assert!(matches!(
            result,
            Err(GrantError::GrantClosed {
                id: 0,
                status: GrantStatus::InProgress
            })
        ));
        assert!(gateway.applications.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_plan_never_reaches_the_gateway() {
        let gateway = Arc::new(MockGateway::default());
        let reader = Arc::new(NullChainReader::new());
        let client = client(Arc::clone(&gateway), reader);

        let plan = GrantPlan {
            title: "Wells".into(),
            description: "Dig".into(),
            total_amount: U256::from(100u64),
            milestones: vec![MilestoneInput {
                description: "All of it".into(),
                amount: U256::from(99u64),
            }],
        };

        let result = client.create_grant(&plan).await;
        assert!(matches!(
            result,
            Err(GrantError::MilestoneSumMismatch { .. })
        ));
        assert!(gateway.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn valid_plan_is_created_and_assigned_an_id() {
        let gateway = Arc::new(MockGateway::default());
        let reader = Arc::new(NullChainReader::new());
        let client = client(Arc::clone(&gateway), reader);

        let plan = GrantPlan {
            title: "Wells".into(),
            description: "Dig".into(),
            total_amount: U256::from(100u64),
            milestones: vec![MilestoneInput {
                description: "All of it".into(),
                amount: U256::from(100u64),
            }],
        };

        let id = client.create_grant(&plan).await.unwrap();
        assert_eq!(id, 0);
        assert_eq!(gateway.created.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn submitting_a_submitted_milestone_is_rejected() {
        let gateway = Arc::new(MockGateway::with_grant(open_grant()));
        let reader = Arc::new(NullChainReader::new());
        let client = client(Arc::clone(&gateway), reader);

        // Milestone 1 is already Submitted.
        let result = client.submit_milestone(0, 1).await;
        assert!(matches!(
            result,
            Err(GrantError::MilestoneNotSubmittable {
                index: 1,
                status: MilestoneStatus::Submitted
            })
        ));

        client.submit_milestone(0, 0).await.unwrap();
        assert_eq!(*gateway.submissions.lock().unwrap(), vec![(0, 0)]);
    }

    #[tokio::test]
    async fn approving_requires_a_submitted_milestone() {
        let gateway = Arc::new(MockGateway::with_grant(open_grant()));
        let reader = Arc::new(NullChainReader::new());
        let client = client(Arc::clone(&gateway), reader);

        let result = client.approve_milestone(0, 0).await;
        assert!(matches!(
            result,
            Err(GrantError::MilestoneNotSubmitted {
                index: 0,
                status: MilestoneStatus::Pending
            })
        ));

        client.approve_milestone(0, 1).await.unwrap();
        assert_eq!(*gateway.approvals.lock().unwrap(), vec![(0, 1)]);
    }

    #[tokio::test]
    async fn out_of_range_milestone_is_reported_with_the_count() {
        let gateway = Arc::new(MockGateway::with_grant(open_grant()));
        let reader = Arc::new(NullChainReader::new());
        let client = client(Arc::clone(&gateway), reader);

        let result = client.submit_milestone(0, 5).await;
        assert!(matches!(
            result,
            Err(GrantError::MilestoneOutOfRange { index: 5, count: 2 })
        ));
    }

    #[tokio::test]
    async fn grants_lists_everything_in_order() {
        let gateway = Arc::new(MockGateway::with_grant(open_grant()));
        {
            let mut second = open_grant();
            second.id = 1;
            second.title = "School roofs".into();
            gateway.grants.lock().unwrap().push(second);
        }
        let reader = Arc::new(NullChainReader::new());
        let client = client(Arc::clone(&gateway), reader);

        let grants = client.grants().await.unwrap();
        assert_eq!(grants.len(), 2);
        assert_eq!(grants[0].title, "Clean water wells");
        assert_eq!(grants[1].title, "School roofs");
    }
}
