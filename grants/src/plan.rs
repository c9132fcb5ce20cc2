//! Grant creation plans and their validation.

use crate::error::GrantError;
use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

/// A milestone as entered when drafting a grant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneInput {
    pub description: String,
    /// Tranche size in wei.
    pub amount: U256,
}

/// A grant ready to be submitted, before it exists on chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantPlan {
    pub title: String,
    pub description: String,
    /// Total funding in wei.
    pub total_amount: U256,
    pub milestones: Vec<MilestoneInput>,
}

impl GrantPlan {
    /// Sum of the milestone amounts, or `None` on overflow.
    pub fn milestone_sum(&self) -> Option<U256> {
        self.milestones
            .iter()
            .try_fold(U256::ZERO, |sum, milestone| {
                sum.checked_add(milestone.amount)
            })
    }

    /// Validate the plan before submission.
    ///
    /// Text fields must be non-blank, there must be at least one milestone,
    /// every milestone carries a nonzero amount, and the amounts sum exactly
    /// to the grant total. The contract enforces the same rules; validating
    /// here turns a gas-wasting revert into an immediate error.
    pub fn validate(&self) -> Result<(), GrantError> {
        if self.title.trim().is_empty() {
            return Err(GrantError::EmptyField("title"));
        }
        if self.description.trim().is_empty() {
            return Err(GrantError::EmptyField("description"));
        }
        if self.milestones.is_empty() {
            return Err(GrantError::NoMilestones);
        }
        if self.total_amount.is_zero() {
            return Err(GrantError::ZeroTotal);
        }

        for (index, milestone) in self.milestones.iter().enumerate() {
            if milestone.description.trim().is_empty() {
                return Err(GrantError::EmptyMilestoneDescription { index });
            }
            if milestone.amount.is_zero() {
                return Err(GrantError::ZeroMilestoneAmount { index });
            }
        }

        let sum = self.milestone_sum().ok_or(GrantError::AmountOverflow)?;
        if sum != self.total_amount {
            return Err(GrantError::MilestoneSumMismatch {
                expected: self.total_amount,
                actual: sum,
            });
        }

        Ok(())
    }
}
