use accesschain_types::{ChainError, GrantStatus, MilestoneStatus};
use alloy_primitives::{Address, U256};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GrantError {
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("a grant needs at least one milestone")]
    NoMilestones,

    #[error("grant total must be nonzero")]
    ZeroTotal,

    #[error("milestone {index} has an empty description")]
    EmptyMilestoneDescription { index: usize },

    #[error("milestone {index} has a zero amount")]
    ZeroMilestoneAmount { index: usize },

    #[error("milestone amounts overflow")]
    AmountOverflow,

    #[error("milestone amounts sum to {actual}, expected grant total {expected}")]
    MilestoneSumMismatch { expected: U256, actual: U256 },

    #[error("applicant {0} has not completed verification")]
    ApplicantNotVerified(Address),

    #[error("grant {id} is {status}, not accepting applications")]
    GrantClosed { id: u64, status: GrantStatus },

    #[error("grant has {count} milestones, index {index} is out of range")]
    MilestoneOutOfRange { index: u64, count: usize },

    #[error("milestone {index} is {status}, it cannot be submitted")]
    MilestoneNotSubmittable { index: u64, status: MilestoneStatus },

    #[error("milestone {index} is {status}, only submitted milestones can be approved")]
    MilestoneNotSubmitted { index: u64, status: MilestoneStatus },

    #[error("NGO {0} is already registered")]
    NgoAlreadyRegistered(Address),

    #[error("NGO {0} is already authorized")]
    NgoAlreadyAuthorized(Address),

    #[error("NGO {0} is not registered")]
    NgoNotRegistered(Address),

    #[error("NGO {0} is not authorized")]
    NgoNotAuthorized(Address),

    #[error(transparent)]
    Chain(#[from] ChainError),
}
