//! Grant, milestone, and application records.

use crate::error::ChainError;
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a grant.
///
/// Stored on-chain as a `uint8`; `from_raw`/`as_raw` define the mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GrantStatus {
    /// Accepting applications.
    Open,
    /// An applicant was approved; milestones are being worked.
    InProgress,
    /// Every milestone was approved and paid out.
    Completed,
    /// Withdrawn by the NGO before completion.
    Cancelled,
}

impl GrantStatus {
    pub fn from_raw(raw: u8) -> Result<Self, ChainError> {
        match raw {
            0 => Ok(Self::Open),
            1 => Ok(Self::InProgress),
            2 => Ok(Self::Completed),
            3 => Ok(Self::Cancelled),
            other => Err(ChainError::Decode(format!("unknown grant status {other}"))),
        }
    }

    pub fn as_raw(&self) -> u8 {
        match self {
            Self::Open => 0,
            Self::InProgress => 1,
            Self::Completed => 2,
            Self::Cancelled => 3,
        }
    }

    /// Whether new applications are accepted.
    pub fn accepts_applications(&self) -> bool {
        matches!(self, Self::Open)
    }
}

impl fmt::Display for GrantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Open => "open",
            Self::InProgress => "in progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        };
        write!(f, "{text}")
    }
}

/// Lifecycle status of a single milestone within a grant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MilestoneStatus {
    /// Not yet submitted for review.
    Pending,
    /// Submitted by the recipient; awaiting NGO review.
    Submitted,
    /// Approved by the NGO; the tranche is released.
    Approved,
}

impl MilestoneStatus {
    pub fn from_raw(raw: u8) -> Result<Self, ChainError> {
        match raw {
            0 => Ok(Self::Pending),
            1 => Ok(Self::Submitted),
            2 => Ok(Self::Approved),
            other => Err(ChainError::Decode(format!("unknown milestone status {other}"))),
        }
    }

    pub fn as_raw(&self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Submitted => 1,
            Self::Approved => 2,
        }
    }

    /// Whether the recipient can still submit work for this milestone.
    pub fn accepts_submission(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl fmt::Display for MilestoneStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Pending => "pending",
            Self::Submitted => "submitted",
            Self::Approved => "approved",
        };
        write!(f, "{text}")
    }
}

/// Status of one application to a grant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub fn from_raw(raw: u8) -> Result<Self, ChainError> {
        match raw {
            0 => Ok(Self::Pending),
            1 => Ok(Self::Approved),
            2 => Ok(Self::Rejected),
            other => Err(ChainError::Decode(format!("unknown application status {other}"))),
        }
    }

    pub fn as_raw(&self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Approved => 1,
            Self::Rejected => 2,
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        };
        write!(f, "{text}")
    }
}

/// A funding tranche tied to a deliverable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub description: String,
    /// Tranche size in wei.
    pub amount: U256,
    pub status: MilestoneStatus,
}

/// A grant as read from the chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    pub id: u64,
    /// The NGO that created and funds the grant.
    pub ngo: Address,
    pub title: String,
    pub description: String,
    /// Total funding in wei; always the sum of the milestone amounts.
    pub total_amount: U256,
    pub status: GrantStatus,
    pub milestones: Vec<Milestone>,
}

/// One applicant's standing on a grant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub grant_id: u64,
    pub applicant: Address,
    pub status: ApplicationStatus,
}
