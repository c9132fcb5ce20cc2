//! Grant lifecycle rules for AccessChain.
//!
//! An authorized NGO publishes a grant split into milestones; verified
//! recipients apply; the NGO approves one application and then releases
//! funding milestone by milestone as work is submitted and reviewed.
//!
//! This crate owns the rules around that flow: milestone plans must sum to
//! the grant total, applications are gated on a completed verification, and
//! milestone actions must respect the milestone's current state. The actual
//! transactions go through the [`gateway`] traits, implemented against a
//! real chain in `accesschain-chain`.

pub mod client;
pub mod error;
pub mod gateway;
pub mod ngo;
pub mod plan;

pub use client::GrantClient;
pub use error::GrantError;
pub use gateway::{GrantGateway, NgoGateway};
pub use ngo::NgoClient;
pub use plan::{GrantPlan, MilestoneInput};
