//! Fundamental types for AccessChain.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! request identifiers, attestations, grant and NGO records, the chain access traits,
//! and the common error type.

pub mod attestation;
pub mod chain;
pub mod error;
pub mod grant;
pub mod ngo;
pub mod request;

pub use attestation::Attestation;
pub use chain::{ChainReader, ChainWriter, EmittedLog, RequestStatus, TxOutcome};
pub use error::ChainError;
pub use grant::{Application, ApplicationStatus, Grant, GrantStatus, Milestone, MilestoneStatus};
pub use ngo::NgoProfile;
pub use request::RequestId;
