//! Identity verification for AccessChain.
//!
//! Grant applications are gated on a third-party attestation recorded by the
//! KRNL verifier contract. This crate owns the client side of that flow:
//!
//! 1. **Check**: read the durable `isVerified` flag; a verified subject
//!    needs nothing else.
//! 2. **Request**: submit a `requestVerification` transaction and recover
//!    the request identifier from the confirmed receipt's logs.
//! 3. **Poll**: query `getVerificationStatus` on an interval until the
//!    attestation completes, the attempt ceiling is reached, or the
//!    request is cancelled.
//!
//! The [`VerificationCoordinator`] runs one lifecycle per subject address,
//! rejects overlapping starts, and broadcasts every transition so callers
//! can follow along without polling the coordinator themselves.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod events;
pub mod state;

pub use config::CoordinatorConfig;
pub use coordinator::VerificationCoordinator;
pub use error::VerificationError;
pub use events::VerificationEvent;
pub use state::{VerificationRequest, VerificationStatus};
