use alloy_primitives::Address;
use thiserror::Error;

/// Synchronous rejections from starting a verification.
///
/// Anything that happens after the start is accepted lands in the request
/// record instead of being returned to the caller.
#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("a verification is already in flight for {0}")]
    ConflictingRequest(Address),

    #[error("connection is not on chain {expected}: {detail}")]
    NetworkMismatch { expected: u64, detail: String },
}
