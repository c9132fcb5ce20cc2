//! Attestation payloads stored by the verifier contract.

use alloy_primitives::Bytes;
use serde::{Deserialize, Serialize};

/// The opaque attestation payload the verifier stores for a verified subject.
///
/// The payload is produced off-chain by the attestation platform and written
/// by the verifier once a request completes with a positive result. Its
/// internal structure belongs to the platform; clients treat it as bytes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attestation {
    pub payload: Bytes,
}

impl Attestation {
    pub fn new(payload: Bytes) -> Self {
        Self { payload }
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}
