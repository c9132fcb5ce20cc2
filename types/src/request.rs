//! Verification request identifiers.

use alloy_primitives::{hex, B256};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 32-byte request identifier assigned by the verifier contract.
///
/// The identifier is extracted from the first indexed topic of the
/// `VerificationRequested` event and is the key for all subsequent
/// status polls.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(B256);

impl RequestId {
    pub const ZERO: Self = Self(B256::ZERO);

    pub fn new(id: B256) -> Self {
        Self(id)
    }

    pub fn as_b256(&self) -> &B256 {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == B256::ZERO
    }
}

impl fmt::Debug for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RequestId({})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<B256> for RequestId {
    fn from(id: B256) -> Self {
        Self(id)
    }
}

impl FromStr for RequestId {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}
