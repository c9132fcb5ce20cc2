//! NGO registry records.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// An NGO's standing in the access-control registry.
///
/// Registration is self-service; authorization is granted by the registry
/// admin and is what actually permits creating grants.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NgoProfile {
    pub address: Address,
    pub name: String,
    pub registered: bool,
    pub authorized: bool,
}

impl NgoProfile {
    /// A profile for an address the registry has never seen.
    pub fn unknown(address: Address) -> Self {
        Self {
            address,
            name: String::new(),
            registered: false,
            authorized: false,
        }
    }

    /// Whether this NGO may create grants.
    pub fn can_create_grants(&self) -> bool {
        self.registered && self.authorized
    }
}
