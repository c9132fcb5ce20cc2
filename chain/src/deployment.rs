//! Per-network contract deployment addresses.

use accesschain_types::ChainError;
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// Where the three AccessChain contracts live on the target network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractAddresses {
    /// KRNL verifier contract.
    pub verifier: Address,
    /// Grant registry contract.
    pub access_grant: Address,
    /// NGO access-control contract.
    pub ngo_access_control: Address,
}

impl ContractAddresses {
    /// Reject placeholder zero addresses before any call is attempted.
    pub fn validate(&self) -> Result<(), ChainError> {
        for (name, address) in [
            ("verifier", self.verifier),
            ("access_grant", self.access_grant),
            ("ngo_access_control", self.ngo_access_control),
        ] {
            if address == Address::ZERO {
                return Err(ChainError::Config(format!(
                    "contract address {name} is unset"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addresses() -> ContractAddresses {
        ContractAddresses {
            verifier: Address::repeat_byte(0x11),
            access_grant: Address::repeat_byte(0x22),
            ngo_access_control: Address::repeat_byte(0x33),
        }
    }

    #[test]
    fn complete_addresses_validate() {
        assert!(addresses().validate().is_ok());
    }

    #[test]
    fn a_zero_address_is_named_in_the_error() {
        let mut incomplete = addresses();
        incomplete.access_grant = Address::ZERO;
        match incomplete.validate() {
            Err(ChainError::Config(message)) => assert!(message.contains("access_grant")),
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn addresses_parse_from_toml() {
        let parsed: ContractAddresses = toml::from_str(
            r#"
            verifier = "0x1111111111111111111111111111111111111111"
            access_grant = "0x2222222222222222222222222222222222222222"
            ngo_access_control = "0x3333333333333333333333333333333333333333"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.verifier, Address::repeat_byte(0x11));
    }
}
