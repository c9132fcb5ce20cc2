//! Ethereum access for AccessChain.
//!
//! Everything that touches a real endpoint lives here: network descriptors
//! for the supported test chains, typed contract bindings, and the gateway
//! implementations behind the `accesschain-types` traits. The rest of the
//! workspace stays transport-neutral and is tested against the nullables.

mod calls;
pub mod contracts;
pub mod deployment;
pub mod network;
pub mod provider;
pub mod registry;
pub mod verifier;

pub use alloy::providers::DynProvider;
pub use deployment::ContractAddresses;
pub use network::{NativeCurrency, NetworkDescriptor};
pub use provider::{connect, connect_with_signer};
pub use registry::{GrantRegistry, NgoRegistry};
pub use verifier::EvmVerifier;
