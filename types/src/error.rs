//! Common error type for chain access.

use thiserror::Error;

/// Errors surfaced by readers and writers talking to an Ethereum endpoint.
///
/// `Clone` and `PartialEq` are derived so scripted test doubles can replay
/// errors and tests can assert on them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    /// Transport or node failure while talking to the endpoint.
    #[error("rpc error: {0}")]
    Rpc(String),

    /// A simulated or submitted call reverted.
    #[error("contract call reverted: {0}")]
    Reverted(String),

    /// The endpoint reports a different chain than the one required.
    #[error("connected to chain {actual}, expected {expected}")]
    WrongChain { expected: u64, actual: u64 },

    /// The endpoint does not support a required wallet method.
    #[error("endpoint does not support {method}")]
    UnsupportedMethod { method: &'static str },

    /// A response could not be decoded into the expected shape.
    #[error("malformed response: {0}")]
    Decode(String),

    /// Missing or invalid local configuration.
    #[error("configuration error: {0}")]
    Config(String),
}
