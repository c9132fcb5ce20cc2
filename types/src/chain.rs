//! Chain access traits.
//!
//! The verification coordinator and the grant clients talk to the chain
//! through these seams. The `accesschain-chain` crate implements them
//! against a real Ethereum endpoint; `accesschain-nullables` provides
//! scripted in-memory implementations for tests.

use crate::attestation::Attestation;
use crate::error::ChainError;
use crate::request::RequestId;
use alloy_primitives::{Address, Bytes, B256};
use async_trait::async_trait;

/// Completion flags reported by the verifier for a pending request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestStatus {
    /// Whether the external attestation flow has finished.
    pub completed: bool,
    /// The result; meaningful only once `completed` is true.
    pub verified: bool,
}

impl RequestStatus {
    pub const PENDING: Self = Self {
        completed: false,
        verified: false,
    };

    pub fn completed(verified: bool) -> Self {
        Self {
            completed: true,
            verified,
        }
    }
}

/// A log entry emitted by a confirmed transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmittedLog {
    /// Contract that emitted the log.
    pub address: Address,
    /// Topic list; index 0 is the event signature, indexed parameters follow.
    pub topics: Vec<B256>,
    /// Non-indexed payload.
    pub data: Bytes,
}

impl EmittedLog {
    /// First indexed parameter, the topic after the event signature.
    pub fn first_indexed_topic(&self) -> Option<B256> {
        self.topics.get(1).copied()
    }
}

/// Confirmed transaction outcome handed back by a [`ChainWriter`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxOutcome {
    pub tx_hash: B256,
    pub logs: Vec<EmittedLog>,
}

impl TxOutcome {
    /// Extract the request identifier from the logs: the first indexed
    /// topic of the first log emitted by `verifier`.
    pub fn request_id_from(&self, verifier: Address) -> Option<RequestId> {
        self.logs
            .iter()
            .filter(|log| log.address == verifier)
            .find_map(|log| log.first_indexed_topic())
            .map(RequestId::new)
    }
}

/// Read-only queries against the verifier contract.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Whether the subject already holds a stored verification flag.
    async fn is_verified(&self, subject: Address) -> Result<bool, ChainError>;

    /// Stored attestation payload for a verified subject.
    async fn verification_data(&self, subject: Address) -> Result<Attestation, ChainError>;

    /// Completion flags for a pending request.
    async fn verification_status(&self, request_id: RequestId)
        -> Result<RequestStatus, ChainError>;
}

/// Transaction submission and network control.
#[async_trait]
pub trait ChainWriter: Send + Sync {
    /// Ensure the connection targets `chain_id`, switching or adding the
    /// network where the endpoint supports it.
    async fn ensure_chain(&self, chain_id: u64) -> Result<(), ChainError>;

    /// Simulate, submit, and confirm a verification request transaction
    /// for `subject`, returning the confirmed outcome.
    async fn request_verification(
        &self,
        subject: Address,
        aux_data: Bytes,
    ) -> Result<TxOutcome, ChainError>;
}
