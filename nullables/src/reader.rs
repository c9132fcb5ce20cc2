//! Nullable chain reader: scripted verifier queries, no network.

use accesschain_types::{Attestation, ChainError, ChainReader, RequestId, RequestStatus};
use alloy_primitives::Address;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use tokio::sync::Mutex;

/// A test reader that answers verifier queries from pre-loaded state.
///
/// Status polls replay a per-request script; once a script runs dry the
/// reader keeps answering "not completed", which is what a request that
/// never finishes looks like.
pub struct NullChainReader {
    inner: Mutex<ReaderState>,
}

#[derive(Default)]
struct ReaderState {
    verified: HashMap<Address, bool>,
    attestations: HashMap<Address, Attestation>,
    /// Errors returned by the next `is_verified` calls, in order.
    read_failures: VecDeque<ChainError>,
    status_scripts: HashMap<RequestId, VecDeque<Result<RequestStatus, ChainError>>>,
    status_calls: HashMap<RequestId, u32>,
    is_verified_calls: u32,
}

impl NullChainReader {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(ReaderState::default()),
        }
    }

    /// Set the durable verification flag for a subject.
    pub async fn set_verified(&self, subject: Address, verified: bool) {
        self.inner.lock().await.verified.insert(subject, verified);
    }

    /// Set the stored attestation payload for a subject.
    pub async fn set_attestation(&self, subject: Address, attestation: Attestation) {
        self.inner
            .lock()
            .await
            .attestations
            .insert(subject, attestation);
    }

    /// Fail the next `is_verified` call with `error`. Stackable.
    pub async fn push_read_failure(&self, error: ChainError) {
        self.inner.lock().await.read_failures.push_back(error);
    }

    /// Script the responses for status polls of `request_id`, in order.
    pub async fn script_status(
        &self,
        request_id: RequestId,
        steps: Vec<Result<RequestStatus, ChainError>>,
    ) {
        self.inner
            .lock()
            .await
            .status_scripts
            .insert(request_id, steps.into());
    }

    /// How many status polls `request_id` has received.
    pub async fn status_calls(&self, request_id: RequestId) -> u32 {
        self.inner
            .lock()
            .await
            .status_calls
            .get(&request_id)
            .copied()
            .unwrap_or(0)
    }

    /// How many `is_verified` reads happened.
    pub async fn is_verified_calls(&self) -> u32 {
        self.inner.lock().await.is_verified_calls
    }
}

impl Default for NullChainReader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChainReader for NullChainReader {
    async fn is_verified(&self, subject: Address) -> Result<bool, ChainError> {
        let mut state = self.inner.lock().await;
        state.is_verified_calls += 1;
        if let Some(err) = state.read_failures.pop_front() {
            return Err(err);
        }
        Ok(state.verified.get(&subject).copied().unwrap_or(false))
    }

    async fn verification_data(&self, subject: Address) -> Result<Attestation, ChainError> {
        let state = self.inner.lock().await;
        Ok(state
            .attestations
            .get(&subject)
            .cloned()
            .unwrap_or_default())
    }

    async fn verification_status(
        &self,
        request_id: RequestId,
    ) -> Result<RequestStatus, ChainError> {
        let mut state = self.inner.lock().await;
        *state.status_calls.entry(request_id).or_insert(0) += 1;
        match state
            .status_scripts
            .get_mut(&request_id)
            .and_then(|steps| steps.pop_front())
        {
            Some(step) => step,
            None => Ok(RequestStatus::PENDING),
        }
    }
}
