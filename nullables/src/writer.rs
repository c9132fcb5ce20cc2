//! Nullable chain writer: records submissions instead of sending them.

use accesschain_types::{ChainError, ChainWriter, EmittedLog, RequestId, TxOutcome};
use alloy_primitives::{Address, Bytes, B256};
use async_trait::async_trait;
use std::collections::VecDeque;
use tokio::sync::Mutex;

/// A test writer that records every submission and replays scripted
/// outcomes.
///
/// `ensure_chain` succeeds unless an error was injected with
/// [`reject_chain`](Self::reject_chain). Submissions pop outcomes in
/// script order; an unscripted submission fails, which keeps a test from
/// silently succeeding on a call it never arranged for.
pub struct NullChainWriter {
    inner: Mutex<WriterState>,
}

#[derive(Default)]
struct WriterState {
    chain_error: Option<ChainError>,
    outcomes: VecDeque<Result<TxOutcome, ChainError>>,
    submissions: Vec<(Address, Bytes)>,
    ensure_chain_calls: u32,
}

impl NullChainWriter {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(WriterState::default()),
        }
    }

    /// Make every `ensure_chain` call fail with `error`.
    pub async fn reject_chain(&self, error: ChainError) {
        self.inner.lock().await.chain_error = Some(error);
    }

    /// Queue the outcome for the next submission.
    pub async fn push_outcome(&self, outcome: Result<TxOutcome, ChainError>) {
        self.inner.lock().await.outcomes.push_back(outcome);
    }

    /// Every `(subject, aux_data)` pair submitted so far.
    pub async fn submissions(&self) -> Vec<(Address, Bytes)> {
        self.inner.lock().await.submissions.clone()
    }

    /// How many times the network precondition was checked.
    pub async fn ensure_chain_calls(&self) -> u32 {
        self.inner.lock().await.ensure_chain_calls
    }

    /// A confirmed outcome whose single log yields `request_id` when
    /// scanned for events from `verifier`.
    pub fn outcome_with_request(verifier: Address, request_id: RequestId) -> TxOutcome {
        TxOutcome {
            tx_hash: B256::repeat_byte(0xfe),
            logs: vec![EmittedLog {
                address: verifier,
                topics: vec![B256::repeat_byte(0x01), *request_id.as_b256()],
                data: Bytes::new(),
            }],
        }
    }
}

impl Default for NullChainWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChainWriter for NullChainWriter {
    async fn ensure_chain(&self, _chain_id: u64) -> Result<(), ChainError> {
        let mut state = self.inner.lock().await;
        state.ensure_chain_calls += 1;
        match &state.chain_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    async fn request_verification(
        &self,
        subject: Address,
        aux_data: Bytes,
    ) -> Result<TxOutcome, ChainError> {
        let mut state = self.inner.lock().await;
        state.submissions.push((subject, aux_data));
        state
            .outcomes
            .pop_front()
            .unwrap_or_else(|| Err(ChainError::Rpc("no scripted outcome".into())))
    }
}
