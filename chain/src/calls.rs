//! Shared plumbing for contract calls: fault mapping and receipt handling.

use accesschain_types::{ChainError, EmittedLog};
use alloy::rpc::types::TransactionReceipt;
use alloy::transports::{RpcError, TransportErrorKind};

/// Map a contract call failure, separating reverts from transport faults.
pub(crate) fn call_error(err: alloy::contract::Error) -> ChainError {
    classify_call_text(err.to_string())
}

fn classify_call_text(text: String) -> ChainError {
    if text.contains("revert") {
        ChainError::Reverted(text)
    } else {
        ChainError::Rpc(text)
    }
}

pub(crate) fn transport_error(err: RpcError<TransportErrorKind>) -> ChainError {
    ChainError::Rpc(err.to_string())
}

/// JSON-RPC error code carried by a response, if the failure was one.
pub(crate) fn rpc_error_code(err: &RpcError<TransportErrorKind>) -> Option<i64> {
    err.as_error_resp().map(|payload| payload.code)
}

/// A mined transaction can still have failed; check the receipt status.
pub(crate) fn ensure_success(receipt: &TransactionReceipt) -> Result<(), ChainError> {
    if receipt.status() {
        Ok(())
    } else {
        Err(ChainError::Reverted(format!(
            "transaction {} reverted",
            receipt.transaction_hash
        )))
    }
}

/// Convert receipt logs into the transport-neutral form the rest of the
/// workspace consumes.
pub(crate) fn emitted_logs(receipt: &TransactionReceipt) -> Vec<EmittedLog> {
    receipt
        .inner
        .logs()
        .iter()
        .map(|log| EmittedLog {
            address: log.inner.address,
            topics: log.inner.data.topics().to_vec(),
            data: log.inner.data.data.clone(),
        })
        .collect()
}
