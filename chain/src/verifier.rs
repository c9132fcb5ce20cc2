//! Verifier contract gateway.

use crate::calls::{call_error, emitted_logs, ensure_success, rpc_error_code, transport_error};
use crate::contracts::KrnlVerifier;
use crate::network::NetworkDescriptor;
use accesschain_types::{
    Attestation, ChainError, ChainReader, ChainWriter, RequestId, RequestStatus, TxOutcome,
};
use alloy::providers::{DynProvider, Provider};
use alloy::transports::{RpcError, TransportErrorKind};
use alloy_primitives::{Address, Bytes};
use async_trait::async_trait;

/// EIP-3326 error: the wallet does not know the requested chain.
const UNRECOGNIZED_CHAIN: i64 = 4902;
/// JSON-RPC method-not-found; plain nodes have no wallet_* methods.
const METHOD_NOT_FOUND: i64 = -32601;

/// [`ChainReader`] and [`ChainWriter`] backed by the KRNL verifier contract.
pub struct EvmVerifier {
    contract: KrnlVerifier::KrnlVerifierInstance<DynProvider>,
    provider: DynProvider,
    network: NetworkDescriptor,
}

impl EvmVerifier {
    pub fn new(provider: DynProvider, verifier: Address, network: NetworkDescriptor) -> Self {
        Self {
            contract: KrnlVerifier::new(verifier, provider.clone()),
            provider,
            network,
        }
    }

    /// Address of the bound verifier contract.
    pub fn address(&self) -> Address {
        *self.contract.address()
    }

    async fn switch_chain(&self) -> Result<(), RpcError<TransportErrorKind>> {
        let params = vec![serde_json::json!({ "chainId": self.network.hex_chain_id() })];
        self.provider
            .raw_request::<_, serde_json::Value>("wallet_switchEthereumChain".into(), params)
            .await?;
        Ok(())
    }

    async fn add_chain(&self) -> Result<(), RpcError<TransportErrorKind>> {
        let params = vec![self.network.add_chain_params()];
        self.provider
            .raw_request::<_, serde_json::Value>("wallet_addEthereumChain".into(), params)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ChainReader for EvmVerifier {
    async fn is_verified(&self, subject: Address) -> Result<bool, ChainError> {
        self.contract
            .isVerified(subject)
            .call()
            .await
            .map_err(call_error)
    }

    async fn verification_data(&self, subject: Address) -> Result<Attestation, ChainError> {
        let payload = self
            .contract
            .getVerificationData(subject)
            .call()
            .await
            .map_err(call_error)?;
        Ok(Attestation::new(payload))
    }

    async fn verification_status(
        &self,
        request_id: RequestId,
    ) -> Result<RequestStatus, ChainError> {
        let status = self
            .contract
            .getVerificationStatus(*request_id.as_b256())
            .call()
            .await
            .map_err(call_error)?;
        Ok(RequestStatus {
            completed: status.completed,
            verified: status.verified,
        })
    }
}

#[async_trait]
impl ChainWriter for EvmVerifier {
    async fn ensure_chain(&self, chain_id: u64) -> Result<(), ChainError> {
        let actual = self
            .provider
            .get_chain_id()
            .await
            .map_err(transport_error)?;
        if actual == chain_id {
            return Ok(());
        }

        tracing::info!(expected = chain_id, actual, "wrong chain, attempting switch");
        match self.switch_chain().await {
            Ok(()) => {}
            Err(err) => match rpc_error_code(&err) {
                Some(UNRECOGNIZED_CHAIN) => {
                    tracing::info!(chain = %self.network.name, "adding network to wallet");
                    self.add_chain().await.map_err(transport_error)?;
                }
                Some(METHOD_NOT_FOUND) => {
                    return Err(ChainError::UnsupportedMethod {
                        method: "wallet_switchEthereumChain",
                    });
                }
                _ => return Err(transport_error(err)),
            },
        }

        let now = self
            .provider
            .get_chain_id()
            .await
            .map_err(transport_error)?;
        if now != chain_id {
            return Err(ChainError::WrongChain {
                expected: chain_id,
                actual: now,
            });
        }
        Ok(())
    }

    async fn request_verification(
        &self,
        subject: Address,
        aux_data: Bytes,
    ) -> Result<TxOutcome, ChainError> {
        let call = self.contract.requestVerification(subject, aux_data);

        // Simulate first so reverts surface with their reason instead of
        // burning gas.
        call.call().await.map_err(call_error)?;

        let pending = call.send().await.map_err(call_error)?;
        let receipt = pending
            .get_receipt()
            .await
            .map_err(|err| ChainError::Rpc(err.to_string()))?;
        ensure_success(&receipt)?;

        tracing::info!(
            %subject,
            tx = %receipt.transaction_hash,
            "verification request confirmed"
        );
        Ok(TxOutcome {
            tx_hash: receipt.transaction_hash,
            logs: emitted_logs(&receipt),
        })
    }
}
