//! Fetching of historical storage values and account/storage proofs over
//! Ethereum JSON-RPC.

use crate::{
    errors::{ProofError, ProofResult},
    types::StateProof,
};
use alloy_eips::{BlockId, BlockNumberOrTag};
use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_provider::{Provider, ReqwestProvider};
use alloy_transport::{RpcError, TransportErrorKind};
use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use tracing::{trace, warn};

/// Interface for reading storage and fetching Merkle-Patricia proofs at a
/// fixed historical block.
///
/// Every method takes an explicit block number; implementations must pin the
/// upstream query to exactly that block and must never fall back to a
/// different one on failure.
#[async_trait]
pub trait ProofFetcher {
    /// Returns the raw 32-byte word stored at `slot` of `address` at the
    /// given block.
    async fn storage_at(&self, block: u64, address: Address, slot: B256) -> ProofResult<B256>;

    /// Fetches the account witness for `address` and one storage proof per
    /// entry of `slots`, all rooted in the given block's state root.
    ///
    /// The returned [StateProof] preserves the node order of the RPC
    /// response and aligns its storage proofs positionally with `slots`.
    async fn proofs(&self, block: u64, address: Address, slots: &[B256])
        -> ProofResult<StateProof>;
}

/// A [ProofFetcher] backed by an alloy [ReqwestProvider].
///
/// Transport-level failures are retried in place with exponential backoff up
/// to the configured budget; node-level error responses are surfaced
/// immediately, since retrying a node that has pruned the requested state
/// cannot succeed.
#[derive(Debug, Clone)]
pub struct AlloyProofFetcher {
    /// The inner L2 JSON-RPC provider.
    inner: ReqwestProvider,
    /// Retry budget for transport-level failures.
    max_retries: usize,
}

impl AlloyProofFetcher {
    /// Creates a new fetcher over the given provider.
    pub const fn new(inner: ReqwestProvider, max_retries: usize) -> Self {
        Self { inner, max_retries }
    }

    /// Creates a new fetcher from the provided URL.
    pub fn new_http(url: reqwest::Url, max_retries: usize) -> Self {
        Self::new(ReqwestProvider::new_http(url), max_retries)
    }

    /// Runs `op` with the configured transport-retry policy.
    async fn with_retries<T, F, Fut>(&self, op: F) -> ProofResult<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = ProofResult<T>>,
    {
        op.retry(ExponentialBuilder::default().with_max_times(self.max_retries))
            .when(|err| matches!(err, ProofError::Transport(_)))
            .notify(|err, after| {
                warn!(target: "proof_fetcher", "retrying in {after:?} after transport failure: {err}");
            })
            .await
    }
}

/// Classifies an RPC failure for a query pinned to `block`.
///
/// A JSON-RPC error response means the node processed the request and
/// refused it (for a fixed historical block, almost always pruned state); it
/// is reported as a node error and never retried. Everything else is a
/// transport problem and safe to retry.
fn classify(err: RpcError<TransportErrorKind>, block: u64) -> ProofError {
    match err {
        RpcError::ErrorResp(payload) => {
            ProofError::Node { block, message: payload.message.to_string() }
        }
        other => ProofError::Transport(other.to_string()),
    }
}

#[async_trait]
impl ProofFetcher for AlloyProofFetcher {
    async fn storage_at(&self, block: u64, address: Address, slot: B256) -> ProofResult<B256> {
        trace!(target: "proof_fetcher", block, %address, %slot, "eth_getStorageAt");
        let word = self
            .with_retries(|| async {
                self.inner
                    .get_storage_at(address, U256::from_be_bytes(slot.0))
                    .block_id(BlockId::Number(BlockNumberOrTag::Number(block)))
                    .await
                    .map_err(|e| classify(e, block))
            })
            .await?;
        Ok(B256::from(word))
    }

    async fn proofs(
        &self,
        block: u64,
        address: Address,
        slots: &[B256],
    ) -> ProofResult<StateProof> {
        trace!(target: "proof_fetcher", block, %address, slots = slots.len(), "eth_getProof");
        let response = self
            .with_retries(|| async {
                self.inner
                    .get_proof(address, slots.to_vec())
                    .block_id(BlockId::Number(BlockNumberOrTag::Number(block)))
                    .await
                    .map_err(|e| classify(e, block))
            })
            .await?;

        if response.storage_proof.len() != slots.len() {
            return Err(ProofError::ProofUnavailable {
                expected: slots.len(),
                actual: response.storage_proof.len(),
            });
        }

        // Node order is preserved exactly as returned; the verifier walks
        // these lists positionally.
        let state_trie_witness = Bytes::from(alloy_rlp::encode(&response.account_proof));
        let storage_proofs = response
            .storage_proof
            .into_iter()
            .map(|slot_proof| Bytes::from(alloy_rlp::encode(&slot_proof.proof)))
            .collect();

        Ok(StateProof { state_trie_witness, storage_proofs })
    }
}
