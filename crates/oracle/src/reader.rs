//! Read-only access to the output oracle contract over Ethereum JSON-RPC.

use crate::{
    bindings::ICheckpointOracle,
    errors::OracleError,
    types::Checkpoint,
};
use alloy_primitives::{Address, Bytes, TxKind, U256};
use alloy_provider::{Provider, ReqwestProvider};
use alloy_rpc_types::{TransactionInput, TransactionRequest};
use alloy_sol_types::SolCall;
use alloy_transport::{RpcError, TransportErrorKind};
use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use tracing::{trace, warn};

/// Interface for reading the output oracle's checkpoint history.
///
/// Implementations must not cache across calls: checkpoints accrue over
/// time, and a stale count would make the resolver hand out finality it
/// cannot back.
#[async_trait]
pub trait CheckpointReader {
    /// Returns the total number of checkpoints submitted to the oracle.
    async fn checkpoint_count(&self) -> Result<u64, OracleError>;

    /// Returns the checkpoint record at `index`.
    async fn checkpoint_at(&self, index: u64) -> Result<Checkpoint, OracleError>;
}

/// A [CheckpointReader] issuing `eth_call`s against the oracle contract
/// through an alloy [ReqwestProvider].
#[derive(Debug, Clone)]
pub struct AlloyCheckpointReader {
    /// The inner L1 JSON-RPC provider.
    inner: ReqwestProvider,
    /// The oracle contract address.
    address: Address,
    /// Retry budget for transport-level failures.
    max_retries: usize,
}

impl AlloyCheckpointReader {
    /// Creates a new reader for the oracle at `address`.
    pub const fn new(inner: ReqwestProvider, address: Address, max_retries: usize) -> Self {
        Self { inner, address, max_retries }
    }

    /// Creates a new reader from the provided URL.
    pub fn new_http(url: reqwest::Url, address: Address, max_retries: usize) -> Self {
        Self::new(ReqwestProvider::new_http(url), address, max_retries)
    }

    /// Issues a read-only call with the given calldata, retrying
    /// transport-level failures with exponential backoff.
    async fn call(&self, calldata: Bytes) -> Result<Bytes, OracleError> {
        let run = || async {
            let tx = TransactionRequest {
                to: Some(TxKind::Call(self.address)),
                input: TransactionInput::new(calldata.clone()),
                ..Default::default()
            };
            self.inner.call(&tx).await.map_err(classify)
        };
        run.retry(ExponentialBuilder::default().with_max_times(self.max_retries))
            .when(|err| matches!(err, OracleError::Transport(_)))
            .notify(|err, after| {
                warn!(target: "oracle_reader", "retrying in {after:?} after transport failure: {err}");
            })
            .await
    }
}

/// Classifies an `eth_call` failure.
///
/// An error response means the node executed the call and it failed (revert
/// or rejection); everything else is transport and safe to retry.
fn classify(err: RpcError<TransportErrorKind>) -> OracleError {
    match err {
        RpcError::ErrorResp(payload) => OracleError::Call(payload.message.to_string()),
        other => OracleError::Transport(other.to_string()),
    }
}

/// Narrows a `uint256` block value into the `u64` domain.
fn block_u64(value: U256) -> Result<u64, OracleError> {
    u64::try_from(value).map_err(|_| OracleError::BlockOutOfRange)
}

#[async_trait]
impl CheckpointReader for AlloyCheckpointReader {
    async fn checkpoint_count(&self) -> Result<u64, OracleError> {
        trace!(target: "oracle_reader", oracle = %self.address, "checkpointCount");
        let calldata = ICheckpointOracle::checkpointCountCall {}.abi_encode();
        let output = self.call(calldata.into()).await?;
        let ret = ICheckpointOracle::checkpointCountCall::abi_decode_returns(&output, true)
            .map_err(|e| OracleError::Decode(e.to_string()))?;
        block_u64(ret.count)
    }

    async fn checkpoint_at(&self, index: u64) -> Result<Checkpoint, OracleError> {
        trace!(target: "oracle_reader", oracle = %self.address, index, "checkpointAt");
        let calldata =
            ICheckpointOracle::checkpointAtCall { index: U256::from(index) }.abi_encode();
        let output = self.call(calldata.into()).await?;
        let ret = ICheckpointOracle::checkpointAtCall::abi_decode_returns(&output, true)
            .map_err(|e| OracleError::Decode(e.to_string()))?;
        Ok(Checkpoint {
            output_root: ret.outputRoot,
            l2_block_number: block_u64(ret.l2BlockNumber)?,
            l1_submission_block: block_u64(ret.l1SubmissionBlock)?,
        })
    }
}
