//! Error types for the `spyglass-oracle` crate.

use thiserror::Error;

/// An error produced while reading the output oracle contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    /// The L1 node could not be reached or timed out. Retried internally
    /// with backoff; surfaced once the retry budget is exhausted.
    #[error("transport failure talking to the L1 node: {0}")]
    Transport(String),
    /// The oracle call was executed and failed (revert or node-level
    /// rejection).
    #[error("oracle call failed: {0}")]
    Call(String),
    /// The oracle's return data did not decode against the expected ABI.
    #[error("failed to decode oracle return data: {0}")]
    Decode(String),
    /// The oracle reported a block number outside the `u64` range.
    #[error("oracle returned a block number outside the u64 range")]
    BlockOutOfRange,
}

/// An error produced while resolving a provable block.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FinalityError {
    /// No checkpoint has been submitted at or before the safe L1 height.
    /// Retryable by the client once L1 progresses past the delay window.
    #[error("no checkpoint submitted at or before safe L1 height {safe_l1}")]
    NotYetFinalized {
        /// The L1 height checkpoints must have been submitted by.
        safe_l1: u64,
    },
    /// The underlying oracle read failed.
    #[error(transparent)]
    Oracle(#[from] OracleError),
}
