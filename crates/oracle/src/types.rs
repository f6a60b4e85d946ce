//! Checkpoint and finality types.

use alloy_primitives::B256;

/// One record of the output oracle: an L2 output commitment and the L1 block
/// at which it was submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    /// The committed L2 output root.
    pub output_root: B256,
    /// The L2 block the output root commits to.
    pub l2_block_number: u64,
    /// The L1 block at which the checkpoint was submitted.
    pub l1_submission_block: u64,
}

/// An L2 block the resolver asserts is verifiable on L1 at request time.
///
/// The oracle's checkpoint for this block was included in L1 state at least
/// a full safety delay before the current L1 head, so a verifier contract
/// processing the proof is guaranteed to find it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProvableBlock {
    /// The L2 block number all proofs in the response are rooted in.
    pub number: u64,
    /// The oracle index of the checkpoint covering this block.
    pub checkpoint_index: u64,
}
