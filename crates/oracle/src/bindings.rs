//! ABI bindings for the output oracle contract.

use alloy_sol_types::sol;

sol! {
    /// The read-only surface of the L1 output oracle consumed by the
    /// gateway. The contract itself is external; only this slice of its ABI
    /// is relied upon.
    interface ICheckpointOracle {
        /// Total number of checkpoints submitted to the oracle.
        function checkpointCount() external view returns (uint256 count);

        /// The checkpoint record at `index`. Submission heights are
        /// monotonically non-decreasing in the index.
        function checkpointAt(uint256 index)
            external
            view
            returns (bytes32 outputRoot, uint256 l2BlockNumber, uint256 l1SubmissionBlock);
    }
}
