//! Resolution of the most recent provably finalized L2 block.

use crate::{
    errors::FinalityError,
    reader::CheckpointReader,
    types::ProvableBlock,
};
use tracing::debug;

/// Computes the highest L2 block number that is both checkpoint-anchored and
/// safe to serve under the configured delay.
///
/// The delay, measured in L1 blocks, guards against the race between
/// checkpoint submission landing on L1 and proof construction here: a proof
/// is only served against a checkpoint the verifier is guaranteed to find
/// once the client replays the callback.
#[derive(Debug, Clone)]
pub struct FinalityResolver<C> {
    /// The oracle read adapter.
    oracle: C,
    /// Safety delay in L1 blocks.
    delay: u64,
}

impl<C> FinalityResolver<C>
where
    C: CheckpointReader + Send + Sync,
{
    /// Creates a new resolver with the given safety delay.
    pub const fn new(oracle: C, delay: u64) -> Self {
        Self { oracle, delay }
    }

    /// Returns the newest checkpointed L2 block whose checkpoint was
    /// submitted at or before `l1_head - delay`.
    ///
    /// Fails with [FinalityError::NotYetFinalized] when the oracle is empty
    /// or every checkpoint is too recent; both are retryable conditions
    /// that resolve themselves as L1 progresses.
    pub async fn resolve_provable_block(&self, l1_head: u64) -> Result<ProvableBlock, FinalityError> {
        let safe_l1 = l1_head.saturating_sub(self.delay);

        let count = self.oracle.checkpoint_count().await?;
        let Some(latest) = count.checked_sub(1) else {
            return Err(FinalityError::NotYetFinalized { safe_l1 });
        };

        let newest = self.oracle.checkpoint_at(latest).await?;
        if newest.l1_submission_block <= safe_l1 {
            debug!(target: "finality", l2_block = newest.l2_block_number, index = latest, safe_l1, "latest checkpoint is safe");
            return Ok(ProvableBlock { number: newest.l2_block_number, checkpoint_index: latest });
        }

        // Submission heights grow with the index, so binary-search the
        // prefix `[0, latest)` for the highest checkpoint submitted at or
        // before the safe height.
        let mut lo = 0_u64;
        let mut hi = latest;
        let mut best = None;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let checkpoint = self.oracle.checkpoint_at(mid).await?;
            if checkpoint.l1_submission_block <= safe_l1 {
                best = Some((mid, checkpoint));
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }

        match best {
            Some((index, checkpoint)) => {
                debug!(target: "finality", l2_block = checkpoint.l2_block_number, index, safe_l1, "walked back to safe checkpoint");
                Ok(ProvableBlock { number: checkpoint.l2_block_number, checkpoint_index: index })
            }
            None => Err(FinalityError::NotYetFinalized { safe_l1 }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{test_utils::MockCheckpointReader, types::Checkpoint};
    use alloy_primitives::B256;

    fn checkpoint(l2_block_number: u64, l1_submission_block: u64) -> Checkpoint {
        Checkpoint { output_root: B256::ZERO, l2_block_number, l1_submission_block }
    }

    #[tokio::test]
    async fn zero_delay_serves_the_latest_checkpoint() {
        let oracle = MockCheckpointReader::new(vec![checkpoint(1000, 500)]);
        let resolver = FinalityResolver::new(oracle, 0);
        let block = resolver.resolve_provable_block(510).await.unwrap();
        assert_eq!(block, ProvableBlock { number: 1000, checkpoint_index: 0 });
    }

    #[tokio::test]
    async fn delay_past_the_only_checkpoint_is_not_yet_finalized() {
        // Safe height 510 - 20 = 490 precedes the only submission at 500.
        let oracle = MockCheckpointReader::new(vec![checkpoint(1000, 500)]);
        let resolver = FinalityResolver::new(oracle, 20);
        let err = resolver.resolve_provable_block(510).await.unwrap_err();
        assert_eq!(err, FinalityError::NotYetFinalized { safe_l1: 490 });
    }

    #[tokio::test]
    async fn delay_walks_back_to_an_older_checkpoint() {
        let oracle = MockCheckpointReader::new(vec![
            checkpoint(800, 400),
            checkpoint(900, 450),
            checkpoint(1000, 500),
        ]);
        let resolver = FinalityResolver::new(oracle, 20);
        // Safe height 490: the checkpoint submitted at 450 is the newest fit.
        let block = resolver.resolve_provable_block(510).await.unwrap();
        assert_eq!(block, ProvableBlock { number: 900, checkpoint_index: 1 });
    }

    #[tokio::test]
    async fn empty_oracle_is_not_yet_finalized() {
        let oracle = MockCheckpointReader::new(vec![]);
        let resolver = FinalityResolver::new(oracle, 5);
        let err = resolver.resolve_provable_block(100).await.unwrap_err();
        assert_eq!(err, FinalityError::NotYetFinalized { safe_l1: 95 });
    }

    #[tokio::test]
    async fn small_head_does_not_underflow() {
        let oracle = MockCheckpointReader::new(vec![checkpoint(10, 3)]);
        let resolver = FinalityResolver::new(oracle, 100);
        let err = resolver.resolve_provable_block(50).await.unwrap_err();
        assert_eq!(err, FinalityError::NotYetFinalized { safe_l1: 0 });
    }

    #[tokio::test]
    async fn resolved_block_is_monotone_in_l1_head() {
        let history = vec![
            checkpoint(100, 10),
            checkpoint(200, 20),
            checkpoint(300, 30),
            checkpoint(400, 40),
            checkpoint(500, 50),
        ];
        let resolver = FinalityResolver::new(MockCheckpointReader::new(history), 5);

        let mut last = 0;
        for l1_head in 15..=60 {
            if let Ok(block) = resolver.resolve_provable_block(l1_head).await {
                assert!(block.number >= last, "resolved block regressed at head {l1_head}");
                last = block.number;
            }
        }
        assert_eq!(last, 500);
    }

    #[tokio::test]
    async fn exact_boundary_is_inclusive() {
        // Submission at exactly the safe height qualifies.
        let oracle = MockCheckpointReader::new(vec![checkpoint(1000, 490)]);
        let resolver = FinalityResolver::new(oracle, 20);
        let block = resolver.resolve_provable_block(510).await.unwrap();
        assert_eq!(block.number, 1000);
    }
}
