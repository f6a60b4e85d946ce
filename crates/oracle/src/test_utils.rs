//! Test utilities for oracle reads.

use crate::{errors::OracleError, reader::CheckpointReader, types::Checkpoint};
use async_trait::async_trait;

/// A [CheckpointReader] over a fixed in-memory checkpoint history.
#[derive(Debug, Clone, Default)]
pub(crate) struct MockCheckpointReader {
    /// The checkpoint history, oldest first.
    pub(crate) checkpoints: Vec<Checkpoint>,
}

impl MockCheckpointReader {
    /// Creates a mock over the given history.
    pub(crate) const fn new(checkpoints: Vec<Checkpoint>) -> Self {
        Self { checkpoints }
    }
}

#[async_trait]
impl CheckpointReader for MockCheckpointReader {
    async fn checkpoint_count(&self) -> Result<u64, OracleError> {
        Ok(self.checkpoints.len() as u64)
    }

    async fn checkpoint_at(&self, index: u64) -> Result<Checkpoint, OracleError> {
        self.checkpoints
            .get(index as usize)
            .copied()
            .ok_or_else(|| OracleError::Call(format!("checkpoint index {index} out of bounds")))
    }
}
