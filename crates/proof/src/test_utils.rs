//! Test utilities for the proof-assembly pipeline.

use crate::{
    errors::{ProofError, ProofResult},
    fetcher::ProofFetcher,
    types::StateProof,
};
use alloy_primitives::{Address, Bytes, B256};
use async_trait::async_trait;
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};

/// A [ProofFetcher] over an in-memory storage map.
///
/// Proof bytes are synthesized deterministically from the query, so
/// idempotence assertions are meaningful; every upstream call is recorded
/// for interaction assertions.
#[derive(Debug, Default)]
pub(crate) struct MockProofFetcher {
    /// Backing storage; unset slots read as zero.
    pub(crate) storage: HashMap<B256, B256>,
    /// Every `(block, slot)` pair passed to [ProofFetcher::storage_at].
    pub(crate) storage_reads: Mutex<Vec<(u64, B256)>>,
    /// Number of [ProofFetcher::proofs] calls issued.
    pub(crate) proof_calls: AtomicUsize,
    /// When set, `proofs` drops this many storage proofs from its response.
    pub(crate) withhold_proofs: usize,
}

impl MockProofFetcher {
    /// Creates a mock whose storage holds the given entries.
    pub(crate) fn with_storage(entries: impl IntoIterator<Item = (B256, B256)>) -> Self {
        Self { storage: entries.into_iter().collect(), ..Default::default() }
    }

    /// The recorded `(block, slot)` storage reads.
    pub(crate) fn reads(&self) -> Vec<(u64, B256)> {
        self.storage_reads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProofFetcher for MockProofFetcher {
    async fn storage_at(&self, block: u64, _address: Address, slot: B256) -> ProofResult<B256> {
        self.storage_reads.lock().unwrap().push((block, slot));
        Ok(self.storage.get(&slot).copied().unwrap_or_default())
    }

    async fn proofs(
        &self,
        block: u64,
        address: Address,
        slots: &[B256],
    ) -> ProofResult<StateProof> {
        self.proof_calls.fetch_add(1, Ordering::SeqCst);
        let returned = slots.len().saturating_sub(self.withhold_proofs);
        if returned != slots.len() {
            return Err(ProofError::ProofUnavailable { expected: slots.len(), actual: returned });
        }
        let account_nodes = vec![Bytes::copy_from_slice(address.as_slice())];
        let storage_proofs = slots
            .iter()
            .map(|slot| {
                let node = [slot.as_slice(), &block.to_be_bytes()].concat();
                Bytes::from(alloy_rlp::encode(&vec![Bytes::from(node)]))
            })
            .collect();
        Ok(StateProof {
            state_trie_witness: Bytes::from(alloy_rlp::encode(&account_nodes)),
            storage_proofs,
        })
    }
}
