//! Core types shared across the proof-assembly pipeline.

use alloy_primitives::Bytes;

/// A complete account and storage witness for one contract at a fixed L2
/// block.
///
/// The encoding is bit-exact for on-chain re-verification: each field is the
/// RLP encoding of a list of raw trie nodes, in the exact order the upstream
/// node returned them. Trie-proof verification is order-sensitive, so nothing
/// here may be re-sorted or deduplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateProof {
    /// RLP-encoded list of trie nodes proving the account's
    /// `(nonce, balance, storageRoot, codeHash)` against the block's state
    /// root.
    pub state_trie_witness: Bytes,
    /// One RLP-encoded node list per requested storage key, proving each
    /// key's value against the account's storage root.
    ///
    /// Positionally aligned with the derived slot list of the request that
    /// produced it.
    pub storage_proofs: Vec<Bytes>,
}
