//! Drives a [ProofFetcher] across exactly the slots a storage-path request
//! needs and packages the result into the canonical wire encoding.

use crate::{
    errors::{CommandError, ProofResult},
    fetcher::ProofFetcher,
    slots::{self, Command, DynamicHeader, PathElement},
    types::StateProof,
};
use alloy_primitives::{Address, Bytes, B256};
use futures::{stream, StreamExt, TryStreamExt};
use tracing::debug;

/// Default bound on concurrent storage reads within a single request.
pub const DEFAULT_MAX_CONCURRENT_READS: usize = 8;

/// How a resolved element's logical value is produced if a later command
/// back-references it.
///
/// Values are materialized lazily: an element that is never back-referenced
/// costs no storage reads beyond what its own slot derivation required.
#[derive(Debug, Clone)]
enum ValueSource {
    /// The 32-byte word at the held slot, unread until needed.
    Word(B256),
    /// A short dynamic value already read from its base slot.
    Inline(Bytes),
    /// A long dynamic value spread over the held content slots, trimmed to
    /// `len` bytes.
    Spread {
        /// The content slots, in value order.
        slots: Vec<B256>,
        /// The byte length of the value.
        len: usize,
    },
}

/// A resolved storage-path command: the raw keys it occupies and its value
/// source.
#[derive(Debug, Clone)]
struct ResolvedElement {
    /// Every raw storage key the element occupies, in proof order.
    slots: Vec<B256>,
    /// How to produce the element's logical value on demand.
    value: ValueSource,
}

/// Assembles account/storage witnesses for storage-path requests at a fixed
/// L2 block.
///
/// The block number is chosen once by the caller before any fetch begins and
/// threads unchanged through every read in the request, so all proofs in one
/// response share a single trie root.
#[derive(Debug, Clone)]
pub struct ProofAssembler<F> {
    /// The upstream fetcher.
    fetcher: F,
    /// Bound on concurrent storage reads.
    max_concurrent_reads: usize,
}

impl<F> ProofAssembler<F>
where
    F: ProofFetcher + Send + Sync,
{
    /// Creates a new assembler over the given fetcher.
    pub fn new(fetcher: F, max_concurrent_reads: usize) -> Self {
        Self { fetcher, max_concurrent_reads: max_concurrent_reads.max(1) }
    }

    /// Resolves every command of the request and fetches one witness
    /// covering the full derived slot list.
    ///
    /// Commands execute in order; back-references may only point at earlier
    /// commands. Any failure aborts the whole request: a partially proven
    /// composite value is useless to the verifier.
    pub async fn assemble(
        &self,
        block: u64,
        target: Address,
        commands: &[B256],
        constants: &[Bytes],
    ) -> ProofResult<StateProof> {
        let mut resolved: Vec<ResolvedElement> = Vec::with_capacity(commands.len());
        let mut memo: Vec<Option<Bytes>> = Vec::with_capacity(commands.len());
        for raw in commands {
            let command = Command::parse(raw)?;
            let element =
                self.resolve(block, target, &command, constants, &resolved, &mut memo).await?;
            resolved.push(element);
            memo.push(None);
        }

        let slot_list: Vec<B256> =
            resolved.iter().flat_map(|element| element.slots.iter().copied()).collect();
        debug!(target: "assembler", block, %target, slots = slot_list.len(), "fetching state proof");
        self.fetcher.proofs(block, target, &slot_list).await
    }

    /// Resolves a single command into its slot set and value source.
    async fn resolve(
        &self,
        block: u64,
        target: Address,
        command: &Command,
        constants: &[Bytes],
        prior: &[ResolvedElement],
        memo: &mut [Option<Bytes>],
    ) -> ProofResult<ResolvedElement> {
        let (first, rest) = match command.elements() {
            [first, rest @ ..] => (first, rest),
            [] => return Err(CommandError::EmptyPath.into()),
        };

        let base = self.element_value(block, target, first, constants, prior, memo).await?;
        let mut slot = slots::base_slot(&base)?;
        for element in rest {
            let key = self.element_value(block, target, element, constants, prior, memo).await?;
            slot = slots::mapping_slot(&key, slot);
        }
        let base = B256::from(slot);

        if !command.dynamic {
            return Ok(ResolvedElement { slots: vec![base], value: ValueSource::Word(base) });
        }

        let word = self.fetcher.storage_at(block, target, base).await?;
        match slots::decode_dynamic_header(word)? {
            DynamicHeader::Short { len } => Ok(ResolvedElement {
                slots: vec![base],
                value: ValueSource::Inline(Bytes::copy_from_slice(&word[..len])),
            }),
            DynamicHeader::Long { len, slots: count } => {
                let content = slots::content_slots(slot, count);
                let mut all = Vec::with_capacity(count + 1);
                all.push(base);
                all.extend_from_slice(&content);
                Ok(ResolvedElement { slots: all, value: ValueSource::Spread { slots: content, len } })
            }
        }
    }

    /// Resolves one path element to its byte value.
    async fn element_value(
        &self,
        block: u64,
        target: Address,
        element: &PathElement,
        constants: &[Bytes],
        prior: &[ResolvedElement],
        memo: &mut [Option<Bytes>],
    ) -> ProofResult<Bytes> {
        match *element {
            PathElement::Constant(index) => constants.get(index as usize).cloned().ok_or_else(|| {
                CommandError::ConstantOutOfRange { index, len: constants.len() }.into()
            }),
            PathElement::Backref(index) => {
                self.materialize(block, target, index, prior, memo).await
            }
        }
    }

    /// Produces the logical value of an earlier command, memoized per
    /// request.
    async fn materialize(
        &self,
        block: u64,
        target: Address,
        index: u8,
        prior: &[ResolvedElement],
        memo: &mut [Option<Bytes>],
    ) -> ProofResult<Bytes> {
        let Some(element) = prior.get(index as usize) else {
            return Err(CommandError::BackrefOutOfRange { index, len: prior.len() }.into());
        };
        if let Some(value) = &memo[index as usize] {
            return Ok(value.clone());
        }

        let value = match &element.value {
            ValueSource::Word(slot) => {
                let word = self.fetcher.storage_at(block, target, *slot).await?;
                Bytes::copy_from_slice(word.as_slice())
            }
            ValueSource::Inline(bytes) => bytes.clone(),
            ValueSource::Spread { slots, len } => {
                let words = self.read_many(block, target, slots).await?;
                let mut value = Vec::with_capacity(words.len() * 32);
                for word in &words {
                    value.extend_from_slice(word.as_slice());
                }
                value.truncate(*len);
                Bytes::from(value)
            }
        };
        memo[index as usize] = Some(value.clone());
        Ok(value)
    }

    /// Reads a batch of slots with bounded fan-out, preserving order.
    async fn read_many(
        &self,
        block: u64,
        target: Address,
        slots: &[B256],
    ) -> ProofResult<Vec<B256>> {
        stream::iter(slots.iter().map(|slot| self.fetcher.storage_at(block, target, *slot)))
            .buffered(self.max_concurrent_reads)
            .try_collect()
            .await
    }
}
