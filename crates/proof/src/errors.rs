//! Error types for the `spyglass-proof` crate.

use thiserror::Error;

/// A [Result] type alias where the error is [ProofError].
pub type ProofResult<T> = Result<T, ProofError>;

/// An error produced while parsing or executing a storage-path command.
///
/// Every variant indicates a request the gateway can never serve, regardless
/// of upstream health; callers should treat these as non-retryable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// A path element carried an opcode outside the closed instruction set.
    #[error("unknown opcode {0:#04x} in storage-path command")]
    UnknownOpcode(u8),
    /// A constant operand pointed past the end of the constants array.
    #[error("constant index {index} out of range ({len} constants supplied)")]
    ConstantOutOfRange {
        /// The out-of-range operand.
        index: u8,
        /// The number of constants supplied with the request.
        len: usize,
    },
    /// A back-reference pointed at a command that has not executed yet.
    #[error("back-reference {index} out of range ({len} values resolved)")]
    BackrefOutOfRange {
        /// The out-of-range operand.
        index: u8,
        /// The number of command values resolved so far.
        len: usize,
    },
    /// A command consisted solely of the flags byte and a terminator.
    #[error("storage-path command has no path elements")]
    EmptyPath,
    /// An operand longer than one word cannot form a base storage slot.
    #[error("operand of {0} bytes cannot form a base slot")]
    OperandTooLong(usize),
    /// The base slot of a value flagged dynamic does not hold a valid
    /// Solidity `string`/`bytes` header.
    #[error("slot flagged dynamic holds an invalid length header ({tag:#04x})")]
    InvalidDynamicHeader {
        /// The low byte of the header word.
        tag: u8,
    },
    /// The length word of a dynamic value implies more content slots than
    /// the gateway is willing to fetch.
    #[error("dynamic value spans {slots} slots, exceeding the limit of {limit}")]
    ValueTooLarge {
        /// The number of content slots the length word implies.
        slots: usize,
        /// The configured ceiling.
        limit: usize,
    },
}

/// An error produced while fetching storage values or assembling proofs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProofError {
    /// The inbound storage-path program was malformed. Non-retryable.
    #[error(transparent)]
    Command(#[from] CommandError),
    /// The upstream node could not be reached or timed out. Retried
    /// internally with backoff; surfaced only once the retry budget is
    /// exhausted.
    #[error("transport failure talking to the L2 node: {0}")]
    Transport(String),
    /// The node answered the query for the pinned historical block with an
    /// error, most commonly because the state at that block has been pruned.
    /// Never retried against a different block: substituting a fresher block
    /// would silently break the finality guarantee.
    #[error("node error at block {block}: {message}")]
    Node {
        /// The block the query was pinned to.
        block: u64,
        /// The error message returned by the node.
        message: String,
    },
    /// `eth_getProof` returned fewer storage proofs than slots requested.
    #[error("node returned {actual} storage proofs for {expected} requested slots")]
    ProofUnavailable {
        /// The number of slots the request asked to prove.
        expected: usize,
        /// The number of proofs the node actually returned.
        actual: usize,
    },
}
