//! Storage-path command parsing and Solidity storage-slot derivation.
//!
//! A request addresses contract storage with a compact program: each command
//! is one 32-byte word whose first byte holds flags and whose remaining bytes
//! form a path of single-byte elements, terminated by `0xff`. The first
//! element yields the base slot; every further element descends one mapping
//! level, rehashing the slot with the element's value per the Solidity
//! storage layout. A command flagged dynamic addresses a Solidity
//! `string`/`bytes` value, whose content slots are derived from the length
//! header stored in the base slot.
//!
//! The derivation here must match the target contract's in-storage layout
//! byte for byte; a divergence produces proofs that verify against nothing.

use crate::errors::CommandError;
use alloy_primitives::{keccak256, B256, U256};

/// Flag bit marking a command's value as dynamic-length (`string`/`bytes`).
const FLAG_DYNAMIC: u8 = 0x01;
/// Path-element opcode: the operand indexes the request's constants array.
const OP_CONSTANT: u8 = 0x00;
/// Path-element opcode: the operand indexes the values of previously
/// executed commands.
const OP_BACKREF: u8 = 0x20;
/// Mask selecting the opcode bits of a path element.
const OP_MASK: u8 = 0xe0;
/// Mask selecting the operand bits of a path element.
const OPERAND_MASK: u8 = 0x1f;
/// Path terminator byte.
const STOP: u8 = 0xff;

/// Ceiling on the number of content slots a single dynamic value may span.
///
/// A garbage length word in the base slot would otherwise fan out into an
/// unbounded number of `eth_getStorageAt` calls against the upstream node.
pub const MAX_VALUE_SLOTS: usize = 1024;

/// A single element of a storage path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathElement {
    /// Resolves to the request constant at the held index.
    Constant(u8),
    /// Resolves to the value of the previously executed command at the held
    /// index.
    Backref(u8),
}

/// A parsed 32-byte storage-path command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Whether the addressed value is dynamic-length.
    pub dynamic: bool,
    elements: Vec<PathElement>,
}

impl Command {
    /// Parses a raw command word.
    ///
    /// Fails on opcodes outside the closed instruction set and on paths with
    /// no elements; operand range checks happen at execution time, when the
    /// constants and resolved values are in hand.
    pub fn parse(raw: &B256) -> Result<Self, CommandError> {
        let dynamic = raw[0] & FLAG_DYNAMIC != 0;
        let mut elements = Vec::new();
        for &byte in &raw[1..] {
            if byte == STOP {
                break;
            }
            let operand = byte & OPERAND_MASK;
            match byte & OP_MASK {
                OP_CONSTANT => elements.push(PathElement::Constant(operand)),
                OP_BACKREF => elements.push(PathElement::Backref(operand)),
                opcode => return Err(CommandError::UnknownOpcode(opcode)),
            }
        }
        if elements.is_empty() {
            return Err(CommandError::EmptyPath);
        }
        Ok(Self { dynamic, elements })
    }

    /// The path elements, base element first.
    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }
}

/// Interprets an operand's bytes as a big-endian storage slot.
pub(crate) fn base_slot(bytes: &[u8]) -> Result<U256, CommandError> {
    if bytes.len() > 32 {
        return Err(CommandError::OperandTooLong(bytes.len()));
    }
    Ok(U256::from_be_slice(bytes))
}

/// Derives the slot of `mapping[key]` held at `slot`, per the Solidity
/// storage layout: `keccak256(key ‖ uint256(slot))`.
pub(crate) fn mapping_slot(key: &[u8], slot: U256) -> U256 {
    let mut preimage = Vec::with_capacity(key.len() + 32);
    preimage.extend_from_slice(key);
    preimage.extend_from_slice(&slot.to_be_bytes::<32>());
    U256::from_be_bytes(keccak256(&preimage).0)
}

/// The decoded length header of a Solidity dynamic value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DynamicHeader {
    /// The value is stored inline in the base slot, occupying the first
    /// `len` bytes of the word.
    Short {
        /// The byte length of the value, at most 31.
        len: usize,
    },
    /// The value occupies `slots` content slots starting at
    /// `keccak256(uint256(baseSlot))`.
    Long {
        /// The byte length of the value.
        len: usize,
        /// The number of content slots the value spans.
        slots: usize,
    },
}

/// Decodes the base-slot word of a dynamic value.
///
/// Short form: the low byte is `2 * len` (even), the value sits in the high
/// bytes of the same word. Long form: the whole word is `2 * len + 1` (odd),
/// the value sits in consecutive slots starting at the keccak of the base
/// slot.
pub(crate) fn decode_dynamic_header(word: B256) -> Result<DynamicHeader, CommandError> {
    let tag = word[31];
    if tag & 1 == 0 {
        let len = (tag / 2) as usize;
        if len > 31 {
            return Err(CommandError::InvalidDynamicHeader { tag });
        }
        return Ok(DynamicHeader::Short { len });
    }
    let word = U256::from_be_bytes(word.0);
    let len = (word - U256::from(1)) / U256::from(2);
    let slots = (len + U256::from(31)) / U256::from(32);
    if slots > U256::from(MAX_VALUE_SLOTS) {
        return Err(CommandError::ValueTooLarge {
            slots: slots.saturating_to::<usize>(),
            limit: MAX_VALUE_SLOTS,
        });
    }
    Ok(DynamicHeader::Long { len: len.to::<usize>(), slots: slots.to::<usize>() })
}

/// Enumerates the content slots of a long dynamic value rooted at `base`:
/// `keccak256(uint256(base)) + i` for each content word.
pub(crate) fn content_slots(base: U256, count: usize) -> Vec<B256> {
    let start = U256::from_be_bytes(keccak256(base.to_be_bytes::<32>()).0);
    (0..count).map(|i| B256::from(start + U256::from(i))).collect()
}
