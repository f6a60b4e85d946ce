//! EIP-3668 request decoding and callback payload encoding.
//!
//! The inbound `data` field carries an ABI-encoded call against the gateway
//! ABI. Dispatch is a closed enum keyed on the 4-byte selector: anything
//! outside the supported set is rejected before a single upstream RPC is
//! issued.

use alloy_primitives::{hex, Address, Bytes, B256, U256};
use alloy_sol_types::{sol, SolCall, SolValue};
use serde::{Deserialize, Serialize};
use spyglass_proof::StateProof;

sol! {
    /// The gateway ABI consumed by the on-chain fetcher contract.
    interface IEVMGateway {
        /// Returns a witness for every storage slot the command program
        /// addresses on `target`, proven against a finalized L2 block.
        function getStorageSlots(address target, bytes32[] memory commands, bytes[] memory constants)
            external
            pure
            returns (bytes memory witness);
    }
}

/// A decoded, validated gateway request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum GatewayRequest {
    /// `getStorageSlots(address,bytes32[],bytes[])`
    GetStorageSlots {
        /// The L2 contract whose storage is being proven.
        target: Address,
        /// The storage-path command words.
        commands: Vec<B256>,
        /// The constant pool the commands index into.
        constants: Vec<Bytes>,
    },
}

/// Errors produced while decoding an off-chain lookup request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum EnvelopeError {
    /// The sender path segment is not a well-formed address.
    #[error("malformed sender address: {0}")]
    MalformedSender(String),
    /// The calldata hex or its ABI payload did not decode.
    #[error("malformed request data: {0}")]
    MalformedRequest(String),
    /// The inner call's selector is outside the supported gateway ABI.
    #[error("unknown function selector {}", hex::encode_prefixed(.0))]
    UnknownSelector([u8; 4]),
}

/// Decodes the `sender` and hex `data` fields of an off-chain lookup
/// request into a [GatewayRequest].
pub(crate) fn decode_request(sender: &str, data: &str) -> Result<GatewayRequest, EnvelopeError> {
    // The sender is the reverting L1 contract. It does not influence proof
    // construction, but a request that cannot even name its origin is
    // malformed.
    sender
        .parse::<Address>()
        .map_err(|e| EnvelopeError::MalformedSender(e.to_string()))?;

    let raw = hex::decode(data).map_err(|e| EnvelopeError::MalformedRequest(e.to_string()))?;
    if raw.len() < 4 {
        return Err(EnvelopeError::MalformedRequest(format!(
            "calldata of {} bytes has no selector",
            raw.len()
        )));
    }

    let mut selector = [0u8; 4];
    selector.copy_from_slice(&raw[..4]);
    match selector {
        IEVMGateway::getStorageSlotsCall::SELECTOR => {
            let call = IEVMGateway::getStorageSlotsCall::abi_decode(&raw, true)
                .map_err(|e| EnvelopeError::MalformedRequest(e.to_string()))?;
            Ok(GatewayRequest::GetStorageSlots {
                target: call.target,
                commands: call.commands,
                constants: call.constants,
            })
        }
        other => Err(EnvelopeError::UnknownSelector(other)),
    }
}

/// Encodes the callback payload for a successful request: the proven block
/// number and the state proof, wrapped as the function's `bytes` return.
///
/// Deterministic by construction; nothing here depends on time or request
/// identity, so identical requests against the same provable block produce
/// byte-identical payloads.
pub(crate) fn encode_witness(block_number: u64, proof: &StateProof) -> Bytes {
    let witness: Bytes = (
        U256::from(block_number),
        (proof.state_trie_witness.clone(), proof.storage_proofs.clone()),
    )
        .abi_encode_params()
        .into();
    witness.abi_encode().into()
}

/// The response body shared by the GET and POST forms of the endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct DataResponse {
    /// The ABI-encoded callback payload, 0x-prefixed.
    pub(crate) data: String,
}

/// The POST request body.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LookupBody {
    /// The reverting L1 contract address.
    pub(crate) sender: String,
    /// The ABI-encoded inner call, 0x-prefixed.
    pub(crate) data: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SENDER: &str = "0x226159d592e2b063810a10ebf6dcbada94ed68b8";

    fn encoded_call() -> String {
        let call = IEVMGateway::getStorageSlotsCall {
            target: Address::repeat_byte(0xab),
            commands: vec![B256::ZERO],
            constants: vec![Bytes::from(vec![0u8; 32])],
        };
        hex::encode_prefixed(call.abi_encode())
    }

    #[test]
    fn round_trips_a_get_storage_slots_call() {
        let request = decode_request(SENDER, &encoded_call()).unwrap();
        let GatewayRequest::GetStorageSlots { target, commands, constants } = request;
        assert_eq!(target, Address::repeat_byte(0xab));
        assert_eq!(commands, vec![B256::ZERO]);
        assert_eq!(constants.len(), 1);
    }

    #[test]
    fn rejects_malformed_sender() {
        let err = decode_request("0x1234", &encoded_call()).unwrap_err();
        assert!(matches!(err, EnvelopeError::MalformedSender(_)));
    }

    #[test]
    fn rejects_short_calldata() {
        let err = decode_request(SENDER, "0x01").unwrap_err();
        assert!(matches!(err, EnvelopeError::MalformedRequest(_)));
    }

    #[test]
    fn rejects_non_hex_calldata() {
        let err = decode_request(SENDER, "0xzzzz").unwrap_err();
        assert!(matches!(err, EnvelopeError::MalformedRequest(_)));
    }

    #[test]
    fn rejects_unknown_selector() {
        let err = decode_request(SENDER, "0xdeadbeef").unwrap_err();
        assert_eq!(err, EnvelopeError::UnknownSelector([0xde, 0xad, 0xbe, 0xef]));
    }

    #[test]
    fn rejects_truncated_arguments() {
        // Valid selector, garbage tail.
        let data = hex::encode_prefixed(IEVMGateway::getStorageSlotsCall::SELECTOR);
        let err = decode_request(SENDER, &data).unwrap_err();
        assert!(matches!(err, EnvelopeError::MalformedRequest(_)));
    }

    #[test]
    fn witness_encoding_is_deterministic() {
        let proof = StateProof {
            state_trie_witness: Bytes::from(vec![0xc0]),
            storage_proofs: vec![Bytes::from(vec![0xc1, 0x80])],
        };
        assert_eq!(encode_witness(1000, &proof), encode_witness(1000, &proof));
        assert_ne!(encode_witness(1000, &proof), encode_witness(1001, &proof));
    }
}
