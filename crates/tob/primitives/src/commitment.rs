//! ABI wire types for commitments, delegations and the ToB payload.
//!
//! All types encode with the Solidity ABI (`abi.encode`) so keys and digests computed here match
//! the ones computed by the on-chain registry.

use alloy_primitives::{Address, B256, Bytes, FixedBytes, aliases::U48, keccak256};
use alloy_sol_types::{SolType, sol};
use thiserror::Error;

use crate::MAX_BLOCK_IDENTIFIER;

sol! {
    /// An attestation binding a committer to a typed payload and a designated slasher.
    #[derive(Debug, Default, PartialEq, Eq)]
    struct Commitment {
        /// Numeric tag selecting the payload schema.
        uint64 commitmentType;
        /// Opaque, schema-specific payload.
        bytes payload;
        /// The slasher allowed to adjudicate this commitment.
        address slasher;
    }

    /// A [`Commitment`] with the committer's signature over its digest.
    #[derive(Debug, Default, PartialEq, Eq)]
    struct SignedCommitment {
        /// The signed commitment.
        Commitment commitment;
        /// 65 byte `r || s || v` ECDSA signature over [`Commitment::digest`].
        bytes signature;
    }

    /// A proposer's delegation of commitment rights to a committer.
    #[derive(Debug, Default, PartialEq, Eq)]
    struct Delegation {
        /// The delegating proposer.
        address proposer;
        /// Key the proposer delegated to.
        address delegate;
        /// The gateway that signs commitments on the proposer's behalf.
        address committer;
        /// Slot the delegation is valid for.
        uint64 slot;
        /// Free-form delegation metadata.
        bytes metadata;
    }

    /// Payload of a top-of-block commitment.
    #[derive(Debug, Default, PartialEq, Eq)]
    struct ToBCommitment {
        /// Timestamp of the block the call must land in.
        uint48 blockIdentifier;
        /// The protected contract the first transaction must call.
        address target;
        /// Selector of the function the first transaction must call.
        bytes4 functionSelector;
    }
}

/// Errors raised while decoding a commitment payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommitmentError {
    /// The payload is not a valid ABI encoding of a [`ToBCommitment`].
    #[error("invalid ToB commitment payload: {0}")]
    InvalidPayload(String),
    /// The block identifier does not fit the payload's `uint48` field.
    #[error("block identifier {0} exceeds uint48")]
    BlockIdentifierOverflow(u64),
}

impl Commitment {
    /// Returns the digest a committer signs: `keccak256(abi.encode(commitment))`.
    pub fn digest(&self) -> B256 {
        keccak256(<Self as SolType>::abi_encode(self))
    }

    /// Decodes the payload as a [`ToBCommitment`].
    pub fn tob_payload(&self) -> Result<ToBCommitment, CommitmentError> {
        ToBCommitment::decode(&self.payload)
    }
}

impl SignedCommitment {
    /// Returns the gateway fault key for this signed commitment.
    ///
    /// The key covers the signature but not the delegation, so it cannot be changed by
    /// resubmitting the same commitment under a different delegation.
    pub fn fault_id(&self) -> B256 {
        keccak256(<Self as SolType>::abi_encode(self))
    }
}

impl ToBCommitment {
    /// Creates a new payload, rejecting block identifiers above [`MAX_BLOCK_IDENTIFIER`].
    pub const fn new(
        block_identifier: u64,
        target: Address,
        function_selector: FixedBytes<4>,
    ) -> Result<Self, CommitmentError> {
        if block_identifier > MAX_BLOCK_IDENTIFIER {
            return Err(CommitmentError::BlockIdentifierOverflow(block_identifier));
        }
        Ok(Self { blockIdentifier: U48::from_limbs([block_identifier]), target, functionSelector: function_selector })
    }

    /// ABI-encodes the payload.
    pub fn encode(&self) -> Bytes {
        <Self as SolType>::abi_encode(self).into()
    }

    /// Decodes and validates an ABI-encoded payload.
    pub fn decode(data: &[u8]) -> Result<Self, CommitmentError> {
        <Self as SolType>::abi_decode_validate(data)
            .map_err(|e| CommitmentError::InvalidPayload(e.to_string()))
    }

    /// Wraps the payload into a [`Commitment`] addressed to `slasher`.
    pub fn into_commitment(self, commitment_type: u64, slasher: Address) -> Commitment {
        Commitment { commitmentType: commitment_type, payload: self.encode(), slasher }
    }
}

/// Returns the challenge key for a commitment opened under a delegation:
/// `keccak256(abi.encode(commitment, delegation))`.
pub fn challenge_id(commitment: &Commitment, delegation: &Delegation) -> B256 {
    keccak256(<(Commitment, Delegation) as SolType>::abi_encode_params(&(
        commitment.clone(),
        delegation.clone(),
    )))
}
