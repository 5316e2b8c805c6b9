//! Top-of-block inclusion verification.

use alloy_consensus::{Transaction, TxEnvelope};
use alloy_eips::eip2718::Decodable2718;
use alloy_primitives::{Address, B256, Bytes, FixedBytes, keccak256};
use base_tob_primitives::{BlockHashes, SELECTOR_LEN, ToBCommitment};
use tracing::debug;

use crate::{HeaderFields, InclusionError, InclusionResult, proof_lookup};

/// Transaction trie key of index 0, `rlp(0)`.
pub const TOB_TRANSACTION_KEY: [u8; 1] = [alloy_rlp::EMPTY_STRING_CODE];

/// Proof material showing which transaction ran first in a block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InclusionProof {
    /// Number of the block the transaction ran in.
    pub block_number: u64,
    /// RLP header of block `block_number - 1`.
    pub previous_block_header: Bytes,
    /// RLP header of block `block_number`.
    pub block_header: Bytes,
    /// Transaction trie nodes from the root to the leaf at index 0.
    pub transaction_proof: Vec<Bytes>,
}

/// What the first transaction of the block is expected to look like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectedInclusion {
    /// Timestamp of the block.
    pub block_identifier: u64,
    /// Address the transaction must call.
    pub destination: Address,
    /// Selector the calldata must start with.
    pub selector: FixedBytes<4>,
}

impl From<&ToBCommitment> for ExpectedInclusion {
    fn from(payload: &ToBCommitment) -> Self {
        Self {
            block_identifier: payload.blockIdentifier.to::<u64>(),
            destination: payload.target,
            selector: payload.functionSelector,
        }
    }
}

/// A transaction proven to have run at index 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncludedTransaction {
    /// Hash of the block that included it.
    pub block_hash: B256,
    /// Hash of the transaction.
    pub tx_hash: B256,
    /// The called address.
    pub destination: Address,
    /// The called selector.
    pub selector: FixedBytes<4>,
}

/// Verifies that the first transaction of `proof.block_number` matches `expected`.
///
/// Trust starts from the hash `chain` reports for the preceding block, which must still be in
/// the recent block hash window. The target header is trusted only through its parent hash.
pub fn verify_tob_inclusion<C>(
    chain: &C,
    proof: &InclusionProof,
    expected: &ExpectedInclusion,
) -> InclusionResult<IncludedTransaction>
where
    C: BlockHashes + ?Sized,
{
    let result = verify(chain, proof, expected);
    if let Err(err) = &result {
        debug!(
            target: "tob::inclusion",
            block_number = proof.block_number,
            %err,
            "rejected inclusion proof"
        );
    }
    result
}

fn verify<C>(
    chain: &C,
    proof: &InclusionProof,
    expected: &ExpectedInclusion,
) -> InclusionResult<IncludedTransaction>
where
    C: BlockHashes + ?Sized,
{
    let trusted = proof
        .block_number
        .checked_sub(1)
        .and_then(|previous| chain.recent_block_hash(previous))
        .ok_or(InclusionError::InvalidBlockNumber {
            number: proof.block_number,
            head: chain.block_number(),
        })?;

    let computed = keccak256(&proof.previous_block_header);
    if computed != trusted {
        return Err(InclusionError::InvalidBlockHash { trusted, computed });
    }

    let header = HeaderFields::decode(&proof.block_header)?;
    if header.parent_hash != computed {
        return Err(InclusionError::InvalidParentBlockHash {
            expected: computed,
            actual: header.parent_hash,
        });
    }

    if header.timestamp != expected.block_identifier {
        return Err(InclusionError::IncorrectTimestamp {
            expected: expected.block_identifier,
            actual: header.timestamp,
        });
    }

    let leaf =
        proof_lookup(header.transactions_root, &TOB_TRANSACTION_KEY, &proof.transaction_proof)?
            .ok_or(InclusionError::TransactionNotIncluded)?;

    let tx = TxEnvelope::decode_2718(&mut leaf.as_slice())
        .map_err(|e| InclusionError::InvalidTransaction(e.to_string()))?;

    let destination = tx.to();
    if destination != Some(expected.destination) {
        return Err(InclusionError::InvalidDestination {
            expected: expected.destination,
            actual: destination,
        });
    }

    let selector = tx.input().get(..SELECTOR_LEN).map(FixedBytes::<4>::from_slice);
    if selector != Some(expected.selector) {
        return Err(InclusionError::IncorrectFunctionSelector {
            expected: expected.selector,
            actual: selector,
        });
    }

    Ok(IncludedTransaction {
        block_hash: header.hash,
        tx_hash: keccak256(&leaf),
        destination: expected.destination,
        selector: expected.selector,
    })
}
