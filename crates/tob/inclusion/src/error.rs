//! Errors for inclusion proof verification.

use alloy_primitives::{Address, B256, FixedBytes};
use thiserror::Error;

/// A [Result] type alias where the error is [`InclusionError`].
pub type InclusionResult<T> = Result<T, InclusionError>;

/// Reasons an inclusion proof is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InclusionError {
    /// The preceding block is outside the trusted block hash window.
    #[error("block {number} is outside the trusted hash window at head {head}")]
    InvalidBlockNumber {
        /// The target block number.
        number: u64,
        /// The block currently executing.
        head: u64,
    },
    /// The preceding header does not hash to the trusted block hash.
    #[error("invalid block hash: trusted {trusted}, computed {computed}")]
    InvalidBlockHash {
        /// Hash the environment vouches for.
        trusted: B256,
        /// Hash of the supplied header bytes.
        computed: B256,
    },
    /// A header could not be decoded.
    #[error("invalid header: {0}")]
    InvalidHeader(String),
    /// The target header does not extend the verified preceding header.
    #[error("invalid parent block hash: expected {expected}, got {actual}")]
    InvalidParentBlockHash {
        /// Hash of the verified preceding header.
        expected: B256,
        /// Parent hash declared by the target header.
        actual: B256,
    },
    /// The target header's timestamp is not the committed block identifier.
    #[error("incorrect timestamp: expected {expected}, got {actual}")]
    IncorrectTimestamp {
        /// The committed block identifier.
        expected: u64,
        /// Timestamp of the target header.
        actual: u64,
    },
    /// The proof resolves, but holds no transaction at index 0.
    #[error("no transaction at index 0")]
    TransactionNotIncluded,
    /// The proof is malformed or does not hash to the transactions root.
    #[error("invalid transaction proof: {0}")]
    InvalidProof(#[from] TrieProofError),
    /// The proven leaf is not a valid transaction envelope.
    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),
    /// The transaction does not call the expected destination.
    #[error("invalid destination: expected {expected}, got {actual:?}")]
    InvalidDestination {
        /// The committed destination.
        expected: Address,
        /// Destination of the transaction, `None` for contract creation.
        actual: Option<Address>,
    },
    /// The transaction's calldata does not start with the expected selector.
    #[error("incorrect function selector: expected {expected}, got {actual:?}")]
    IncorrectFunctionSelector {
        /// The committed selector.
        expected: FixedBytes<4>,
        /// Selector of the transaction, `None` if calldata is shorter than four bytes.
        actual: Option<FixedBytes<4>>,
    },
}

/// Structural failures while walking a Merkle-Patricia proof.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrieProofError {
    /// The proof ended before the path was resolved.
    #[error("proof ended before node {0}")]
    MissingNode(B256),
    /// A proof node does not match the reference held by its parent.
    #[error("node hash mismatch: expected {expected}, got {actual}")]
    NodeHashMismatch {
        /// Reference held by the parent node.
        expected: B256,
        /// Hash of the supplied node.
        actual: B256,
    },
    /// A node is neither a branch, an extension nor a leaf.
    #[error("invalid trie node: {0}")]
    InvalidNode(&'static str),
    /// RLP decoding failed.
    #[error("rlp: {0}")]
    Rlp(alloy_rlp::Error),
}

impl From<alloy_rlp::Error> for TrieProofError {
    fn from(err: alloy_rlp::Error) -> Self {
        Self::Rlp(err)
    }
}
