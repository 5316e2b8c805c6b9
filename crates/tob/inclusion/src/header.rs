//! Positional decoding of RLP block headers.
//!
//! Only the fields the verifier consumes are read, by their index in the canonical header list.
//! Trailing fields added by later forks are tolerated and ignored.

use alloy_primitives::{B256, keccak256};

use crate::{InclusionError, rlp::list_items};

/// Index of the parent hash in the header list.
pub const PARENT_HASH_INDEX: usize = 0;
/// Index of the state root in the header list.
pub const STATE_ROOT_INDEX: usize = 3;
/// Index of the transactions root in the header list.
pub const TRANSACTIONS_ROOT_INDEX: usize = 4;
/// Index of the block number in the header list.
pub const NUMBER_INDEX: usize = 8;
/// Index of the timestamp in the header list.
pub const TIMESTAMP_INDEX: usize = 11;
/// Index of the base fee in the header list, present from London onwards.
pub const BASE_FEE_INDEX: usize = 15;

/// Number of fields in a pre-London header.
const MIN_HEADER_FIELDS: usize = 15;

/// Header fields read from raw RLP, with the hash of exactly those bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderFields {
    /// `keccak256` of the raw header.
    pub hash: B256,
    /// Hash of the parent block.
    pub parent_hash: B256,
    /// State root after the block.
    pub state_root: B256,
    /// Root of the transaction trie.
    pub transactions_root: B256,
    /// Block number.
    pub number: u64,
    /// Block timestamp.
    pub timestamp: u64,
    /// Base fee per gas, if the header has one.
    pub base_fee_per_gas: Option<u64>,
}

impl HeaderFields {
    /// Decodes the header fields from an RLP-encoded header.
    pub fn decode(raw: &[u8]) -> Result<Self, InclusionError> {
        let invalid = |e: alloy_rlp::Error| InclusionError::InvalidHeader(e.to_string());

        let items = list_items(raw).map_err(invalid)?;
        if items.len() < MIN_HEADER_FIELDS {
            return Err(InclusionError::InvalidHeader(format!(
                "expected at least {MIN_HEADER_FIELDS} fields, got {}",
                items.len()
            )));
        }

        let base_fee_per_gas =
            items.get(BASE_FEE_INDEX).map(|item| item.u64()).transpose().map_err(invalid)?;

        Ok(Self {
            hash: keccak256(raw),
            parent_hash: items[PARENT_HASH_INDEX].b256().map_err(invalid)?,
            state_root: items[STATE_ROOT_INDEX].b256().map_err(invalid)?,
            transactions_root: items[TRANSACTIONS_ROOT_INDEX].b256().map_err(invalid)?,
            number: items[NUMBER_INDEX].u64().map_err(invalid)?,
            timestamp: items[TIMESTAMP_INDEX].u64().map_err(invalid)?,
            base_fee_per_gas,
        })
    }
}
