//! In-memory chain state.

use std::collections::HashMap;

use alloy_primitives::B256;
use base_tob_primitives::{BlockHashes, ChainState};

/// A [`ChainState`] whose head, clock and hashes are set by the test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockChain {
    /// Number of the executing block.
    pub number: u64,
    /// Timestamp of the executing block.
    pub timestamp: u64,
    /// Gas limit of the executing block.
    pub gas_limit: u64,
    /// Known block hashes by number.
    pub hashes: HashMap<u64, B256>,
}

impl MockChain {
    /// Block time used by [`MockChain::advance_blocks`].
    pub const BLOCK_TIME: u64 = 12;

    /// Creates a chain with its head at `number` / `timestamp` and a 30M gas limit.
    pub fn new(number: u64, timestamp: u64) -> Self {
        Self { number, timestamp, gas_limit: 30_000_000, hashes: HashMap::new() }
    }

    /// Records the hash of block `number`.
    pub fn with_block_hash(mut self, number: u64, hash: B256) -> Self {
        self.hashes.insert(number, hash);
        self
    }

    /// Records the hash of block `number`.
    pub fn set_block_hash(&mut self, number: u64, hash: B256) {
        self.hashes.insert(number, hash);
    }

    /// Moves the clock forward without producing blocks.
    pub const fn advance_time(&mut self, seconds: u64) {
        self.timestamp += seconds;
    }

    /// Produces `count` empty blocks, [`Self::BLOCK_TIME`] seconds apart.
    pub fn advance_blocks(&mut self, count: u64) {
        for _ in 0..count {
            let number = self.number;
            self.hashes
                .entry(number)
                .or_insert_with(|| B256::left_padding_from(&number.to_be_bytes()));
            self.number += 1;
            self.timestamp += Self::BLOCK_TIME;
        }
    }
}

impl BlockHashes for MockChain {
    fn block_number(&self) -> u64 {
        self.number
    }

    fn block_hash(&self, number: u64) -> Option<B256> {
        self.hashes.get(&number).copied()
    }
}

impl ChainState for MockChain {
    fn timestamp(&self) -> u64 {
        self.timestamp
    }

    fn gas_limit(&self) -> u64 {
        self.gas_limit
    }
}
