//! Record of blocks in which the protected operation ran at the top.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use base_tob_primitives::ChainState;

/// Read access to submission records, consumed by the
/// [`FaultAttributionEngine`](crate::FaultAttributionEngine).
pub trait SubmissionLookup {
    /// Returns `true` if the protected operation ran at the top of block `block_id`.
    fn was_submitted(&self, block_id: u64) -> bool;

    /// Returns the number of the block with timestamp `block_id`, if it was checkpointed.
    fn block_number_of(&self, block_id: u64) -> Option<u64>;
}

/// Set-once submission flags and timestamp to block number checkpoints, both keyed by block
/// timestamp.
///
/// Neither map is ever cleared: a block identifier recorded once stays recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionLedger {
    submitted: HashSet<u64>,
    checkpoints: HashMap<u64, u64>,
}

impl SubmissionLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the current block as submitted and checkpoints it.
    ///
    /// Returns `true` the first time the block is recorded.
    pub fn record_submission<C: ChainState + ?Sized>(&mut self, chain: &C) -> bool {
        self.checkpoint(chain);
        self.submitted.insert(chain.timestamp())
    }

    /// Records the current block's number under its timestamp and returns it.
    ///
    /// The first checkpoint for a timestamp wins.
    pub fn checkpoint<C: ChainState + ?Sized>(&mut self, chain: &C) -> u64 {
        *self.checkpoints.entry(chain.timestamp()).or_insert_with(|| chain.block_number())
    }

    /// Number of blocks recorded as submitted.
    pub fn submissions(&self) -> usize {
        self.submitted.len()
    }
}

impl SubmissionLookup for SubmissionLedger {
    fn was_submitted(&self, block_id: u64) -> bool {
        self.submitted.contains(&block_id)
    }

    fn block_number_of(&self, block_id: u64) -> Option<u64> {
        self.checkpoints.get(&block_id).copied()
    }
}

impl<T: SubmissionLookup + ?Sized> SubmissionLookup for &T {
    fn was_submitted(&self, block_id: u64) -> bool {
        (**self).was_submitted(block_id)
    }

    fn block_number_of(&self, block_id: u64) -> Option<u64> {
        (**self).block_number_of(block_id)
    }
}

impl<T: SubmissionLookup + ?Sized> SubmissionLookup for Arc<T> {
    fn was_submitted(&self, block_id: u64) -> bool {
        (**self).was_submitted(block_id)
    }

    fn block_number_of(&self, block_id: u64) -> Option<u64> {
        (**self).block_number_of(block_id)
    }
}
