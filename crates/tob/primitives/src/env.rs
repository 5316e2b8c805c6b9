//! Read-only view of the execution environment.
//!
//! Everything the slasher and the inclusion verifier learn about the chain goes through these
//! traits, so operations stay synchronous lookups against already-committed state.

use alloy_primitives::B256;

use crate::BLOCK_HASH_WINDOW;

/// Access to the chain's trusted block hashes.
pub trait BlockHashes {
    /// Returns the number of the block currently executing.
    fn block_number(&self) -> u64;

    /// Returns the canonical hash of block `number`, if the environment knows it.
    fn block_hash(&self, number: u64) -> Option<B256>;

    /// Returns the hash of block `number` only if it lies in the recent hash window
    /// (`current - 256 <= number < current`), mirroring the `BLOCKHASH` opcode.
    fn recent_block_hash(&self, number: u64) -> Option<B256> {
        let current = self.block_number();
        if number >= current || current - number > BLOCK_HASH_WINDOW {
            return None;
        }
        self.block_hash(number)
    }
}

/// Block context of the currently executing block.
pub trait ChainState: BlockHashes {
    /// Returns the current block timestamp in seconds. This is the block identifier.
    fn timestamp(&self) -> u64;

    /// Returns the current block gas limit.
    fn gas_limit(&self) -> u64;
}

/// Measurement of the execution budget left to the running call.
pub trait GasMeter {
    /// Returns the gas remaining at the point of measurement.
    fn gas_left(&self) -> u64;
}

/// A [`GasMeter`] that always reports the same value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedGasMeter(pub u64);

impl GasMeter for FixedGasMeter {
    fn gas_left(&self) -> u64 {
        self.0
    }
}

impl<T: BlockHashes + ?Sized> BlockHashes for &T {
    fn block_number(&self) -> u64 {
        (**self).block_number()
    }

    fn block_hash(&self, number: u64) -> Option<B256> {
        (**self).block_hash(number)
    }
}

impl<T: ChainState + ?Sized> ChainState for &T {
    fn timestamp(&self) -> u64 {
        (**self).timestamp()
    }

    fn gas_limit(&self) -> u64 {
        (**self).gas_limit()
    }
}

impl<T: GasMeter + ?Sized> GasMeter for &T {
    fn gas_left(&self) -> u64 {
        (**self).gas_left()
    }
}
