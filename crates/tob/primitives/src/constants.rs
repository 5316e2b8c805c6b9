//! Protocol constants.

/// Gas charged to every transaction before any execution. Doubles as the floor for the
/// configured intrinsic overhead of a guarded call.
pub const TX_BASE_GAS: u64 = 21_000;

/// Number of most recent block hashes the execution environment exposes.
pub const BLOCK_HASH_WINDOW: u64 = 256;

/// Length of an ABI function selector.
pub const SELECTOR_LEN: usize = 4;

/// Largest block identifier a ToB payload can carry, `type(uint48).max`.
pub const MAX_BLOCK_IDENTIFIER: u64 = (1 << 48) - 1;
