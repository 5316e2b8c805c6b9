//! Construction-time settings for the slasher and the guard.

use alloy_primitives::{Address, U256};
use base_tob_primitives::TX_BASE_GAS;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Default challenge window, two hours.
pub const DEFAULT_CHALLENGE_WINDOW_SECS: u64 = 7_200;

/// Settings of a [`FaultAttributionEngine`](crate::FaultAttributionEngine).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlasherConfig {
    /// Length of every dispute window, in seconds.
    #[serde(default = "default_challenge_window_secs")]
    pub challenge_window_secs: u64,
    /// The commitment type tag this slasher adjudicates.
    pub commitment_type: u64,
    /// Amount returned to the registry when a proposer is slashed.
    pub slash_amount: U256,
    /// The contract whose calls must land at the top of the block.
    pub protected_contract: Address,
    /// The registry, the only caller allowed to slash.
    pub registry: Address,
    /// This slasher's own identity, as named in commitments.
    pub slasher: Address,
}

impl SlasherConfig {
    /// Checks the window is non-zero and every address is set.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.challenge_window_secs == 0 {
            return Err(ConfigError::ZeroChallengeWindow);
        }
        for (name, address) in [
            ("protectedContract", self.protected_contract),
            ("registry", self.registry),
            ("slasher", self.slasher),
        ] {
            if address.is_zero() {
                return Err(ConfigError::MissingAddress(name));
            }
        }
        Ok(())
    }
}

/// Settings of a [`TopOfBlockGuard`](crate::TopOfBlockGuard).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardConfig {
    /// The only account allowed to change the intrinsic gas overhead.
    pub owner: Address,
    /// Gas charged before the protected operation starts that still counts as top of block.
    #[serde(default = "default_intrinsic_gas_overhead")]
    pub intrinsic_gas_overhead: u64,
}

impl GuardConfig {
    /// Creates a config for `owner` with the minimum overhead.
    pub const fn new(owner: Address) -> Self {
        Self { owner, intrinsic_gas_overhead: TX_BASE_GAS }
    }

    /// Checks the overhead is at least the base transaction cost.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.intrinsic_gas_overhead < TX_BASE_GAS {
            return Err(ConfigError::IntrinsicGasCostTooLow {
                value: self.intrinsic_gas_overhead,
                minimum: TX_BASE_GAS,
            });
        }
        Ok(())
    }
}

const fn default_challenge_window_secs() -> u64 {
    DEFAULT_CHALLENGE_WINDOW_SECS
}

const fn default_intrinsic_gas_overhead() -> u64 {
    TX_BASE_GAS
}
