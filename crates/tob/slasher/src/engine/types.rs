//! Challenge and gateway fault records.

use alloy_primitives::{Address, B256};
use derive_more::Display;

/// Status of a challenge or a gateway fault.
///
/// Records only move forward: from `Unresolved` to exactly one of the terminal statuses.
#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ChallengeStatus {
    /// No record exists.
    #[default]
    Nonexistent,
    /// Opened and awaiting resolution.
    Unresolved,
    /// The proposer was slashed.
    ProposerFault,
    /// Blame moved to the gateway. Terminal-guilty for a gateway fault.
    GatewayFault,
    /// The gateway proved its innocence.
    Vindicated,
}

/// A dispute against a proposer's broken commitment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Challenge {
    /// Timestamp the challenge was opened at.
    pub created_at: u64,
    /// Current status.
    pub status: ChallengeStatus,
}

/// A fault attributed to the gateway a proposer delegated to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GatewayFault {
    /// The gateway at fault.
    pub gateway: Address,
    /// Timestamp the fault was attributed at.
    pub created_at: u64,
    /// The challenge the fault was attributed from.
    pub challenge_id: B256,
    /// Current status.
    pub status: ChallengeStatus,
}
