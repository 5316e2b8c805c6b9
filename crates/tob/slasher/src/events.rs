//! Events emitted on committed state transitions.

use alloy_primitives::{Address, B256, U256};

/// A committed state transition, buffered until drained with `take_events`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlasherEvent {
    /// The protected operation ran at the top of a block.
    SubmissionRecorded {
        /// Timestamp of the block.
        block_id: u64,
        /// Number of the block.
        block_number: u64,
    },
    /// The intrinsic gas overhead changed.
    IntrinsicGasCostUpdated {
        /// Previous value.
        old: u64,
        /// New value.
        new: u64,
    },
    /// A challenge was opened against a broken commitment.
    ChallengeOpened {
        /// The challenge key.
        challenge_id: B256,
        /// The committed block identifier.
        block_id: u64,
        /// The delegation's committer.
        committer: Address,
    },
    /// The proposer was found at fault and slashed through the registry.
    ProposerSlashed {
        /// The challenge key.
        challenge_id: B256,
        /// Amount returned to the registry.
        amount: U256,
        /// The party credited by the registry.
        challenger: Address,
    },
    /// Blame moved from the proposer to its gateway.
    GatewayFaultProven {
        /// The fault key.
        fault_id: B256,
        /// The challenge the fault was attributed from.
        challenge_id: B256,
        /// The gateway at fault.
        gateway: Address,
    },
    /// The gateway did not defend itself in time.
    GatewaySlashable {
        /// The fault key.
        fault_id: B256,
        /// The gateway at fault.
        gateway: Address,
    },
    /// The gateway proved the committed call ran at the top of the block.
    GatewayVindicated {
        /// The fault key.
        fault_id: B256,
        /// The cleared gateway.
        gateway: Address,
        /// Hash of the block the call was included in.
        block_hash: B256,
    },
}
