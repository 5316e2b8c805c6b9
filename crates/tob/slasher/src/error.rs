//! Error types for the slasher.

use alloy_primitives::{Address, B256};
use base_tob_inclusion::InclusionError;
use base_tob_primitives::CommitmentError;
use thiserror::Error;

use crate::ChallengeStatus;

/// A [Result] type alias where the error is [`SlasherError`].
pub type SlasherResult<T> = Result<T, SlasherError>;

/// Reasons a slasher, guard or account operation is rejected.
///
/// Every rejection leaves state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlasherError {
    /// `slash` was called by someone other than the registry.
    #[error("only the registry may slash, called by {caller}")]
    OnlyUrc {
        /// The rejected caller.
        caller: Address,
    },
    /// An owner-only setting was changed by someone else.
    #[error("{caller} is not authorized")]
    Unauthorized {
        /// The rejected caller.
        caller: Address,
    },
    /// A challenge already exists for this commitment and delegation.
    #[error("challenge {0} already exists")]
    ChallengeAlreadyExists(B256),
    /// A gateway fault already exists for this signed commitment.
    #[error("gateway fault {0} already exists")]
    GatewayFaultAlreadyExists(B256),
    /// The record is not in the status the transition starts from.
    #[error("wrong challenge status: expected {expected}, got {actual}")]
    WrongChallengeStatus {
        /// Status the transition requires.
        expected: ChallengeStatus,
        /// Status the record is in.
        actual: ChallengeStatus,
    },
    /// The protected operation ran at the top of the committed block.
    #[error("commitment for block {block_id} was honored")]
    CommitmentWasNotBroken {
        /// The committed block identifier.
        block_id: u64,
    },
    /// The window for this step has closed.
    #[error("challenge period expired at {deadline}, now {now}")]
    ChallengePeriodExpired {
        /// Last second the step was allowed.
        deadline: u64,
        /// Current block timestamp.
        now: u64,
    },
    /// The window for this step is still open.
    #[error("challenge period open until {deadline}, now {now}")]
    ChallengePeriodNotExpired {
        /// Last second of the window.
        deadline: u64,
        /// Current block timestamp.
        now: u64,
    },
    /// The commitment does not target the protected contract.
    #[error("invalid destination: expected {expected}, got {actual}")]
    InvalidDestination {
        /// The configured protected contract.
        expected: Address,
        /// Target named by the commitment.
        actual: Address,
    },
    /// The commitment type tag is not the one this slasher handles.
    #[error("invalid commitment type: expected {expected}, got {actual}")]
    InvalidCommitmentType {
        /// The configured commitment type.
        expected: u64,
        /// Type of the commitment.
        actual: u64,
    },
    /// The commitment designates a different slasher.
    #[error("wrong slasher: expected {expected}, got {actual}")]
    WrongSlasher {
        /// This slasher's identity.
        expected: Address,
        /// Slasher named by the commitment.
        actual: Address,
    },
    /// The operation expected to run in a different block.
    #[error("block identifier mismatch: expected {expected}, current {actual}")]
    BlockIdentifierMismatch {
        /// Block identifier declared by the caller.
        expected: u64,
        /// Timestamp of the executing block.
        actual: u64,
    },
    /// Gas was spent in the block before the protected operation started.
    #[error("not top of block: {consumed} gas consumed, at most {allowed} allowed")]
    NotTopOfBlock {
        /// Gas consumed before the operation, net of the intrinsic overhead.
        consumed: u64,
        /// The allowance for a single transaction's base cost.
        allowed: u64,
    },
    /// The intrinsic gas overhead is below the base transaction cost.
    #[error("intrinsic gas cost {value} is below {minimum}")]
    IntrinsicGasCostTooLow {
        /// The rejected value.
        value: u64,
        /// The floor.
        minimum: u64,
    },
    /// A signature is malformed or not from the expected signer.
    #[error("invalid signature")]
    InvalidSignature,
    /// No trusted hash is known for the committed block.
    #[error("block hash unavailable for block {block_id}")]
    BlockHashUnavailable {
        /// The committed block identifier.
        block_id: u64,
    },
    /// A call in a batch failed.
    #[error("call {index} failed")]
    CallFailed {
        /// Position of the failed call in the batch.
        index: usize,
    },
    /// The commitment payload could not be decoded.
    #[error(transparent)]
    Commitment(#[from] CommitmentError),
    /// The inclusion proof was rejected.
    #[error(transparent)]
    Inclusion(#[from] InclusionError),
}

/// Invalid configuration values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The challenge window is zero.
    #[error("challenge window must be non-zero")]
    ZeroChallengeWindow,
    /// A required address is unset.
    #[error("{0} address must be set")]
    MissingAddress(&'static str),
    /// The intrinsic gas overhead is below the base transaction cost.
    #[error("intrinsic gas overhead {value} is below {minimum}")]
    IntrinsicGasCostTooLow {
        /// The configured value.
        value: u64,
        /// The floor.
        minimum: u64,
    },
}
