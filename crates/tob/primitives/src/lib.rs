#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/base/base/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod commitment;
pub use commitment::{
    Commitment, CommitmentError, Delegation, SignedCommitment, ToBCommitment, challenge_id,
};

mod constants;
pub use constants::{BLOCK_HASH_WINDOW, MAX_BLOCK_IDENTIFIER, SELECTOR_LEN, TX_BASE_GAS};

mod env;
pub use env::{BlockHashes, ChainState, FixedGasMeter, GasMeter};
