#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/base/base/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod error;
pub use error::{InclusionError, InclusionResult, TrieProofError};

mod header;
pub use header::{
    BASE_FEE_INDEX, HeaderFields, NUMBER_INDEX, PARENT_HASH_INDEX, STATE_ROOT_INDEX,
    TIMESTAMP_INDEX, TRANSACTIONS_ROOT_INDEX,
};

mod rlp;

mod trie;
pub use trie::{EMPTY_ROOT_HASH, proof_lookup};

mod verifier;
pub use verifier::{
    ExpectedInclusion, IncludedTransaction, InclusionProof, TOB_TRANSACTION_KEY,
    verify_tob_inclusion,
};
