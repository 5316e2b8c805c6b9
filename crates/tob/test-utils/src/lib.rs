#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/base/base/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod accounts;
pub use accounts::{Account, malleate_signature};

mod blocks;
pub use blocks::{
    BlockFixture, TEST_CHAIN_ID, build_eip1559_tx, index_key, test_header, trie_with_proof,
};

mod chain;
pub use chain::MockChain;
