//! Block, transaction and trie fixtures.

use alloy_consensus::{Header, SignableTransaction, TxEip1559};
use alloy_eips::eip2718::Encodable2718;
use alloy_primitives::{Address, B256, Bytes, TxKind, U256, keccak256};
use alloy_rlp::Encodable;
use alloy_signer::SignerSync;
use alloy_trie::{HashBuilder, Nibbles, proof::ProofRetainer};

use crate::{Account, MockChain};

/// Chain id used for test transactions.
pub const TEST_CHAIN_ID: u64 = 8453;

/// Creates a test header with the given block number and timestamp.
pub fn test_header(number: u64, timestamp: u64) -> Header {
    Header {
        parent_hash: B256::repeat_byte(0x01),
        ommers_hash: B256::ZERO,
        beneficiary: Address::repeat_byte(0x02),
        state_root: B256::repeat_byte(0x03),
        transactions_root: B256::repeat_byte(0x04),
        receipts_root: B256::repeat_byte(0x05),
        logs_bloom: Default::default(),
        difficulty: Default::default(),
        number,
        gas_limit: 30_000_000,
        gas_used: 21_000,
        timestamp,
        extra_data: Default::default(),
        mix_hash: B256::repeat_byte(0x06),
        nonce: Default::default(),
        base_fee_per_gas: Some(1_000_000_000),
        withdrawals_root: Some(B256::repeat_byte(0x07)),
        blob_gas_used: Some(131_072),
        excess_blob_gas: Some(0),
        parent_beacon_block_root: Some(B256::repeat_byte(0x08)),
        requests_hash: None,
    }
}

/// Build and sign an EIP-1559 transaction, returning its EIP-2718 encoding.
pub fn build_eip1559_tx(nonce: u64, to: TxKind, input: Bytes, account: Account) -> Bytes {
    let tx = TxEip1559 {
        chain_id: TEST_CHAIN_ID,
        nonce,
        gas_limit: 30_000_000,
        max_fee_per_gas: 1_000_000_000,
        max_priority_fee_per_gas: 1_000_000_000,
        to,
        value: U256::ZERO,
        access_list: Default::default(),
        input,
    };

    let signature = account.signer().sign_hash_sync(&tx.signature_hash()).expect("signing works");
    tx.into_signed(signature).encoded_2718().into()
}

/// RLP-encodes a transaction index for use as a trie key.
pub fn index_key(index: usize) -> Vec<u8> {
    alloy_rlp::encode(index)
}

/// Builds a trie over `leaves` and returns its root with the proof for `target`, root first.
pub fn trie_with_proof(leaves: &[(Vec<u8>, Vec<u8>)], target: &[u8]) -> (B256, Vec<Bytes>) {
    let mut sorted = leaves.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));

    let mut builder = HashBuilder::default()
        .with_proof_retainer(ProofRetainer::new(vec![Nibbles::unpack(target)]));
    for (key, value) in &sorted {
        builder.add_leaf(Nibbles::unpack(key), value);
    }

    let root = builder.root();
    let proof =
        builder.take_proof_nodes().into_nodes_sorted().into_iter().map(|(_, node)| node).collect();
    (root, proof)
}

/// A block and its parent as raw RLP headers, with the transaction proof for index 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockFixture {
    /// Number of the block.
    pub block_number: u64,
    /// RLP header of the parent block.
    pub previous_header: Bytes,
    /// RLP header of the block.
    pub header: Bytes,
    /// Transaction trie proof for index 0, root first.
    pub transaction_proof: Vec<Bytes>,
}

impl BlockFixture {
    /// Builds block `number` at `timestamp` holding `transactions` in order.
    pub fn new(number: u64, timestamp: u64, transactions: &[Bytes]) -> Self {
        let previous = test_header(
            number.saturating_sub(1),
            timestamp.saturating_sub(MockChain::BLOCK_TIME),
        );
        let previous_header = encode_header(&previous);

        let leaves: Vec<_> =
            transactions.iter().enumerate().map(|(i, tx)| (index_key(i), tx.to_vec())).collect();
        let (transactions_root, transaction_proof) = trie_with_proof(&leaves, &index_key(0));

        let header = Header {
            parent_hash: keccak256(&previous_header),
            transactions_root,
            ..test_header(number, timestamp)
        };

        Self {
            block_number: number,
            previous_header,
            header: encode_header(&header),
            transaction_proof,
        }
    }

    /// Hash of the parent header.
    pub fn previous_hash(&self) -> B256 {
        keccak256(&self.previous_header)
    }

    /// Hash of the block header.
    pub fn hash(&self) -> B256 {
        keccak256(&self.header)
    }

    /// Registers the hashes of both headers with `chain`.
    pub fn install(&self, chain: &mut MockChain) {
        chain.set_block_hash(self.block_number.saturating_sub(1), self.previous_hash());
        chain.set_block_hash(self.block_number, self.hash());
    }
}

fn encode_header(header: &Header) -> Bytes {
    let mut buf = Vec::with_capacity(header.length());
    header.encode(&mut buf);
    buf.into()
}
