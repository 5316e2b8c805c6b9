//! Merkle-Patricia proof lookup.
//!
//! Walks a list of proof nodes from a trusted root towards a key and returns the value stored
//! under it. Nodes referenced by hash must hash to that reference; nodes shorter than 32 bytes
//! are embedded in their parent and may or may not be repeated in the proof.

use alloy_primitives::{B256, Bytes, keccak256};
use alloy_rlp::Decodable;
use alloy_trie::{
    Nibbles,
    nodes::{BranchNode, RlpNode, TrieNode},
};

pub use alloy_trie::EMPTY_ROOT_HASH;

use crate::TrieProofError;

/// Returns the value stored under `key` in the trie rooted at `root`.
///
/// `Ok(None)` means the proof shows the key is absent. Proof nodes must be ordered from the root
/// towards the leaf.
pub fn proof_lookup(
    root: B256,
    key: &[u8],
    proof: &[Bytes],
) -> Result<Option<Vec<u8>>, TrieProofError> {
    if root == EMPTY_ROOT_HASH {
        return Ok(None);
    }

    let path = Nibbles::unpack(key);
    let mut depth = 0;
    let mut nodes = proof.iter().peekable();
    let mut next = RlpNode::word_rlp(&root);

    loop {
        let node = match next.as_hash() {
            Some(expected) => {
                let node = nodes.next().ok_or(TrieProofError::MissingNode(expected))?;
                let actual = keccak256(node);
                if actual != expected {
                    return Err(TrieProofError::NodeHashMismatch { expected, actual });
                }
                TrieNode::decode(&mut node.as_ref())?
            }
            None => {
                let raw = &next[..];
                if nodes.peek().is_some_and(|node| node.as_ref() == raw) {
                    nodes.next();
                }
                TrieNode::decode(&mut &raw[..])?
            }
        };

        let rest = path.slice(depth..);
        match node {
            TrieNode::EmptyRoot => return Ok(None),
            TrieNode::Branch(branch) => {
                let Some(nibble) = path.get(depth) else {
                    return Ok(None);
                };
                match branch_child(&branch, nibble)? {
                    Some(child) => next = child,
                    None => return Ok(None),
                }
                depth += 1;
            }
            TrieNode::Extension(extension) => {
                if !rest.starts_with(&extension.key) {
                    return Ok(None);
                }
                depth += extension.key.len();
                next = extension.child;
            }
            TrieNode::Leaf(leaf) => {
                return Ok((leaf.key == rest).then_some(leaf.value));
            }
        }
    }
}

/// Returns the reference a branch holds for `nibble`, `None` if that slot is empty.
fn branch_child(branch: &BranchNode, nibble: u8) -> Result<Option<RlpNode>, TrieProofError> {
    if !branch.state_mask.is_bit_set(nibble) {
        return Ok(None);
    }
    let below = branch.state_mask.get() & ((1u16 << nibble) - 1);
    branch
        .stack
        .get(below.count_ones() as usize)
        .cloned()
        .map(Some)
        .ok_or(TrieProofError::InvalidNode("branch is missing a child named by its mask"))
}

#[cfg(test)]
mod tests {
    use base_tob_test_utils::{index_key, trie_with_proof};
    use rstest::rstest;

    use super::*;

    fn leaves(count: usize, value_len: usize) -> Vec<(Vec<u8>, Vec<u8>)> {
        (0..count).map(|i| (index_key(i), vec![i as u8 + 1; value_len])).collect()
    }

    #[rstest]
    #[case::single_hashed_leaf(1, 64, 0)]
    #[case::branch_hashed_leaves(3, 64, 0)]
    #[case::branch_hashed_leaves_last(3, 64, 2)]
    #[case::inline_leaves(3, 2, 0)]
    #[case::deep_trie(200, 40, 0)]
    #[case::deep_trie_high_index(200, 40, 130)]
    fn test_proof_lookup_finds_value(
        #[case] count: usize,
        #[case] value_len: usize,
        #[case] index: usize,
    ) {
        let leaves = leaves(count, value_len);
        let key = index_key(index);
        let (root, proof) = trie_with_proof(&leaves, &key);

        let value = proof_lookup(root, &key, &proof).unwrap();
        assert_eq!(value, Some(vec![index as u8 + 1; value_len]));
    }

    #[test]
    fn test_proof_lookup_absent_key() {
        let leaves: Vec<_> = leaves(4, 64).into_iter().skip(1).collect();
        let key = index_key(0);
        let (root, proof) = trie_with_proof(&leaves, &key);

        assert_eq!(proof_lookup(root, &key, &proof).unwrap(), None);
    }

    #[test]
    fn test_proof_lookup_empty_trie() {
        assert_eq!(proof_lookup(EMPTY_ROOT_HASH, &index_key(0), &[]).unwrap(), None);
    }

    #[test]
    fn test_proof_lookup_tampered_node() {
        let leaves = leaves(3, 64);
        let key = index_key(0);
        let (root, mut proof) = trie_with_proof(&leaves, &key);

        let last = proof.len() - 1;
        let mut node = proof[last].to_vec();
        let end = node.len() - 1;
        node[end] ^= 0xff;
        proof[last] = node.into();

        let err = proof_lookup(root, &key, &proof).unwrap_err();
        assert!(matches!(err, TrieProofError::NodeHashMismatch { .. }));
    }

    #[test]
    fn test_proof_lookup_truncated_proof() {
        let leaves = leaves(3, 64);
        let key = index_key(0);
        let (root, mut proof) = trie_with_proof(&leaves, &key);
        proof.pop();

        let err = proof_lookup(root, &key, &proof).unwrap_err();
        assert!(matches!(err, TrieProofError::MissingNode(_)));
    }

    #[test]
    fn test_proof_lookup_wrong_root() {
        let leaves = leaves(3, 64);
        let key = index_key(0);
        let (_, proof) = trie_with_proof(&leaves, &key);

        let err = proof_lookup(B256::repeat_byte(0x42), &key, &proof).unwrap_err();
        assert_eq!(
            err,
            TrieProofError::NodeHashMismatch {
                expected: B256::repeat_byte(0x42),
                actual: keccak256(&proof[0]),
            }
        );
    }
}
