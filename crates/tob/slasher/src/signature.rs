//! Raw-hash ECDSA recovery.

use alloy_primitives::{Address, B256, Signature};

/// Recovers the signer of `hash` from a 65 byte `r || s || v` signature.
///
/// `hash` is signed as is, without a message prefix. Signatures with `s` in the upper half of the
/// curve order are rejected, so every signer has exactly one accepted encoding per hash.
pub(crate) fn recover_signer(hash: B256, signature: &[u8]) -> Option<Address> {
    let Ok(signature) = Signature::try_from(signature) else {
        return None;
    };
    if signature.normalize_s().is_some() {
        return None;
    }
    signature.recover_address_from_prehash(&hash).ok()
}

/// Returns `true` if `signature` over `hash` recovers to `expected`.
pub(crate) fn signed_by(hash: B256, signature: &[u8], expected: Address) -> bool {
    recover_signer(hash, signature) == Some(expected)
}
