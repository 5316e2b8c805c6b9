//! Deterministic test accounts.

use alloy_primitives::{Address, B256, Bytes, FixedBytes, Signature, U256, address, hex};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;

/// Anvil's deterministic accounts, named after the role they play in tests.
///
/// Derived from the test mnemonic: "test test test test test test test test test test test junk"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Account {
    /// The proposer that made a commitment (Anvil account #0).
    Proposer,
    /// The gateway the proposer delegated to (Anvil account #1).
    Gateway,
    /// A third party opening challenges (Anvil account #2).
    Challenger,
    /// Owner of guarded contracts and batch accounts (Anvil account #3).
    Owner,
}

impl Account {
    /// Returns the Ethereum address for this account.
    pub const fn address(&self) -> Address {
        match self {
            Self::Proposer => address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266"),
            Self::Gateway => address!("70997970C51812dc3A010C7d01b50e0d17dc79C8"),
            Self::Challenger => address!("3C44CdDdB6a900fa2b585dd299e03d12FA4293BC"),
            Self::Owner => address!("90F79bf6EB2c4f870365E785982E1f101E93b906"),
        }
    }

    /// Returns the private key (hex string without 0x prefix).
    pub const fn private_key(&self) -> &'static str {
        match self {
            Self::Proposer => "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
            Self::Gateway => "59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d",
            Self::Challenger => "5de4111afa1a4b94908f83103eb1f1706367c2e68ca870fc3fb9a804cdab365a",
            Self::Owner => "7c852118294e51e653712a81e05800f419141751be58f605c371e15141b007a6",
        }
    }

    /// Constructs and returns a `PrivateKeySigner` for this account.
    pub fn signer(&self) -> PrivateKeySigner {
        let key_bytes =
            hex::decode(self.private_key()).expect("should be able to decode private key");
        let key_fixed: FixedBytes<32> = FixedBytes::from_slice(&key_bytes);
        PrivateKeySigner::from_bytes(&key_fixed)
            .expect("should be able to build the PrivateKeySigner")
    }

    /// Signs `hash` directly (no message prefix) and returns the 65 byte `r || s || v` encoding.
    pub fn sign_hash(&self, hash: B256) -> Bytes {
        let signature = self.signer().sign_hash_sync(&hash).expect("signing works");
        Bytes::copy_from_slice(&signature.as_bytes())
    }
}

/// Returns the high-s twin of a 65 byte signature.
///
/// Replaces `s` with `n - s` and flips the parity, which recovers the same signer from different
/// bytes.
pub fn malleate_signature(signature: &[u8]) -> Bytes {
    let order = U256::from_be_bytes(hex!(
        "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141"
    ));
    let signature = Signature::try_from(signature).expect("65 byte signature");
    let twin = Signature::new(signature.r(), order - signature.s(), !signature.v());
    Bytes::copy_from_slice(&twin.as_bytes())
}
