//! Signature-gated batch execution account.
//!
//! The account is the usual carrier of a protected call: its owner signs a batch off-chain and a
//! relayer submits it as the first transaction of the block.

use alloy_primitives::{Address, B256, Bytes, U256, keccak256};
use alloy_sol_types::{SolValue, sol};
use tracing::{debug, warn};

use crate::{SlasherError, SlasherResult, signature::signed_by};

sol! {
    /// A single call in a batch.
    #[derive(Debug, PartialEq, Eq)]
    struct Call {
        /// Address to call.
        address to;
        /// Value to send.
        uint256 value;
        /// Calldata.
        bytes data;
    }
}

/// Runs the calls of a batch on behalf of the account.
pub trait CallExecutor {
    /// Error returned by a failed call.
    type Error: core::fmt::Display;

    /// Performs `call` from `from` and returns its output.
    fn call(&mut self, from: Address, call: &Call) -> Result<Bytes, Self::Error>;
}

/// An account that executes batches signed by its owner, with replay protection by nonce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchAccount {
    owner: Address,
    nonce: u64,
}

impl BatchAccount {
    /// Creates an account controlled by `owner`, starting at nonce zero.
    pub const fn new(owner: Address) -> Self {
        Self { owner, nonce: 0 }
    }

    /// Returns the owner.
    pub const fn owner(&self) -> Address {
        self.owner
    }

    /// Returns the nonce the next batch must be signed with.
    pub const fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Returns the digest the owner signs for `calls` at `nonce`:
    /// `keccak256(abi.encode(nonce, calls))`.
    pub fn batch_digest(nonce: u64, calls: &[Call]) -> B256 {
        keccak256((U256::from(nonce), calls.to_vec()).abi_encode_params())
    }

    /// Executes `calls` in order if `signature` is the owner's signature over the batch digest.
    ///
    /// The first failing call fails the whole batch and leaves the nonce unchanged. Rolling back
    /// the effects of earlier calls is up to `executor`.
    pub fn execute<E: CallExecutor + ?Sized>(
        &mut self,
        calls: &[Call],
        signature: &[u8],
        executor: &mut E,
    ) -> SlasherResult<Vec<Bytes>> {
        let digest = Self::batch_digest(self.nonce, calls);
        if !signed_by(digest, signature, self.owner) {
            warn!(
                target: "tob::account",
                owner = %self.owner,
                nonce = self.nonce,
                "invalid batch signature"
            );
            return Err(SlasherError::InvalidSignature);
        }

        let mut outputs = Vec::with_capacity(calls.len());
        for (index, call) in calls.iter().enumerate() {
            let output = executor.call(self.owner, call).map_err(|err| {
                debug!(target: "tob::account", index, to = %call.to, %err, "batch call failed");
                SlasherError::CallFailed { index }
            })?;
            outputs.push(output);
        }

        self.nonce += 1;
        Ok(outputs)
    }
}
