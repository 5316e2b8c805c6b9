//! Storage backends for challenge and fault records.

use std::collections::HashMap;

use alloy_primitives::B256;

use super::{Challenge, GatewayFault};

/// Keyed storage for challenges and gateway faults.
///
/// The engine checks every precondition before writing, so implementations only need to
/// store and return records.
pub trait ChallengeStore {
    /// Returns the challenge stored under `id`.
    fn challenge(&self, id: B256) -> Option<Challenge>;

    /// Stores `challenge` under `id`, replacing any previous record.
    fn put_challenge(&mut self, id: B256, challenge: Challenge);

    /// Returns the gateway fault stored under `id`.
    fn fault(&self, id: B256) -> Option<GatewayFault>;

    /// Stores `fault` under `id`, replacing any previous record.
    fn put_fault(&mut self, id: B256, fault: GatewayFault);
}

/// A [`ChallengeStore`] backed by hash maps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryChallengeStore {
    challenges: HashMap<B256, Challenge>,
    faults: HashMap<B256, GatewayFault>,
}

impl InMemoryChallengeStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored challenges.
    pub fn challenges(&self) -> usize {
        self.challenges.len()
    }

    /// Number of stored gateway faults.
    pub fn faults(&self) -> usize {
        self.faults.len()
    }
}

impl ChallengeStore for InMemoryChallengeStore {
    fn challenge(&self, id: B256) -> Option<Challenge> {
        self.challenges.get(&id).copied()
    }

    fn put_challenge(&mut self, id: B256, challenge: Challenge) {
        self.challenges.insert(id, challenge);
    }

    fn fault(&self, id: B256) -> Option<GatewayFault> {
        self.faults.get(&id).copied()
    }

    fn put_fault(&mut self, id: B256, fault: GatewayFault) {
        self.faults.insert(id, fault);
    }
}
