//! The challenge and gateway fault state machine.
//!
//! A challenge is opened against a commitment whose block has no recorded top-of-block
//! submission. From there, within one challenge window, either:
//!
//! - nobody answers, and after the window the registry slashes the proposer, or
//! - the delegated gateway is shown to have signed both the commitment and the committed block's
//!   hash, which moves blame to the gateway.
//!
//! A gateway fault runs its own window, measured from the attribution. The gateway clears itself
//! by proving the committed call was the first transaction of the block, otherwise anyone may
//! mark it slashable once the window has passed.
//!
//! Every transition checks all of its preconditions before writing anything, so a rejected call
//! leaves the store untouched.

use alloy_primitives::{Address, B256, U256};
use base_tob_inclusion::{ExpectedInclusion, InclusionProof, verify_tob_inclusion};
use base_tob_primitives::{ChainState, Commitment, Delegation, SignedCommitment, challenge_id};
use tracing::{debug, info, warn};

use crate::{
    ConfigError, SlasherConfig, SlasherError, SlasherEvent, SlasherMetrics, SlasherResult,
    SubmissionLookup, signature::signed_by,
};

mod store;
pub use store::{ChallengeStore, InMemoryChallengeStore};

mod types;
pub use types::{Challenge, ChallengeStatus, GatewayFault};

/// Adjudicates broken top-of-block commitments between a proposer and its gateway.
#[derive(Debug)]
pub struct FaultAttributionEngine<S = InMemoryChallengeStore> {
    config: SlasherConfig,
    store: S,
    events: Vec<SlasherEvent>,
    metrics: SlasherMetrics,
}

impl FaultAttributionEngine<InMemoryChallengeStore> {
    /// Creates an engine backed by an empty [`InMemoryChallengeStore`].
    pub fn in_memory(config: SlasherConfig) -> Result<Self, ConfigError> {
        Self::new(config, InMemoryChallengeStore::new())
    }
}

impl<S: ChallengeStore> FaultAttributionEngine<S> {
    /// Creates an engine over `store` from a validated config.
    pub fn new(config: SlasherConfig, store: S) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, store, events: Vec::new(), metrics: SlasherMetrics::default() })
    }

    /// Opens a challenge against a commitment that was not honored, returning its key.
    ///
    /// Neither the delegation nor the commitment signature is checked here. A challenge opened
    /// with forged data can only be resolved through [`Self::slash`], which the registry calls
    /// after verifying both signatures itself.
    pub fn open_challenge<C, L>(
        &mut self,
        chain: &C,
        ledger: &L,
        delegation: &Delegation,
        commitment: &Commitment,
    ) -> SlasherResult<B256>
    where
        C: ChainState + ?Sized,
        L: SubmissionLookup + ?Sized,
    {
        let result = self.try_open_challenge(chain, ledger, delegation, commitment);
        self.observe("open_challenge", result)
    }

    /// Marks the proposer at fault once the challenge window has passed, returning the slash
    /// amount. Only the registry may call this.
    ///
    /// `committer`, `evidence` and `challenger` are supplied by the registry after it verified the
    /// signature chain; they are only reported.
    #[allow(clippy::too_many_arguments)]
    pub fn slash<C: ChainState + ?Sized>(
        &mut self,
        chain: &C,
        caller: Address,
        delegation: &Delegation,
        commitment: &Commitment,
        committer: Address,
        evidence: &[u8],
        challenger: Address,
    ) -> SlasherResult<U256> {
        let result =
            self.try_slash(chain, caller, delegation, commitment, committer, evidence, challenger);
        self.observe("slash", result)
    }

    /// Moves blame from the proposer to the delegated gateway, returning the fault key.
    ///
    /// The gateway must have signed the commitment digest and, separately, the hash of the
    /// committed block. The block hash is resolved through the ledger's checkpoint for the
    /// committed timestamp.
    pub fn attribute_gateway_fault<C, L>(
        &mut self,
        chain: &C,
        ledger: &L,
        delegation: &Delegation,
        signed_commitment: &SignedCommitment,
        block_hash_signature: &[u8],
    ) -> SlasherResult<B256>
    where
        C: ChainState + ?Sized,
        L: SubmissionLookup + ?Sized,
    {
        let result = self.try_attribute_gateway_fault(
            chain,
            ledger,
            delegation,
            signed_commitment,
            block_hash_signature,
        );
        self.observe("attribute_gateway_fault", result)
    }

    /// Finalizes a gateway fault the gateway did not answer within its window.
    pub fn mark_gateway_slashable<C: ChainState + ?Sized>(
        &mut self,
        chain: &C,
        fault_id: B256,
    ) -> SlasherResult<()> {
        let result = self.try_mark_gateway_slashable(chain, fault_id);
        self.observe("mark_gateway_slashable", result)
    }

    /// Clears a gateway that proves the committed call was the first transaction of the block.
    ///
    /// Once the fault's window has closed this fails with
    /// [`SlasherError::ChallengePeriodExpired`], whether or not the fault was already marked
    /// slashable. Verifier errors are returned unchanged as [`SlasherError::Inclusion`].
    pub fn vindicate_gateway<C: ChainState + ?Sized>(
        &mut self,
        chain: &C,
        signed_commitment: &SignedCommitment,
        proof: &InclusionProof,
    ) -> SlasherResult<()> {
        let result = self.try_vindicate_gateway(chain, signed_commitment, proof);
        self.observe("vindicate_gateway", result)
    }

    /// Returns `true` if the gateway fault was finalized.
    pub fn gateway_slashable(&self, fault_id: B256) -> bool {
        self.fault(fault_id).status == ChallengeStatus::GatewayFault
    }

    /// Returns the challenge under `challenge_id`, or a `Nonexistent` default.
    pub fn challenge(&self, challenge_id: B256) -> Challenge {
        self.store.challenge(challenge_id).unwrap_or_default()
    }

    /// Returns the gateway fault under `fault_id`, or a `Nonexistent` default.
    pub fn fault(&self, fault_id: B256) -> GatewayFault {
        self.store.fault(fault_id).unwrap_or_default()
    }

    /// Returns the configuration.
    pub const fn config(&self) -> &SlasherConfig {
        &self.config
    }

    /// Returns the backing store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Drains the buffered events.
    pub fn take_events(&mut self) -> Vec<SlasherEvent> {
        std::mem::take(&mut self.events)
    }

    fn try_open_challenge<C, L>(
        &mut self,
        chain: &C,
        ledger: &L,
        delegation: &Delegation,
        commitment: &Commitment,
    ) -> SlasherResult<B256>
    where
        C: ChainState + ?Sized,
        L: SubmissionLookup + ?Sized,
    {
        let payload = commitment.tob_payload()?;
        let block_id = payload.blockIdentifier.to::<u64>();
        if ledger.was_submitted(block_id) {
            return Err(SlasherError::CommitmentWasNotBroken { block_id });
        }
        if payload.target != self.config.protected_contract {
            return Err(SlasherError::InvalidDestination {
                expected: self.config.protected_contract,
                actual: payload.target,
            });
        }
        if commitment.slasher != self.config.slasher {
            return Err(SlasherError::WrongSlasher {
                expected: self.config.slasher,
                actual: commitment.slasher,
            });
        }
        self.ensure_commitment_type(commitment)?;

        let id = challenge_id(commitment, delegation);
        if self.challenge(id).status != ChallengeStatus::Nonexistent {
            return Err(SlasherError::ChallengeAlreadyExists(id));
        }

        let created_at = chain.timestamp();
        self.store.put_challenge(id, Challenge { created_at, status: ChallengeStatus::Unresolved });

        self.metrics.challenges_opened.increment(1);
        info!(
            target: "tob::slasher",
            challenge_id = %id,
            block_id,
            created_at,
            "challenge opened"
        );
        self.events.push(SlasherEvent::ChallengeOpened {
            challenge_id: id,
            block_id,
            committer: delegation.committer,
        });
        Ok(id)
    }

    #[allow(clippy::too_many_arguments)]
    fn try_slash<C: ChainState + ?Sized>(
        &mut self,
        chain: &C,
        caller: Address,
        delegation: &Delegation,
        commitment: &Commitment,
        committer: Address,
        evidence: &[u8],
        challenger: Address,
    ) -> SlasherResult<U256> {
        if caller != self.config.registry {
            return Err(SlasherError::OnlyUrc { caller });
        }
        self.ensure_commitment_type(commitment)?;

        let id = challenge_id(commitment, delegation);
        let mut challenge = self.unresolved_challenge(id)?;
        self.ensure_expired(challenge.created_at, chain.timestamp())?;

        challenge.status = ChallengeStatus::ProposerFault;
        self.store.put_challenge(id, challenge);

        let amount = self.config.slash_amount;
        self.metrics.proposers_slashed.increment(1);
        info!(
            target: "tob::slasher",
            challenge_id = %id,
            %committer,
            %challenger,
            evidence_len = evidence.len(),
            %amount,
            "proposer slashed"
        );
        self.events.push(SlasherEvent::ProposerSlashed { challenge_id: id, amount, challenger });
        Ok(amount)
    }

    fn try_attribute_gateway_fault<C, L>(
        &mut self,
        chain: &C,
        ledger: &L,
        delegation: &Delegation,
        signed_commitment: &SignedCommitment,
        block_hash_signature: &[u8],
    ) -> SlasherResult<B256>
    where
        C: ChainState + ?Sized,
        L: SubmissionLookup + ?Sized,
    {
        let commitment = &signed_commitment.commitment;
        let challenge_id = challenge_id(commitment, delegation);
        let mut challenge = self.unresolved_challenge(challenge_id)?;
        let now = chain.timestamp();
        self.ensure_open(challenge.created_at, now)?;

        let block_id = commitment.tob_payload()?.blockIdentifier.to::<u64>();
        let block_hash = ledger
            .block_number_of(block_id)
            .and_then(|number| chain.block_hash(number))
            .ok_or(SlasherError::BlockHashUnavailable { block_id })?;

        let gateway = delegation.committer;
        if !signed_by(commitment.digest(), &signed_commitment.signature, gateway) ||
            !signed_by(block_hash, block_hash_signature, gateway)
        {
            return Err(SlasherError::InvalidSignature);
        }

        let fault_id = signed_commitment.fault_id();
        if self.fault(fault_id).status != ChallengeStatus::Nonexistent {
            return Err(SlasherError::GatewayFaultAlreadyExists(fault_id));
        }

        challenge.status = ChallengeStatus::GatewayFault;
        self.store.put_challenge(challenge_id, challenge);
        self.store.put_fault(
            fault_id,
            GatewayFault {
                gateway,
                created_at: now,
                challenge_id,
                status: ChallengeStatus::Unresolved,
            },
        );

        self.metrics.gateway_faults_proven.increment(1);
        info!(
            target: "tob::slasher",
            %challenge_id,
            %fault_id,
            %gateway,
            %block_hash,
            "gateway fault proven"
        );
        self.events.push(SlasherEvent::GatewayFaultProven { fault_id, challenge_id, gateway });
        Ok(fault_id)
    }

    fn try_mark_gateway_slashable<C: ChainState + ?Sized>(
        &mut self,
        chain: &C,
        fault_id: B256,
    ) -> SlasherResult<()> {
        let mut fault = self.unresolved_fault(fault_id)?;
        self.ensure_expired(fault.created_at, chain.timestamp())?;

        fault.status = ChallengeStatus::GatewayFault;
        self.store.put_fault(fault_id, fault);

        self.metrics.gateways_slashable.increment(1);
        info!(target: "tob::slasher", %fault_id, gateway = %fault.gateway, "gateway slashable");
        self.events.push(SlasherEvent::GatewaySlashable { fault_id, gateway: fault.gateway });
        Ok(())
    }

    fn try_vindicate_gateway<C: ChainState + ?Sized>(
        &mut self,
        chain: &C,
        signed_commitment: &SignedCommitment,
        proof: &InclusionProof,
    ) -> SlasherResult<()> {
        let fault_id = signed_commitment.fault_id();
        let mut fault = self.fault(fault_id);
        if fault.status == ChallengeStatus::Nonexistent {
            return Err(SlasherError::WrongChallengeStatus {
                expected: ChallengeStatus::Unresolved,
                actual: fault.status,
            });
        }
        // A late defense reports the closed window even once the fault was finalized.
        self.ensure_open(fault.created_at, chain.timestamp())?;
        ensure_unresolved(fault.status)?;

        let payload = signed_commitment.commitment.tob_payload()?;
        let included = verify_tob_inclusion(chain, proof, &ExpectedInclusion::from(&payload))?;

        fault.status = ChallengeStatus::Vindicated;
        self.store.put_fault(fault_id, fault);

        self.metrics.gateways_vindicated.increment(1);
        info!(
            target: "tob::slasher",
            %fault_id,
            gateway = %fault.gateway,
            block_hash = %included.block_hash,
            tx_hash = %included.tx_hash,
            "gateway vindicated"
        );
        self.events.push(SlasherEvent::GatewayVindicated {
            fault_id,
            gateway: fault.gateway,
            block_hash: included.block_hash,
        });
        Ok(())
    }

    const fn ensure_commitment_type(&self, commitment: &Commitment) -> SlasherResult<()> {
        if commitment.commitmentType != self.config.commitment_type {
            return Err(SlasherError::InvalidCommitmentType {
                expected: self.config.commitment_type,
                actual: commitment.commitmentType,
            });
        }
        Ok(())
    }

    fn unresolved_challenge(&self, id: B256) -> SlasherResult<Challenge> {
        let challenge = self.challenge(id);
        ensure_unresolved(challenge.status)?;
        Ok(challenge)
    }

    fn unresolved_fault(&self, id: B256) -> SlasherResult<GatewayFault> {
        let fault = self.fault(id);
        ensure_unresolved(fault.status)?;
        Ok(fault)
    }

    /// Last timestamp at which a window opened at `created_at` is still open.
    const fn deadline(&self, created_at: u64) -> u64 {
        created_at.saturating_add(self.config.challenge_window_secs)
    }

    const fn ensure_open(&self, created_at: u64, now: u64) -> SlasherResult<()> {
        let deadline = self.deadline(created_at);
        if now > deadline {
            return Err(SlasherError::ChallengePeriodExpired { deadline, now });
        }
        Ok(())
    }

    const fn ensure_expired(&self, created_at: u64, now: u64) -> SlasherResult<()> {
        let deadline = self.deadline(created_at);
        if now <= deadline {
            return Err(SlasherError::ChallengePeriodNotExpired { deadline, now });
        }
        Ok(())
    }

    fn observe<T>(&self, operation: &'static str, result: SlasherResult<T>) -> SlasherResult<T> {
        if let Err(err) = &result {
            self.metrics.rejected_operations.increment(1);
            if matches!(err, SlasherError::InvalidSignature) {
                warn!(target: "tob::slasher", operation, "rejected signature");
            } else {
                debug!(target: "tob::slasher", operation, %err, "rejected operation");
            }
        }
        result
    }
}

const fn ensure_unresolved(actual: ChallengeStatus) -> SlasherResult<()> {
    if !matches!(actual, ChallengeStatus::Unresolved) {
        return Err(SlasherError::WrongChallengeStatus {
            expected: ChallengeStatus::Unresolved,
            actual,
        });
    }
    Ok(())
}
