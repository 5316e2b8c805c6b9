//! Full dispute flows: guard, ledger, engine and inclusion verifier together.

use alloy_primitives::{Address, B256, Bytes, FixedBytes, TxKind, U256, aliases::U48};
use alloy_sol_types::{SolCall, sol};
use base_tob_inclusion::{InclusionError, InclusionProof};
use base_tob_primitives::{
    Commitment, Delegation, FixedGasMeter, SignedCommitment, TX_BASE_GAS, ToBCommitment,
    challenge_id,
};
use base_tob_slasher::{
    BatchAccount, Call, CallExecutor, ChallengeStatus, FaultAttributionEngine, GuardConfig,
    SlasherConfig, SlasherError, SlasherEvent, SubmissionLookup, TopOfBlockGuard,
};
use base_tob_test_utils::{
    Account, BlockFixture, MockChain, build_eip1559_tx, malleate_signature,
};

sol! {
    function increment(uint48 blockId);
}

const BLOCK: u64 = 100;
const BLOCK_ID: u64 = 1_200;
const WINDOW: u64 = 3_600;
const TARGET: Address = Address::repeat_byte(0xaa);
const REGISTRY: Address = Address::repeat_byte(0xee);
const SLASHER: Address = Address::repeat_byte(0x5a);
const SLASH_AMOUNT: u64 = 1_000_000;
const TOP: FixedGasMeter = FixedGasMeter(30_000_000 - TX_BASE_GAS);
const LATE: FixedGasMeter = FixedGasMeter(30_000_000 - 200_000);

fn selector() -> FixedBytes<4> {
    FixedBytes::from(incrementCall::SELECTOR)
}

fn commitment() -> Commitment {
    ToBCommitment::new(BLOCK_ID, TARGET, selector()).unwrap().into_commitment(1, SLASHER)
}

fn signed_commitment() -> SignedCommitment {
    SignedCommitment {
        commitment: commitment(),
        signature: Account::Gateway.sign_hash(commitment().digest()),
    }
}

fn delegation() -> Delegation {
    Delegation {
        proposer: Account::Proposer.address(),
        delegate: Account::Proposer.address(),
        committer: Account::Gateway.address(),
        slot: 7,
        metadata: Bytes::new(),
    }
}

/// Block `BLOCK` whose first transaction is the gateway's committed call.
fn honored_block() -> BlockFixture {
    let input = incrementCall { blockId: U48::from_limbs([BLOCK_ID]) }.abi_encode();
    let tx = build_eip1559_tx(0, TxKind::Call(TARGET), input.into(), Account::Gateway);
    BlockFixture::new(BLOCK, BLOCK_ID, &[tx])
}

fn inclusion_proof(fixture: &BlockFixture) -> InclusionProof {
    InclusionProof {
        block_number: fixture.block_number,
        previous_block_header: fixture.previous_header.clone(),
        block_header: fixture.header.clone(),
        transaction_proof: fixture.transaction_proof.clone(),
    }
}

struct Harness {
    chain: MockChain,
    guard: TopOfBlockGuard,
    engine: FaultAttributionEngine,
    block: BlockFixture,
}

impl Harness {
    /// Block `BLOCK` is produced without a recorded submission, checkpointed, and followed by ten
    /// more blocks. A challenge is then opened.
    fn challenged() -> (Self, B256) {
        let mut chain = MockChain::new(BLOCK, BLOCK_ID);
        let mut guard = TopOfBlockGuard::new(GuardConfig::new(Account::Owner.address())).unwrap();
        let block = honored_block();
        block.install(&mut chain);
        guard.checkpoint(&chain);
        chain.advance_blocks(10);

        let engine = FaultAttributionEngine::in_memory(SlasherConfig {
            challenge_window_secs: WINDOW,
            commitment_type: 1,
            slash_amount: U256::from(SLASH_AMOUNT),
            protected_contract: TARGET,
            registry: REGISTRY,
            slasher: SLASHER,
        })
        .unwrap();

        let mut harness = Self { chain, guard, engine, block };
        let id = harness
            .engine
            .open_challenge(&harness.chain, &harness.guard, &delegation(), &commitment())
            .unwrap();
        (harness, id)
    }

    fn slash(&mut self) -> Result<U256, SlasherError> {
        self.engine.slash(
            &self.chain,
            REGISTRY,
            &delegation(),
            &commitment(),
            Account::Gateway.address(),
            b"evidence",
            Account::Challenger.address(),
        )
    }

    fn attribute(&mut self) -> Result<B256, SlasherError> {
        let block_hash_signature = Account::Gateway.sign_hash(self.block.hash());
        self.engine.attribute_gateway_fault(
            &self.chain,
            &self.guard,
            &delegation(),
            &signed_commitment(),
            &block_hash_signature,
        )
    }

    fn vindicate(&mut self) -> Result<(), SlasherError> {
        let proof = inclusion_proof(&self.block);
        self.engine.vindicate_gateway(&self.chain, &signed_commitment(), &proof)
    }
}

#[test]
fn scenario_a_proposer_slashed_after_window() {
    let (mut h, id) = Harness::challenged();
    let opened_at = h.engine.challenge(id).created_at;

    h.chain.advance_time(WINDOW);
    assert_eq!(
        h.slash(),
        Err(SlasherError::ChallengePeriodNotExpired {
            deadline: opened_at + WINDOW,
            now: opened_at + WINDOW,
        })
    );

    h.chain.advance_time(1);
    assert_eq!(h.slash(), Ok(U256::from(SLASH_AMOUNT)));
    assert_eq!(h.engine.challenge(id).status, ChallengeStatus::ProposerFault);

    assert_eq!(
        h.slash(),
        Err(SlasherError::WrongChallengeStatus {
            expected: ChallengeStatus::Unresolved,
            actual: ChallengeStatus::ProposerFault,
        })
    );

    let events = h.engine.take_events();
    assert_eq!(events.len(), 2);
    assert_eq!(
        events[1],
        SlasherEvent::ProposerSlashed {
            challenge_id: id,
            amount: U256::from(SLASH_AMOUNT),
            challenger: Account::Challenger.address(),
        }
    );
}

#[test]
fn scenario_b_blame_moves_to_gateway() {
    let (mut h, id) = Harness::challenged();

    let fault_id = h.attribute().unwrap();
    assert_eq!(fault_id, signed_commitment().fault_id());
    assert_eq!(h.engine.challenge(id).status, ChallengeStatus::GatewayFault);

    let fault = h.engine.fault(fault_id);
    assert_eq!(fault.gateway, Account::Gateway.address());
    assert_eq!(fault.challenge_id, id);
    assert_eq!(fault.created_at, h.chain.timestamp);
    assert_eq!(fault.status, ChallengeStatus::Unresolved);
    assert!(!h.engine.gateway_slashable(fault_id));

    h.chain.advance_time(WINDOW + 1);
    assert_eq!(
        h.slash(),
        Err(SlasherError::WrongChallengeStatus {
            expected: ChallengeStatus::Unresolved,
            actual: ChallengeStatus::GatewayFault,
        })
    );
}

#[test]
fn scenario_b_attribution_closes_with_window() {
    let (mut h, id) = Harness::challenged();
    let opened_at = h.engine.challenge(id).created_at;

    h.chain.advance_time(WINDOW + 1);
    assert_eq!(
        h.attribute(),
        Err(SlasherError::ChallengePeriodExpired {
            deadline: opened_at + WINDOW,
            now: opened_at + WINDOW + 1,
        })
    );
}

#[test]
fn scenario_b_attribution_open_at_deadline() {
    let (mut h, _) = Harness::challenged();

    h.chain.advance_time(WINDOW);
    assert!(h.attribute().is_ok());
}

#[test]
fn scenario_b_attribution_requires_block_hash_signature() {
    let (mut h, id) = Harness::challenged();

    let signed_other_block = Account::Gateway.sign_hash(h.block.previous_hash());
    let err = h
        .engine
        .attribute_gateway_fault(
            &h.chain,
            &h.guard,
            &delegation(),
            &signed_commitment(),
            &signed_other_block,
        )
        .unwrap_err();
    assert_eq!(err, SlasherError::InvalidSignature);
    assert_eq!(h.engine.challenge(id).status, ChallengeStatus::Unresolved);
}

#[test]
fn scenario_b_fault_recorded_once() {
    let (mut h, _) = Harness::challenged();
    let fault_id = h.attribute().unwrap();

    // Same signed commitment, challenged again under another delegation by the same gateway.
    let other = Delegation { slot: 8, ..delegation() };
    h.engine.open_challenge(&h.chain, &h.guard, &other, &commitment()).unwrap();
    let block_hash_signature = Account::Gateway.sign_hash(h.block.hash());
    let err = h
        .engine
        .attribute_gateway_fault(
            &h.chain,
            &h.guard,
            &other,
            &signed_commitment(),
            &block_hash_signature,
        )
        .unwrap_err();

    assert_eq!(err, SlasherError::GatewayFaultAlreadyExists(fault_id));
    let other_id = challenge_id(&commitment(), &other);
    assert_eq!(h.engine.challenge(other_id).status, ChallengeStatus::Unresolved);
}

#[test]
fn scenario_b_malleated_signature_cannot_record_second_fault() {
    let (mut h, _) = Harness::challenged();
    let fault_id = h.attribute().unwrap();

    let twin = SignedCommitment {
        commitment: commitment(),
        signature: malleate_signature(&signed_commitment().signature),
    };
    assert_ne!(twin.fault_id(), fault_id);

    let other = Delegation { slot: 8, ..delegation() };
    h.engine.open_challenge(&h.chain, &h.guard, &other, &commitment()).unwrap();
    let block_hash_signature = Account::Gateway.sign_hash(h.block.hash());
    let err = h
        .engine
        .attribute_gateway_fault(&h.chain, &h.guard, &other, &twin, &block_hash_signature)
        .unwrap_err();

    assert_eq!(err, SlasherError::InvalidSignature);
    assert_eq!(h.engine.fault(twin.fault_id()).status, ChallengeStatus::Nonexistent);
    assert_eq!(h.engine.store().faults(), 1);
    let other_id = challenge_id(&commitment(), &other);
    assert_eq!(h.engine.challenge(other_id).status, ChallengeStatus::Unresolved);
}

#[test]
fn scenario_c_gateway_vindicated() {
    let (mut h, _) = Harness::challenged();
    let fault_id = h.attribute().unwrap();
    h.chain.advance_blocks(5);

    h.vindicate().unwrap();
    assert_eq!(h.engine.fault(fault_id).status, ChallengeStatus::Vindicated);
    assert!(!h.engine.gateway_slashable(fault_id));
    assert_eq!(
        h.engine.take_events().last(),
        Some(&SlasherEvent::GatewayVindicated {
            fault_id,
            gateway: Account::Gateway.address(),
            block_hash: h.block.hash(),
        })
    );

    h.chain.advance_time(WINDOW + 1);
    assert!(matches!(
        h.engine.mark_gateway_slashable(&h.chain, fault_id),
        Err(SlasherError::WrongChallengeStatus { actual: ChallengeStatus::Vindicated, .. })
    ));
    assert!(!h.engine.gateway_slashable(fault_id));
}

#[test]
fn scenario_c_verifier_errors_propagate() {
    let (mut h, _) = Harness::challenged();
    let fault_id = h.attribute().unwrap();

    let mut proof = inclusion_proof(&h.block);
    proof.previous_block_header = h.block.header.clone();
    let err = h.engine.vindicate_gateway(&h.chain, &signed_commitment(), &proof).unwrap_err();
    assert_eq!(
        err,
        SlasherError::Inclusion(InclusionError::InvalidBlockHash {
            trusted: h.block.previous_hash(),
            computed: h.block.hash(),
        })
    );
    assert_eq!(h.engine.fault(fault_id).status, ChallengeStatus::Unresolved);

    // A block whose first transaction calls something else does not clear the gateway.
    let input = Bytes::from_static(&[1, 2, 3, 4]);
    let tx = build_eip1559_tx(0, TxKind::Call(TARGET), input, Account::Gateway);
    let wrong = BlockFixture::new(BLOCK, BLOCK_ID, &[tx]);
    let err = h
        .engine
        .vindicate_gateway(&h.chain, &signed_commitment(), &inclusion_proof(&wrong))
        .unwrap_err();
    assert!(matches!(
        err,
        SlasherError::Inclusion(InclusionError::IncorrectFunctionSelector { .. })
    ));
}

#[test]
fn scenario_d_gateway_slashable_after_its_window() {
    let (mut h, _) = Harness::challenged();
    h.chain.advance_time(100);
    let fault_id = h.attribute().unwrap();
    let attributed_at = h.engine.fault(fault_id).created_at;

    h.chain.advance_time(WINDOW);
    assert_eq!(
        h.engine.mark_gateway_slashable(&h.chain, fault_id),
        Err(SlasherError::ChallengePeriodNotExpired {
            deadline: attributed_at + WINDOW,
            now: attributed_at + WINDOW,
        })
    );

    h.chain.advance_time(1);
    h.engine.mark_gateway_slashable(&h.chain, fault_id).unwrap();
    assert!(h.engine.gateway_slashable(fault_id));

    assert_eq!(
        h.vindicate(),
        Err(SlasherError::ChallengePeriodExpired {
            deadline: attributed_at + WINDOW,
            now: attributed_at + WINDOW + 1,
        })
    );
    assert!(matches!(
        h.engine.mark_gateway_slashable(&h.chain, fault_id),
        Err(SlasherError::WrongChallengeStatus { actual: ChallengeStatus::GatewayFault, .. })
    ));

    h.chain.advance_time(WINDOW * 10);
    assert!(h.engine.gateway_slashable(fault_id));
}

/// Routes calls to the protected contract through the guard.
struct ProtectedContract<'a> {
    guard: &'a mut TopOfBlockGuard,
    chain: &'a MockChain,
    meter: FixedGasMeter,
    counter: u64,
}

impl CallExecutor for ProtectedContract<'_> {
    type Error = SlasherError;

    fn call(&mut self, _from: Address, call: &Call) -> Result<Bytes, SlasherError> {
        let Self { guard, chain, meter, counter } = self;
        let Ok(decoded) = incrementCall::abi_decode(&call.data) else {
            return Err(SlasherError::CallFailed { index: 0 });
        };
        guard.execute(*chain, &*meter, decoded.blockId.to::<u64>(), || {
            *counter += 1;
            Ok(Bytes::new())
        })
    }
}

fn batch() -> Vec<Call> {
    vec![Call {
        to: TARGET,
        value: U256::ZERO,
        data: incrementCall { blockId: U48::from_limbs([BLOCK_ID]) }.abi_encode().into(),
    }]
}

#[test]
fn honored_commitment_cannot_be_challenged() {
    let mut chain = MockChain::new(BLOCK, BLOCK_ID);
    let mut guard = TopOfBlockGuard::new(GuardConfig::new(Account::Owner.address())).unwrap();
    let mut account = BatchAccount::new(Account::Gateway.address());

    let signature = Account::Gateway.sign_hash(BatchAccount::batch_digest(0, &batch()));
    let mut contract =
        ProtectedContract { guard: &mut guard, chain: &chain, meter: TOP, counter: 0 };
    account.execute(&batch(), &signature, &mut contract).unwrap();
    assert_eq!(contract.counter, 1);
    assert_eq!(account.nonce(), 1);

    chain.advance_blocks(3);
    let mut engine = FaultAttributionEngine::in_memory(SlasherConfig {
        challenge_window_secs: WINDOW,
        commitment_type: 1,
        slash_amount: U256::from(SLASH_AMOUNT),
        protected_contract: TARGET,
        registry: REGISTRY,
        slasher: SLASHER,
    })
    .unwrap();

    assert_eq!(
        engine.open_challenge(&chain, &guard, &delegation(), &commitment()),
        Err(SlasherError::CommitmentWasNotBroken { block_id: BLOCK_ID })
    );
    assert_eq!(guard.block_number_of(BLOCK_ID), Some(BLOCK));
}

#[test]
fn late_execution_leaves_commitment_open() {
    let mut chain = MockChain::new(BLOCK, BLOCK_ID);
    let mut guard = TopOfBlockGuard::new(GuardConfig::new(Account::Owner.address())).unwrap();
    let mut account = BatchAccount::new(Account::Gateway.address());

    let signature = Account::Gateway.sign_hash(BatchAccount::batch_digest(0, &batch()));
    let mut contract =
        ProtectedContract { guard: &mut guard, chain: &chain, meter: LATE, counter: 0 };
    assert_eq!(
        account.execute(&batch(), &signature, &mut contract),
        Err(SlasherError::CallFailed { index: 0 })
    );
    assert_eq!(contract.counter, 0);
    assert_eq!(account.nonce(), 0);

    chain.advance_blocks(3);
    let mut engine = FaultAttributionEngine::in_memory(SlasherConfig {
        challenge_window_secs: WINDOW,
        commitment_type: 1,
        slash_amount: U256::from(SLASH_AMOUNT),
        protected_contract: TARGET,
        registry: REGISTRY,
        slasher: SLASHER,
    })
    .unwrap();
    assert!(engine.open_challenge(&chain, &guard, &delegation(), &commitment()).is_ok());
}
