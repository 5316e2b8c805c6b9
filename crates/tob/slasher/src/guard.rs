//! The protected-contract guard.

use alloy_primitives::Address;
use base_tob_primitives::{ChainState, GasMeter, TX_BASE_GAS};
use tracing::{debug, info};

use crate::{
    ConfigError, GuardConfig, GuardMetrics, PositionDetector, SlasherError, SlasherEvent,
    SlasherResult, SubmissionLedger, SubmissionLookup,
};

/// Runs protected operations, recording every block in which one ran at the top.
///
/// Each call to [`TopOfBlockGuard::execute`] checks the position first, then runs the
/// operation, and only records the submission if the operation succeeded. A rejected position
/// never reaches the operation.
#[derive(Debug)]
pub struct TopOfBlockGuard {
    owner: Address,
    detector: PositionDetector,
    ledger: SubmissionLedger,
    events: Vec<SlasherEvent>,
    metrics: GuardMetrics,
}

impl TopOfBlockGuard {
    /// Creates a guard from a validated config.
    pub fn new(config: GuardConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let detector = PositionDetector::new(config.intrinsic_gas_overhead).map_err(|_| {
            ConfigError::IntrinsicGasCostTooLow {
                value: config.intrinsic_gas_overhead,
                minimum: TX_BASE_GAS,
            }
        })?;
        Ok(Self {
            owner: config.owner,
            detector,
            ledger: SubmissionLedger::new(),
            events: Vec::new(),
            metrics: GuardMetrics::default(),
        })
    }

    /// Runs `op` if the current execution is at the top of block `expected_block_id`.
    ///
    /// Errors of the position check are converted into the operation's error type. The
    /// submission is recorded only when `op` returns `Ok`.
    pub fn execute<C, M, T, E, F>(
        &mut self,
        chain: &C,
        meter: &M,
        expected_block_id: u64,
        op: F,
    ) -> Result<T, E>
    where
        C: ChainState + ?Sized,
        M: GasMeter + ?Sized,
        F: FnOnce() -> Result<T, E>,
        E: From<SlasherError>,
    {
        if let Err(err) = self.detector.ensure_top_of_block(chain, meter, expected_block_id) {
            self.metrics.position_rejections.increment(1);
            debug!(target: "tob::guard", block_id = expected_block_id, %err, "rejected position");
            return Err(err.into());
        }

        let output = match op() {
            Ok(output) => output,
            Err(err) => {
                self.metrics.operation_failures.increment(1);
                debug!(
                    target: "tob::guard",
                    block_id = expected_block_id,
                    "protected operation failed"
                );
                return Err(err);
            }
        };

        if self.ledger.record_submission(chain) {
            let block_number = chain.block_number();
            self.metrics.submissions_recorded.increment(1);
            info!(
                target: "tob::guard",
                block_id = expected_block_id,
                block_number,
                "recorded top-of-block submission"
            );
            self.events.push(SlasherEvent::SubmissionRecorded {
                block_id: expected_block_id,
                block_number,
            });
        }
        Ok(output)
    }

    /// Checkpoints the current block so its hash can later be resolved from its timestamp.
    pub fn checkpoint<C: ChainState + ?Sized>(&mut self, chain: &C) -> u64 {
        self.ledger.checkpoint(chain)
    }

    /// Changes the intrinsic gas overhead. Only the owner may call this.
    pub fn set_intrinsic_gas_overhead(&mut self, caller: Address, new: u64) -> SlasherResult<()> {
        if caller != self.owner {
            return Err(SlasherError::Unauthorized { caller });
        }
        let old = self.detector.set_intrinsic_gas_overhead(new)?;

        self.metrics.overhead_updates.increment(1);
        info!(target: "tob::guard", old, new, "intrinsic gas overhead updated");
        self.events.push(SlasherEvent::IntrinsicGasCostUpdated { old, new });
        Ok(())
    }

    /// Returns the current intrinsic gas overhead.
    pub const fn intrinsic_gas_overhead(&self) -> u64 {
        self.detector.intrinsic_gas_overhead()
    }

    /// Returns the owner.
    pub const fn owner(&self) -> Address {
        self.owner
    }

    /// Returns the submission ledger.
    pub const fn ledger(&self) -> &SubmissionLedger {
        &self.ledger
    }

    /// Drains the buffered events.
    pub fn take_events(&mut self) -> Vec<SlasherEvent> {
        std::mem::take(&mut self.events)
    }
}

impl SubmissionLookup for TopOfBlockGuard {
    fn was_submitted(&self, block_id: u64) -> bool {
        self.ledger.was_submitted(block_id)
    }

    fn block_number_of(&self, block_id: u64) -> Option<u64> {
        self.ledger.block_number_of(block_id)
    }
}
