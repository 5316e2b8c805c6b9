//! Top-of-block position detection.

use base_tob_primitives::{ChainState, GasMeter, TX_BASE_GAS};

use crate::{SlasherError, SlasherResult};

/// Classifies an execution as top-of-block from how much of the block's gas was already spent.
///
/// The protected operation is expected to run in a transaction that declared the full block gas
/// limit as its allowance, so `gas_limit - gas_left` is everything consumed in the block before the
/// operation started. Once the intrinsic overhead of the carrying transaction is subtracted, at
/// most one transaction's base cost may remain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionDetector {
    intrinsic_gas_overhead: u64,
}

impl Default for PositionDetector {
    fn default() -> Self {
        Self { intrinsic_gas_overhead: TX_BASE_GAS }
    }
}

impl PositionDetector {
    /// Creates a detector, rejecting an overhead below [`TX_BASE_GAS`].
    pub const fn new(intrinsic_gas_overhead: u64) -> SlasherResult<Self> {
        if intrinsic_gas_overhead < TX_BASE_GAS {
            return Err(SlasherError::IntrinsicGasCostTooLow {
                value: intrinsic_gas_overhead,
                minimum: TX_BASE_GAS,
            });
        }
        Ok(Self { intrinsic_gas_overhead })
    }

    /// Returns the configured intrinsic gas overhead.
    pub const fn intrinsic_gas_overhead(&self) -> u64 {
        self.intrinsic_gas_overhead
    }

    /// Replaces the intrinsic gas overhead and returns the previous value.
    pub const fn set_intrinsic_gas_overhead(&mut self, new: u64) -> SlasherResult<u64> {
        if new < TX_BASE_GAS {
            return Err(SlasherError::IntrinsicGasCostTooLow { value: new, minimum: TX_BASE_GAS });
        }
        let old = self.intrinsic_gas_overhead;
        self.intrinsic_gas_overhead = new;
        Ok(old)
    }

    /// Fails unless the executing block is `expected_block_id` and nothing but the carrying
    /// transaction's own overhead ran before this point.
    pub fn ensure_top_of_block<C, M>(
        &self,
        chain: &C,
        meter: &M,
        expected_block_id: u64,
    ) -> SlasherResult<()>
    where
        C: ChainState + ?Sized,
        M: GasMeter + ?Sized,
    {
        let actual = chain.timestamp();
        if actual != expected_block_id {
            return Err(SlasherError::BlockIdentifierMismatch {
                expected: expected_block_id,
                actual,
            });
        }

        let consumed = chain
            .gas_limit()
            .saturating_sub(meter.gas_left())
            .saturating_sub(self.intrinsic_gas_overhead);
        if consumed > TX_BASE_GAS {
            return Err(SlasherError::NotTopOfBlock { consumed, allowed: TX_BASE_GAS });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use base_tob_primitives::FixedGasMeter;
    use base_tob_test_utils::MockChain;
    use rstest::rstest;

    use super::*;

    const GAS_LIMIT: u64 = 30_000_000;

    #[rstest]
    #[case::nothing_before(GAS_LIMIT - 21_000, true)]
    #[case::exactly_one_base_cost(GAS_LIMIT - 42_000, true)]
    #[case::one_gas_over(GAS_LIMIT - 42_001, false)]
    #[case::after_a_transfer(GAS_LIMIT - 63_000, false)]
    #[case::more_left_than_limit(GAS_LIMIT + 1, true)]
    fn test_ensure_top_of_block(#[case] gas_left: u64, #[case] top: bool) {
        let chain = MockChain::new(10, 1_000);
        let detector = PositionDetector::default();
        let result = detector.ensure_top_of_block(&chain, &FixedGasMeter(gas_left), 1_000);
        assert_eq!(result.is_ok(), top);
    }

    #[test]
    fn test_reports_consumed_gas() {
        let chain = MockChain::new(10, 1_000);
        let err = PositionDetector::default()
            .ensure_top_of_block(&chain, &FixedGasMeter(GAS_LIMIT - 100_000), 1_000)
            .unwrap_err();
        assert_eq!(err, SlasherError::NotTopOfBlock { consumed: 79_000, allowed: TX_BASE_GAS });
    }

    #[test]
    fn test_overhead_widens_allowance() {
        let chain = MockChain::new(10, 1_000);
        let detector = PositionDetector::new(50_000).unwrap();
        let meter = FixedGasMeter(GAS_LIMIT - 71_000);
        assert!(detector.ensure_top_of_block(&chain, &meter, 1_000).is_ok());
    }

    #[test]
    fn test_rejects_other_block() {
        let chain = MockChain::new(10, 1_012);
        let err = PositionDetector::default()
            .ensure_top_of_block(&chain, &FixedGasMeter(GAS_LIMIT), 1_000)
            .unwrap_err();
        assert_eq!(err, SlasherError::BlockIdentifierMismatch { expected: 1_000, actual: 1_012 });
    }

    #[test]
    fn test_overhead_floor() {
        assert!(PositionDetector::new(TX_BASE_GAS - 1).is_err());

        let mut detector = PositionDetector::default();
        assert_eq!(
            detector.set_intrinsic_gas_overhead(20_000),
            Err(SlasherError::IntrinsicGasCostTooLow { value: 20_000, minimum: TX_BASE_GAS })
        );
        assert_eq!(detector.intrinsic_gas_overhead(), TX_BASE_GAS);

        assert_eq!(detector.set_intrinsic_gas_overhead(30_000), Ok(TX_BASE_GAS));
        assert_eq!(detector.intrinsic_gas_overhead(), 30_000);
    }
}
