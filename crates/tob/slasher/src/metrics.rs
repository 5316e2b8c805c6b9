//! Metrics for the slasher and the guard.

use metrics::Counter;
use metrics_derive::Metrics;

/// Metrics for the [`FaultAttributionEngine`](crate::FaultAttributionEngine).
#[derive(Metrics, Clone)]
#[metrics(scope = "tob_slasher")]
pub struct SlasherMetrics {
    /// Number of challenges opened.
    #[metric(describe = "Number of challenges opened")]
    pub challenges_opened: Counter,

    /// Number of proposers slashed.
    #[metric(describe = "Number of proposers slashed")]
    pub proposers_slashed: Counter,

    /// Number of faults attributed to gateways.
    #[metric(describe = "Number of faults attributed to gateways")]
    pub gateway_faults_proven: Counter,

    /// Number of gateway faults finalized.
    #[metric(describe = "Number of gateway faults finalized as slashable")]
    pub gateways_slashable: Counter,

    /// Number of gateways cleared by an inclusion proof.
    #[metric(describe = "Number of gateways cleared by an inclusion proof")]
    pub gateways_vindicated: Counter,

    /// Number of rejected operations.
    #[metric(describe = "Number of rejected slasher operations")]
    pub rejected_operations: Counter,
}

/// Metrics for the [`TopOfBlockGuard`](crate::TopOfBlockGuard).
#[derive(Metrics, Clone)]
#[metrics(scope = "tob_guard")]
pub struct GuardMetrics {
    /// Number of blocks with a recorded top-of-block submission.
    #[metric(describe = "Number of blocks with a recorded top-of-block submission")]
    pub submissions_recorded: Counter,

    /// Number of executions rejected by the position check.
    #[metric(describe = "Number of executions rejected by the position check")]
    pub position_rejections: Counter,

    /// Number of protected operations that failed after passing the position check.
    #[metric(describe = "Number of protected operations that failed")]
    pub operation_failures: Counter,

    /// Number of intrinsic gas overhead updates.
    #[metric(describe = "Number of intrinsic gas overhead updates")]
    pub overhead_updates: Counter,
}
