#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/base/base/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod account;
pub use account::{BatchAccount, Call, CallExecutor};

mod config;
pub use config::{DEFAULT_CHALLENGE_WINDOW_SECS, GuardConfig, SlasherConfig};

mod engine;
pub use engine::{
    Challenge, ChallengeStatus, ChallengeStore, FaultAttributionEngine, GatewayFault,
    InMemoryChallengeStore,
};

mod error;
pub use error::{ConfigError, SlasherError, SlasherResult};

mod events;
pub use events::SlasherEvent;

mod guard;
pub use guard::TopOfBlockGuard;

mod ledger;
pub use ledger::{SubmissionLedger, SubmissionLookup};

mod metrics;
pub use metrics::{GuardMetrics, SlasherMetrics};

mod position;
pub use position::PositionDetector;

mod signature;
