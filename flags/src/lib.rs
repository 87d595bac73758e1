//! Server-side feature flags with deterministic percentage rollout.
//!
//! Each flag is configured through a pair of keys read at evaluation time:
//! `FEATURE_<NAME>` holds the mode (`on`, `off`, `rollout`) and
//! `ROLLOUT_<NAME>_PERCENT` the rollout percentage. Anything missing or
//! malformed evaluates to disabled.

pub mod bucket;
pub mod client_id;
pub mod evaluator;
pub mod metrics_defs;
pub mod mode;
pub mod source;

pub use bucket::deterministic_bucket;
pub use client_id::{ANON_ID_HEADER, resolve_client_id};
pub use evaluator::{
    DEFAULT_FLAG_NAMES, FlagDecision, FlagDefinition, FlagEvaluator, FlagSummary, FlagsMap,
    Reason, evaluate,
};
pub use mode::{FlagMode, parse_flag_mode, parse_rollout_percent};
pub use source::{EnvSource, FlagSource};
