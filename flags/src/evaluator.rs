use crate::bucket::deterministic_bucket;
use crate::metrics_defs::FLAG_EVALUATIONS;
use crate::mode::{FlagMode, parse_flag_mode, parse_rollout_percent};
use crate::source::{EnvSource, FlagSource, mode_key, rollout_key};
use serde::{Deserialize, Serialize};
use shared::counter;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Flags served when no explicit list is configured.
pub const DEFAULT_FLAG_NAMES: &[&str] = &[
    "PROPOSAL_REVIEW",
    "RISK_RADAR",
    "RISK_RADAR_EXPORT",
    "ARCH_GENERATOR",
    "EXEC_MODAL",
    "STICKY_CTA",
];

/// Decisions keyed by lower-cased flag name (`RISK_RADAR` -> `risk_radar`).
pub type FlagsMap = BTreeMap<String, FlagDecision>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlagDefinition {
    pub name: String,
    pub mode: FlagMode,
    pub rollout_percent: i64,
}

impl FlagDefinition {
    pub fn new(name: impl Into<String>, mode: FlagMode, rollout_percent: i64) -> Self {
        FlagDefinition {
            name: name.into(),
            mode,
            rollout_percent,
        }
    }

    pub fn from_raw(name: impl Into<String>, mode: Option<&str>, percent: Option<&str>) -> Self {
        FlagDefinition::new(name, parse_flag_mode(mode), parse_rollout_percent(percent))
    }

    pub fn from_source(name: &str, source: &dyn FlagSource) -> Self {
        FlagDefinition::from_raw(
            name,
            source.get(&mode_key(name)).as_deref(),
            source.get(&rollout_key(name)).as_deref(),
        )
    }

    pub fn short_name(&self) -> String {
        self.name.to_lowercase()
    }

    /// Decision for `client_id`. Rollout flags are bucketed on
    /// `client_id` immediately followed by the flag name.
    pub fn decide(&self, client_id: &str) -> FlagDecision {
        match self.mode {
            FlagMode::On => FlagDecision::from_env(true),
            FlagMode::Off => FlagDecision::from_env(false),
            FlagMode::Rollout => {
                let key = format!("{client_id}{}", self.name);
                let enabled = deterministic_bucket(&key, self.rollout_percent);
                FlagDecision::from_rollout(enabled, self.rollout_percent)
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reason {
    Env,
    Rollout,
}

impl Reason {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Reason::Env => "env",
            Reason::Rollout => "rollout",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagDecision {
    pub enabled: bool,
    pub reason: Reason,
    /// Only present for rollout decisions that came out enabled, so excluded
    /// clients never learn the rollout size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<i64>,
}

impl FlagDecision {
    pub fn from_env(enabled: bool) -> Self {
        FlagDecision {
            enabled,
            reason: Reason::Env,
            percentage: None,
        }
    }

    pub fn from_rollout(enabled: bool, percentage: i64) -> Self {
        FlagDecision {
            enabled,
            reason: Reason::Rollout,
            percentage: enabled.then_some(percentage),
        }
    }
}

/// Evaluates every flag in `flags` for `client_id`.
pub fn evaluate(client_id: &str, flags: &[FlagDefinition]) -> FlagsMap {
    flags
        .iter()
        .map(|flag| {
            let decision = flag.decide(client_id);
            counter!(
                FLAG_EVALUATIONS,
                "reason" => decision.reason.as_str(),
                "enabled" => if decision.enabled { "true" } else { "false" },
            )
            .increment(1);
            (flag.short_name(), decision)
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FlagSummaryEntry {
    pub mode: FlagMode,
    #[serde(rename = "rolloutPercent")]
    pub rollout_percent: String,
}

/// Per-flag configuration overview, safe to log or expose to operators.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FlagSummary(pub BTreeMap<String, FlagSummaryEntry>);

impl FlagSummary {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Evaluates a fixed catalogue of flags against a [`FlagSource`].
///
/// Cheap to clone; one instance is shared by all request handlers.
#[derive(Clone)]
pub struct FlagEvaluator {
    names: Arc<Vec<String>>,
    source: Arc<dyn FlagSource>,
}

impl FlagEvaluator {
    pub fn new<I, S>(names: I, source: Arc<dyn FlagSource>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = names
            .into_iter()
            .map(|name| name.as_ref().trim().to_uppercase())
            .filter(|name| !name.is_empty())
            .collect();

        FlagEvaluator {
            names: Arc::new(names),
            source,
        }
    }

    /// The default catalogue read from the process environment.
    pub fn from_env() -> Self {
        FlagEvaluator::new(DEFAULT_FLAG_NAMES, Arc::new(EnvSource))
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Reads the current definitions. Nothing is cached between calls.
    pub fn definitions(&self) -> Vec<FlagDefinition> {
        self.names
            .iter()
            .map(|name| FlagDefinition::from_source(name, self.source.as_ref()))
            .collect()
    }

    pub fn evaluate(&self, client_id: &str) -> FlagsMap {
        evaluate(client_id, &self.definitions())
    }

    /// Case-insensitive check of a single flag. Unknown flags are disabled.
    pub fn is_feature_enabled(&self, flag_name: &str, client_id: &str) -> bool {
        let wanted = flag_name.trim().to_uppercase();
        self.names
            .iter()
            .find(|name| **name == wanted)
            .map(|name| {
                FlagDefinition::from_source(name, self.source.as_ref())
                    .decide(client_id)
                    .enabled
            })
            .unwrap_or(false)
    }

    pub fn summary(&self) -> FlagSummary {
        let entries = self
            .names
            .iter()
            .map(|name| {
                let mode = parse_flag_mode(self.source.get(&mode_key(name)).as_deref());
                let rollout_percent = self
                    .source
                    .get(&rollout_key(name))
                    .filter(|raw| !raw.is_empty())
                    .unwrap_or_else(|| "not set".to_string());
                (
                    name.clone(),
                    FlagSummaryEntry {
                        mode,
                        rollout_percent,
                    },
                )
            })
            .collect();

        FlagSummary(entries)
    }

    pub fn log_summary(&self) {
        let summary = self.summary();
        let enabled = summary
            .0
            .values()
            .filter(|entry| entry.mode != FlagMode::Off)
            .count();
        tracing::info!(
            flags = summary.0.len(),
            not_off = enabled,
            summary = %summary.to_json(),
            "feature flag configuration"
        );
    }
}
