//! Metrics definitions for flag evaluation.

use shared::metrics_defs::{MetricDef, MetricType};

pub const FLAG_EVALUATIONS: MetricDef = MetricDef {
    name: "flags.evaluations",
    metric_type: MetricType::Counter,
    description: "Flag decisions computed, tagged by reason and outcome",
};

pub const ALL_METRICS: &[MetricDef] = &[FLAG_EVALUATIONS];
