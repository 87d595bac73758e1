//! Metrics definitions for the site API.

use shared::metrics_defs::{MetricDef, MetricType};

pub const LEAD_SUBMISSIONS: MetricDef = MetricDef {
    name: "api.lead.submissions",
    metric_type: MetricType::Counter,
    description: "Lead form submissions, tagged by outcome",
};

pub const FLAG_REQUESTS: MetricDef = MetricDef {
    name: "api.featureflags.requests",
    metric_type: MetricType::Counter,
    description: "Feature flag requests, tagged by whether the client sent an id",
};

pub const ALL_METRICS: &[MetricDef] = &[LEAD_SUBMISSIONS, FLAG_REQUESTS];
