//! Metrics definitions for lead storage.

use shared::metrics_defs::{MetricDef, MetricType};

pub const LEAD_STORE_FALLBACKS: MetricDef = MetricDef {
    name: "lead_store.fallback",
    metric_type: MetricType::Counter,
    description: "Operations served by the fallback store, tagged by operation",
};

pub const LEAD_STORE_PRIMARY_DISABLED: MetricDef = MetricDef {
    name: "lead_store.primary_disabled",
    metric_type: MetricType::Counter,
    description: "Times a primary store was disabled for the rest of the process",
};

pub const LEAD_STORE_DEGRADED: MetricDef = MetricDef {
    name: "lead_store.degraded",
    metric_type: MetricType::Counter,
    description: "Reads answered with a default because both stores failed",
};

pub const LEAD_STORE_WRITE_FAILURES: MetricDef = MetricDef {
    name: "lead_store.write_failures",
    metric_type: MetricType::Counter,
    description: "Mirrored writes that failed in one store, tagged by backend",
};

pub const SHEETS_REQUEST_DURATION: MetricDef = MetricDef {
    name: "lead_store.sheets.request.duration",
    metric_type: MetricType::Histogram,
    description: "Google Sheets API request time in seconds",
};

pub const ALL_METRICS: &[MetricDef] = &[
    LEAD_STORE_FALLBACKS,
    LEAD_STORE_PRIMARY_DISABLED,
    LEAD_STORE_DEGRADED,
    LEAD_STORE_WRITE_FAILURES,
    SHEETS_REQUEST_DURATION,
];
