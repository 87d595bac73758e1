//! Storage for captured leads.
//!
//! [`LeadStore`] is the persistence contract. [`JsonLeadStore`] keeps leads
//! in a local file, [`SheetsLeadStore`] appends them to a Google Sheet, and
//! [`FallbackLeadStore`] composes two stores with primary/fallback failover
//! while [`CompositeLeadStore`] mirrors writes into several.

mod composite;
pub mod config;
mod fallback;
mod json_store;
pub mod lead;
pub mod metrics_defs;
pub mod sanitize;
mod sheets;
mod store;
#[cfg(test)]
mod testutils;

pub use composite::CompositeLeadStore;
pub use config::LeadStoreConfig;
pub use fallback::FallbackLeadStore;
pub use json_store::{DEFAULT_LEADS_FILE, JsonLeadStore};
pub use lead::{Attribution, InvalidLead, Lead, LeadInput, SubmissionContext};
pub use sheets::{DEFAULT_SHEET_NAME, SheetsConfig, SheetsLeadStore};
pub use store::{LeadStore, StorageError, StorageErrorCode};

use std::path::Path;
use std::sync::Arc;

/// Builds the store described by `config`.
///
/// Only I/O while preparing the JSON file fails here; an incomplete
/// spreadsheet configuration produces an unconfigured store instead.
pub fn build_store(config: LeadStoreConfig) -> Result<Arc<dyn LeadStore>, StorageError> {
    let store: Arc<dyn LeadStore> = match config {
        LeadStoreConfig::Json { path } => {
            tracing::info!(path = %path.display(), "using json file lead store");
            Arc::new(JsonLeadStore::new(path)?)
        }
        LeadStoreConfig::Gsheets(sheets) => {
            tracing::info!(sheet = %sheets.sheet_name, "using google sheets lead store");
            Arc::new(SheetsLeadStore::new(sheets.with_env_fallback()))
        }
        LeadStoreConfig::Fallback { primary, fallback } => {
            let primary = build_store(*primary)?;
            let fallback = build_store(*fallback)?;
            Arc::new(FallbackLeadStore::new(primary, fallback))
        }
        LeadStoreConfig::Composite { stores } => {
            let stores = stores
                .into_iter()
                .map(build_store)
                .collect::<Result<Vec<_>, _>>()?;
            tracing::info!(stores = stores.len(), "using composite lead store");
            Arc::new(CompositeLeadStore::new(stores))
        }
    };

    Ok(store)
}

/// Builds the store selected by `LEAD_STORE_PROVIDER`.
pub fn store_from_env(json_path: &Path) -> Result<Arc<dyn LeadStore>, StorageError> {
    let provider = std::env::var(config::ENV_PROVIDER).ok();
    tracing::info!(provider = provider.as_deref().unwrap_or("json"), "selecting lead store");
    build_store(LeadStoreConfig::from_provider(
        provider.as_deref(),
        json_path.to_path_buf(),
    ))
}
