use crate::lead::Lead;
use crate::metrics_defs::{LEAD_STORE_DEGRADED, LEAD_STORE_WRITE_FAILURES};
use crate::store::{LeadStore, StorageError};
use async_trait::async_trait;
use shared::counter;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Mirrors every lead into several stores, e.g. while migrating between
/// backends.
///
/// * `save_lead` writes to all stores concurrently. Individual failures are
///   logged and counted but never returned.
/// * `email_exists` is true when any store knows the email. Stores that error
///   are skipped.
/// * `get_all_leads` reads the first store only and answers an empty list if
///   it fails.
pub struct CompositeLeadStore {
    stores: Vec<Arc<dyn LeadStore>>,
}

impl CompositeLeadStore {
    pub fn new(stores: Vec<Arc<dyn LeadStore>>) -> Self {
        CompositeLeadStore { stores }
    }
}

#[async_trait]
impl LeadStore for CompositeLeadStore {
    fn backend(&self) -> &'static str {
        "composite"
    }

    async fn save_lead(&self, lead: &Lead) -> Result<(), StorageError> {
        let lead = Arc::new(lead.clone());
        let mut join_set = JoinSet::new();

        for store in &self.stores {
            let store = store.clone();
            let lead = lead.clone();
            join_set.spawn(async move { (store.backend(), store.save_lead(&lead).await) });
        }

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((_, Ok(()))) => {}
                Ok((backend, Err(err))) => {
                    tracing::error!(backend, error = %err, "lead store failed to save lead");
                    counter!(LEAD_STORE_WRITE_FAILURES, "backend" => backend).increment(1);
                }
                Err(err) => tracing::error!(error = %err, "lead save task panicked"),
            }
        }

        Ok(())
    }

    async fn email_exists(&self, email: &str) -> Result<bool, StorageError> {
        for store in &self.stores {
            match store.email_exists(email).await {
                Ok(true) => return Ok(true),
                Ok(false) => {}
                Err(err) => {
                    tracing::warn!(backend = store.backend(), error = %err, "could not check email");
                }
            }
        }

        Ok(false)
    }

    async fn get_all_leads(&self) -> Result<Vec<Lead>, StorageError> {
        let Some(first) = self.stores.first() else {
            return Ok(Vec::new());
        };

        match first.get_all_leads().await {
            Ok(leads) => Ok(leads),
            Err(err) => {
                tracing::warn!(backend = first.backend(), error = %err, "lead listing unavailable");
                counter!(LEAD_STORE_DEGRADED, "op" => "get_all_leads").increment(1);
                Ok(Vec::new())
            }
        }
    }
}
