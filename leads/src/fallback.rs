use crate::lead::Lead;
use crate::metrics_defs::{LEAD_STORE_DEGRADED, LEAD_STORE_FALLBACKS, LEAD_STORE_PRIMARY_DISABLED};
use crate::store::{LeadStore, StorageError};
use async_trait::async_trait;
use shared::counter;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Tries the primary store first and falls back to the secondary one.
///
/// The first `NotConfigured` error from the primary disables it for the rest
/// of this instance's lifetime; there is no recovery. Any other primary error
/// only diverts the current call. Share one instance per process so the
/// latch applies everywhere.
///
/// When the fallback fails as well, `save_lead` returns the fallback's error,
/// `email_exists` answers `false` and `get_all_leads` answers an empty list.
pub struct FallbackLeadStore {
    primary: Arc<dyn LeadStore>,
    fallback: Arc<dyn LeadStore>,
    primary_disabled: AtomicBool,
}

impl FallbackLeadStore {
    pub fn new(primary: Arc<dyn LeadStore>, fallback: Arc<dyn LeadStore>) -> Self {
        FallbackLeadStore {
            primary,
            fallback,
            primary_disabled: AtomicBool::new(false),
        }
    }

    pub fn primary_disabled(&self) -> bool {
        self.primary_disabled.load(Ordering::Acquire)
    }

    fn primary_failed(&self, op: &'static str, err: &StorageError) {
        if err.is_not_configured() {
            if !self.primary_disabled.swap(true, Ordering::AcqRel) {
                tracing::warn!(
                    primary = self.primary.backend(),
                    fallback = self.fallback.backend(),
                    error = %err,
                    "primary lead store is not configured, using fallback from now on"
                );
                counter!(LEAD_STORE_PRIMARY_DISABLED, "backend" => self.primary.backend())
                    .increment(1);
            }
        } else {
            tracing::warn!(
                op,
                primary = self.primary.backend(),
                error = %err,
                "primary lead store failed, using fallback for this call"
            );
        }
    }

    fn using_fallback(&self, op: &'static str) {
        counter!(LEAD_STORE_FALLBACKS, "op" => op).increment(1);
    }
}

#[async_trait]
impl LeadStore for FallbackLeadStore {
    fn backend(&self) -> &'static str {
        "fallback"
    }

    async fn save_lead(&self, lead: &Lead) -> Result<(), StorageError> {
        if !self.primary_disabled() {
            match self.primary.save_lead(lead).await {
                Ok(()) => return Ok(()),
                Err(err) => self.primary_failed("save_lead", &err),
            }
        }

        self.using_fallback("save_lead");
        self.fallback.save_lead(lead).await.inspect_err(|err| {
            tracing::error!(
                fallback = self.fallback.backend(),
                error = %err,
                "fallback lead store failed to save lead"
            );
        })
    }

    async fn email_exists(&self, email: &str) -> Result<bool, StorageError> {
        if !self.primary_disabled() {
            match self.primary.email_exists(email).await {
                Ok(exists) => return Ok(exists),
                Err(err) => self.primary_failed("email_exists", &err),
            }
        }

        self.using_fallback("email_exists");
        match self.fallback.email_exists(email).await {
            Ok(exists) => Ok(exists),
            Err(err) => {
                tracing::warn!(error = %err, "duplicate check unavailable, treating email as new");
                counter!(LEAD_STORE_DEGRADED, "op" => "email_exists").increment(1);
                Ok(false)
            }
        }
    }

    async fn get_all_leads(&self) -> Result<Vec<Lead>, StorageError> {
        if !self.primary_disabled() {
            match self.primary.get_all_leads().await {
                Ok(leads) => return Ok(leads),
                Err(err) => self.primary_failed("get_all_leads", &err),
            }
        }

        self.using_fallback("get_all_leads");
        match self.fallback.get_all_leads().await {
            Ok(leads) => Ok(leads),
            Err(err) => {
                tracing::warn!(error = %err, "lead listing unavailable, returning no leads");
                counter!(LEAD_STORE_DEGRADED, "op" => "get_all_leads").increment(1);
                Ok(Vec::new())
            }
        }
    }
}
