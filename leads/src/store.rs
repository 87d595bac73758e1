use crate::lead::Lead;
use async_trait::async_trait;

/// Whether retrying a failed operation could ever succeed without
/// reconfiguring the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageErrorCode {
    /// Required configuration or credentials are missing.
    NotConfigured,
    /// Network, auth, quota or I/O trouble that may clear up.
    Transient,
}

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("{backend} lead store is not configured: {reason}")]
    NotConfigured {
        backend: &'static str,
        reason: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("could not sign credentials: {0}")]
    Credentials(#[from] jsonwebtoken::errors::Error),

    #[error("remote store returned {status}: {body}")]
    Remote { status: u16, body: String },

    #[error("lead store unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    pub fn code(&self) -> StorageErrorCode {
        match self {
            StorageError::NotConfigured { .. } => StorageErrorCode::NotConfigured,
            _ => StorageErrorCode::Transient,
        }
    }

    pub fn is_not_configured(&self) -> bool {
        self.code() == StorageErrorCode::NotConfigured
    }
}

/// Persistence contract for captured leads.
///
/// Implementations never retry internally; failover between backends is the
/// job of [`crate::FallbackLeadStore`].
#[async_trait]
pub trait LeadStore: Send + Sync {
    /// Short backend name used in logs and metric tags.
    fn backend(&self) -> &'static str;

    async fn save_lead(&self, lead: &Lead) -> Result<(), StorageError>;

    async fn email_exists(&self, email: &str) -> Result<bool, StorageError>;

    async fn get_all_leads(&self) -> Result<Vec<Lead>, StorageError>;
}
