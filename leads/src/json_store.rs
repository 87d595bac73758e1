//! Lead storage in a single local JSON file.
//!
//! The whole collection is one JSON array. Every save reads the array,
//! appends and rewrites the file. Two concurrent saves in the same process
//! can interleave and lose one of the leads, so this store is only suitable
//! for a single low-traffic writer. Use an append-only log or an embedded
//! database if concurrent writers are needed.
use crate::lead::Lead;
use crate::sanitize::normalize_email;
use crate::store::{LeadStore, StorageError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub const DEFAULT_LEADS_FILE: &str = "leads.json";

pub struct JsonLeadStore {
    path: PathBuf,
}

impl JsonLeadStore {
    /// Opens the store, creating the file with an empty array if it does not
    /// exist yet.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, "[]")?;
            tracing::info!(path = %path.display(), "created leads file");
        }

        Ok(JsonLeadStore { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_leads(&self) -> Result<Vec<Lead>, StorageError> {
        let data = tokio::fs::read(&self.path).await?;
        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_slice(&data)?)
    }

    async fn write_leads(&self, leads: &[Lead]) -> Result<(), StorageError> {
        let data = serde_json::to_vec_pretty(leads)?;
        tokio::fs::write(&self.path, data).await?;
        Ok(())
    }
}

#[async_trait]
impl LeadStore for JsonLeadStore {
    fn backend(&self) -> &'static str {
        "json"
    }

    async fn save_lead(&self, lead: &Lead) -> Result<(), StorageError> {
        let mut leads = self.read_leads().await?;
        leads.push(lead.clone());
        self.write_leads(&leads).await?;
        tracing::debug!(email = %lead.email, total = leads.len(), "lead saved to json file");
        Ok(())
    }

    async fn email_exists(&self, email: &str) -> Result<bool, StorageError> {
        let wanted = normalize_email(email);
        let leads = self.read_leads().await?;
        Ok(leads.iter().any(|lead| normalize_email(&lead.email) == wanted))
    }

    async fn get_all_leads(&self) -> Result<Vec<Lead>, StorageError> {
        self.read_leads().await
    }
}
