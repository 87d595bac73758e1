use crate::json_store::DEFAULT_LEADS_FILE;
use crate::sheets::SheetsConfig;
use serde::Deserialize;
use std::path::PathBuf;

/// Env var selecting the provider when no store is configured explicitly.
pub const ENV_PROVIDER: &str = "LEAD_STORE_PROVIDER";

#[derive(Clone, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "lowercase")]
#[serde(tag = "type")]
pub enum LeadStoreConfig {
    Json {
        #[serde(default = "default_json_path")]
        path: PathBuf,
    },
    Gsheets(SheetsConfig),
    Fallback {
        primary: Box<LeadStoreConfig>,
        fallback: Box<LeadStoreConfig>,
    },
    /// Writes go to every store; reads come from the first.
    Composite { stores: Vec<LeadStoreConfig> },
}

pub fn default_json_path() -> PathBuf {
    PathBuf::from(DEFAULT_LEADS_FILE)
}

impl Default for LeadStoreConfig {
    fn default() -> Self {
        LeadStoreConfig::Json {
            path: default_json_path(),
        }
    }
}

impl LeadStoreConfig {
    /// Maps a `LEAD_STORE_PROVIDER` value to a store layout.
    ///
    /// Google Sheets is always backed by the JSON file so a misconfigured
    /// spreadsheet never loses leads. Unknown values select the JSON file.
    pub fn from_provider(provider: Option<&str>, json_path: PathBuf) -> Self {
        let json = LeadStoreConfig::Json { path: json_path };
        let provider = provider.unwrap_or("json").trim().to_lowercase();

        match provider.as_str() {
            "gsheets" | "googlesheets" | "google_sheets" => LeadStoreConfig::Fallback {
                primary: Box::new(LeadStoreConfig::Gsheets(SheetsConfig::default())),
                fallback: Box::new(json),
            },
            "json" => json,
            other => {
                tracing::warn!(provider = other, "unknown lead store provider, using json");
                json
            }
        }
    }
}
