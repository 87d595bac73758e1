use flags::DEFAULT_FLAG_NAMES;
use leads::LeadStoreConfig;
use serde::Deserialize;
use site_api::config::Config as SiteConfig;
use std::fs::File;

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct MetricsConfig {
    pub statsd_host: String,
    pub statsd_port: u16,
    #[serde(default = "default_metrics_prefix")]
    pub prefix: String,
}

fn default_metrics_prefix() -> String {
    "portfolio".into()
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default)]
    pub level: Option<String>,
    pub sentry_dsn: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct FlagsConfig {
    /// Upper-case flag names; each reads `FEATURE_<NAME>` and
    /// `ROLLOUT_<NAME>_PERCENT`.
    pub names: Vec<String>,
}

impl Default for FlagsConfig {
    fn default() -> Self {
        FlagsConfig {
            names: DEFAULT_FLAG_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Config {
    pub metrics: Option<MetricsConfig>,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub flags: FlagsConfig,
    /// When absent the store is chosen by `LEAD_STORE_PROVIDER`.
    pub lead_store: Option<LeadStoreConfig>,
}

impl Config {
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let data = serde_yaml::from_reader(file)?;

        Ok(data)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not load config from file: {0}")]
    LoadError(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),
}
