mod config;
mod telemetry;

use clap::{Parser, Subcommand};
use config::{Config, ConfigError};
use flags::{EnvSource, FlagEvaluator, resolve_client_id};
use leads::{LeadStore, StorageError};
use site_api::{AppState, SiteApiError};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "portfolio", about = "Feature flags and lead capture for the portfolio site")]
struct Cli {
    /// YAML config file. Built-in defaults and the environment are used when omitted.
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Run the public API and the admin listener.
    Serve,
    /// Print the flags a client would receive.
    Flags {
        #[arg(long)]
        client_id: Option<String>,
    },
    /// Print every stored lead as JSON.
    Leads,
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Telemetry(#[from] telemetry::TelemetryError),
    #[error("lead store: {0}")]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Server(#[from] SiteApiError),
    #[error("could not encode output: {0}")]
    Output(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.config.as_deref().map(Config::from_file).transpose() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let _sentry = telemetry::init_logging(&config.logging);

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!(error = %e, "could not start runtime");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli.command, config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "portfolio exited with error");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: CliCommand, config: Config) -> Result<(), CliError> {
    let flags = FlagEvaluator::new(&config.flags.names, Arc::new(EnvSource));

    match command {
        CliCommand::Serve => {
            if let Some(metrics) = &config.metrics {
                telemetry::init_metrics(metrics)?;
            }
            flags.log_summary();

            let store = lead_store(&config)?;
            tracing::info!(backend = store.backend(), "starting site api");
            let state = AppState::new(flags, store, config.site.admin_token.clone());
            site_api::run(config.site, state).await?;
        }
        CliCommand::Flags { client_id } => {
            let client_id = resolve_client_id(client_id.as_deref());
            let evaluated = flags.evaluate(&client_id);
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "clientId": client_id,
                    "flags": evaluated,
                }))?
            );
        }
        CliCommand::Leads => {
            let store = lead_store(&config)?;
            let all = store.get_all_leads().await?;
            println!("{}", serde_json::to_string_pretty(&all)?);
        }
    }

    Ok(())
}

fn lead_store(config: &Config) -> Result<Arc<dyn LeadStore>, StorageError> {
    match &config.lead_store {
        Some(store) => leads::build_store(store.clone()),
        None => leads::store_from_env(Path::new(leads::DEFAULT_LEADS_FILE)),
    }
}
