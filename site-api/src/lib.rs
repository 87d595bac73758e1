pub mod api;
pub mod config;
pub mod metrics_defs;

use flags::FlagEvaluator;
use leads::LeadStore;
use shared::admin_service::AdminService;
use shared::http::run_http_service;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::net::TcpListener;

#[derive(thiserror::Error, Debug)]
pub enum SiteApiError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Config(#[from] config::ValidationError),
}

/// Shared by every request; the lead store keeps its failover state here
/// for the lifetime of the process.
#[derive(Clone)]
pub struct AppState {
    pub flags: FlagEvaluator,
    pub leads: Arc<dyn LeadStore>,
    pub admin_token: Option<String>,
}

impl AppState {
    pub fn new(
        flags: FlagEvaluator,
        leads: Arc<dyn LeadStore>,
        admin_token: Option<String>,
    ) -> Self {
        AppState {
            flags,
            leads,
            admin_token,
        }
    }
}

/// Runs the public API and the admin listener until either fails.
pub async fn run(config: config::Config, state: AppState) -> Result<(), SiteApiError> {
    config.validate()?;

    let ready = Arc::new(AtomicBool::new(false));
    let ready_probe = ready.clone();
    let flags = state.flags.clone();
    let admin = AdminService::<_, _, SiteApiError>::new(
        move || ready_probe.load(Ordering::Relaxed),
        move || flags.summary().to_json(),
    );

    let api_task = serve(config.listener, state, ready);
    let admin_task = run_http_service(
        &config.admin_listener.host,
        config.admin_listener.port,
        admin,
    );

    tokio::try_join!(api_task, admin_task)?;
    Ok(())
}

async fn serve(
    listener: config::Listener,
    state: AppState,
    ready: Arc<AtomicBool>,
) -> Result<(), SiteApiError> {
    let app = api::router(state);
    let tcp = TcpListener::bind(listener.addr()).await?;
    tracing::info!(addr = %listener.addr(), "site api listening");
    ready.store(true, Ordering::Relaxed);

    axum::serve(tcp, app.into_make_service_with_connect_info::<SocketAddr>()).await?;
    Ok(())
}
