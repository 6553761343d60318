pub mod api; // Local HTTP API
pub mod config;
pub mod core_state; // Session registry
pub mod export; // Page snapshots → PDF
pub mod imaging;
pub mod models;
pub mod session;
pub mod stages; // Wizard stage views + edits
pub mod store; // Per-section report store
pub mod wizard; // Stage navigation

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

pub fn run() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = match config::ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration error: {e}");
            std::process::exit(2);
        }
    };
    tracing::info!(
        bind = %config.bind,
        exports_dir = %config.exports_dir.display(),
        export_concurrency = config.export_concurrency,
        "Configuration loaded"
    );

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Cannot start async runtime: {e}");
            std::process::exit(1);
        }
    };

    let bind = config.bind;
    let core = Arc::new(core_state::CoreState::new(config));
    if let Err(e) = runtime.block_on(api::serve(core, bind, api::shutdown_signal())) {
        tracing::error!("Report API server error: {e}");
        std::process::exit(1);
    }
}
