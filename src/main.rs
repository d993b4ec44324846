use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use materna::api::server::start_api_server;
use materna::config;
use materna::engine::CareEngine;
use materna::store::SqliteStore;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    std::fs::create_dir_all(config::app_data_dir()).expect("cannot create data directory");

    let store = SqliteStore::open(&config::database_path()).expect("cannot open record store");
    let engine = Arc::new(CareEngine::new(Arc::new(store)));

    let mut server = start_api_server(engine, config::bind_addr())
        .await
        .expect("cannot start API server");

    tracing::info!(addr = %server.session.server_addr, "Materna listening");

    tokio::signal::ctrl_c().await.expect("cannot listen for shutdown signal");
    tracing::info!("Shutdown requested");
    server.shutdown();
}
