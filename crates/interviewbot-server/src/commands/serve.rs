//! The `interviewbot serve` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use interviewbot_core::gateway::InterviewGateway;
use interviewbot_providers::config::load_config_from;
use interviewbot_providers::create_provider;
use interviewbot_server::AppState;
use interviewbot_store::SessionStore;

pub async fn execute(
    host: Option<String>,
    port: Option<u16>,
    database: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let mut config = load_config_from(config_path.as_deref())?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(database) = database {
        config.database_path = database;
    }

    // Fail fast: no credential, no server.
    let provider = create_provider(&config.provider)?;
    let gateway = InterviewGateway::with_models(provider, config.gateway_models());
    let provider_name = gateway.provider_name().to_string();

    let store = SessionStore::new(&config.database_path);
    store.initialize().with_context(|| {
        format!(
            "failed to initialize database: {}",
            config.database_path.display()
        )
    })?;

    let scratch_dir = config
        .server
        .scratch_dir
        .clone()
        .unwrap_or_else(std::env::temp_dir);
    std::fs::create_dir_all(&scratch_dir).with_context(|| {
        format!(
            "failed to create scratch directory: {}",
            scratch_dir.display()
        )
    })?;

    let state = AppState::new(gateway, Arc::new(store))
        .with_scratch_dir(scratch_dir)
        .with_max_upload_bytes(config.server.max_upload_bytes);
    let app = interviewbot_server::app(state, &config.server.allowed_origins)?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(
        %addr,
        provider = %provider_name,
        chat_model = %config.chat_model,
        database = %config.database_path.display(),
        "interviewbot API listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("interviewbot API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
