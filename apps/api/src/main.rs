mod config;
mod errors;
mod llm_client;
mod models;
mod routes;
mod session;
mod simulation;
mod state;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::session::SessionStore;
use crate::state::AppState;

const SESSION_SWEEP_PERIOD: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Crisis Ops API v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Default provider: {} ({}), server keys: {:?}",
        config.default_provider.label(),
        config.default_provider.model(),
        config.api_keys
    );

    let llm = LlmClient::new(&config.endpoints);

    let idle_ttl = Duration::from_secs(config.session_idle_ttl_secs);
    let sessions = SessionStore::with_idle_ttl(idle_ttl);
    sessions.spawn_sweeper(SESSION_SWEEP_PERIOD);
    info!("Idle sessions expire after {}s", idle_ttl.as_secs());

    let state = AppState {
        llm: Arc::new(llm),
        sessions,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the front end has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
