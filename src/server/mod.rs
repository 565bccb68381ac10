//! Scorebox HTTP server
//!
//! Serves the prediction endpoint plus liveness and storage-readiness
//! probes. Startup is strict: the schema must be in place and the model
//! artifact loaded before the listener binds; there is no degraded mode.

mod api;
mod error;
mod handlers;
mod state;

pub use api::create_router;
pub use error::ServerError;
pub use handlers::PredictResponse;
pub use state::AppState;

use crate::inference::ModelAdapter;
use crate::model::ModelSource;
use crate::storage::LogStore;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    /// Artifact location: a URL, a `file://` path, or a bare path
    pub model_source: String,
    pub model_fetch_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://predictions.db?mode=rwc".to_string()),
            db_max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
            model_source: Self::resolve_model_source(),
            model_fetch_timeout_secs: std::env::var("MODEL_FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        }
    }
}

impl ServerConfig {
    /// Resolve the artifact source: an explicit `MODEL_URL` wins, otherwise
    /// endpoint/bucket/key compose into a blob-store URL.
    fn resolve_model_source() -> String {
        if let Ok(url) = std::env::var("MODEL_URL") {
            if !url.is_empty() {
                return url;
            }
        }

        let endpoint = std::env::var("MODEL_ENDPOINT")
            .unwrap_or_else(|_| "https://s3.amazonaws.com".to_string());
        let bucket =
            std::env::var("MODEL_BUCKET").unwrap_or_else(|_| "scorebox-models".to_string());
        let key = std::env::var("MODEL_KEY").unwrap_or_else(|_| "classifier.json".to_string());

        ModelSource::from_bucket(&endpoint, &bucket, &key).to_string()
    }
}

/// Start the server with the given configuration
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let start_time = chrono::Utc::now();
    info!(
        database_url = %config.database_url,
        started_at = %start_time.to_rfc3339(),
        "Initializing prediction log store"
    );

    let store = LogStore::connect_lazy(&config.database_url, config.db_max_connections)?;
    store.ensure_schema().await?;

    let source = ModelSource::parse(&config.model_source);
    info!(source = %source, "Loading model artifact");
    let adapter = ModelAdapter::load(
        &source,
        Duration::from_secs(config.model_fetch_timeout_secs),
    )
    .await?;

    let state = Arc::new(AppState::new(config.clone(), adapter, store));
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!(
        host = %config.host,
        port = config.port,
        address = %addr,
        started_at = %start_time.to_rfc3339(),
        "Scorebox server starting"
    );
    info!(url = %format!("http://{}/health", addr), "Health endpoint available");
    info!(url = %format!("http://{}/predict", addr), "Prediction endpoint available");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(address = %addr, pid = std::process::id(), "Server listening and ready to accept connections");

    // Graceful shutdown on ctrl+c
    let start_time_for_shutdown = start_time;
    let shutdown_signal = async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
        let stop_time = chrono::Utc::now();
        let uptime = stop_time.signed_duration_since(start_time_for_shutdown);
        info!(
            stopped_at = %stop_time.to_rfc3339(),
            uptime_secs = uptime.num_seconds(),
            "Shutdown signal received, stopping server gracefully"
        );
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shut down cleanly");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8000);
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.model_fetch_timeout_secs, 30);
    }
}
