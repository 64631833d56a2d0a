//! Report Store API Server
//!
//! REST API for listing, reading, saving and deleting reports.

use anyhow::Context;
use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Instant;
use storage::{MemoryRepository, MySqlRepository, ReportStore, SqliteRepository, StorageError};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

pub mod config;
pub mod error;
pub mod routes;
pub mod telemetry;

pub use crate::config::{ApiConfig, LogFormat, StoreKind};
pub use crate::error::{ApiError, Operation};

/// Application state shared across handlers
pub struct AppState {
    /// Report repository
    pub store: Arc<dyn ReportStore>,
    /// Prometheus render handle, when metrics are enabled
    pub metrics: Option<PrometheusHandle>,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(store: Arc<dyn ReportStore>) -> Self {
        Self {
            store,
            metrics: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: Instant::now(),
        }
    }

    /// Serve `/metrics` from this handle
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_origin(Any)
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/api/health", get(routes::health::health))
        .route(
            "/api/reports",
            get(routes::reports::list_reports).post(routes::reports::save_report),
        )
        .route(
            "/api/reports/:id",
            get(routes::reports::get_report).delete(routes::reports::delete_report),
        )
        .route("/metrics", get(routes::health::metrics))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Open the configured repository and ensure its schema
pub async fn open_store(config: &ApiConfig) -> Result<Arc<dyn ReportStore>, StorageError> {
    let store: Arc<dyn ReportStore> = match config.store {
        StoreKind::Mysql => {
            let repo = MySqlRepository::connect_lazy(&config.mysql_settings());
            if config.init_schema {
                // The server keeps running without a database; requests
                // fail individually until it becomes reachable.
                if let Err(e) = repo.init_schema().await {
                    error!(error = %e, "Failed to create reports table");
                }
            }
            Arc::new(repo)
        }
        StoreKind::Sqlite => {
            let repo = SqliteRepository::connect(&config.sqlite_path).await?;
            if config.init_schema {
                repo.init_schema().await?;
            }
            Arc::new(repo)
        }
        StoreKind::Memory => Arc::new(MemoryRepository::new()),
    };

    Ok(store)
}

/// Log whether the store answers; never fatal
pub async fn check_store(store: &dyn ReportStore) {
    match store.ping().await {
        Ok(()) => info!(backend = store.backend(), "Connected to report store"),
        Err(e) => error!(backend = store.backend(), error = %e, "Error connecting to report store"),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Server shutting down");
}

/// Run the server
pub async fn run_server(config: ApiConfig) -> anyhow::Result<()> {
    let store = open_store(&config)
        .await
        .context("Failed to open report store")?;
    check_store(store.as_ref()).await;

    let mut state = AppState::new(store);
    if config.metrics_enabled {
        let handle = telemetry::install_metrics().context("Failed to install metrics recorder")?;
        state = state.with_metrics(handle);
    }

    let app = create_router(Arc::new(state));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(store: StoreKind) -> ApiConfig {
        ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            store,
            db_host: "localhost".to_string(),
            db_port: 3306,
            db_user: "root".to_string(),
            db_password: String::new(),
            db_database: "reports".to_string(),
            db_max_connections: 1,
            sqlite_path: ":memory:".to_string(),
            init_schema: true,
            log_format: LogFormat::Pretty,
            log_level: "info".to_string(),
            metrics_enabled: false,
        }
    }

    #[tokio::test]
    async fn test_open_memory_store() {
        let store = open_store(&config(StoreKind::Memory)).await.unwrap();
        assert_eq!(store.backend(), "memory");
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_open_sqlite_store_creates_schema() {
        let store = open_store(&config(StoreKind::Sqlite)).await.unwrap();
        assert_eq!(store.backend(), "sqlite");
        store.ping().await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }

    #[test]
    fn test_app_state_defaults() {
        let state = AppState::new(Arc::new(MemoryRepository::new()));
        assert!(state.metrics.is_none());
        assert_eq!(state.version, env!("CARGO_PKG_VERSION"));
    }
}
