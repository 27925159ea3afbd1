use std::{future::Future, sync::Arc, time::Duration};

use anyhow::Context;
use axum::http::{header::CONTENT_TYPE, Method};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::{
    config::{ServerConfig, StoreKind},
    database::{ConnectionProvider, MemoryStore, MySqlStore, SuggestionStore},
    routes::{router, AppState},
};

/// Builds the store named by the config. The connection provider is created
/// here once and shared by every request for the life of the process.
pub fn build_store(config: &ServerConfig) -> Arc<dyn SuggestionStore> {
    match config.store {
        StoreKind::MySql => Arc::new(MySqlStore::new(ConnectionProvider::new(
            config.database_url.clone(),
        ))),
        StoreKind::Memory => {
            warn!("Using the in-memory store, suggestions are lost on restart");
            Arc::new(MemoryStore::new())
        }
    }
}

pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    info!("Initializing state...");
    let store = build_store(&config);

    let address = format!("0.0.0.0:{}", config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!("Server running on {address}");

    serve(listener, store, shutdown_signal()).await
}

/// Serves until `shutdown` resolves, then closes the store.
pub async fn serve<F>(
    listener: TcpListener,
    store: Arc<dyn SuggestionStore>,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let app = router(AppState::new(store.clone()))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("server error");

    info!("Server shutting down...");
    store.close().await;
    result
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::{
        database::MemoryStore,
        error::StoreError,
        suggestion::{SuggestionRow, ValidSuggestion},
    };

    #[derive(Default)]
    struct TrackedStore {
        inner: MemoryStore,
        closed: AtomicBool,
    }

    #[async_trait]
    impl SuggestionStore for TrackedStore {
        async fn insert(&self, suggestion: ValidSuggestion) -> Result<Vec<SuggestionRow>, StoreError> {
            self.inner.insert(suggestion).await
        }

        async fn list(&self) -> Result<Vec<SuggestionRow>, StoreError> {
            self.inner.list().await
        }

        async fn close(&self) {
            self.closed.store(true, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn shutdown_closes_the_store() {
        let store = Arc::new(TrackedStore::default());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();

        serve(listener, store.clone(), async {}).await.unwrap();

        assert!(store.closed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn memory_store_starts_empty() {
        let config = ServerConfig {
            port: 0,
            database_url: None,
            store: StoreKind::Memory,
        };
        assert!(build_store(&config).list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn mysql_store_without_url_reports_configuration() {
        let config = ServerConfig {
            port: 0,
            database_url: None,
            store: StoreKind::MySql,
        };
        let err = build_store(&config).list().await.unwrap_err();
        assert_eq!(err.to_string(), "DATABASE_URL not configured");
    }
}
