//! Common utilities for integration tests
//!
//! Spins up the full HTTP stack in-process on an ephemeral port.

use gas_ticker::db::{create_pool, run_migrations};
use gas_ticker::metrics::WatchMetrics;
use gas_ticker::registry::GasRegistry;
use gas_ticker::server::{create_router, AppState};
use gas_ticker::store::Persistence;
use gas_ticker::watcher::GasWatcher;
use sqlx::SqlitePool;
use std::sync::Arc;
use tempfile::TempDir;

/// Discord base URL nothing listens on, so nickname lookups fail fast
const UNREACHABLE_DISCORD: &str = "http://127.0.0.1:9";

pub struct TestServer {
    pub base_url: String,
    pub registry: Arc<GasRegistry>,
    pub client: reqwest::Client,
    pub pool: Option<SqlitePool>,
    _temp_dir: Option<TempDir>,
}

impl TestServer {
    /// Server without a database
    pub async fn start() -> Self {
        Self::spawn(Persistence::Disabled, None, None).await
    }

    /// Server persisting to a fresh SQLite database
    pub async fn start_with_db() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let pool = create_pool(&temp_dir.path().join("ticker.db"))
            .await
            .unwrap();
        run_migrations(&pool).await.unwrap();

        Self::spawn(Persistence::sqlite(pool.clone()), Some(pool), Some(temp_dir)).await
    }

    async fn spawn(
        persistence: Persistence,
        pool: Option<SqlitePool>,
        temp_dir: Option<TempDir>,
    ) -> Self {
        let watcher = GasWatcher::new(None, UNREACHABLE_DISCORD).unwrap();
        let registry = Arc::new(GasRegistry::new(
            persistence,
            Arc::new(watcher),
            WatchMetrics::new().unwrap(),
        ));

        let app = create_router(AppState {
            registry: registry.clone(),
        });
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            registry,
            client: reqwest::Client::new(),
            pool,
            _temp_dir: temp_dir,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn post_gas(&self, body: serde_json::Value) -> reqwest::Response {
        self.client
            .post(self.url("/gas"))
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    pub async fn delete_gas(&self, network: &str) -> reqwest::Response {
        self.client
            .delete(self.url(&format!("/gas/{}", network)))
            .send()
            .await
            .unwrap()
    }

    pub async fn list_gas(&self) -> serde_json::Value {
        let response = self.client.get(self.url("/gas")).send().await.unwrap();
        assert_eq!(response.status(), 200);
        response.json().await.unwrap()
    }
}
