//! Durable mirror of the registry.
//!
//! The store is a durability aid, not the source of truth for what is
//! running. Rows are upserted on create and kept on delete.

use std::future::Future;

use crate::db::models::GasRow;
use crate::error::Result;
use crate::models::GasSpec;
use sqlx::SqlitePool;

/// What an upsert did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted(i64),
    Updated(i64),
    /// No store configured
    Skipped,
}

/// Upsert/lookup by network key.
pub trait GasStore: Send + Sync {
    fn find_id(&self, network: &str) -> impl Future<Output = Result<Option<i64>>> + Send;

    /// Lookup-then-update-else-insert. Not atomic on its own; callers
    /// serialize concurrent upserts for the same network.
    fn upsert(&self, spec: &GasSpec) -> impl Future<Output = Result<UpsertOutcome>> + Send;
}

pub struct SqliteGasStore {
    pool: SqlitePool,
}

impl SqliteGasStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_id(&self, network: &str) -> Result<Option<i64>> {
        let id = sqlx::query_scalar::<_, i64>("SELECT id FROM gases WHERE network = ? LIMIT 1")
            .bind(network)
            .fetch_optional(&self.pool)
            .await?;

        Ok(id)
    }

    pub async fn upsert(&self, spec: &GasSpec) -> Result<UpsertOutcome> {
        let frequency = i64::try_from(spec.frequency).unwrap_or(i64::MAX);

        match self.find_id(&spec.network).await? {
            Some(id) => {
                sqlx::query(
                    "UPDATE gases SET token = ?, nickname = ?, network = ?, frequency = ? WHERE id = ?",
                )
                .bind(&spec.token)
                .bind(spec.nickname)
                .bind(&spec.network)
                .bind(frequency)
                .bind(id)
                .execute(&self.pool)
                .await?;

                tracing::info!(network = %spec.network, id, "Updated gas in db");
                Ok(UpsertOutcome::Updated(id))
            },
            None => {
                let result = sqlx::query(
                    "INSERT INTO gases (token, nickname, network, frequency) VALUES (?, ?, ?, ?)",
                )
                .bind(&spec.token)
                .bind(spec.nickname)
                .bind(&spec.network)
                .bind(frequency)
                .execute(&self.pool)
                .await?;

                let id = result.last_insert_rowid();
                tracing::info!(network = %spec.network, id, "Stored gas in db");
                Ok(UpsertOutcome::Inserted(id))
            },
        }
    }

    /// All persisted rows, oldest first
    pub async fn list_rows(&self) -> Result<Vec<GasRow>> {
        let rows = sqlx::query_as::<_, GasRow>(
            "SELECT id, token, nickname, network, frequency FROM gases ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

impl GasStore for SqliteGasStore {
    fn find_id(&self, network: &str) -> impl Future<Output = Result<Option<i64>>> + Send {
        self.find_id(network)
    }

    fn upsert(&self, spec: &GasSpec) -> impl Future<Output = Result<UpsertOutcome>> + Send {
        self.upsert(spec)
    }
}

/// The store the registry writes through: SQLite, or nothing at all
pub enum Persistence {
    Sqlite(SqliteGasStore),
    Disabled,
}

impl Persistence {
    pub fn sqlite(pool: SqlitePool) -> Self {
        Persistence::Sqlite(SqliteGasStore::new(pool))
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Persistence::Sqlite(_))
    }
}

impl GasStore for Persistence {
    async fn find_id(&self, network: &str) -> Result<Option<i64>> {
        match self {
            Persistence::Sqlite(store) => store.find_id(network).await,
            Persistence::Disabled => Ok(None),
        }
    }

    async fn upsert(&self, spec: &GasSpec) -> Result<UpsertOutcome> {
        match self {
            Persistence::Sqlite(store) => store.upsert(spec).await,
            Persistence::Disabled => Ok(UpsertOutcome::Skipped),
        }
    }
}
