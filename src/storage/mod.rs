//! Prediction log store
//!
//! Single-table persistence over a sqlx `Any` pool, so SQLite and
//! PostgreSQL connection strings both work. One row per served prediction;
//! rows are never updated or deleted. The pool is built lazily and each
//! request checks out its own scoped session, so readiness always reflects
//! live storage state.

use crate::error::{Result, ScoreboxError};
use crate::schema::{FeatureVector, FEATURE_NAMES};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::any::AnyPoolOptions;
use sqlx::pool::PoolConnection;
use sqlx::{Any, AnyPool, Row};
use tracing::info;

/// Scoped per-request storage session; dropping it returns the connection
/// to the pool on every exit path.
pub type LogSession = PoolConnection<Any>;

/// One persisted prediction record
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub vector: FeatureVector,
    pub prediction: i64,
}

/// SQL dialect, derived from the connection string scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dialect {
    Sqlite,
    Postgres,
}

/// Ensure default Any drivers are installed (idempotent).
fn ensure_drivers() {
    sqlx::any::install_default_drivers();
}

/// Log store over a shared connection pool
#[derive(Debug, Clone)]
pub struct LogStore {
    pool: AnyPool,
    dialect: Dialect,
}

impl LogStore {
    /// Build the pool without connecting. Connections are established on
    /// first use, so a temporarily unreachable store surfaces through the
    /// readiness probe rather than at construction.
    pub fn connect_lazy(database_url: &str, max_connections: u32) -> Result<Self> {
        ensure_drivers();

        let dialect = if database_url.starts_with("sqlite") {
            Dialect::Sqlite
        } else {
            Dialect::Postgres
        };

        let pool = AnyPoolOptions::new()
            .max_connections(max_connections)
            .connect_lazy(database_url)
            .map_err(|e| ScoreboxError::StorageError(format!("pool setup: {}", e)))?;

        Ok(Self { pool, dialect })
    }

    /// Create the `prediction_logs` table and its indexes if absent.
    /// The only schema management this service performs.
    pub async fn ensure_schema(&self) -> Result<()> {
        let feature_columns: Vec<String> = FEATURE_NAMES
            .iter()
            .map(|name| format!("{} DOUBLE PRECISION NOT NULL", name))
            .collect();

        let id_column = match self.dialect {
            Dialect::Sqlite => "id INTEGER PRIMARY KEY AUTOINCREMENT",
            Dialect::Postgres => "id BIGSERIAL PRIMARY KEY",
        };

        let ddl = format!(
            "CREATE TABLE IF NOT EXISTS prediction_logs (\
             {}, timestamp TEXT NOT NULL, {}, prediction BIGINT NOT NULL)",
            id_column,
            feature_columns.join(", "),
        );

        sqlx::query(&ddl).execute(&self.pool).await?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_prediction_logs_timestamp \
             ON prediction_logs (timestamp)",
        )
        .execute(&self.pool)
        .await?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_prediction_logs_prediction \
             ON prediction_logs (prediction)",
        )
        .execute(&self.pool)
        .await?;

        info!("Prediction log schema ready");
        Ok(())
    }

    /// Check out a scoped session for one request
    pub async fn session(&self) -> Result<LogSession> {
        Ok(self.pool.acquire().await?)
    }

    /// Append one prediction record; durable before return, no retry.
    /// The timestamp is assigned here, at write time, in UTC.
    pub async fn append(
        &self,
        session: &mut LogSession,
        vector: &FeatureVector,
        prediction: i64,
    ) -> Result<LogEntry> {
        let timestamp = Utc::now();

        let placeholders: Vec<String> = (1..=FEATURE_NAMES.len() + 2)
            .map(|i| format!("${}", i))
            .collect();
        let sql = format!(
            "INSERT INTO prediction_logs (timestamp, {}, prediction) VALUES ({}) RETURNING id",
            FEATURE_NAMES.join(", "),
            placeholders.join(", "),
        );

        let mut query = sqlx::query(&sql).bind(timestamp.to_rfc3339());
        for value in vector.values() {
            query = query.bind(value);
        }
        query = query.bind(prediction);

        let row = query.fetch_one(&mut **session).await?;
        let id: i64 = row.try_get("id")?;

        Ok(LogEntry {
            id,
            timestamp,
            vector: *vector,
            prediction,
        })
    }

    /// Trivial round-trip query; used by the readiness probe and the
    /// `check` command, never by the prediction path.
    pub async fn check_connectivity(&self) -> Result<()> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }

    /// Total persisted rows
    pub async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM prediction_logs")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("n")?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(name: &str) -> LogStore {
        let path = std::env::temp_dir().join(format!(
            "scorebox-store-{}-{}.db",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        let url = format!("sqlite://{}?mode=rwc", path.display());
        LogStore::connect_lazy(&url, 2).unwrap()
    }

    fn sample_vector() -> FeatureVector {
        FeatureVector::from_values([
            -0.1, 1.2, -0.5, 0.8, -2.1, 0.3, 1.1, -0.0, 0.9, 4.4, -2.2, -2.1, -2.4, 2.4, 1.1,
        ])
    }

    #[tokio::test]
    async fn test_ensure_schema_is_idempotent() {
        let store = temp_store("schema");
        store.ensure_schema().await.unwrap();
        store.ensure_schema().await.unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_append_assigns_increasing_ids() {
        let store = temp_store("append");
        store.ensure_schema().await.unwrap();

        let mut session = store.session().await.unwrap();
        let first = store
            .append(&mut session, &sample_vector(), 0)
            .await
            .unwrap();
        let second = store
            .append(&mut session, &sample_vector(), 1)
            .await
            .unwrap();

        assert!(second.id > first.id);
        assert_eq!(first.prediction, 0);
        assert_eq!(second.prediction, 1);
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_append_preserves_vector() {
        let store = temp_store("roundtrip");
        store.ensure_schema().await.unwrap();

        let vector = sample_vector();
        let mut session = store.session().await.unwrap();
        let entry = store.append(&mut session, &vector, 1).await.unwrap();
        drop(session);

        assert_eq!(entry.vector, vector);

        let row = sqlx::query("SELECT feature_9, prediction FROM prediction_logs WHERE id = $1")
            .bind(entry.id)
            .fetch_one(&store.pool)
            .await
            .unwrap();
        let feature_9: f64 = row.try_get("feature_9").unwrap();
        let prediction: i64 = row.try_get("prediction").unwrap();
        assert_eq!(feature_9, 4.4);
        assert_eq!(prediction, 1);
    }

    #[tokio::test]
    async fn test_check_connectivity_ok() {
        let store = temp_store("probe");
        store.ensure_schema().await.unwrap();
        assert!(store.check_connectivity().await.is_ok());
    }

    #[tokio::test]
    async fn test_check_connectivity_unreachable() {
        // Discard port; nothing listens there.
        let store = LogStore::connect_lazy("postgres://127.0.0.1:9/none", 1).unwrap();
        assert!(store.check_connectivity().await.is_err());
    }
}
