//! Store module - JSON document collections persisted in SQLite
//!
//! Every collection lives in the same `documents` table, keyed by
//! `(collection, id)`. Each write touches exactly one row (or one statement
//! for bulk deletes), so per-document writes are atomic. Filtering,
//! projection and sorting run in process over the decoded documents.

pub mod filter;
pub mod options;
pub mod projection;

pub use filter::Filter;
pub use options::{FindOptions, Sort, SortOrder};
pub use projection::Projection;

use crate::core::{AppError, Config};
use serde_json::Value;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite};
use std::time::Duration;
use tracing::{debug, info, instrument};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    collection TEXT NOT NULL,
    id TEXT NOT NULL,
    body TEXT NOT NULL,
    PRIMARY KEY (collection, id)
)
"#;

/// Ids per `DELETE ... IN (...)` statement
const DELETE_CHUNK_SIZE: usize = 10_000;

/// Handle to the shared document database
#[derive(Clone)]
pub struct DocumentStore {
    pool: SqlitePool,
}

impl DocumentStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool using the configured URL and limits
    pub async fn connect(config: &Config) -> Result<Self, AppError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .max_lifetime(Duration::from_secs(config.connection_lifetime_secs))
            .connect(&config.database_url)
            .await?;
        info!("Connected to document store");
        Ok(Self::new(pool))
    }

    /// Private in-memory database, used by tests and throwaway instances.
    /// A single connection that never expires keeps the data alive.
    pub async fn in_memory() -> Result<Self, AppError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        let store = Self::new(pool);
        store.init_schema().await?;
        Ok(store)
    }

    pub async fn init_schema(&self) -> Result<(), AppError> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        debug!("Document schema ready");
        Ok(())
    }

    pub fn collection(&self, name: &'static str) -> Collection {
        Collection {
            name,
            pool: self.pool.clone(),
        }
    }
}

/// A named set of documents with `_id` as primary key
#[derive(Clone)]
pub struct Collection {
    name: &'static str,
    pool: SqlitePool,
}

impl Collection {
    fn encode(document: &Value) -> Result<String, AppError> {
        serde_json::to_string(document).map_err(|e| {
            AppError::internal_server_error("Unable to encode document").with_details(e.to_string())
        })
    }

    fn decode(body: &str) -> Result<Value, AppError> {
        serde_json::from_str(body).map_err(|e| {
            AppError::internal_server_error("Corrupted document").with_details(e.to_string())
        })
    }

    /// Inserts a new document; a duplicate `id` is a conflict
    #[instrument(skip(self, document), fields(collection = self.name, id = %id))]
    pub async fn insert_one(&self, id: &str, document: &Value) -> Result<(), AppError> {
        let body = Self::encode(document)?;
        sqlx::query("INSERT INTO documents (collection, id, body) VALUES (?, ?, ?)")
            .bind(self.name)
            .bind(id)
            .bind(body)
            .execute(&self.pool)
            .await?;
        debug!("Document inserted");
        Ok(())
    }

    #[instrument(skip(self), fields(collection = self.name))]
    pub async fn find_one(&self, id: &str) -> Result<Option<Value>, AppError> {
        let body: Option<String> =
            sqlx::query_scalar("SELECT body FROM documents WHERE collection = ? AND id = ?")
                .bind(self.name)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        body.as_deref().map(Self::decode).transpose()
    }

    pub async fn exists(&self, id: &str) -> Result<bool, AppError> {
        let found: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM documents WHERE collection = ? AND id = ?")
                .bind(self.name)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(found.is_some())
    }

    /// All documents matching `filter`, sorted and paged by `options`
    /// (insertion order when unsorted), then projected
    #[instrument(skip_all, fields(collection = self.name))]
    pub async fn find(
        &self,
        filter: &Filter,
        projection: Option<&Projection>,
        options: &FindOptions,
    ) -> Result<Vec<Value>, AppError> {
        let matcher = filter.compile()?;
        if let Some(projection) = projection {
            projection.validate()?;
        }

        let bodies: Vec<String> =
            sqlx::query_scalar("SELECT body FROM documents WHERE collection = ? ORDER BY rowid")
                .bind(self.name)
                .fetch_all(&self.pool)
                .await?;

        let mut matching = Vec::new();
        for body in &bodies {
            let document = Self::decode(body)?;
            if matcher.matches(&document) {
                matching.push(document);
            }
        }
        debug!("{} of {} documents matched", matching.len(), bodies.len());

        options
            .apply(matching)
            .into_iter()
            .map(|document| match projection {
                Some(projection) => projection.apply(document),
                None => Ok(document),
            })
            .collect()
    }

    /// Overwrites an existing document; `false` when `id` is absent
    #[instrument(skip(self, document), fields(collection = self.name, id = %id))]
    pub async fn replace_one(&self, id: &str, document: &Value) -> Result<bool, AppError> {
        let body = Self::encode(document)?;
        let result = sqlx::query("UPDATE documents SET body = ? WHERE collection = ? AND id = ?")
            .bind(body)
            .bind(self.name)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), fields(collection = self.name))]
    pub async fn delete_one(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = ? AND id = ?")
            .bind(self.name)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Deletes every listed id, returning how many rows went away. Ids are
    /// sent in chunks that stay under SQLite's bound parameter limit, all in
    /// one transaction.
    #[instrument(skip(self, ids), fields(collection = self.name, requested = ids.len()))]
    pub async fn delete_many(&self, ids: &[String]) -> Result<u64, AppError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        let mut removed = 0;
        for chunk in ids.chunks(DELETE_CHUNK_SIZE) {
            let mut query_builder =
                QueryBuilder::<Sqlite>::new("DELETE FROM documents WHERE collection = ");
            query_builder.push_bind(self.name);
            query_builder.push(" AND id IN (");
            let mut separated = query_builder.separated(", ");
            for id in chunk {
                separated.push_bind(id);
            }
            separated.push_unseparated(")");

            removed += query_builder.build().execute(&mut *tx).await?.rows_affected();
        }
        tx.commit().await?;

        debug!("Deleted {} documents", removed);
        Ok(removed)
    }
}
