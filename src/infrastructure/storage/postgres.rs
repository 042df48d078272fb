//! PostgreSQL backend. Each entity is one JSONB row keyed by its storage key.

use std::fmt::Debug;
use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use tokio::sync::OnceCell;

use crate::domain::storage::{Storage, StorageEntity, StorageKey};
use crate::domain::DomainError;

static TABLE_NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z_][a-z0-9_]{0,62}$").unwrap());

#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub url: String,
    pub max_connections: u32,
    /// How long to wait for a pooled connection before failing
    pub acquire_timeout: Duration,
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            acquire_timeout: Duration::from_secs(10),
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }
}

/// SQL text for one table, rendered once at construction
#[derive(Debug)]
struct TableQueries {
    create_table: String,
    select_one: String,
    select_all: String,
    insert: String,
    delete: String,
    exists: String,
}

impl TableQueries {
    fn for_table(table: &str) -> Self {
        Self {
            create_table: format!(
                "CREATE TABLE IF NOT EXISTS {table} (\
                 key VARCHAR(64) PRIMARY KEY, \
                 data JSONB NOT NULL, \
                 created_at TIMESTAMPTZ NOT NULL DEFAULT NOW())"
            ),
            select_one: format!("SELECT data FROM {table} WHERE key = $1"),
            select_all: format!("SELECT data FROM {table} ORDER BY created_at, key"),
            insert: format!("INSERT INTO {table} (key, data) VALUES ($1, $2)"),
            delete: format!("DELETE FROM {table} WHERE key = $1"),
            exists: format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE key = $1)"),
        }
    }
}

pub struct PostgresStorage<E> {
    pool: PgPool,
    table: String,
    queries: TableQueries,
    /// Set once the table has been created; failed attempts are retried on the next call
    table_ready: OnceCell<()>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Debug for PostgresStorage<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresStorage")
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}

impl<E> PostgresStorage<E>
where
    E: StorageEntity,
{
    /// Wrap an existing pool. The table name is interpolated into SQL, so it must be a
    /// plain lowercase identifier.
    pub fn new(pool: PgPool, table: impl Into<String>) -> Result<Self, DomainError> {
        let table = table.into();

        if !TABLE_NAME_PATTERN.is_match(&table) {
            return Err(DomainError::configuration(format!(
                "Invalid table name '{}'",
                table
            )));
        }

        Ok(Self {
            pool,
            queries: TableQueries::for_table(&table),
            table,
            table_ready: OnceCell::new(),
            _entity: PhantomData,
        })
    }

    /// Build the pool without opening a connection. An unreachable server surfaces on
    /// the first query or `ping`, not here.
    pub fn connect(config: &PostgresConfig, table: impl Into<String>) -> Result<Self, DomainError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_lazy(&config.url)
            .map_err(|e| DomainError::configuration(format!("Invalid database URL: {}", e)))?;

        Self::new(pool, table)
    }

    /// Create the table if it does not exist yet. Runs at most once successfully.
    pub async fn ensure_table(&self) -> Result<(), DomainError> {
        self.table_ready
            .get_or_try_init(|| async {
                sqlx::query(&self.queries.create_table)
                    .execute(&self.pool)
                    .await
                    .map(|_| ())
                    .map_err(storage_error("create table"))
            })
            .await
            .map(|_| ())
    }

    fn decode(row: &PgRow) -> Result<E, DomainError> {
        let data: serde_json::Value = row
            .try_get("data")
            .map_err(storage_error("read row"))?;

        serde_json::from_value(data)
            .map_err(|e| DomainError::storage(format!("Corrupt row: {}", e)))
    }
}

fn storage_error(action: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e| DomainError::storage(format!("Failed to {}: {}", action, e))
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[async_trait]
impl<E> Storage<E> for PostgresStorage<E>
where
    E: StorageEntity + 'static,
{
    async fn get(&self, key: &E::Key) -> Result<Option<E>, DomainError> {
        self.ensure_table().await?;

        let row = sqlx::query(&self.queries.select_one)
            .bind(key.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error("fetch entity"))?;

        row.as_ref().map(Self::decode).transpose()
    }

    async fn list(&self) -> Result<Vec<E>, DomainError> {
        self.ensure_table().await?;

        let rows = sqlx::query(&self.queries.select_all)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error("list entities"))?;

        rows.iter().map(Self::decode).collect()
    }

    async fn create(&self, entity: E) -> Result<E, DomainError> {
        self.ensure_table().await?;

        let data = serde_json::to_value(&entity)
            .map_err(|e| DomainError::internal(format!("Failed to encode entity: {}", e)))?;

        let result = sqlx::query(&self.queries.insert)
            .bind(entity.key().as_str())
            .bind(data)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(entity),
            Err(e) if is_unique_violation(&e) => Err(DomainError::conflict(format!(
                "'{}' already exists",
                entity.key().as_str()
            ))),
            Err(e) => Err(storage_error("insert entity")(e)),
        }
    }

    async fn delete(&self, key: &E::Key) -> Result<bool, DomainError> {
        self.ensure_table().await?;

        let result = sqlx::query(&self.queries.delete)
            .bind(key.as_str())
            .execute(&self.pool)
            .await
            .map_err(storage_error("delete entity"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, key: &E::Key) -> Result<bool, DomainError> {
        self.ensure_table().await?;

        sqlx::query_scalar::<_, bool>(&self.queries.exists)
            .bind(key.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error("check existence"))
    }

    async fn ping(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(storage_error("reach PostgreSQL"))?;

        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
