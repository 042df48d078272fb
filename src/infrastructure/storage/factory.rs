//! Storage factory for runtime storage selection

use std::sync::Arc;

use tracing::warn;

use crate::config::StorageSettings;
use crate::domain::storage::{Storage, StorageEntity};
use crate::domain::DomainError;

use super::in_memory::InMemoryStorage;
use super::postgres::{PostgresConfig, PostgresStorage};

/// Supported storage types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageType {
    /// In-memory storage (for testing/development)
    InMemory,
    /// PostgreSQL storage
    Postgres,
}

impl StorageType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Some(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Some(Self::Postgres),
            _ => None,
        }
    }
}

/// Resolved storage configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    InMemory,
    Postgres(PostgresConfig),
}

impl StorageConfig {
    /// Resolve the `[storage]` settings section
    pub fn from_settings(settings: &StorageSettings) -> Result<Self, DomainError> {
        let storage_type = StorageType::parse(&settings.backend).ok_or_else(|| {
            DomainError::configuration(format!(
                "Unknown storage backend '{}'",
                settings.backend
            ))
        })?;

        match storage_type {
            StorageType::InMemory => Ok(Self::InMemory),
            StorageType::Postgres => {
                let url = settings.database_url.clone().ok_or_else(|| {
                    DomainError::configuration(
                        "storage.database_url is required for the postgres backend",
                    )
                })?;

                Ok(Self::Postgres(
                    PostgresConfig::new(url)
                        .with_max_connections(settings.max_connections)
                        .with_acquire_timeout(settings.acquire_timeout()),
                ))
            }
        }
    }

    /// Returns the storage type
    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory => StorageType::InMemory,
            Self::Postgres(_) => StorageType::Postgres,
        }
    }
}

/// Factory for creating storage instances
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Creates a storage instance based on the configuration
    pub async fn create<E>(
        config: &StorageConfig,
        table_name: &str,
    ) -> Result<Arc<dyn Storage<E>>, DomainError>
    where
        E: StorageEntity + 'static,
    {
        match config {
            StorageConfig::InMemory => Ok(Arc::new(InMemoryStorage::<E>::new())),
            StorageConfig::Postgres(pg_config) => {
                let storage = PostgresStorage::<E>::connect(pg_config, table_name)?;

                // An outage shows up in the status check; startup does not fail on one.
                if let Err(e) = storage.ensure_table().await {
                    warn!(
                        table = table_name,
                        error = %e,
                        "PostgreSQL unavailable, table creation deferred"
                    );
                }

                Ok(Arc::new(storage))
            }
        }
    }
}
