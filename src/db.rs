//! PostgreSQL pool for the `postgres` storage backend.

use std::time::{Duration, Instant};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use sqlx::migrate::MigrateDatabase;
use sqlx::{
    postgres::{PgPool, PgPoolOptions},
    FromRow, Postgres,
};
use thiserror::Error;
use url::Url;

use crate::config::DatabaseConfig;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    ConnectionError(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    MigrationError(String),

    #[error("Database not found: {0}")]
    DatabaseNotFound(String),

    #[error("Failed to create database: {0}")]
    DatabaseCreationFailed(String),
}

pub type DbResult<T> = Result<T, DatabaseError>;

/// Shared connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DBHealthStatus {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Clone, Deserialize, Serialize, FromRow)]
pub struct DbInfo {
    pub name: Option<String>,
    pub version: Option<String>,
}

/// Reported under `db_health` by `/health`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseHealth {
    pub status: DBHealthStatus,
    pub response_time_ms: u64,
    pub pool_size: u32,
    pub idle_connections: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_info: Option<DbInfo>,
}

impl Database {
    /// Connects the pool, creating the database and applying migrations when configured to
    pub async fn connect(config: &DatabaseConfig) -> DbResult<Self> {
        info!("Connecting to PostgreSQL");
        debug!(
            "Pool settings: max_conn={}, min_conn={}, timeout={}s",
            config.max_connections, config.min_connections, config.connect_timeout_seconds
        );

        if !config.skip_db_exists_check {
            prepare_database(config).await?;
        }

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .connect(&config.url)
            .await
            .map_err(|e| {
                warn!("Failed to connect to database: {}", e);
                DatabaseError::ConnectionError(e)
            })?;

        if config.use_migrations {
            info!("Applying migrations");
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .map_err(|e| DatabaseError::MigrationError(e.to_string()))?;
        }

        info!("Database ready");
        Ok(Self { pool })
    }

    pub fn get_pool(&self) -> &PgPool {
        &self.pool
    }

    /// Never fails; problems are reported as `Unhealthy`
    pub async fn health_check(&self) -> DatabaseHealth {
        let started = Instant::now();
        let info = sqlx::query_as::<_, DbInfo>(
            "SELECT current_database() AS name, version() AS version",
        )
        .fetch_one(&self.pool)
        .await;
        let response_time_ms = started.elapsed().as_millis() as u64;

        let (status, message, db_info) = match info {
            Ok(info) => (DBHealthStatus::Healthy, None, Some(info)),
            Err(e) => (
                DBHealthStatus::Unhealthy,
                Some(format!("Database query failed: {}", e)),
                None,
            ),
        };

        DatabaseHealth {
            status,
            response_time_ms,
            pool_size: self.pool.size(),
            idle_connections: self.pool.num_idle(),
            message,
            db_info,
        }
    }

    pub async fn shutdown(&self) {
        let (size, idle) = (self.pool.size(), self.pool.num_idle());
        self.pool.close().await;
        info!("Database pool closed ({} connections, {} idle)", size, idle);
    }
}

async fn prepare_database(config: &DatabaseConfig) -> DbResult<()> {
    let name = database_name(&config.url).ok_or_else(|| {
        DatabaseError::DatabaseNotFound("No database name in DATABASE_URL".to_string())
    })?;

    if Postgres::database_exists(&config.url).await? {
        debug!("Database '{}' exists", name);
        return Ok(());
    }

    if !config.create_database_if_missing {
        return Err(DatabaseError::DatabaseNotFound(format!(
            "Database '{}' does not exist",
            name
        )));
    }

    info!("Creating database '{}'", name);
    Postgres::create_database(&config.url)
        .await
        .map_err(|e| DatabaseError::DatabaseCreationFailed(format!("'{}': {}", name, e)))
}

/// Database name from the path of a connection URL
fn database_name(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let name = parsed.path().trim_start_matches('/');
    (!name.is_empty()).then(|| name.to_string())
}
