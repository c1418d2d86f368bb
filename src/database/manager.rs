use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};

use crate::config::DatabaseConfig;

/// Errors from the storage layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Map a failed INSERT/UPDATE, turning unique-constraint violations into `Conflict`.
    pub fn from_write(err: sqlx::Error, conflict_message: impl FnOnce() -> String) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                DatabaseError::Conflict(conflict_message())
            }
            _ => DatabaseError::Sqlx(err),
        }
    }
}

/// Builds the shared connection pool. The pool is handed to components
/// explicitly; nothing reaches it through global state.
pub struct DatabaseManager;

impl DatabaseManager {
    /// Create the pool without connecting. Connections are opened on first use,
    /// so the server can start while the database is still coming up.
    pub fn connect_lazy(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        let url = config
            .url
            .as_deref()
            .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;
        url::Url::parse(url).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect_lazy(url)?;

        info!("Created database pool for: {}", Self::redacted_url(url));
        Ok(pool)
    }

    /// Create the pool and fail unless a connection can be opened now.
    pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        let pool = Self::connect_lazy(config)?;
        Self::health_check(&pool).await?;
        Ok(pool)
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

    /// Log the outcome of a startup connectivity probe without failing startup.
    pub async fn probe(pool: &PgPool) {
        match Self::health_check(pool).await {
            Ok(()) => info!("Database connected successfully"),
            Err(e) => error!("Database connection failed: {}", e),
        }
    }

    /// Connection string with the password masked, for logs.
    pub fn redacted_url(raw: &str) -> String {
        match url::Url::parse(raw) {
            Ok(mut url) => {
                if url.password().is_some() {
                    let _ = url.set_password(Some("****"));
                }
                url.to_string()
            }
            Err(_) => "<invalid url>".to_string(),
        }
    }
}
