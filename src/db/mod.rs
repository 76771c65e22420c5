//! Database module for the Anime List API
//!
//! Provides database connection pool management, health check functionality,
//! and one repository module per stored entity.

pub mod anime;
pub mod anime_lists;
pub mod users;
pub mod webhooks;

use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Error as SqlxError;
use std::time::Duration;
use thiserror::Error;

/// Database-related errors
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to connect to database: {0}")]
    ConnectionError(#[from] SqlxError),

    #[error("Database health check failed: {0}")]
    HealthCheckError(String),
}

/// Repository-related errors
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    /// A unique constraint rejected the write; holds the constraint name
    #[error("Duplicate record: {0}")]
    Duplicate(String),
}

impl RepositoryError {
    /// Classify an error raised by an INSERT or UPDATE
    pub(crate) fn from_write(err: sqlx::Error) -> Self {
        match &err {
            SqlxError::Database(db_err) if db_err.is_unique_violation() => {
                RepositoryError::Duplicate(db_err.constraint().unwrap_or("unique").to_string())
            }
            _ => RepositoryError::DatabaseError(err),
        }
    }
}

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Database connection pool wrapper
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool
    ///
    /// # Arguments
    /// * `database_url` - PostgreSQL connection string
    pub async fn new(database_url: &str) -> Result<Self, DbError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .min_connections(2)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Wrap an existing pool
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run the embedded migrations
    pub async fn run_migrations(&self) -> Result<(), DbError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| DbError::ConnectionError(SqlxError::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Check database health by executing a simple query
    pub async fn health_check(&self) -> Result<(), DbError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| DbError::HealthCheckError(e.to_string()))?;
        Ok(())
    }

    /// Close the database connection pool gracefully
    pub async fn close(&self) {
        self.pool.close().await;
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_write_keeps_non_constraint_errors() {
        let err = RepositoryError::from_write(SqlxError::RowNotFound);
        assert!(matches!(err, RepositoryError::DatabaseError(_)));
    }

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Duplicate("users_email_key".to_string());
        assert_eq!(err.to_string(), "Duplicate record: users_email_key");
    }

    #[tokio::test]
    #[ignore] // Requires a running database
    async fn test_database_connection() {
        dotenvy::dotenv().ok();
        let database_url = std::env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set for tests");

        let db = Database::new(&database_url).await;
        assert!(db.is_ok(), "Should connect to database");

        let db = db.unwrap();
        let health = db.health_check().await;
        assert!(health.is_ok(), "Health check should pass");
    }
}
