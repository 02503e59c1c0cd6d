//! Application state

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};

use crate::BoxError;
use crate::config::Config;

/// Shared application state, cloned into every handler
#[derive(Clone)]
pub struct AppState {
    /// SQLite connection pool
    pub pool: SqlitePool,
    /// JWT secret for staff authentication
    pub jwt_secret: String,
    /// Token lifetime in hours
    pub jwt_expiry_hours: i64,
}

impl AppState {
    /// Open the pool (WAL, foreign keys on) and apply migrations
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let options = SqliteConnectOptions::from_str(&config.database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(std::time::Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect_with(options)
            .await?;
        tracing::info!(
            max_connections = config.db_max_connections,
            "Database connection established"
        );

        Self::with_pool(pool, config).await
    }

    /// Wrap an already open pool (tests use an in-memory one)
    pub async fn with_pool(pool: SqlitePool, config: &Config) -> Result<Self, BoxError> {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");

        Ok(Self {
            pool,
            jwt_secret: config.jwt_secret.clone(),
            jwt_expiry_hours: config.jwt_expiry_hours,
        })
    }

    /// Close the pool, waiting for checked-out connections to return
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database pool closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn file_database_is_created_and_migrated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("menu.db");
        let config = Config {
            database_url: format!("sqlite://{}", path.display()),
            ..Config::for_tests()
        };

        let state = AppState::new(&config).await.unwrap();
        let (allergens,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM allergen_translations")
            .fetch_one(&state.pool)
            .await
            .unwrap();
        assert!(allergens > 0);

        state.close().await;
        assert!(path.exists());
    }
}
