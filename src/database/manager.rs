use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tracing::info;

use crate::config::DatabaseConfig;

/// Builds the connection pool for the tenant-binding database
pub struct DatabaseManager;

impl DatabaseManager {
    /// Create the pool without connecting; the first query opens a connection.
    /// Lets the console start (and report degraded health) while the database is down.
    pub fn connect_lazy(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect_lazy(&config.url)?;

        info!(
            max_connections = config.max_connections,
            "Created lazy database pool for: {}",
            Self::redacted_url(&config.url)
        );
        Ok(pool)
    }

    /// Strip credentials from a connection URL before logging it
    fn redacted_url(raw: &str) -> String {
        match url::Url::parse(raw) {
            Ok(mut url) => {
                let _ = url.set_password(None);
                let _ = url.set_username("");
                url.to_string()
            }
            Err(_) => "<invalid database url>".to_string(),
        }
    }
}
