//! Database connection pool management
//!
//! Uses sqlx PgPool with explicit connection limits and a bounded
//! acquire timeout so a saturated pool fails fast instead of queueing
//! indefinitely.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::{Connection, PgPool};

/// How long a caller may wait for a free connection.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Create a PostgreSQL connection pool and verify it with a ping.
///
/// # Arguments
///
/// * `database_url` - PostgreSQL connection string
/// * `max_connections` - Maximum number of connections in the pool
///
/// # Errors
///
/// Returns an error if the pool cannot be created or the initial ping
/// fails. Callers treat this as fatal at startup.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(database_url)
        .await?;

    ping(&pool).await?;

    Ok(pool)
}

/// Check out a connection and round-trip it to the server.
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    let mut conn = pool.acquire().await?;
    conn.ping().await
}
