//! Database module - PostgreSQL connection and migrations

use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};

/// Create database connection pool.
///
/// The pool connects lazily so the server can start while the database is
/// down; requests then fall back to JSON storage.
pub fn create_pool(database_url: &str, acquire_timeout: Duration) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(acquire_timeout)
        .connect_lazy(database_url)
}

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    // Simple query protocol, the schema holds several statements
    sqlx::raw_sql(SCHEMA_SQL)
        .execute(pool)
        .await?;

    tracing::info!("Database schema applied successfully");
    Ok(())
}

/// Connectivity check
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Database schema SQL
const SCHEMA_SQL: &str = r#"
-- Shared access points
CREATE TABLE IF NOT EXISTS access_points (
    id TEXT PRIMARY KEY DEFAULT gen_random_uuid()::text,
    mac VARCHAR(64) NOT NULL,
    ssid VARCHAR(255) NOT NULL DEFAULT '',
    auth_mode VARCHAR(100) NOT NULL DEFAULT '',
    first_seen VARCHAR(64) NOT NULL DEFAULT '',
    channel INT NOT NULL DEFAULT 0,
    rssi INT NOT NULL DEFAULT 0,
    current_latitude DOUBLE PRECISION NOT NULL DEFAULT 0,
    current_longitude DOUBLE PRECISION NOT NULL DEFAULT 0,
    altitude_meters DOUBLE PRECISION NOT NULL DEFAULT 0,
    accuracy_meters DOUBLE PRECISION NOT NULL DEFAULT 0,
    ap_type VARCHAR(32) NOT NULL DEFAULT '',
    city VARCHAR(255),
    state VARCHAR(255),
    uploaded_by VARCHAR(255),
    shared_publicly BOOLEAN NOT NULL DEFAULT false,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_access_points_location ON access_points(current_latitude, current_longitude, ssid);
CREATE INDEX IF NOT EXISTS idx_access_points_shared ON access_points(shared_publicly);
"#;
