//! Configuration module

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Large Wigle scans run to tens of megabytes
const DEFAULT_MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL; `None` runs on fallback storage only
    pub database_url: Option<String>,

    /// Server port
    pub port: u16,

    /// JSON file used when the database is unreachable
    pub fallback_storage_path: PathBuf,

    /// Wigle export served as the sample data set
    pub sample_data_path: PathBuf,

    /// How long a request waits for a database connection
    pub db_acquire_timeout: Duration,

    /// Request body cap for uploads and shares
    pub max_upload_bytes: usize,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),

            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),

            fallback_storage_path: lookup("FALLBACK_STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data-fallback.json")),

            sample_data_path: lookup("SAMPLE_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("public/data/sample-data.txt")),

            db_acquire_timeout: Duration::from_secs(
                lookup("DB_ACQUIRE_TIMEOUT_SECS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(3),
            ),

            max_upload_bytes: lookup("MAX_UPLOAD_BYTES")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),

            environment: lookup("ENVIRONMENT")
                .unwrap_or_else(|| "development".to_string()),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
