//! WiFi scan data core
//!
//! ```text
//! raw Wigle text ──► parser ──► Vec<AccessPoint> ──► classify / aggregate ──► JSON
//!                                     │
//!                                     └──► service cache (last upload wins)
//! ```

pub mod aggregate;
pub mod cache;
pub mod classify;
pub mod parser;
pub mod service;
pub mod table;
pub mod types;

pub use aggregate::{DashboardSummary, MarkerColorMode};
pub use parser::{parse_wigle_wifi_data, FieldWarning, ParseOptions};
pub use service::WifiDataService;
pub use types::*;

/// Errors surfaced by the ingestion service
#[derive(Debug, thiserror::Error)]
pub enum WigleError {
    #[error("Failed to parse the uploaded file. Please make sure it's in the correct Wigle WiFi format.")]
    ParseFailed,

    #[error("Empty file content")]
    EmptyFile,

    #[error("Failed to load sample data: {0}")]
    SampleUnavailable(#[source] std::io::Error),
}
