//! WiFi Data Service
//!
//! Owns the records cache and feeds it from either the sample data file or
//! user uploads.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info, warn};

use super::cache::AccessPointCache;
use super::parser::{parse_report, parse_wigle_wifi_data, ParseOptions, ParseReport};
use super::types::AccessPoint;
use super::WigleError;

/// Built-in fixture used when the sample file cannot be loaded
pub const DEFAULT_SAMPLE_DATA: &str = "WigleWifi-1.4,appRelease=v1.4.1,model=ESP32 Marauder,release=v1.4.1,device=ESP32 Marauder,display=SPI TFT,board=ESP32 Marauder,brand=JustCallMeKoko
MAC,SSID,AuthMode,FirstSeen,Channel,RSSI,CurrentLatitude,CurrentLongitude,AltitudeMeters,AccuracyMeters,Type
72:8C:52:2B:9F:7B,SkyCerda,[WPA2_PSK],2025-5-6 11:14:51,11,-89,30.7193718,-97.3206482,144.50,1.50,WIFI
72:8C:52:6B:9F:7B,,[WPA2_PSK],2025-5-6 11:14:51,11,-89,30.7193718,-97.3206482,144.50,1.50,WIFI
E8:D3:EB:6D:B9:86,Granger Lake Wifi,[WPA2_PSK],2025-5-6 11:14:59,6,-78,30.7194500,-97.3211517,144.50,1.50,WIFI
E8:D3:EB:6D:B9:89,,[OPEN],2025-5-6 11:14:59,6,-78,30.7194500,-97.3211517,144.50,1.50,WIFI
E8:D3:EB:6D:B9:83,,[WPA3_PSK],2025-5-6 11:14:59,6,-79,30.7194500,-97.3211517,144.50,1.50,WIFI
C8:B8:2F:33:DD:A4,,[WPA3_PSK],2025-5-6 11:14:59,6,-81,30.7194500,-97.3211517,144.50,1.50,WIFI
C8:B8:2F:33:DD:A6,Granger Lake Wifi,[WPA2_PSK],2025-5-6 11:14:59,6,-82,30.7194500,-97.3211517,144.50,1.50,WIFI
C8:B8:2F:33:DD:A8,,[OPEN],2025-5-6 11:14:59,6,-82,30.7194500,-97.3211517,144.50,1.50,WIFI";

#[derive(Debug, Clone)]
pub struct WifiDataService {
    cache: AccessPointCache,
    sample_path: PathBuf,
}

impl WifiDataService {
    pub fn new(sample_path: impl Into<PathBuf>) -> Self {
        Self {
            cache: AccessPointCache::new(),
            sample_path: sample_path.into(),
        }
    }

    /// Load the sample data file, serving the cache unless `force_reload`.
    ///
    /// A missing, unreadable or empty file falls back to
    /// [`DEFAULT_SAMPLE_DATA`]; this never fails. Without `force_reload` the
    /// parsed sample only fills an empty cache, so an upload that finished
    /// during the read is what gets returned.
    pub async fn load_sample_data(&self, force_reload: bool) -> Arc<[AccessPoint]> {
        if !force_reload {
            if let Some(cached) = self.cache.get() {
                return cached;
            }
        }

        info!("Loading sample data from {}", self.sample_path.display());

        let text = match self.read_sample().await {
            Ok(text) if !text.is_empty() => {
                info!("Loaded sample data, length: {}", text.len());
                text
            }
            Ok(_) => {
                warn!("Empty sample data received, using default data");
                DEFAULT_SAMPLE_DATA.to_string()
            }
            Err(e) => {
                error!("Error loading sample data: {}", e);
                info!("Loading default sample data");
                DEFAULT_SAMPLE_DATA.to_string()
            }
        };

        let access_points = parse_wigle_wifi_data(&text);
        if force_reload {
            self.cache.set(access_points)
        } else {
            self.cache.get_or_set(access_points)
        }
    }

    async fn read_sample(&self) -> Result<String, WigleError> {
        tokio::fs::read_to_string(&self.sample_path)
            .await
            .map_err(WigleError::SampleUnavailable)
    }

    /// Parse uploaded file content and make it the cached data set
    pub fn parse_user_data(&self, content: &[u8], options: ParseOptions) -> Result<ParseReport, WigleError> {
        let text = std::str::from_utf8(content).map_err(|e| {
            error!("Error parsing user WiFi data: {}", e);
            WigleError::ParseFailed
        })?;

        let mut report = parse_report(text, options);
        let records = std::mem::take(&mut report.access_points);
        report.access_points = self.cache.set(records).to_vec();

        info!("Parsed {} access points from upload", report.access_points.len());
        Ok(report)
    }

    /// Entry point for file uploads; empty content is rejected
    pub fn handle_file_upload(&self, content: &[u8], options: ParseOptions) -> Result<ParseReport, WigleError> {
        if content.is_empty() {
            return Err(WigleError::EmptyFile);
        }
        self.parse_user_data(content, options)
    }

    pub fn cached(&self) -> Option<Arc<[AccessPoint]>> {
        self.cache.get()
    }

    pub fn invalidate(&self) {
        self.cache.invalidate();
    }
}

// ============================================================================
// TESTS
// ============================================================================
