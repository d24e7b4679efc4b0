//! WiFi Types
//!
//! Records and derived categories shared by the parser, classifier and
//! aggregator. Field names serialize exactly as the Wigle CSV columns so the
//! dashboard can consume them unchanged.

use serde::{Deserialize, Serialize};

// ============================================================================
// ACCESS POINT
// ============================================================================

/// One detected WiFi network observation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AccessPoint {
    #[serde(rename = "MAC")]
    pub mac: String,
    #[serde(rename = "SSID")]
    pub ssid: String,
    #[serde(rename = "AuthMode")]
    pub auth_mode: String,
    #[serde(rename = "FirstSeen")]
    pub first_seen: String,
    #[serde(rename = "Channel")]
    pub channel: i32,
    #[serde(rename = "RSSI")]
    pub rssi: i32,
    #[serde(rename = "CurrentLatitude")]
    pub current_latitude: f64,
    #[serde(rename = "CurrentLongitude")]
    pub current_longitude: f64,
    #[serde(rename = "AltitudeMeters")]
    pub altitude_meters: f64,
    #[serde(rename = "AccuracyMeters")]
    pub accuracy_meters: f64,
    #[serde(rename = "Type")]
    pub kind: String,
}

// ============================================================================
// CLASSIFICATION
// ============================================================================

/// Security level derived from the auth mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SecurityLevel {
    None,
    Low,
    Medium,
    High,
}

impl SecurityLevel {
    /// All levels, weakest first
    pub const ALL: [SecurityLevel; 4] = [
        SecurityLevel::None,
        SecurityLevel::Low,
        SecurityLevel::Medium,
        SecurityLevel::High,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SecurityLevel::None => "None",
            SecurityLevel::Low => "Low",
            SecurityLevel::Medium => "Medium",
            SecurityLevel::High => "High",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            SecurityLevel::None => "#f87171",   // Red
            SecurityLevel::Low => "#fb923c",    // Orange
            SecurityLevel::Medium => "#facc15", // Yellow
            SecurityLevel::High => "#4ade80",   // Green
        }
    }
}

impl std::fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Signal strength category derived from RSSI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalStrength {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl SignalStrength {
    /// All categories, strongest first
    pub const ALL: [SignalStrength; 4] = [
        SignalStrength::Excellent,
        SignalStrength::Good,
        SignalStrength::Fair,
        SignalStrength::Poor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SignalStrength::Excellent => "Excellent",
            SignalStrength::Good => "Good",
            SignalStrength::Fair => "Fair",
            SignalStrength::Poor => "Poor",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            SignalStrength::Excellent => "#4ade80", // Green
            SignalStrength::Good => "#facc15",      // Yellow
            SignalStrength::Fair => "#fb923c",      // Orange
            SignalStrength::Poor => "#f87171",      // Red
        }
    }
}

impl std::fmt::Display for SignalStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Radio band derived from the channel number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelBand {
    #[serde(rename = "2.4GHz")]
    TwoFourGhz,
    #[serde(rename = "5GHz")]
    FiveGhz,
}

impl ChannelBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelBand::TwoFourGhz => "2.4GHz",
            ChannelBand::FiveGhz => "5GHz",
        }
    }
}

impl std::fmt::Display for ChannelBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// DISTRIBUTIONS
// ============================================================================

/// Auth mode slice for the pie chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthModeCount {
    pub name: String,
    pub value: usize,
    pub color: &'static str,
}

/// Channel bar for the bar chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelCount {
    pub channel: i32,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecurityCount {
    pub security: SecurityLevel,
    pub count: usize,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalCount {
    pub signal: SignalStrength,
    pub count: usize,
    pub color: &'static str,
}

// ============================================================================
// SUMMARY + MARKERS
// ============================================================================

/// Summary statistics over a record set
///
/// `open_network_percentage` and `avg_signal_strength` are `None` for an
/// empty set instead of propagating a division by zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkStats {
    pub total_networks: usize,
    pub unique_network_count: usize,
    pub open_network_count: usize,
    pub open_network_percentage: Option<f64>,
    pub most_common_channel: i32,
    pub avg_signal_strength: Option<f64>,
}

/// Map marker: the record plus its derived categories
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerInfo {
    #[serde(flatten)]
    pub access_point: AccessPoint,
    pub id: String,
    pub security_level: SecurityLevel,
    pub signal_level: SignalStrength,
    pub channel_band: ChannelBand,
    pub color: &'static str,
}
