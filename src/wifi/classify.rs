//! Access Point Classifier
//!
//! Pure lookups from raw record fields to derived categories and colors.

use super::types::{ChannelBand, SecurityLevel, SignalStrength};

/// Color for anything without a dedicated entry
pub const UNKNOWN_COLOR: &str = "#94a3b8";

/// Highest 2.4GHz channel number
const MAX_2_4GHZ_CHANNEL: i32 = 14;

/// Classify an auth mode token.
///
/// Checks run in a fixed order and unrecognized non-empty tokens fall back
/// to `Medium`, not `None`.
pub fn security_level(auth_mode: &str) -> SecurityLevel {
    let mode = auth_mode.to_lowercase();

    if mode.contains("open") || mode.is_empty() {
        SecurityLevel::None
    } else if mode.contains("wep") {
        SecurityLevel::Low
    } else if mode.contains("wpa_psk") || mode.contains("wpa2_psk") {
        SecurityLevel::Medium
    } else if mode.contains("wpa3") || mode.contains("wpa2_wpa3") {
        SecurityLevel::High
    } else {
        SecurityLevel::Medium
    }
}

/// Classify RSSI (dBm). Each lower bound is inclusive.
pub fn signal_strength(rssi: i32) -> SignalStrength {
    if rssi >= -50 {
        SignalStrength::Excellent
    } else if rssi >= -65 {
        SignalStrength::Good
    } else if rssi >= -75 {
        SignalStrength::Fair
    } else {
        SignalStrength::Poor
    }
}

pub fn channel_band(channel: i32) -> ChannelBand {
    if channel > MAX_2_4GHZ_CHANNEL {
        ChannelBand::FiveGhz
    } else {
        ChannelBand::TwoFourGhz
    }
}

/// Pie chart color for a raw auth mode token
pub fn auth_mode_color(auth_mode: &str) -> &'static str {
    match auth_mode {
        "OPEN" => "#f87171",
        "WEP" => "#fb923c",
        "WPA_PSK" => "#facc15",
        "WPA2_PSK" => "#a3e635",
        "WPA_WPA2_PSK" => "#34d399",
        "WPA2" => "#2dd4bf",
        "WPA2_WPA3_PSK" => "#22d3ee",
        "WPA3_PSK" => "#38bdf8",
        _ => UNKNOWN_COLOR,
    }
}

/// Open networks: auth mode mentions "open" or is empty
pub fn is_open_network(auth_mode: &str) -> bool {
    auth_mode.is_empty() || auth_mode.to_lowercase().contains("open")
}

// ============================================================================
// TESTS
// ============================================================================
