//! Distributions and summary statistics
//!
//! Every function here is a pure pass over the record slice; nothing is
//! mutated and nothing fails.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::classify::{auth_mode_color, channel_band, is_open_network, security_level, signal_strength};
use super::types::{
    AccessPoint, AuthModeCount, ChannelCount, MarkerInfo, NetworkStats, SecurityCount,
    SecurityLevel, SignalCount, SignalStrength,
};

/// Bucket name used for records with an empty auth mode
pub const UNKNOWN_AUTH_MODE: &str = "UNKNOWN";

// ============================================================================
// DISTRIBUTIONS
// ============================================================================

/// Count records per raw auth mode, in order of first appearance.
pub fn auth_mode_distribution(access_points: &[AccessPoint]) -> Vec<AuthModeCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<AuthModeCount> = Vec::new();

    for ap in access_points {
        let name = if ap.auth_mode.is_empty() {
            UNKNOWN_AUTH_MODE
        } else {
            ap.auth_mode.as_str()
        };

        match index.get(name) {
            Some(&i) => counts[i].value += 1,
            None => {
                index.insert(name, counts.len());
                counts.push(AuthModeCount {
                    name: name.to_string(),
                    value: 1,
                    color: auth_mode_color(name),
                });
            }
        }
    }

    counts
}

/// Count records per channel, ascending. Channel 0 (unparsed) is left out.
pub fn channel_distribution(access_points: &[AccessPoint]) -> Vec<ChannelCount> {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();

    for ap in access_points.iter().filter(|ap| ap.channel != 0) {
        *counts.entry(ap.channel).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(channel, count)| ChannelCount { channel, count })
        .collect()
}

/// Always four entries, `None` through `High`.
pub fn security_distribution(access_points: &[AccessPoint]) -> Vec<SecurityCount> {
    let mut counts = [0usize; 4];
    for ap in access_points {
        counts[security_level(&ap.auth_mode) as usize] += 1;
    }

    SecurityLevel::ALL
        .iter()
        .zip(counts)
        .map(|(&security, count)| SecurityCount {
            security,
            count,
            color: security.color(),
        })
        .collect()
}

/// Always four entries, `Excellent` through `Poor`.
pub fn signal_distribution(access_points: &[AccessPoint]) -> Vec<SignalCount> {
    let mut counts = [0usize; 4];
    for ap in access_points {
        counts[signal_strength(ap.rssi) as usize] += 1;
    }

    SignalStrength::ALL
        .iter()
        .zip(counts)
        .map(|(&signal, count)| SignalCount {
            signal,
            count,
            color: signal.color(),
        })
        .collect()
}

// ============================================================================
// STATISTICS
// ============================================================================

pub fn network_stats(access_points: &[AccessPoint]) -> NetworkStats {
    let total_networks = access_points.len();

    let unique_network_count = access_points
        .iter()
        .map(|ap| ap.ssid.as_str())
        .collect::<HashSet<_>>()
        .len();

    let open_network_count = access_points
        .iter()
        .filter(|ap| is_open_network(&ap.auth_mode))
        .count();

    let (open_network_percentage, avg_signal_strength) = if total_networks == 0 {
        (None, None)
    } else {
        let total = total_networks as f64;
        let rssi_sum: i64 = access_points.iter().map(|ap| i64::from(ap.rssi)).sum();
        (
            Some(round_one_decimal(open_network_count as f64 / total * 100.0)),
            Some(round_one_decimal(rssi_sum as f64 / total)),
        )
    };

    NetworkStats {
        total_networks,
        unique_network_count,
        open_network_count,
        open_network_percentage,
        most_common_channel: most_common_channel(access_points),
        avg_signal_strength,
    }
}

/// Most frequent channel.
///
/// Among equally frequent channels, the one whose last occurrence comes
/// latest in the input wins. Empty input gives 0.
pub fn most_common_channel(access_points: &[AccessPoint]) -> i32 {
    let mut counts: HashMap<i32, usize> = HashMap::new();
    for ap in access_points {
        *counts.entry(ap.channel).or_insert(0) += 1;
    }

    let Some(&max) = counts.values().max() else {
        return 0;
    };

    access_points
        .iter()
        .rev()
        .find(|ap| counts[&ap.channel] == max)
        .map(|ap| ap.channel)
        .unwrap_or(0)
}

/// One decimal place, rounded on the exact binary value.
///
/// Only `x.x25` and `x.x75` style values are exact ties in binary; those
/// round away from zero. Everything else goes through decimal formatting,
/// so 1.45 (stored as 1.4499..) becomes 1.4.
fn round_one_decimal(value: f64) -> f64 {
    let magnitude = value.abs();
    let tenths = magnitude * 10.0;
    let rounded = if (magnitude * 4.0).fract() == 0.0 && tenths.fract() == 0.5 {
        tenths.ceil() / 10.0
    } else {
        format!("{:.1}", magnitude).parse().unwrap_or(magnitude)
    };
    rounded.copysign(value)
}

// ============================================================================
// MAP MARKERS
// ============================================================================

/// Which category drives marker color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerColorMode {
    #[default]
    Security,
    Signal,
}

/// Build map markers, colored by security level.
///
/// Records with a latitude or longitude of exactly 0 are treated as having
/// no position and dropped, which also drops real points on the equator or
/// the prime meridian.
pub fn prepare_map_markers(access_points: &[AccessPoint]) -> Vec<MarkerInfo> {
    access_points
        .iter()
        .filter(|ap| has_position(ap))
        .map(|ap| {
            let security_level = security_level(&ap.auth_mode);
            MarkerInfo {
                access_point: ap.clone(),
                id: ap.mac.clone(),
                security_level,
                signal_level: signal_strength(ap.rssi),
                channel_band: channel_band(ap.channel),
                color: security_level.color(),
            }
        })
        .collect()
}

/// Repaint markers for the selected view mode
pub fn recolor_markers(markers: &mut [MarkerInfo], mode: MarkerColorMode) {
    for marker in markers {
        marker.color = match mode {
            MarkerColorMode::Security => marker.security_level.color(),
            MarkerColorMode::Signal => marker.signal_level.color(),
        };
    }
}

fn has_position(ap: &AccessPoint) -> bool {
    let set = |v: f64| v != 0.0 && !v.is_nan();
    set(ap.current_latitude) && set(ap.current_longitude)
}

// ============================================================================
// DASHBOARD BUNDLE
// ============================================================================

/// Everything the dashboard renders for one record set
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub stats: NetworkStats,
    pub auth_mode_distribution: Vec<AuthModeCount>,
    pub channel_distribution: Vec<ChannelCount>,
    pub security_distribution: Vec<SecurityCount>,
    pub signal_distribution: Vec<SignalCount>,
    pub markers: Vec<MarkerInfo>,
}

impl DashboardSummary {
    pub fn build(access_points: &[AccessPoint], mode: MarkerColorMode) -> Self {
        let mut markers = prepare_map_markers(access_points);
        recolor_markers(&mut markers, mode);

        Self {
            stats: network_stats(access_points),
            auth_mode_distribution: auth_mode_distribution(access_points),
            channel_distribution: channel_distribution(access_points),
            security_distribution: security_distribution(access_points),
            signal_distribution: signal_distribution(access_points),
            markers,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
